//! A one-dimensional radiative-convective equilibrium (RCE) model.
//!
//! The iteration engine and the submodel contracts live in [`rce_core`], the default
//! physical schemes in [`rce_components`]. This crate glues both together: [`RCEBuilder`]
//! fills in default schemes for every submodel that is not supplied, and [`RunConfig`]
//! describes a complete run in a TOML file.
//!
//! ```no_run
//! use rce::{Atmosphere, RCEBuilder};
//!
//! let atmosphere = Atmosphere::idealised(60, 101325.0, 10.0, 288.0).unwrap();
//! let mut model = RCEBuilder::new()
//!     .with_timestep(0.5)
//!     .with_outfile("rce.jsonl")
//!     .build(atmosphere)
//!     .unwrap();
//! model.run().unwrap();
//! ```

pub mod builder;
pub mod config;
#[cfg(feature = "python")]
pub mod python;

pub use builder::RCEBuilder;
pub use config::{AtmosphereConfig, RunConfig};
pub use rce_components::components;
pub use rce_core::atmosphere::Atmosphere;
pub use rce_core::errors::{RCEError, RCEResult};
pub use rce_core::parameters::{RCEParameters, WriteEvery};
pub use rce_core::rce::{RunStatus, RCE};
