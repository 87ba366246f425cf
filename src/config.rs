//! Run configuration files.
//!
//! A run is described in TOML. The control parameters sit at the top level, the
//! atmosphere and every submodel are tables. Submodels are selected by their `type`:
//!
//! ```toml
//! experiment = "grey RCE"
//! timestep = 0.5
//! max_iterations = 2000
//! writeevery = 10.0  # days; an integer selects every nth iteration
//! outfile = "rce.jsonl"
//!
//! [atmosphere]
//! n_levels = 60
//! surface_temperature = 295.0
//!
//! [humidity]
//! type = "FixedRH"
//! parameters = { rh = 0.75 }
//!
//! [convection]
//! type = "HardAdjustment"
//! ```
//!
//! Omitted submodels take the defaults of [`RCEBuilder`].

use crate::builder::RCEBuilder;
use rce_core::atmosphere::Atmosphere;
use rce_core::errors::{RCEError, RCEResult};
use rce_core::parameters::RCEParameters;
use rce_core::profile::{FloatValue, Profile};
use rce_core::rce::RCE;
use rce_core::submodel::{Cloud, Convection, Humidity, LapseRate, Radiation, Upwelling};
use rce_core::surface::Surface;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters of an idealised initial column, see [`Atmosphere::idealised`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealisedAtmosphere {
    pub n_levels: usize,
    /// unit: Pa
    pub surface_pressure: FloatValue,
    /// unit: Pa
    pub top_pressure: FloatValue,
    /// unit: K
    pub surface_temperature: FloatValue,
}

impl Default for IdealisedAtmosphere {
    fn default() -> Self {
        Self {
            n_levels: 60,
            surface_pressure: 101325.0,
            top_pressure: 10.0,
            surface_temperature: 288.0,
        }
    }
}

/// The initial state of the column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AtmosphereConfig {
    /// Explicit profiles
    Profiles {
        plev: Vec<FloatValue>,
        phlev: Vec<FloatValue>,
        #[serde(rename = "T")]
        temperature: Vec<FloatValue>,
        #[serde(rename = "H2O")]
        humidity: Vec<FloatValue>,
    },
    Idealised(IdealisedAtmosphere),
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        AtmosphereConfig::Idealised(IdealisedAtmosphere::default())
    }
}

impl AtmosphereConfig {
    pub fn build(&self) -> RCEResult<Atmosphere> {
        match self {
            AtmosphereConfig::Profiles {
                plev,
                phlev,
                temperature,
                humidity,
            } => Atmosphere::new(
                Profile::from_vec(plev.clone()),
                Profile::from_vec(phlev.clone()),
                Profile::from_vec(temperature.clone()),
                Profile::from_vec(humidity.clone()),
            ),
            AtmosphereConfig::Idealised(config) => Atmosphere::idealised(
                config.n_levels,
                config.surface_pressure,
                config.top_pressure,
                config.surface_temperature,
            ),
        }
    }
}

/// A complete model run
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub atmosphere: AtmosphereConfig,
    #[serde(flatten)]
    pub parameters: RCEParameters,
    /// JSON-lines file for the trajectory. Nothing is written if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfile: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiation: Option<Box<dyn Radiation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Box<dyn Humidity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<Box<dyn Surface>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<Box<dyn Cloud>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convection: Option<Box<dyn Convection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lapse: Option<Box<dyn LapseRate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upwelling: Option<Box<dyn Upwelling>>,
}

impl RunConfig {
    /// Parse a configuration.
    ///
    /// Malformed TOML, unknown submodel types and a `writeevery` that is neither an
    /// integer nor a float are all configuration errors.
    pub fn from_toml(content: &str) -> RCEResult<Self> {
        toml::from_str(content).map_err(|e| RCEError::configuration(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> RCEResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// A builder with every configured submodel and the output.
    pub fn into_builder(self) -> RCEBuilder {
        let mut builder = RCEBuilder::new();
        builder.with_parameters(self.parameters);
        if let Some(outfile) = self.outfile {
            builder.with_outfile(outfile);
        }
        if let Some(radiation) = self.radiation {
            builder.with_radiation(radiation);
        }
        if let Some(humidity) = self.humidity {
            builder.with_humidity(humidity);
        }
        if let Some(surface) = self.surface {
            builder.with_surface(surface);
        }
        if let Some(cloud) = self.cloud {
            builder.with_cloud(cloud);
        }
        if let Some(convection) = self.convection {
            builder.with_convection(convection);
        }
        if let Some(lapse) = self.lapse {
            builder.with_lapse(lapse);
        }
        if let Some(upwelling) = self.upwelling {
            builder.with_upwelling(upwelling);
        }
        builder
    }

    /// Build the initial atmosphere and the model.
    pub fn build(self) -> RCEResult<RCE> {
        let atmosphere = self.atmosphere.build()?;
        self.into_builder().build(atmosphere)
    }
}
