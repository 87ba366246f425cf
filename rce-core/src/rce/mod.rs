//! The radiative-convective equilibrium controller.
//!
//! An [`RCE`] couples one instance of every submodel to an atmospheric column and a
//! surface, and steps the column forward in time until the temperature change per
//! iteration is below a threshold on every level, or until a maximum number of
//! iterations is reached.
//!
//! Every iteration applies the submodels in a fixed order, because later steps depend on
//! the mutations of earlier ones:
//!
//! 1. radiation (after updating the solar angle) provides fluxes and heating rates
//! 2. the surface absorbs the net surface flux
//! 3. the critical lapse rate is calculated from the current state
//! 4. the radiative heating is applied to the temperature
//! 5. convection stabilises the heated profile
//! 6. upwelling cools the profile
//! 7. the geopotential height is recomputed
//! 8. the humidity is updated from the adjusted state
//! 9. the temperature change of the iteration is stored as `deltaT`
//!
//! after which the state is optionally written and the convergence criterion checked.

mod runtime;

#[cfg(test)]
mod tests;

pub use runtime::{RunStatus, RCE};
