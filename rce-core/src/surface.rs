//! Surface state and the surface model contract.

use crate::atmosphere::Atmosphere;
use crate::constants::{DENSITY_SEA_WATER, SPECIFIC_HEAT_CAPACITY_SEA_WATER};
use crate::errors::RCEResult;
use crate::profile::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Radiative fluxes at the surface (W / m^2), taken from level 0 of the heating rates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceFluxes {
    pub sw_down: FloatValue,
    pub sw_up: FloatValue,
    pub lw_down: FloatValue,
    pub lw_up: FloatValue,
}

impl SurfaceFluxes {
    /// Net downward flux into the surface.
    pub fn net_down(&self) -> FloatValue {
        self.sw_down - self.sw_up + self.lw_down - self.lw_up
    }
}

/// State of the surface below the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceState {
    /// Surface temperature (K)
    pub temperature: FloatValue,
    /// Surface pressure (Pa).
    /// Overwritten with the lowest half-level pressure when a run starts.
    pub pressure: FloatValue,
    pub albedo: FloatValue,
    /// Density of the surface layer (kg / m^3)
    pub rho: FloatValue,
    /// Specific heat capacity of the surface layer (J / kg / K)
    pub c_p: FloatValue,
    /// Depth of the surface layer (m)
    pub depth: FloatValue,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            temperature: 288.0,
            pressure: 101325.0,
            albedo: 0.2,
            rho: DENSITY_SEA_WATER,
            c_p: SPECIFIC_HEAT_CAPACITY_SEA_WATER,
            depth: 1.0,
        }
    }
}

impl SurfaceState {
    /// Heat capacity per unit area (J / m^2 / K)
    pub fn heat_capacity(&self) -> FloatValue {
        self.rho * self.c_p * self.depth
    }

    /// Named scalar fields as written to output records.
    pub fn fields(&self) -> Vec<(&'static str, FloatValue)> {
        vec![
            ("temperature", self.temperature),
            ("pressure", self.pressure),
            ("albedo", self.albedo),
            ("rho", self.rho),
            ("c_p", self.c_p),
            ("depth", self.depth),
            ("heat_capacity", self.heat_capacity()),
        ]
    }
}

/// A surface model.
///
/// Owns a [`SurfaceState`] and updates it from the radiative fluxes of each iteration.
#[typetag::serde(tag = "type")]
pub trait Surface: Debug + Send + Sync {
    fn state(&self) -> &SurfaceState;

    fn state_mut(&mut self) -> &mut SurfaceState;

    /// Apply the surface energy balance for one time step (days).
    fn adjust(&mut self, fluxes: &SurfaceFluxes, timestep: FloatValue);

    /// Effective heat capacity seen by the convection scheme (J / m^2 / K).
    ///
    /// Surfaces with a prescribed temperature report an infinite heat capacity.
    fn heat_capacity(&self) -> FloatValue {
        self.state().heat_capacity()
    }

    /// Check the surface against the column it will be coupled to.
    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        Ok(())
    }
}
