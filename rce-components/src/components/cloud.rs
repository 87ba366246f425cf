//! Cloud schemes
//!
//! Clouds only enter the model through the longwave optical depth seen by the radiation
//! scheme.

use rce_core::atmosphere::Atmosphere;
use rce_core::errors::{RCEError, RCEResult};
use rce_core::profile::{FloatValue, Profile};
use rce_core::submodel::Cloud;
use serde::{Deserialize, Serialize};

/// No clouds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearSky {}

#[typetag::serde]
impl Cloud for ClearSky {
    fn optical_depth(&self, atmosphere: &Atmosphere) -> Profile {
        Profile::zeros(atmosphere.n_levels())
    }
}

/// Parameters of a single cloud layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantCloudParameters {
    /// Total longwave optical depth of the cloud
    pub optical_depth: FloatValue,
    /// Pressure of the cloud top
    /// unit: Pa
    pub top_pressure: FloatValue,
    /// Pressure of the cloud base
    /// unit: Pa
    pub bottom_pressure: FloatValue,
}

impl Default for ConstantCloudParameters {
    fn default() -> Self {
        Self {
            optical_depth: 1.0,
            top_pressure: 30000.0,
            bottom_pressure: 50000.0,
        }
    }
}

/// A cloud layer with fixed optical depth between two pressures
///
/// The optical depth is distributed over the model layers in proportion to their pressure
/// overlap with the cloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantCloud {
    #[serde(default)]
    parameters: ConstantCloudParameters,
}

impl ConstantCloud {
    pub fn from_parameters(parameters: ConstantCloudParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Cloud for ConstantCloud {
    fn optical_depth(&self, atmosphere: &Atmosphere) -> Profile {
        let phlev = atmosphere.phlev();
        let top = self.parameters.top_pressure;
        let bottom = self.parameters.bottom_pressure;
        let thickness = bottom - top;

        Profile::from_iter((0..atmosphere.n_levels()).map(|i| {
            let overlap = (phlev[i].min(bottom) - phlev[i + 1].max(top)).max(0.0);
            self.parameters.optical_depth * overlap / thickness
        }))
    }

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        let parameters = &self.parameters;
        if !(parameters.bottom_pressure > parameters.top_pressure && parameters.top_pressure > 0.0)
        {
            return Err(RCEError::configuration(format!(
                "cloud base ({} Pa) must lie below the cloud top ({} Pa)",
                parameters.bottom_pressure, parameters.top_pressure
            )));
        }
        if !(parameters.optical_depth >= 0.0) {
            return Err(RCEError::configuration(
                "cloud optical depth must not be negative",
            ));
        }
        Ok(())
    }
}
