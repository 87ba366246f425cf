//! Critical lapse rates

use crate::thermodynamics::moist_lapse_rate;
use rce_core::atmosphere::Atmosphere;
use rce_core::errors::{RCEError, RCEResult};
use rce_core::profile::{FloatValue, Profile};
use rce_core::submodel::LapseRate;
use serde::{Deserialize, Serialize};
use std::iter::zip;

/// Saturated adiabatic lapse rate of the current temperature profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoistLapseRate {}

#[typetag::serde]
impl LapseRate for MoistLapseRate {
    fn get(&self, atmosphere: &Atmosphere) -> RCEResult<Profile> {
        let lapse = zip(atmosphere.temperature(), atmosphere.plev())
            .map(|(t, p)| moist_lapse_rate(*t, *p));
        Ok(Profile::from_iter(lapse))
    }
}

/// The same critical lapse rate on every level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedLapseRate {
    /// unit: K / m
    pub lapserate: FloatValue,
}

impl Default for FixedLapseRate {
    fn default() -> Self {
        Self { lapserate: 0.0065 }
    }
}

#[typetag::serde]
impl LapseRate for FixedLapseRate {
    fn get(&self, atmosphere: &Atmosphere) -> RCEResult<Profile> {
        Ok(Profile::from_elem(atmosphere.n_levels(), self.lapserate))
    }

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        if !self.lapserate.is_finite() {
            return Err(RCEError::configuration("the lapse rate must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rce_core::constants::{CP, G};

    #[test]
    fn test_moist_lapse_rate_profile() {
        let atmosphere = Atmosphere::idealised(30, 101325.0, 100.0, 300.0).unwrap();

        let lapse = MoistLapseRate {}.get(&atmosphere).unwrap();

        assert_eq!(lapse.len(), 30);
        assert!(lapse.iter().all(|l| *l > 0.0 && *l <= G / CP));
        // Moist air near the surface is less stable than the cold upper troposphere.
        assert!(lapse[0] < lapse[20]);
    }

    #[test]
    fn test_fixed_lapse_rate() {
        let atmosphere = Atmosphere::idealised(10, 101325.0, 100.0, 300.0).unwrap();

        let lapse = FixedLapseRate::default().get(&atmosphere).unwrap();

        assert!(lapse.iter().all(|l| *l == 0.0065));
    }

    #[test]
    fn test_from_toml() {
        let lapse: Box<dyn LapseRate> =
            toml::from_str("type = \"FixedLapseRate\"\nlapserate = 0.008\n").unwrap();
        let atmosphere = Atmosphere::idealised(5, 101325.0, 100.0, 300.0).unwrap();
        assert_eq!(lapse.get(&atmosphere).unwrap()[0], 0.008);
    }
}
