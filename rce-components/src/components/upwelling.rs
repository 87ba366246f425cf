//! Upwelling schemes

use rce_core::atmosphere::Atmosphere;
use rce_core::constants::{CP, G, SECONDS_PER_DAY};
use rce_core::errors::{RCEError, RCEResult};
use rce_core::profile::{FloatValue, Profile};
use rce_core::submodel::Upwelling;
use serde::{Deserialize, Serialize};

/// No large-scale ascent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoUpwelling {}

#[typetag::serde]
impl Upwelling for NoUpwelling {
    fn cool(
        &self,
        _atmosphere: &mut Atmosphere,
        _radheat: &Profile,
        _timestep: FloatValue,
    ) -> RCEResult<()> {
        Ok(())
    }
}

/// Parameters of the stratospheric upwelling scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StratosphericUpwellingParameters {
    /// Vertical velocity
    /// unit: mm / s
    pub w: FloatValue,
    /// Upwelling acts on levels above (at lower pressure than) this
    /// unit: Pa
    pub pressure_threshold: FloatValue,
}

impl Default for StratosphericUpwellingParameters {
    fn default() -> Self {
        Self {
            w: 0.2,
            pressure_threshold: 10000.0,
        }
    }
}

/// Adiabatic cooling by the stratospheric overturning circulation
///
/// Air rising at speed $w$ cools at the rate
/// $$ Q = -w \left(\frac{g}{c_p} - \Gamma\right) $$
/// where $\Gamma = -\partial T / \partial z$ is the actual lapse rate of the column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StratosphericUpwelling {
    #[serde(default)]
    parameters: StratosphericUpwellingParameters,
}

impl StratosphericUpwelling {
    pub fn from_parameters(parameters: StratosphericUpwellingParameters) -> Self {
        Self { parameters }
    }

    /// Lapse rate (K / m) of the temperature profile.
    ///
    /// Central differences in the interior, one-sided at the lowest and highest level.
    pub fn actual_lapse_rate(atmosphere: &Atmosphere) -> Profile {
        let t = atmosphere.temperature();
        let z = atmosphere.height();
        let n_levels = atmosphere.n_levels();
        Profile::from_iter((0..n_levels).map(|i| {
            let lower = i.saturating_sub(1);
            let upper = (i + 1).min(n_levels - 1);
            -(t[upper] - t[lower]) / (z[upper] - z[lower])
        }))
    }

    /// Cooling rate (K / day) on every level, zero below the pressure threshold.
    pub fn cooling_rate(&self, atmosphere: &Atmosphere) -> Profile {
        let w = self.parameters.w * 1e-3 * SECONDS_PER_DAY;
        let lapse = Self::actual_lapse_rate(atmosphere);
        Profile::from_iter(atmosphere.plev().iter().zip(lapse.iter()).map(|(p, gamma)| {
            if *p < self.parameters.pressure_threshold {
                -w * (G / CP - gamma)
            } else {
                0.0
            }
        }))
    }
}

#[typetag::serde]
impl Upwelling for StratosphericUpwelling {
    fn cool(
        &self,
        atmosphere: &mut Atmosphere,
        _radheat: &Profile,
        timestep: FloatValue,
    ) -> RCEResult<()> {
        let cooling = self.cooling_rate(atmosphere);
        atmosphere.temperature_mut().scaled_add(timestep, &cooling);
        Ok(())
    }

    fn validate(&self, atmosphere: &Atmosphere) -> RCEResult<()> {
        if atmosphere.n_levels() < 2 {
            return Err(RCEError::configuration(
                "upwelling needs at least two levels to calculate a lapse rate",
            ));
        }
        if !(self.parameters.w >= 0.0) {
            return Err(RCEError::configuration(
                "the upwelling velocity must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn isothermal() -> Atmosphere {
        let mut atmosphere = Atmosphere::idealised(40, 101325.0, 100.0, 288.0).unwrap();
        atmosphere.temperature_mut().fill(220.0);
        atmosphere.calculate_height();
        atmosphere
    }

    #[test]
    fn test_cooling_above_threshold() {
        let mut atmosphere = isothermal();
        let upwelling = StratosphericUpwelling::default();

        upwelling
            .cool(&mut atmosphere, &Profile::zeros(40), 0.5)
            .unwrap();

        // An isothermal column cools at the dry adiabatic rate times the ascent rate.
        let expected = -0.2e-3 * 86400.0 * G / CP * 0.5;
        for (p, t) in atmosphere.plev().iter().zip(atmosphere.temperature()) {
            if *p < 10000.0 {
                assert_relative_eq!(t - 220.0, expected, max_relative = 1e-9);
            } else {
                assert_eq!(*t, 220.0);
            }
        }
    }

    #[test]
    fn test_no_upwelling() {
        let mut atmosphere = isothermal();
        NoUpwelling {}
            .cool(&mut atmosphere, &Profile::zeros(40), 1.0)
            .unwrap();
        assert!(atmosphere.temperature().iter().all(|t| *t == 220.0));
    }

    #[test]
    fn test_validate_single_level() {
        let atmosphere = Atmosphere::idealised(1, 101325.0, 100.0, 288.0).unwrap();
        assert!(matches!(
            StratosphericUpwelling::default().validate(&atmosphere),
            Err(RCEError::Configuration(_))
        ));
    }
}
