//! Humidity schemes

use crate::thermodynamics::saturation_vmr;
use ndarray::s;
use rce_core::atmosphere::Atmosphere;
use rce_core::errors::{RCEError, RCEResult};
use rce_core::profile::{FloatValue, Profile};
use rce_core::submodel::Humidity;
use rce_core::surface::Surface;
use serde::{Deserialize, Serialize};

/// Parameters of the fixed relative humidity scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedRHParameters {
    /// Relative humidity on every level
    pub rh: FloatValue,
    /// Relative humidity per level, takes precedence over `rh`
    pub rh_profile: Option<Vec<FloatValue>>,
}

impl Default for FixedRHParameters {
    fn default() -> Self {
        Self {
            rh: 0.8,
            rh_profile: None,
        }
    }
}

/// Water vapour at a fixed relative humidity
///
/// Below the cold point (the coldest level) the mixing ratio follows
/// $q = RH \cdot e_s(T) / p$. Above it, the mixing ratio is held at the cold point value,
/// as air entering the stratosphere is freeze-dried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixedRH {
    #[serde(default)]
    parameters: FixedRHParameters,
}

impl FixedRH {
    pub fn from_parameters(parameters: FixedRHParameters) -> Self {
        Self { parameters }
    }

    fn relative_humidity(&self, level: usize) -> FloatValue {
        match &self.parameters.rh_profile {
            Some(profile) => profile[level],
            None => self.parameters.rh,
        }
    }
}

/// Index of the coldest level
fn cold_point(atmosphere: &Atmosphere) -> usize {
    atmosphere
        .temperature()
        .iter()
        .enumerate()
        .fold((0, FloatValue::INFINITY), |(i_min, t_min), (i, t)| {
            if *t < t_min {
                (i, *t)
            } else {
                (i_min, t_min)
            }
        })
        .0
}

#[typetag::serde]
impl Humidity for FixedRH {
    fn get(
        &self,
        atmosphere: &Atmosphere,
        _surface: &dyn Surface,
        _net_heatingrate: &Profile,
    ) -> RCEResult<Profile> {
        let temperature = atmosphere.temperature();
        let plev = atmosphere.plev();
        let cold_point = cold_point(atmosphere);

        let mut humidity = Profile::from_iter(
            (0..atmosphere.n_levels())
                .map(|i| self.relative_humidity(i) * saturation_vmr(temperature[i], plev[i])),
        );
        let stratospheric = humidity[cold_point];
        humidity
            .slice_mut(s![cold_point + 1..])
            .fill(stratospheric);
        Ok(humidity)
    }

    fn validate(&self, atmosphere: &Atmosphere) -> RCEResult<()> {
        let values = match &self.parameters.rh_profile {
            Some(profile) => {
                if profile.len() != atmosphere.n_levels() {
                    return Err(RCEError::configuration(format!(
                        "relative humidity profile has {} values, the atmosphere has {} levels",
                        profile.len(),
                        atmosphere.n_levels()
                    )));
                }
                profile.clone()
            }
            None => vec![self.parameters.rh],
        };
        if values.iter().any(|rh| !(*rh >= 0.0 && *rh <= 1.0)) {
            return Err(RCEError::configuration(
                "relative humidity must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Keeps the water vapour mixing ratio fixed at its initial value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixedVMR {}

#[typetag::serde]
impl Humidity for FixedVMR {
    fn get(
        &self,
        atmosphere: &Atmosphere,
        _surface: &dyn Surface,
        _net_heatingrate: &Profile,
    ) -> RCEResult<Profile> {
        Ok(atmosphere.humidity().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SurfaceHeatCapacity;
    use approx::assert_relative_eq;

    fn column() -> Atmosphere {
        Atmosphere::idealised(30, 101325.0, 100.0, 300.0).unwrap()
    }

    #[test]
    fn test_fixed_rh_below_cold_point() {
        let atmosphere = column();
        let humidity = FixedRH::default()
            .get(
                &atmosphere,
                &SurfaceHeatCapacity::default(),
                &Profile::zeros(30),
            )
            .unwrap();

        let expected = 0.8
            * saturation_vmr(atmosphere.temperature()[0], atmosphere.plev()[0]);
        assert_relative_eq!(humidity[0], expected, max_relative = 1e-12);
        for i in 1..30 {
            assert!(humidity[i] <= humidity[i - 1]);
        }
    }

    #[test]
    fn test_fixed_rh_constant_above_cold_point() {
        let mut atmosphere = column();
        // Warm the upper levels to form a stratosphere above level 20.
        for (i, t) in atmosphere.temperature_mut().iter_mut().enumerate() {
            if i > 20 {
                *t = 200.0 + (i - 20) as FloatValue;
            }
        }
        atmosphere.temperature_mut()[20] = 199.0;

        let humidity = FixedRH::default()
            .get(
                &atmosphere,
                &SurfaceHeatCapacity::default(),
                &Profile::zeros(30),
            )
            .unwrap();

        for i in 21..30 {
            assert_eq!(humidity[i], humidity[20]);
        }
    }

    #[test]
    fn test_rh_profile_length_is_validated() {
        let atmosphere = column();
        let humidity = FixedRH::from_parameters(FixedRHParameters {
            rh_profile: Some(vec![0.5; 10]),
            ..Default::default()
        });

        assert!(matches!(
            humidity.validate(&atmosphere),
            Err(RCEError::Configuration(_))
        ));

        let humidity = FixedRH::from_parameters(FixedRHParameters {
            rh_profile: Some(vec![0.5; 30]),
            ..Default::default()
        });
        assert!(humidity.validate(&atmosphere).is_ok());
    }

    #[test]
    fn test_rh_out_of_range() {
        let humidity = FixedRH::from_parameters(FixedRHParameters {
            rh: 1.5,
            ..Default::default()
        });
        assert!(humidity.validate(&column()).is_err());
    }

    #[test]
    fn test_fixed_vmr() {
        let atmosphere = column();
        let humidity = FixedVMR {}
            .get(
                &atmosphere,
                &SurfaceHeatCapacity::default(),
                &Profile::zeros(30),
            )
            .unwrap();
        assert_eq!(humidity, atmosphere.humidity());
    }
}
