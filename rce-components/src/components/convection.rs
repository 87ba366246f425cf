//! Convective adjustment schemes

use log::debug;
use rce_core::atmosphere::Atmosphere;
use rce_core::constants::{CP, G};
use rce_core::errors::RCEResult;
use rce_core::profile::{FloatValue, Profile};
use rce_core::submodel::Convection;
use rce_core::surface::Surface;
use serde::{Deserialize, Serialize};

/// Instantaneous adjustment onto the critical lapse rate
///
/// Starting at the surface, every level of the contiguous layer that is colder than the
/// critical profile is set to it. The critical profile is anchored at the surface
/// temperature, which is lowered together with the profile so that the enthalpy of
/// the column and the surface is conserved:
/// $$ \sum_i \frac{c_p \Delta p_i}{g} \Delta T_i + C_s \Delta T_s = 0 $$
/// A surface with infinite heat capacity keeps its temperature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HardAdjustment {}

impl HardAdjustment {
    /// Temperature profile following `lapse` upwards from the surface temperature.
    pub fn critical_profile(
        atmosphere: &Atmosphere,
        lapse: &Profile,
        surface_temperature: FloatValue,
    ) -> Profile {
        let z = atmosphere.height();
        let mut profile = Profile::zeros(atmosphere.n_levels());
        profile[0] = surface_temperature - lapse[0] * z[0];
        for i in 1..profile.len() {
            profile[i] = profile[i - 1] - 0.5 * (lapse[i - 1] + lapse[i]) * (z[i] - z[i - 1]);
        }
        profile
    }

    /// Number of levels, from the surface upwards, colder than `critical`.
    fn unstable_layer(temperature: &Profile, critical: &Profile, shift: FloatValue) -> usize {
        temperature
            .iter()
            .zip(critical.iter())
            .take_while(|(t, t_crit)| **t < **t_crit + shift)
            .count()
    }
}

#[typetag::serde]
impl Convection for HardAdjustment {
    fn stabilize(
        &self,
        atmosphere: &mut Atmosphere,
        lapse: &Profile,
        _timestep: FloatValue,
        surface: &mut dyn Surface,
    ) -> RCEResult<()> {
        let temperature = atmosphere.temperature().to_owned();
        let critical = Self::critical_profile(atmosphere, lapse, surface.state().temperature);
        let phlev = atmosphere.phlev();
        let heat_capacity = Profile::from_iter(
            (0..atmosphere.n_levels()).map(|i| CP * (phlev[i] - phlev[i + 1]) / G),
        );
        let surface_heat_capacity = surface.heat_capacity();

        // Surface temperature change that balances the warming of the lowest `n` levels
        let surface_change = |n: usize| -> FloatValue {
            let deficit: FloatValue = (0..n)
                .map(|i| heat_capacity[i] * (critical[i] - temperature[i]))
                .sum();
            let capacity: FloatValue = heat_capacity.iter().take(n).sum();
            -deficit / (capacity + surface_heat_capacity)
        };

        // The depth of the unstable layer depends on the surface temperature change and
        // vice versa. Iterate until the layer depth no longer changes.
        let mut n_unstable = Self::unstable_layer(&temperature, &critical, 0.0);
        for _ in 0..temperature.len() {
            let shift = surface_change(n_unstable);
            let updated = Self::unstable_layer(&temperature, &critical, shift);
            if updated == n_unstable {
                break;
            }
            n_unstable = updated;
        }
        if n_unstable == 0 {
            return Ok(());
        }
        let shift = surface_change(n_unstable);

        debug!(
            "Adjusted {} unstable levels, surface temperature change {:.3} K",
            n_unstable, shift
        );
        let mut t = atmosphere.temperature_mut();
        for i in 0..n_unstable {
            t[i] = critical[i] + shift;
        }
        if surface_heat_capacity.is_finite() {
            surface.state_mut().temperature += shift;
        }
        Ok(())
    }
}

/// No convection, the column stays in pure radiative equilibrium
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonConvective {}

#[typetag::serde]
impl Convection for NonConvective {
    fn stabilize(
        &self,
        _atmosphere: &mut Atmosphere,
        _lapse: &Profile,
        _timestep: FloatValue,
        _surface: &mut dyn Surface,
    ) -> RCEResult<()> {
        Ok(())
    }
}
