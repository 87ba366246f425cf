//! Grey two-stream radiation
//!
//! A single broadband longwave and a single broadband shortwave channel.
//! Water vapour is the only variable absorber, the dry atmosphere contributes a constant
//! mass absorption coefficient.

use rce_core::atmosphere::Atmosphere;
use rce_core::constants::{CP, G, SECONDS_PER_DAY, STEFAN_BOLTZMANN};
use rce_core::errors::{RCEError, RCEResult};
use rce_core::heating_rates::HeatingRates;
use rce_core::profile::{FloatValue, Profile};
use rce_core::submodel::{Cloud, Radiation};
use rce_core::surface::Surface;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Ratio of the effective path length of diffuse radiation to the vertical path
const DIFFUSIVITY: FloatValue = 1.66;

/// Parameters of the grey radiation scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreyRadiationParameters {
    /// Incoming solar flux at the top of the atmosphere
    /// unit: W / m^2
    pub solar_constant: FloatValue,
    /// Solar zenith angle
    /// unit: degree
    pub zenith_angle: FloatValue,
    /// Modulate the insolation with a daily cycle.
    /// The daily mean insolation is unchanged.
    pub diurnal_cycle: bool,
    /// Longwave mass absorption coefficient of dry air
    /// unit: m^2 / kg
    pub kappa_dry: FloatValue,
    /// Longwave mass absorption coefficient of water vapour, per unit mixing ratio
    /// unit: m^2 / kg
    pub kappa_h2o: FloatValue,
    /// Shortwave mass absorption coefficient
    /// unit: m^2 / kg
    pub kappa_sw: FloatValue,
}

impl Default for GreyRadiationParameters {
    fn default() -> Self {
        Self {
            solar_constant: 551.58,
            zenith_angle: 42.05,
            diurnal_cycle: false,
            kappa_dry: 1e-4,
            kappa_h2o: 0.1,
            kappa_sw: 1e-5,
        }
    }
}

/// Grey-gas radiative transfer
///
/// Longwave fluxes follow the two-stream Schwarzschild equations for isothermal layers
/// with a layer transmissivity of $\exp(-D \Delta\tau)$, where
/// $$ \Delta\tau = (\kappa_{dry} + \kappa_{H_2O} q) \frac{\Delta p}{g} + \tau_{cloud} $$
/// and $D = 1.66$. The surface emits as a black body.
///
/// The direct solar beam is attenuated by Beer-Lambert absorption along the slant path.
/// The surface reflects a fraction given by its albedo, which travels upwards as diffuse
/// radiation.
///
/// The heating rate of each layer follows from the divergence of the net flux:
/// $$ \frac{dT}{dt} = \frac{g}{c_p} \frac{\Delta F_{net}}{\Delta p} $$
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreyRadiation {
    #[serde(default)]
    parameters: GreyRadiationParameters,
    /// Model time of the last solar angle update (days)
    #[serde(skip)]
    time_days: FloatValue,
}

impl GreyRadiation {
    pub fn from_parameters(parameters: GreyRadiationParameters) -> Self {
        Self {
            parameters,
            time_days: 0.0,
        }
    }

    pub fn parameters(&self) -> &GreyRadiationParameters {
        &self.parameters
    }

    /// Insolation at the top of the atmosphere (W / m^2) along the direct beam.
    pub fn insolation(&self) -> FloatValue {
        if !self.parameters.diurnal_cycle {
            return self.parameters.solar_constant;
        }
        // Local noon at half past each model day. The factor pi keeps the daily mean.
        let hour_angle = 2.0 * PI * self.time_days.fract();
        self.parameters.solar_constant * PI * (-hour_angle.cos()).max(0.0)
    }

    /// Mass of each layer per unit area (kg / m^2)
    fn layer_mass(atmosphere: &Atmosphere) -> Profile {
        let phlev = atmosphere.phlev();
        Profile::from_iter((0..atmosphere.n_levels()).map(|i| (phlev[i] - phlev[i + 1]) / G))
    }

    fn longwave(
        &self,
        atmosphere: &Atmosphere,
        mass: &Profile,
        surface_temperature: FloatValue,
        cloud_optical_depth: &Profile,
    ) -> (Profile, Profile) {
        let n_levels = atmosphere.n_levels();
        let temperature = atmosphere.temperature();
        let humidity = atmosphere.humidity();

        let transmissivity = Profile::from_iter((0..n_levels).map(|i| {
            let tau = (self.parameters.kappa_dry + self.parameters.kappa_h2o * humidity[i])
                * mass[i]
                + cloud_optical_depth[i];
            (-DIFFUSIVITY * tau).exp()
        }));
        let emission = temperature.mapv(|t| STEFAN_BOLTZMANN * t.powi(4));

        let mut flxu = Profile::zeros(n_levels + 1);
        flxu[0] = STEFAN_BOLTZMANN * surface_temperature.powi(4);
        for i in 0..n_levels {
            flxu[i + 1] = flxu[i] * transmissivity[i] + emission[i] * (1.0 - transmissivity[i]);
        }

        let mut flxd = Profile::zeros(n_levels + 1);
        for i in (0..n_levels).rev() {
            flxd[i] = flxd[i + 1] * transmissivity[i] + emission[i] * (1.0 - transmissivity[i]);
        }
        (flxu, flxd)
    }

    fn shortwave(&self, mass: &Profile, albedo: FloatValue) -> (Profile, Profile) {
        let n_levels = mass.len();
        let mut flxu = Profile::zeros(n_levels + 1);
        let mut flxd = Profile::zeros(n_levels + 1);

        let cos_zenith = self.parameters.zenith_angle.to_radians().cos();
        let insolation = self.insolation();
        if cos_zenith <= 0.0 || insolation <= 0.0 {
            return (flxu, flxd);
        }

        flxd[n_levels] = insolation * cos_zenith;
        for i in (0..n_levels).rev() {
            flxd[i] = flxd[i + 1] * (-self.parameters.kappa_sw * mass[i] / cos_zenith).exp();
        }
        flxu[0] = albedo * flxd[0];
        for i in 0..n_levels {
            flxu[i + 1] = flxu[i] * (-DIFFUSIVITY * self.parameters.kappa_sw * mass[i]).exp();
        }
        (flxu, flxd)
    }

    /// Heating rate (K / day) from the convergence of the net downward flux.
    fn heating_rate(atmosphere: &Atmosphere, flxu: &Profile, flxd: &Profile) -> Profile {
        let phlev = atmosphere.phlev();
        Profile::from_iter((0..atmosphere.n_levels()).map(|i| {
            let net_top = flxd[i + 1] - flxu[i + 1];
            let net_bottom = flxd[i] - flxu[i];
            G / CP * (net_top - net_bottom) / (phlev[i] - phlev[i + 1]) * SECONDS_PER_DAY
        }))
    }
}

impl Default for GreyRadiation {
    fn default() -> Self {
        Self::from_parameters(GreyRadiationParameters::default())
    }
}

#[typetag::serde]
impl Radiation for GreyRadiation {
    fn adjust_solar_angle(&mut self, time_days: FloatValue) {
        self.time_days = time_days;
    }

    fn get_heatingrates(
        &self,
        atmosphere: &Atmosphere,
        surface: &dyn Surface,
        cloud: &dyn Cloud,
    ) -> RCEResult<HeatingRates> {
        let state = surface.state();
        let mass = Self::layer_mass(atmosphere);

        let (lw_flxu, lw_flxd) = self.longwave(
            atmosphere,
            &mass,
            state.temperature,
            &cloud.optical_depth(atmosphere),
        );
        let (sw_flxu, sw_flxd) = self.shortwave(&mass, state.albedo);

        let lw_htngrt = Self::heating_rate(atmosphere, &lw_flxu, &lw_flxd);
        let sw_htngrt = Self::heating_rate(atmosphere, &sw_flxu, &sw_flxd);
        let net_htngrt = &lw_htngrt + &sw_htngrt;

        Ok(HeatingRates {
            lw_flxu,
            lw_flxd,
            sw_flxu,
            sw_flxd,
            lw_htngrt,
            sw_htngrt,
            net_htngrt,
            extra: Default::default(),
        })
    }

    fn solar_constant(&self) -> Option<FloatValue> {
        Some(self.parameters.solar_constant)
    }

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        let parameters = &self.parameters;
        if !(parameters.solar_constant >= 0.0) {
            return Err(RCEError::configuration(
                "the solar constant must not be negative",
            ));
        }
        if !(0.0..90.0).contains(&parameters.zenith_angle) {
            return Err(RCEError::configuration(format!(
                "the zenith angle must be between 0 and 90 degrees, got {}",
                parameters.zenith_angle
            )));
        }
        let kappas = [
            parameters.kappa_dry,
            parameters.kappa_h2o,
            parameters.kappa_sw,
        ];
        if kappas.iter().any(|kappa| !(*kappa >= 0.0)) {
            return Err(RCEError::configuration(
                "absorption coefficients must not be negative",
            ));
        }
        Ok(())
    }
}
