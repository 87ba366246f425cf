//! Minimal submodels used to exercise the controller.

use crate::atmosphere::Atmosphere;
use crate::errors::{RCEError, RCEResult};
use crate::heating_rates::HeatingRates;
use crate::profile::{FloatValue, Profile};
use crate::submodel::{Cloud, Convection, Humidity, LapseRate, Radiation, Submodels, Upwelling};
use crate::surface::{Surface, SurfaceFluxes, SurfaceState};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Relaxes the temperature towards `t_eq` with a time scale of `tau` days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaxationRadiation {
    pub t_eq: FloatValue,
    pub tau: FloatValue,
    /// Upward shortwave flux at the surface, to check that the surface sees the fluxes
    pub surface_sw_up: FloatValue,
    #[serde(skip)]
    pub solar_times: Arc<Mutex<Vec<FloatValue>>>,
    /// Surface pressure seen by every call of `get_heatingrates`
    #[serde(skip)]
    pub surface_pressures: Arc<Mutex<Vec<FloatValue>>>,
}

impl RelaxationRadiation {
    pub fn new(t_eq: FloatValue, tau: FloatValue) -> Self {
        Self {
            t_eq,
            tau,
            surface_sw_up: 0.0,
            solar_times: Default::default(),
            surface_pressures: Default::default(),
        }
    }
}

#[typetag::serde]
impl Radiation for RelaxationRadiation {
    fn adjust_solar_angle(&mut self, time_days: FloatValue) {
        self.solar_times.lock().unwrap().push(time_days);
    }

    fn get_heatingrates(
        &self,
        atmosphere: &Atmosphere,
        surface: &dyn Surface,
        _cloud: &dyn Cloud,
    ) -> RCEResult<HeatingRates> {
        self.surface_pressures
            .lock()
            .unwrap()
            .push(surface.state().pressure);
        let mut heatingrates = HeatingRates::zeros(atmosphere.n_levels());
        heatingrates.net_htngrt = atmosphere
            .temperature()
            .mapv(|t| (self.t_eq - t) / self.tau);
        heatingrates.sw_htngrt = heatingrates.net_htngrt.clone();
        heatingrates.sw_flxu[0] = self.surface_sw_up;
        Ok(heatingrates)
    }

    fn solar_constant(&self) -> Option<FloatValue> {
        Some(1360.0)
    }
}

/// Heats every level by a constant rate and never converges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantHeating {
    pub rate: FloatValue,
    /// Number of levels of the returned heating rates, if different from the column
    pub n_levels: Option<usize>,
}

#[typetag::serde]
impl Radiation for ConstantHeating {
    fn adjust_solar_angle(&mut self, _time_days: FloatValue) {}

    fn get_heatingrates(
        &self,
        atmosphere: &Atmosphere,
        _surface: &dyn Surface,
        _cloud: &dyn Cloud,
    ) -> RCEResult<HeatingRates> {
        let n_levels = self.n_levels.unwrap_or(atmosphere.n_levels());
        let mut heatingrates = HeatingRates::zeros(n_levels);
        heatingrates.net_htngrt.fill(self.rate);
        heatingrates
            .extra
            .insert("H2O".to_string(), Profile::from_elem(n_levels, -1.0));
        Ok(heatingrates)
    }
}

/// Keeps the humidity unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassiveHumidity;

#[typetag::serde]
impl Humidity for PassiveHumidity {
    fn get(
        &self,
        atmosphere: &Atmosphere,
        _surface: &dyn Surface,
        _net_heatingrate: &Profile,
    ) -> RCEResult<Profile> {
        Ok(atmosphere.humidity().to_owned())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoCloud {
    /// Fail validation, to check that the controller rejects the configuration
    pub invalid: bool,
}

#[typetag::serde]
impl Cloud for NoCloud {
    fn optical_depth(&self, atmosphere: &Atmosphere) -> Profile {
        Profile::zeros(atmosphere.n_levels())
    }

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        if self.invalid {
            return Err(RCEError::configuration("cloud rejected the column"));
        }
        Ok(())
    }
}

/// Records the temperature profile it is asked to stabilise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingConvection {
    #[serde(skip)]
    pub seen: Arc<Mutex<Vec<Vec<FloatValue>>>>,
}

#[typetag::serde]
impl Convection for RecordingConvection {
    fn stabilize(
        &self,
        atmosphere: &mut Atmosphere,
        _lapse: &Profile,
        _timestep: FloatValue,
        _surface: &mut dyn Surface,
    ) -> RCEResult<()> {
        self.seen
            .lock()
            .unwrap()
            .push(atmosphere.temperature().to_vec());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZeroLapse;

#[typetag::serde]
impl LapseRate for ZeroLapse {
    fn get(&self, atmosphere: &Atmosphere) -> RCEResult<Profile> {
        Ok(Profile::zeros(atmosphere.n_levels()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoCooling;

#[typetag::serde]
impl Upwelling for NoCooling {
    fn cool(
        &self,
        _atmosphere: &mut Atmosphere,
        _radheat: &Profile,
        _timestep: FloatValue,
    ) -> RCEResult<()> {
        Ok(())
    }
}

/// Surface which accumulates the net downward flux it is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassiveSurface {
    pub state: SurfaceState,
    pub absorbed: FloatValue,
}

#[typetag::serde]
impl Surface for PassiveSurface {
    fn state(&self) -> &SurfaceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SurfaceState {
        &mut self.state
    }

    fn adjust(&mut self, fluxes: &SurfaceFluxes, timestep: FloatValue) {
        self.absorbed += fluxes.net_down() * timestep;
    }
}

pub fn submodels(radiation: impl Radiation + 'static) -> Submodels {
    Submodels {
        radiation: Box::new(radiation),
        humidity: Box::new(PassiveHumidity),
        surface: Box::new(PassiveSurface::default()),
        cloud: Box::new(NoCloud::default()),
        convection: Box::new(RecordingConvection::default()),
        lapse: Box::new(ZeroLapse),
        upwelling: Box::new(NoCooling),
    }
}
