//! Contracts of the physical submodels coupled by the [`RCE`](crate::rce::RCE) controller.
//!
//! Each role is a trait with a narrow set of operations.
//! The controller only ever calls these operations, it never inspects the concrete type,
//! so any conforming implementation can be plugged in.
//!
//! All traits are serialisable as trait objects via `typetag`, internally tagged with a
//! `type` key. This is what allows submodels to be selected in a configuration file:
//!
//! ```toml
//! [humidity]
//! type = "FixedRH"
//! rh = 0.8
//! ```
//!
//! Every trait has a `validate` hook which is called once when the controller is
//! constructed. Implementations use it to reject parameters that are inconsistent with
//! the column they are coupled to.

use crate::atmosphere::Atmosphere;
use crate::errors::RCEResult;
use crate::heating_rates::HeatingRates;
use crate::profile::{FloatValue, Profile};
use crate::surface::Surface;
use std::fmt::Debug;

/// Radiative transfer.
#[typetag::serde(tag = "type")]
pub trait Radiation: Debug + Send + Sync {
    /// Update the solar geometry for the time since model start (days).
    fn adjust_solar_angle(&mut self, time_days: FloatValue);

    /// Calculate fluxes and heating rates for the current state.
    fn get_heatingrates(
        &self,
        atmosphere: &Atmosphere,
        surface: &dyn Surface,
        cloud: &dyn Cloud,
    ) -> RCEResult<HeatingRates>;

    /// Solar constant (W / m^2), if the scheme has one. Only used as output metadata.
    fn solar_constant(&self) -> Option<FloatValue> {
        None
    }

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        Ok(())
    }
}

/// Humidity.
#[typetag::serde(tag = "type")]
pub trait Humidity: Debug + Send + Sync {
    /// Calculate the new humidity mixing ratio profile.
    fn get(
        &self,
        atmosphere: &Atmosphere,
        surface: &dyn Surface,
        net_heatingrate: &Profile,
    ) -> RCEResult<Profile>;

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        Ok(())
    }
}

/// Clouds.
///
/// Opaque to the controller, which only passes it through to the radiation scheme.
#[typetag::serde(tag = "type")]
pub trait Cloud: Debug + Send + Sync {
    /// Longwave optical depth of the cloud in each layer.
    fn optical_depth(&self, atmosphere: &Atmosphere) -> Profile;

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        Ok(())
    }
}

/// Convective adjustment.
#[typetag::serde(tag = "type")]
pub trait Convection: Debug + Send + Sync {
    /// Stabilise the temperature profile towards the critical lapse rate (K / m).
    ///
    /// May modify the atmosphere and the surface temperature in place.
    fn stabilize(
        &self,
        atmosphere: &mut Atmosphere,
        lapse: &Profile,
        timestep: FloatValue,
        surface: &mut dyn Surface,
    ) -> RCEResult<()>;

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        Ok(())
    }
}

/// Critical lapse rate.
#[typetag::serde(tag = "type")]
pub trait LapseRate: Debug + Send + Sync {
    /// Critical lapse rate (K / m) on every level.
    fn get(&self, atmosphere: &Atmosphere) -> RCEResult<Profile>;

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        Ok(())
    }
}

/// Cooling by large-scale ascent.
#[typetag::serde(tag = "type")]
pub trait Upwelling: Debug + Send + Sync {
    /// Apply the upwelling-induced cooling for one time step (days).
    fn cool(
        &self,
        atmosphere: &mut Atmosphere,
        radheat: &Profile,
        timestep: FloatValue,
    ) -> RCEResult<()>;

    fn validate(&self, _atmosphere: &Atmosphere) -> RCEResult<()> {
        Ok(())
    }
}

/// One instance of every submodel.
#[derive(Debug)]
pub struct Submodels {
    pub radiation: Box<dyn Radiation>,
    pub humidity: Box<dyn Humidity>,
    pub surface: Box<dyn Surface>,
    pub cloud: Box<dyn Cloud>,
    pub convection: Box<dyn Convection>,
    pub lapse: Box<dyn LapseRate>,
    pub upwelling: Box<dyn Upwelling>,
}

impl Submodels {
    /// Run the contract checks of every submodel against the column.
    pub fn validate(&self, atmosphere: &Atmosphere) -> RCEResult<()> {
        self.radiation.validate(atmosphere)?;
        self.humidity.validate(atmosphere)?;
        self.surface.validate(atmosphere)?;
        self.cloud.validate(atmosphere)?;
        self.convection.validate(atmosphere)?;
        self.lapse.validate(atmosphere)?;
        self.upwelling.validate(atmosphere)?;
        Ok(())
    }
}
