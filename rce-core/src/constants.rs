//! Physical constants.

use crate::profile::FloatValue;

/// Isobaric mass heat capacity of dry air (J kg^-1 K^-1)
pub const CP: FloatValue = 1003.5;
/// Standard gravity (m s^-2)
pub const G: FloatValue = 9.80665;
/// Stefan-Boltzmann constant (W m^-2 K^-4)
pub const STEFAN_BOLTZMANN: FloatValue = 5.67e-8;
/// Latent heat of vaporization (J kg^-1)
pub const LV: FloatValue = 2_501_000.0;
/// Specific gas constant of dry air (J kg^-1 K^-1)
pub const RD: FloatValue = 287.0597;
/// Specific gas constant of water vapor (J kg^-1 K^-1)
pub const RV: FloatValue = 461.5250;
/// Ratio of the gas constants of dry air and water vapor
pub const EPSILON: FloatValue = RD / RV;
/// Density of sea water (kg m^-3)
pub const DENSITY_SEA_WATER: FloatValue = 1025.0;
/// Specific heat capacity of sea water (J kg^-1 K^-1)
pub const SPECIFIC_HEAT_CAPACITY_SEA_WATER: FloatValue = 4185.5;

/// Seconds per day, the unit conversion between model time steps and SI fluxes.
pub const SECONDS_PER_DAY: FloatValue = 86400.0;
