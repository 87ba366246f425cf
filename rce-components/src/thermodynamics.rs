//! Moist thermodynamics shared by the humidity and lapse rate schemes.

use rce_core::constants::{CP, EPSILON, G, LV, RD};
use rce_core::profile::FloatValue;

/// Saturation water vapour pressure over liquid water (Pa).
///
/// Magnus-type fit, accurate to within 0.1 % between -30 and 35 °C:
/// $$ e_s = 610.94 \exp\left(\frac{17.625 (T - 273.15)}{T - 30.11}\right) $$
pub fn saturation_vapour_pressure(temperature: FloatValue) -> FloatValue {
    610.94 * (17.625 * (temperature - 273.15) / (temperature - 30.11)).exp()
}

/// Saturation volume mixing ratio of water vapour.
pub fn saturation_vmr(temperature: FloatValue, pressure: FloatValue) -> FloatValue {
    saturation_vapour_pressure(temperature) / pressure
}

/// Saturation mass mixing ratio of water vapour (kg / kg).
pub fn saturation_mixing_ratio(temperature: FloatValue, pressure: FloatValue) -> FloatValue {
    let e_s = saturation_vapour_pressure(temperature);
    // Past the boiling point the ratio diverges.
    EPSILON * e_s / (pressure - e_s).max(1e-3 * pressure)
}

/// Saturated adiabatic lapse rate (K / m).
///
/// $$ \Gamma_m = g \frac{1 + \frac{L_v r_s}{R_d T}}{c_p + \frac{L_v^2 r_s \epsilon}{R_d T^2}} $$
pub fn moist_lapse_rate(temperature: FloatValue, pressure: FloatValue) -> FloatValue {
    let r_s = saturation_mixing_ratio(temperature, pressure);
    G * (1.0 + LV * r_s / (RD * temperature))
        / (CP + LV * LV * r_s * EPSILON / (RD * temperature * temperature))
}
