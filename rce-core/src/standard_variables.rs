//! Standard variable definitions.
//!
//! Names follow the conventions of the output files: atmospheric fields use their
//! short chemical or symbolic names (`T`, `H2O`, `CO2`), radiative fields the
//! `<band>_<quantity>` pattern (`lw_flxu`, `net_htngrt`) and surface fields plain
//! names (`temperature`, `albedo`).
//!
//! Well-mixed trace gases carry a default volume mixing ratio which is used to fill
//! the atmosphere when no profile is supplied.

use crate::define_static_variable;

// ============================================================================
// Coordinates
// ============================================================================

define_static_variable!(
    VAR_PLEV,
    name = "plev",
    unit = "Pa",
    standard_name = "air_pressure",
);

define_static_variable!(
    VAR_PHLEV,
    name = "phlev",
    unit = "Pa",
    standard_name = "air_pressure_at_halflevel",
);

// ============================================================================
// Atmospheric state
// ============================================================================

define_static_variable!(
    VAR_T,
    name = "T",
    unit = "K",
    standard_name = "air_temperature",
);

define_static_variable!(
    VAR_Z,
    name = "z",
    unit = "m",
    standard_name = "geopotential_height",
);

define_static_variable!(
    VAR_LAPSE,
    name = "lapse",
    unit = "K / m",
    standard_name = "air_temperature_lapse_rate",
);

define_static_variable!(
    VAR_H2O,
    name = "H2O",
    unit = "1",
    standard_name = "humidity_mixing_ratio",
);

define_static_variable!(
    VAR_O3,
    name = "O3",
    unit = "1",
    standard_name = "ozone_mixing_ratio",
);

define_static_variable!(
    VAR_DELTA_T,
    name = "deltaT",
    unit = "K",
    standard_name = "tendency_of_air_temperature",
);

// ============================================================================
// Well-mixed trace gases
// ============================================================================

define_static_variable!(
    VAR_N2O,
    name = "N2O",
    unit = "1",
    standard_name = "nitrogene_mixing_ratio",
    default_vmr = 306e-9,
);

define_static_variable!(
    VAR_O2,
    name = "O2",
    unit = "1",
    standard_name = "oxygen_mixing_ratio",
    default_vmr = 0.21,
);

define_static_variable!(
    VAR_CO2,
    name = "CO2",
    unit = "1",
    standard_name = "carbon_dioxide_mixing_ratio",
    default_vmr = 348e-6,
);

define_static_variable!(
    VAR_CO,
    name = "CO",
    unit = "1",
    standard_name = "carbon_monoxide_mixing_ratio",
    default_vmr = 0.0,
);

define_static_variable!(
    VAR_CH4,
    name = "CH4",
    unit = "1",
    standard_name = "methane_mixing_ratio",
    default_vmr = 1650e-9,
);

define_static_variable!(
    VAR_CFC11,
    name = "CFC11",
    unit = "1",
    standard_name = "cfc11_mixing_ratio",
    default_vmr = 0.0,
);

define_static_variable!(
    VAR_CFC12,
    name = "CFC12",
    unit = "1",
    standard_name = "cfc12_mixing_ratio",
    default_vmr = 0.0,
);

define_static_variable!(
    VAR_CFC22,
    name = "CFC22",
    unit = "1",
    standard_name = "cfc22_mixing_ratio",
    default_vmr = 0.0,
);

define_static_variable!(
    VAR_CCL4,
    name = "CCl4",
    unit = "1",
    standard_name = "carbon_tetrachloride_mixing_ratio",
    default_vmr = 0.0,
);

// ============================================================================
// Radiative quantities
// ============================================================================

define_static_variable!(
    VAR_LW_HTNGRT,
    name = "lw_htngrt",
    unit = "K / day",
    standard_name = "tendency_of_air_temperature_due_to_longwave_heating",
);

define_static_variable!(
    VAR_LW_FLXU,
    name = "lw_flxu",
    unit = "W / m**2",
    standard_name = "upwelling_longwave_flux_in_air",
);

define_static_variable!(
    VAR_LW_FLXD,
    name = "lw_flxd",
    unit = "W / m**2",
    standard_name = "downwelling_longwave_flux_in_air",
);

define_static_variable!(
    VAR_SW_HTNGRT,
    name = "sw_htngrt",
    unit = "K / day",
    standard_name = "tendency_of_air_temperature_due_to_shortwave_heating",
);

define_static_variable!(
    VAR_SW_FLXU,
    name = "sw_flxu",
    unit = "W / m**2",
    standard_name = "upwelling_shortwave_flux_in_air",
);

define_static_variable!(
    VAR_SW_FLXD,
    name = "sw_flxd",
    unit = "W / m**2",
    standard_name = "downwelling_shortwave_flux_in_air",
);

define_static_variable!(
    VAR_NET_HTNGRT,
    name = "net_htngrt",
    unit = "K / day",
    standard_name = "tendency_of_air_temperature_due_to_radiative_heating",
);

define_static_variable!(
    VAR_TOA,
    name = "toa",
    unit = "W / m**2",
    standard_name = "radiation_budget_at_top_of_the_atmosphere",
);

// ============================================================================
// Surface
// ============================================================================

define_static_variable!(
    VAR_ALBEDO,
    name = "albedo",
    unit = "1",
    standard_name = "surface_albedo",
);

define_static_variable!(
    VAR_SURFACE_PRESSURE,
    name = "pressure",
    unit = "Pa",
    standard_name = "surface_pressure",
);

define_static_variable!(
    VAR_SURFACE_TEMPERATURE,
    name = "temperature",
    unit = "K",
    standard_name = "surface_temperature",
);

define_static_variable!(
    VAR_SURFACE_C_P,
    name = "c_p",
    unit = "J / kg / K",
    standard_name = "specific_heat_capacity_sea_water",
);

define_static_variable!(
    VAR_SURFACE_RHO,
    name = "rho",
    unit = "kg / m**3",
    standard_name = "surface_density",
);

define_static_variable!(
    VAR_SURFACE_DEPTH,
    name = "depth",
    unit = "m",
    standard_name = "surface_depth",
);

define_static_variable!(
    VAR_SURFACE_HEAT_CAPACITY,
    name = "heat_capacity",
    unit = "J / m**2 / K",
    standard_name = "surface_heat_capacity",
);
