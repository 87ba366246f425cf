//! Output of a radiation scheme.

use crate::errors::RCEResult;
use crate::profile::{check_length, FloatValue, Profile};
use crate::surface::SurfaceFluxes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Radiative fluxes and heating rates of one iteration.
///
/// Fluxes (W / m^2) are defined on the half levels, index 0 being the surface and the last
/// index the top of the atmosphere.
/// Heating rates (K / day) are defined on the full levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingRates {
    pub lw_flxu: Profile,
    pub lw_flxd: Profile,
    pub sw_flxu: Profile,
    pub sw_flxd: Profile,
    pub lw_htngrt: Profile,
    pub sw_htngrt: Profile,
    pub net_htngrt: Profile,
    /// Additional diagnostics provided by the scheme, defined on the full levels
    #[serde(default)]
    pub extra: BTreeMap<String, Profile>,
}

impl HeatingRates {
    /// No fluxes and no heating for a column of `n_levels` levels.
    pub fn zeros(n_levels: usize) -> Self {
        Self {
            lw_flxu: Profile::zeros(n_levels + 1),
            lw_flxd: Profile::zeros(n_levels + 1),
            sw_flxu: Profile::zeros(n_levels + 1),
            sw_flxd: Profile::zeros(n_levels + 1),
            lw_htngrt: Profile::zeros(n_levels),
            sw_htngrt: Profile::zeros(n_levels),
            net_htngrt: Profile::zeros(n_levels),
            extra: BTreeMap::new(),
        }
    }

    /// Check that every profile matches a column of `n_levels` levels.
    pub fn validate(&self, n_levels: usize) -> RCEResult<()> {
        for (name, values) in self.fluxes() {
            check_length(name, values, n_levels + 1)?;
        }
        for (name, values) in self.heating() {
            check_length(name, values, n_levels)?;
        }
        for (name, values) in self.extra.iter() {
            check_length(name, values, n_levels)?;
        }
        Ok(())
    }

    /// The fluxes at the surface (level 0).
    pub fn surface_fluxes(&self) -> SurfaceFluxes {
        SurfaceFluxes {
            sw_down: self.sw_flxd[0],
            sw_up: self.sw_flxu[0],
            lw_down: self.lw_flxd[0],
            lw_up: self.lw_flxu[0],
        }
    }

    /// Net downward radiative flux at the top of the atmosphere (W / m^2).
    ///
    /// Only a diagnostic: the convergence check is based on the temperature change.
    pub fn toa_imbalance(&self) -> FloatValue {
        let top = self.sw_flxd.len() - 1;
        self.sw_flxd[top] - self.sw_flxu[top] + self.lw_flxd[top] - self.lw_flxu[top]
    }

    pub fn fluxes(&self) -> [(&'static str, &Profile); 4] {
        [
            ("lw_flxu", &self.lw_flxu),
            ("lw_flxd", &self.lw_flxd),
            ("sw_flxu", &self.sw_flxu),
            ("sw_flxd", &self.sw_flxd),
        ]
    }

    pub fn heating(&self) -> [(&'static str, &Profile); 3] {
        [
            ("lw_htngrt", &self.lw_htngrt),
            ("sw_htngrt", &self.sw_htngrt),
            ("net_htngrt", &self.net_htngrt),
        ]
    }
}
