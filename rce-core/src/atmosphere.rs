//! The atmospheric column.
//!
//! An [`Atmosphere`] holds the vertical profiles of the column on a fixed pressure grid.
//! Full levels (`plev`) carry the state, half levels (`phlev`) bound the layers:
//! `phlev[i] > plev[i] > phlev[i + 1]`.
//! Index 0 is the lowest, surface-adjacent level and pressure decreases with index.
//!
//! Profiles are addressed by name (`T`, `H2O`, `z`, `deltaT`, trace gases, ...).
//! Mutable access is handed out as views so that the length invariant
//! (every profile has one value per level) cannot be broken.

use crate::constants::{G, RD};
use crate::errors::{RCEError, RCEResult};
use crate::profile::{check_length, is_strictly_decreasing, FloatValue, Profile};
use crate::variable::trace_gases;
use ndarray::{Array1, ArrayView1, ArrayViewMut1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TEMPERATURE: &str = "T";
pub const HUMIDITY: &str = "H2O";
pub const HEIGHT: &str = "z";
pub const DELTA_T: &str = "deltaT";

/// Vertical profile of the atmospheric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    plev: Profile,
    phlev: Profile,
    /// Every profile defined on the full levels, keyed by variable name
    fields: BTreeMap<String, Profile>,
}

impl Atmosphere {
    /// Create an atmosphere from temperature and humidity profiles.
    ///
    /// The geopotential height is calculated hydrostatically, `deltaT` starts at zero and
    /// the well-mixed trace gases are set to their default mixing ratios.
    pub fn new(
        plev: Profile,
        phlev: Profile,
        temperature: Profile,
        humidity: Profile,
    ) -> RCEResult<Self> {
        let n_levels = plev.len();
        if n_levels == 0 {
            return Err(RCEError::configuration(
                "the atmosphere needs at least one level",
            ));
        }
        check_length("phlev", &phlev, n_levels + 1)?;
        check_length(TEMPERATURE, &temperature, n_levels)?;
        check_length(HUMIDITY, &humidity, n_levels)?;

        let mut fields = BTreeMap::new();
        fields.insert(TEMPERATURE.to_string(), temperature);
        fields.insert(HUMIDITY.to_string(), humidity);
        fields.insert(HEIGHT.to_string(), Profile::zeros(n_levels));
        fields.insert(DELTA_T.to_string(), Profile::zeros(n_levels));
        for gas in trace_gases() {
            let vmr = gas.default_vmr.unwrap_or(0.0);
            fields.insert(gas.name.to_string(), Profile::from_elem(n_levels, vmr));
        }

        let mut atmosphere = Self {
            plev,
            phlev,
            fields,
        };
        atmosphere.validate()?;
        atmosphere.calculate_height();
        Ok(atmosphere)
    }

    /// Create an idealised column.
    ///
    /// Half levels are spaced logarithmically between `surface_pressure` and `top_pressure`
    /// and full levels sit at the geometric mean of their bounding half levels.
    /// Temperature decreases by 6.5 K/km from `surface_temperature` and is capped at 200 K.
    /// The humidity mixing ratio decays with the cube of the pressure ratio down to a
    /// stratospheric floor of 4 ppmv.
    pub fn idealised(
        n_levels: usize,
        surface_pressure: FloatValue,
        top_pressure: FloatValue,
        surface_temperature: FloatValue,
    ) -> RCEResult<Self> {
        if n_levels == 0 || !(surface_pressure > top_pressure && top_pressure > 0.0) {
            return Err(RCEError::configuration(format!(
                "cannot build a pressure grid with {} levels between {} Pa and {} Pa",
                n_levels, surface_pressure, top_pressure
            )));
        }
        let phlev = Array1::logspace(
            std::f64::consts::E,
            surface_pressure.ln(),
            top_pressure.ln(),
            n_levels + 1,
        );
        let plev = Array1::from_iter((0..n_levels).map(|i| (phlev[i] * phlev[i + 1]).sqrt()));

        // Scale height estimate of a 288 K column, only used for the initial guess.
        let scale_height = RD * 288.0 / G;
        let temperature = plev.mapv(|p| {
            let z = scale_height * (surface_pressure / p).ln();
            (surface_temperature - 0.0065 * z).max(200.0)
        });
        let humidity = plev.mapv(|p| (0.02 * (p / surface_pressure).powi(3)).max(4e-6));

        Self::new(plev, phlev, temperature, humidity)
    }

    /// Check the invariants of the pressure grid, the presence of the core profiles
    /// (`T`, `H2O`, `z`, `deltaT`) and the profile lengths.
    pub fn validate(&self) -> RCEResult<()> {
        if !is_strictly_decreasing(&self.plev) {
            return Err(RCEError::configuration(
                "pressure levels must decrease strictly with index",
            ));
        }
        if !is_strictly_decreasing(&self.phlev) {
            return Err(RCEError::configuration(
                "half-level pressures must decrease strictly with index",
            ));
        }
        let bracketed = self
            .plev
            .iter()
            .enumerate()
            .all(|(i, p)| self.phlev[i] > *p && *p > self.phlev[i + 1]);
        if !bracketed {
            return Err(RCEError::configuration(
                "every pressure level must lie between its bounding half levels",
            ));
        }
        for name in [TEMPERATURE, HUMIDITY, HEIGHT, DELTA_T] {
            if !self.fields.contains_key(name) {
                return Err(RCEError::configuration(format!(
                    "the atmosphere has no `{}` profile",
                    name
                )));
            }
        }
        for (name, values) in self.fields.iter() {
            check_length(name, values, self.n_levels())?;
        }
        Ok(())
    }

    pub fn n_levels(&self) -> usize {
        self.plev.len()
    }

    pub fn plev(&self) -> &Profile {
        &self.plev
    }

    pub fn phlev(&self) -> &Profile {
        &self.phlev
    }

    /// Names of all profiles held by the atmosphere, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|name| name.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> RCEResult<&Profile> {
        self.fields
            .get(name)
            .ok_or_else(|| RCEError::UnknownVariable(name.to_string()))
    }

    /// Mutable view of a profile. The length of the profile cannot be changed through it.
    pub fn get_mut(&mut self, name: &str) -> RCEResult<ArrayViewMut1<'_, FloatValue>> {
        self.fields
            .get_mut(name)
            .map(|values| values.view_mut())
            .ok_or_else(|| RCEError::UnknownVariable(name.to_string()))
    }

    /// Set (or add) a profile.
    ///
    /// Fails if the profile does not have one value per level.
    pub fn set(&mut self, name: &str, values: Profile) -> RCEResult<()> {
        check_length(name, &values, self.n_levels())?;
        self.fields.insert(name.to_string(), values);
        Ok(())
    }

    /// Iterate over all profiles, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values))
    }

    pub fn temperature(&self) -> ArrayView1<'_, FloatValue> {
        self.fields[TEMPERATURE].view()
    }

    pub fn temperature_mut(&mut self) -> ArrayViewMut1<'_, FloatValue> {
        self.field_mut(TEMPERATURE)
    }

    pub fn humidity(&self) -> ArrayView1<'_, FloatValue> {
        self.fields[HUMIDITY].view()
    }

    pub fn height(&self) -> ArrayView1<'_, FloatValue> {
        self.fields[HEIGHT].view()
    }

    pub fn delta_t(&self) -> ArrayView1<'_, FloatValue> {
        self.fields[DELTA_T].view()
    }

    // The core fields are inserted by the constructor, or checked by `validate` for a
    // deserialised atmosphere, and can never be removed.
    fn field_mut(&mut self, name: &str) -> ArrayViewMut1<'_, FloatValue> {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| Profile::zeros(self.plev.len()))
            .view_mut()
    }

    /// Recompute the geopotential height from the temperature and pressure profiles.
    ///
    /// Hydrostatic integration upwards from the surface (`phlev[0]`, `z = 0`) using the
    /// layer-mean temperature between neighbouring levels.
    pub fn calculate_height(&mut self) {
        let temperature = self.fields[TEMPERATURE].clone();
        let n_levels = self.n_levels();

        let mut z = Profile::zeros(n_levels);
        z[0] = RD * temperature[0] / G * (self.phlev[0] / self.plev[0]).ln();
        for i in 1..n_levels {
            let t_mean = 0.5 * (temperature[i - 1] + temperature[i]);
            z[i] = z[i - 1] + RD * t_mean / G * (self.plev[i - 1] / self.plev[i]).ln();
        }
        self.field_mut(HEIGHT).assign(&z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn three_levels() -> Atmosphere {
        Atmosphere::new(
            array![90000.0, 50000.0, 10000.0],
            array![100000.0, 70000.0, 30000.0, 5000.0],
            array![280.0, 250.0, 210.0],
            array![1e-2, 1e-3, 5e-6],
        )
        .unwrap()
    }

    #[test]
    fn test_new_fills_defaults() {
        let atmosphere = three_levels();

        assert_eq!(atmosphere.n_levels(), 3);
        assert_eq!(atmosphere.delta_t().to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(atmosphere.get("CO2").unwrap()[1], 348e-6);
        assert!(atmosphere.has("CH4"));
        assert!(!atmosphere.has("O3"));
    }

    #[test]
    fn test_new_rejects_increasing_pressure() {
        let result = Atmosphere::new(
            array![10000.0, 50000.0],
            array![5000.0, 30000.0, 70000.0],
            array![210.0, 250.0],
            array![5e-6, 1e-3],
        );
        assert!(matches!(result, Err(RCEError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_unbracketed_levels() {
        let result = Atmosphere::new(
            array![90000.0, 50000.0],
            array![100000.0, 40000.0, 5000.0],
            array![280.0, 250.0],
            array![1e-2, 1e-3],
        );
        assert!(matches!(result, Err(RCEError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_wrong_lengths() {
        let result = Atmosphere::new(
            array![90000.0, 50000.0],
            array![100000.0, 70000.0, 30000.0],
            array![280.0],
            array![1e-2, 1e-3],
        );
        match result {
            Err(RCEError::ProfileLengthMismatch {
                name,
                expected,
                actual,
            }) => {
                assert_eq!(name, "T");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected a length mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_core_profiles() {
        for name in [TEMPERATURE, HUMIDITY, HEIGHT, DELTA_T] {
            let mut value = serde_json::to_value(three_levels()).unwrap();
            value["fields"].as_object_mut().unwrap().remove(name);
            let atmosphere: Atmosphere = serde_json::from_value(value).unwrap();

            assert!(
                matches!(atmosphere.validate(), Err(RCEError::Configuration(_))),
                "missing {} was accepted",
                name
            );
        }
    }

    #[test]
    fn test_get_and_set_by_name() {
        let mut atmosphere = three_levels();

        atmosphere.set("O3", array![1e-8, 1e-7, 5e-6]).unwrap();
        assert_eq!(atmosphere.get("O3").unwrap()[2], 5e-6);

        atmosphere.get_mut("T").unwrap()[0] = 300.0;
        assert_eq!(atmosphere.temperature()[0], 300.0);

        assert!(matches!(
            atmosphere.set("T", array![1.0]),
            Err(RCEError::ProfileLengthMismatch { .. })
        ));
        assert!(matches!(
            atmosphere.get("missing"),
            Err(RCEError::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_height_increases_with_level() {
        let atmosphere = Atmosphere::idealised(40, 101325.0, 100.0, 288.0).unwrap();
        let z = atmosphere.height();

        assert!(z[0] > 0.0);
        for i in 1..z.len() {
            assert!(z[i] > z[i - 1], "height must increase at level {}", i);
        }
    }

    #[test]
    fn test_height_of_isothermal_column() {
        let mut atmosphere = three_levels();
        atmosphere.temperature_mut().fill(250.0);
        atmosphere.calculate_height();

        // For an isothermal column z = H ln(p0 / p) with the scale height H = Rd T / g.
        let scale_height = RD * 250.0 / G;
        let expected = scale_height * (100000.0_f64 / 10000.0).ln();
        assert_relative_eq!(atmosphere.height()[2], expected, max_relative = 1e-12);
    }

    #[test]
    fn test_idealised_profile() {
        let atmosphere = Atmosphere::idealised(20, 100000.0, 1000.0, 300.0).unwrap();

        assert_relative_eq!(atmosphere.phlev()[0], 100000.0, max_relative = 1e-12);
        assert_relative_eq!(atmosphere.phlev()[20], 1000.0, max_relative = 1e-12);
        assert!(atmosphere.temperature()[0] < 300.0);
        assert!(atmosphere.temperature().iter().all(|t| *t >= 200.0));
        assert!(atmosphere.humidity().iter().all(|q| *q >= 4e-6));
    }

    #[test]
    fn test_idealised_rejects_bad_grid() {
        assert!(Atmosphere::idealised(0, 100000.0, 100.0, 288.0).is_err());
        assert!(Atmosphere::idealised(10, 100.0, 1000.0, 288.0).is_err());
    }
}
