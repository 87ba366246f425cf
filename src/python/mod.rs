//! Python bindings, built with the `python` feature.
//!
//! Exposes a single `RCE` class which is configured with the same keys as a
//! [`RunConfig`](crate::config::RunConfig) file, passed as a dict.

use crate::config::RunConfig;
use numpy::{PyArray1, PyReadonlyArray1, ToPyArray};
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rce_core::atmosphere::Atmosphere;
use rce_core::errors::RCEError;
use rce_core::profile::FloatValue;
use rce_core::rce::RCE;

fn to_py_err(error: RCEError) -> PyErr {
    match error {
        RCEError::Configuration(_) | RCEError::ProfileLengthMismatch { .. } => {
            PyValueError::new_err(error.to_string())
        }
        RCEError::UnknownVariable(_) => PyKeyError::new_err(error.to_string()),
        _ => PyRuntimeError::new_err(error.to_string()),
    }
}

fn parse_config(config: Option<Bound<'_, PyAny>>) -> PyResult<RunConfig> {
    match config {
        Some(config) => pythonize::depythonize_bound::<RunConfig>(config)
            .map_err(|e| PyValueError::new_err(format!("{}", e))),
        None => Ok(RunConfig::default()),
    }
}

/// Python wrapper for the RCE controller
#[pyclass]
#[pyo3(name = "RCE")]
pub struct PyRCE(pub RCE);

#[pymethods]
impl PyRCE {
    /// Create a model from a configuration dict.
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = parse_config(config)?;
        Ok(Self(config.build().map_err(to_py_err)?))
    }

    /// Create a model for explicit initial profiles.
    ///
    /// The `atmosphere` entry of the configuration is ignored.
    #[staticmethod]
    #[pyo3(signature = (plev, phlev, temperature, humidity, config=None))]
    fn from_profiles(
        plev: PyReadonlyArray1<FloatValue>,
        phlev: PyReadonlyArray1<FloatValue>,
        temperature: PyReadonlyArray1<FloatValue>,
        humidity: PyReadonlyArray1<FloatValue>,
        config: Option<Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let atmosphere = Atmosphere::new(
            plev.as_array().to_owned(),
            phlev.as_array().to_owned(),
            temperature.as_array().to_owned(),
            humidity.as_array().to_owned(),
        )
        .map_err(to_py_err)?;
        let model = parse_config(config)?
            .into_builder()
            .build(atmosphere)
            .map_err(to_py_err)?;
        Ok(Self(model))
    }

    fn run(&mut self) -> PyResult<()> {
        self.0.run().map_err(to_py_err)
    }

    #[getter]
    fn niter(&self) -> usize {
        self.0.niter()
    }

    #[getter]
    fn status(&self) -> String {
        self.0.status().to_string()
    }

    fn is_converged(&self) -> bool {
        self.0.is_converged()
    }

    fn get_hours_passed(&self) -> FloatValue {
        self.0.get_hours_passed()
    }

    #[getter]
    fn surface_temperature(&self) -> FloatValue {
        self.0.surface().state().temperature
    }

    #[getter]
    fn plev<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.atmosphere().plev().to_pyarray_bound(py)
    }

    #[getter]
    fn phlev<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.atmosphere().phlev().to_pyarray_bound(py)
    }

    /// Profile of an atmospheric variable, e.g. `T` or `H2O`.
    fn get<'py>(
        &self,
        py: Python<'py>,
        name: &str,
    ) -> PyResult<Bound<'py, PyArray1<FloatValue>>> {
        let values = self.0.atmosphere().get(name).map_err(to_py_err)?;
        Ok(values.to_pyarray_bound(py))
    }

    /// A field of the most recent heating rates, e.g. `net_htngrt` or `lw_flxu`.
    fn heatingrate<'py>(
        &self,
        py: Python<'py>,
        name: &str,
    ) -> PyResult<Bound<'py, PyArray1<FloatValue>>> {
        let heatingrates = self
            .0
            .heatingrates()
            .ok_or_else(|| PyRuntimeError::new_err("the model has not been run"))?;
        let values = heatingrates
            .fluxes()
            .into_iter()
            .chain(heatingrates.heating())
            .find(|(field, _)| *field == name)
            .map(|(_, values)| values)
            .or_else(|| heatingrates.extra.get(name))
            .ok_or_else(|| PyKeyError::new_err(name.to_string()))?;
        Ok(values.to_pyarray_bound(py))
    }

    fn __repr__(&self) -> String {
        format!(
            "<RCE status={} niter={} levels={}>",
            self.0.status(),
            self.0.niter(),
            self.0.atmosphere().n_levels()
        )
    }
}

#[pymodule]
#[pyo3(name = "_lib")]
fn rce(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_class::<PyRCE>()?;
    Ok(())
}
