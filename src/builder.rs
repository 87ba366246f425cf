//! Assemble a model, filling in default submodels.

use log::debug;
use rce_components::components::{
    ClearSky, FixedRH, GreyRadiation, HardAdjustment, MoistLapseRate, NoUpwelling,
    SurfaceHeatCapacity,
};
use rce_core::atmosphere::Atmosphere;
use rce_core::errors::RCEResult;
use rce_core::output::{JsonLinesWriter, OutputSink};
use rce_core::parameters::{RCEParameters, WriteEvery};
use rce_core::profile::FloatValue;
use rce_core::rce::RCE;
use rce_core::submodel::{Cloud, Convection, Humidity, LapseRate, Radiation, Submodels, Upwelling};
use rce_core::surface::Surface;
use std::path::PathBuf;

/// Take the supplied submodel or fall back to the default scheme.
macro_rules! resolve {
    ($option:expr, $role:literal, $default:expr) => {
        match $option.take() {
            Some(submodel) => submodel,
            None => {
                let submodel = Box::new($default);
                debug!("Using default {} scheme: {:?}", $role, submodel);
                submodel
            }
        }
    };
}

/// Build an [`RCE`] model.
///
/// Every submodel is optional. Omitted ones are replaced by a default scheme:
///
/// | role | default |
/// |---|---|
/// | radiation | [`GreyRadiation`] |
/// | humidity | [`FixedRH`] |
/// | surface | [`SurfaceHeatCapacity`] |
/// | cloud | [`ClearSky`] |
/// | convection | [`HardAdjustment`] |
/// | lapse rate | [`MoistLapseRate`] |
/// | upwelling | [`NoUpwelling`] |
///
/// Nothing is written unless an output is configured.
#[derive(Debug, Default)]
pub struct RCEBuilder {
    radiation: Option<Box<dyn Radiation>>,
    humidity: Option<Box<dyn Humidity>>,
    surface: Option<Box<dyn Surface>>,
    cloud: Option<Box<dyn Cloud>>,
    convection: Option<Box<dyn Convection>>,
    lapse: Option<Box<dyn LapseRate>>,
    upwelling: Option<Box<dyn Upwelling>>,
    output: Option<Box<dyn OutputSink>>,
    parameters: RCEParameters,
}

impl RCEBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radiation(&mut self, radiation: Box<dyn Radiation>) -> &mut Self {
        self.radiation = Some(radiation);
        self
    }

    pub fn with_humidity(&mut self, humidity: Box<dyn Humidity>) -> &mut Self {
        self.humidity = Some(humidity);
        self
    }

    pub fn with_surface(&mut self, surface: Box<dyn Surface>) -> &mut Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_cloud(&mut self, cloud: Box<dyn Cloud>) -> &mut Self {
        self.cloud = Some(cloud);
        self
    }

    pub fn with_convection(&mut self, convection: Box<dyn Convection>) -> &mut Self {
        self.convection = Some(convection);
        self
    }

    pub fn with_lapse(&mut self, lapse: Box<dyn LapseRate>) -> &mut Self {
        self.lapse = Some(lapse);
        self
    }

    pub fn with_upwelling(&mut self, upwelling: Box<dyn Upwelling>) -> &mut Self {
        self.upwelling = Some(upwelling);
        self
    }

    /// Replace all control parameters at once.
    pub fn with_parameters(&mut self, parameters: RCEParameters) -> &mut Self {
        self.parameters = parameters;
        self
    }

    /// Iteration time step in days.
    pub fn with_timestep(&mut self, timestep: FloatValue) -> &mut Self {
        self.parameters.timestep = timestep;
        self
    }

    /// Temperature change (K) per iteration below which the run has converged.
    pub fn with_delta(&mut self, delta: FloatValue) -> &mut Self {
        self.parameters.delta = delta;
        self
    }

    pub fn with_writeevery(&mut self, writeevery: WriteEvery) -> &mut Self {
        self.parameters.writeevery = writeevery;
        self
    }

    pub fn with_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.parameters.max_iterations = max_iterations;
        self
    }

    pub fn with_experiment(&mut self, experiment: &str) -> &mut Self {
        self.parameters.experiment = experiment.to_string();
        self
    }

    /// Write the trajectory to a JSON-lines file.
    pub fn with_outfile(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output = Some(Box::new(JsonLinesWriter::new(path)));
        self
    }

    /// Write the trajectory to a custom output.
    pub fn with_output(&mut self, output: Box<dyn OutputSink>) -> &mut Self {
        self.output = Some(output);
        self
    }

    /// Build the model for an atmosphere.
    ///
    /// The configured submodels and output are moved into the model, so a second call
    /// starts again from the defaults. The control parameters are kept.
    pub fn build(&mut self, atmosphere: Atmosphere) -> RCEResult<RCE> {
        let submodels = Submodels {
            radiation: resolve!(self.radiation, "radiation", GreyRadiation::default()),
            humidity: resolve!(self.humidity, "humidity", FixedRH::default()),
            surface: resolve!(self.surface, "surface", SurfaceHeatCapacity::default()),
            cloud: resolve!(self.cloud, "cloud", ClearSky::default()),
            convection: resolve!(self.convection, "convection", HardAdjustment::default()),
            lapse: resolve!(self.lapse, "lapse rate", MoistLapseRate::default()),
            upwelling: resolve!(self.upwelling, "upwelling", NoUpwelling::default()),
        };
        RCE::new(
            atmosphere,
            submodels,
            self.parameters.clone(),
            self.output.take(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rce_components::components::{FixedLapseRate, FixedVMR};
    use rce_core::errors::RCEError;
    use rce_core::output::MemorySink;
    use rce_core::rce::RunStatus;

    fn atmosphere() -> Atmosphere {
        Atmosphere::idealised(30, 101325.0, 100.0, 288.0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let model = RCEBuilder::new().build(atmosphere()).unwrap();

        assert_eq!(model.status(), RunStatus::Initializing);
        assert_eq!(model.parameters(), &RCEParameters::default());
        assert_eq!(model.submodels().radiation.solar_constant(), Some(551.58));
        assert_eq!(model.surface().state().temperature, 288.0);
        assert!(!model.should_write(0));
    }

    #[test]
    fn test_supplied_submodels_are_used() {
        let model = RCEBuilder::new()
            .with_humidity(Box::new(FixedVMR {}))
            .with_lapse(Box::new(FixedLapseRate { lapserate: 0.008 }))
            .with_surface(Box::new(SurfaceHeatCapacity::new(300.0)))
            .with_timestep(0.25)
            .with_max_iterations(10)
            .build(atmosphere())
            .unwrap();

        assert_eq!(model.surface().state().temperature, 300.0);
        assert_eq!(model.parameters().timestep, 0.25);
        assert_eq!(model.parameters().max_iterations, 10);
        let lapse = model.submodels().lapse.get(model.atmosphere()).unwrap();
        assert_eq!(lapse[0], 0.008);
    }

    #[test]
    fn test_invalid_parameters() {
        let result = RCEBuilder::new().with_timestep(-1.0).build(atmosphere());
        assert!(matches!(result, Err(RCEError::Configuration(_))));
    }

    #[test]
    fn test_output() {
        let sink = MemorySink::new();
        let mut model = RCEBuilder::new()
            .with_output(Box::new(sink.clone()))
            .with_experiment("builder")
            .with_max_iterations(2)
            .build(atmosphere())
            .unwrap();

        model.run().unwrap();

        assert_eq!(sink.metadata().unwrap().experiment, "builder");
        assert_eq!(sink.metadata().unwrap().solar_constant, Some(551.58));
        assert_eq!(sink.records().len(), 2);
    }
}
