//! Controller struct and the iteration loop.

use crate::atmosphere::{Atmosphere, DELTA_T, HUMIDITY};
use crate::errors::RCEResult;
use crate::heating_rates::HeatingRates;
use crate::observer::{LogObserver, RunEvent, RunObserver};
use crate::output::{Metadata, OutputSink, Record};
use crate::parameters::RCEParameters;
use crate::profile::{check_length, FloatValue};
use crate::submodel::Submodels;
use crate::surface::Surface;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a model run.
///
/// `Converged` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// Constructed, `run()` not yet called
    Initializing,
    Iterating,
    /// The temperature change of the last iteration was below `delta` on every level
    Converged,
    /// `max_iterations` were run without convergence
    Exhausted,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Converged | RunStatus::Exhausted)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Initializing => write!(f, "Initializing"),
            RunStatus::Iterating => write!(f, "Iterating"),
            RunStatus::Converged => write!(f, "Converged"),
            RunStatus::Exhausted => write!(f, "Exhausted"),
        }
    }
}

/// Controls a radiative-convective equilibrium simulation.
///
/// The controller owns the atmosphere, the surface and the submodels for the duration of
/// the run. They are handed back with [`RCE::into_parts`].
pub struct RCE {
    atmosphere: Atmosphere,
    submodels: Submodels,
    parameters: RCEParameters,
    output: Option<Box<dyn OutputSink>>,
    observer: Box<dyn RunObserver>,
    /// Result of the most recent radiation call
    heatingrates: Option<HeatingRates>,
    niter: usize,
    converged: bool,
    status: RunStatus,
}

impl RCE {
    /// Set up a model run.
    ///
    /// Fails with a configuration error if the parameters are invalid, the atmosphere breaks
    /// its invariants, or any submodel rejects the column it is coupled to.
    /// Without an output target nothing is written.
    pub fn new(
        atmosphere: Atmosphere,
        submodels: Submodels,
        parameters: RCEParameters,
        output: Option<Box<dyn OutputSink>>,
    ) -> RCEResult<Self> {
        parameters.validate()?;
        atmosphere.validate()?;
        submodels.validate(&atmosphere)?;

        let model = Self {
            atmosphere,
            submodels,
            parameters,
            output,
            observer: Box::new(LogObserver),
            heatingrates: None,
            niter: 0,
            converged: false,
            status: RunStatus::Initializing,
        };
        info!("Created RCE model:\n{:#?}", model);
        Ok(model)
    }

    /// Replace the observer that is notified of run events.
    pub fn with_observer(mut self, observer: impl RunObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Number of iterations completed without convergence.
    pub fn niter(&self) -> usize {
        self.niter
    }

    /// True once a run has met the convergence criterion.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn parameters(&self) -> &RCEParameters {
        &self.parameters
    }

    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    pub fn surface(&self) -> &dyn Surface {
        &*self.submodels.surface
    }

    pub fn submodels(&self) -> &Submodels {
        &self.submodels
    }

    /// Fluxes and heating rates of the most recent iteration.
    pub fn heatingrates(&self) -> Option<&HeatingRates> {
        self.heatingrates.as_ref()
    }

    /// Hand back the atmosphere.
    pub fn into_atmosphere(self) -> Atmosphere {
        self.atmosphere
    }

    /// Hand back the atmosphere and the submodels.
    pub fn into_parts(self) -> (Atmosphere, Submodels) {
        (self.atmosphere, self.submodels)
    }

    /// Number of hours passed since model start.
    pub fn get_hours_passed(&self) -> FloatValue {
        self.niter as FloatValue * 24.0 * self.parameters.timestep
    }

    /// Check if the atmosphere is in radiative-convective equilibrium.
    ///
    /// True if the temperature change of the most recent iteration is below `delta` on
    /// every level. The radiation budget at the top of the atmosphere is not considered.
    pub fn is_converged(&self) -> bool {
        let delta = self.parameters.delta;
        self.atmosphere.delta_t().iter().all(|d| d.abs() < delta)
    }

    /// Check if iteration `niter` is scheduled to be written.
    ///
    /// Never true if there is no output target.
    pub fn should_write(&self, niter: usize) -> bool {
        self.output.is_some()
            && self
                .parameters
                .writeevery
                .is_due(niter, self.parameters.timestep)
    }

    /// Run the model until it converges or `max_iterations` is reached.
    ///
    /// Errors from a submodel or the output target abort the run. The state is not rolled
    /// back, so it may be left partially updated.
    /// Calling `run` again once the run has converged or been exhausted does nothing.
    pub fn run(&mut self) -> RCEResult<()> {
        if self.status.is_terminal() {
            return Ok(());
        }
        self.observer.notify(&RunEvent::Started);

        // The surface pressure follows the lowest half level.
        self.submodels.surface.state_mut().pressure = self.atmosphere.phlev()[0];
        self.status = RunStatus::Iterating;

        while self.niter < self.parameters.max_iterations {
            self.observer
                .notify(&RunEvent::IterationStarted { niter: self.niter });

            self.iterate()?;

            if self.should_write(self.niter) {
                self.write()?;
            }

            if self.is_converged() {
                self.converged = true;
                self.status = RunStatus::Converged;
                self.observer
                    .notify(&RunEvent::Converged { niter: self.niter });
                return Ok(());
            }
            self.niter += 1;
        }

        self.status = RunStatus::Exhausted;
        self.observer
            .notify(&RunEvent::Exhausted { niter: self.niter });
        Ok(())
    }

    /// Apply all submodels once.
    fn iterate(&mut self) -> RCEResult<()> {
        let timestep = self.parameters.timestep;
        let n_levels = self.atmosphere.n_levels();
        let time_days = self.get_hours_passed() / 24.0;
        let submodels = &mut self.submodels;

        submodels.radiation.adjust_solar_angle(time_days);
        let heatingrates = submodels.radiation.get_heatingrates(
            &self.atmosphere,
            &*submodels.surface,
            &*submodels.cloud,
        )?;
        heatingrates.validate(n_levels)?;

        submodels
            .surface
            .adjust(&heatingrates.surface_fluxes(), timestep);

        // Compared against the adjusted profile for the convergence check.
        let t_previous = self.atmosphere.temperature().to_owned();

        let lapse = submodels.lapse.get(&self.atmosphere)?;
        check_length("lapse", &lapse, n_levels)?;

        self.atmosphere
            .temperature_mut()
            .scaled_add(timestep, &heatingrates.net_htngrt);

        submodels.convection.stabilize(
            &mut self.atmosphere,
            &lapse,
            timestep,
            &mut *submodels.surface,
        )?;

        submodels
            .upwelling
            .cool(&mut self.atmosphere, &heatingrates.net_htngrt, timestep)?;

        self.atmosphere.calculate_height();

        let humidity = submodels.humidity.get(
            &self.atmosphere,
            &*submodels.surface,
            &heatingrates.net_htngrt,
        )?;
        self.atmosphere.set(HUMIDITY, humidity)?;

        let delta_t = &self.atmosphere.temperature() - &t_previous;
        self.atmosphere.set(DELTA_T, delta_t)?;

        self.heatingrates = Some(heatingrates);
        Ok(())
    }

    /// Write the current state.
    ///
    /// The first iteration creates the output, all later ones append to it.
    fn write(&mut self) -> RCEResult<()> {
        let hours = self.get_hours_passed();
        let Some(output) = self.output.as_mut() else {
            return Ok(());
        };

        let record = Record::snapshot(
            hours,
            &self.atmosphere,
            self.heatingrates.as_ref(),
            self.submodels.surface.state(),
        );
        if self.niter == 0 {
            let metadata = Metadata::now(
                &self.parameters.experiment,
                self.submodels.radiation.solar_constant(),
            );
            output.create(&record, &metadata)?;
        } else {
            output.append(&record)?;
        }

        self.observer.notify(&RunEvent::Written {
            niter: self.niter,
            hours,
        });
        Ok(())
    }
}

impl fmt::Debug for RCE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RCE")
            .field("n_levels", &self.atmosphere.n_levels())
            .field("submodels", &self.submodels)
            .field("parameters", &self.parameters)
            .field("output", &self.output)
            .field("niter", &self.niter)
            .field("converged", &self.converged)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
