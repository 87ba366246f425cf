//! Diagnostics of a model run.
//!
//! The controller reports progress to a [`RunObserver`] at fixed points of the loop instead
//! of logging directly. [`LogObserver`], the default, forwards the events to the `log`
//! facade. Any `FnMut(&RunEvent)` closure is an observer as well.

use crate::profile::FloatValue;
use log::{debug, info};

/// A point of interest in the iteration loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEvent {
    /// `run()` was entered
    Started,
    /// The body of iteration `niter` is about to be executed
    IterationStarted { niter: usize },
    /// The state of iteration `niter` was written at `hours` since model start
    Written { niter: usize, hours: FloatValue },
    /// The convergence criterion was met in iteration `niter`
    Converged { niter: usize },
    /// The maximum number of iterations was reached without convergence
    Exhausted { niter: usize },
}

pub trait RunObserver: Send {
    fn notify(&mut self, event: &RunEvent);
}

impl<F> RunObserver for F
where
    F: FnMut(&RunEvent) + Send,
{
    fn notify(&mut self, event: &RunEvent) {
        self(event)
    }
}

/// Logs run events.
///
/// Every 100th iteration start is logged at INFO, all others at DEBUG.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn notify(&mut self, event: &RunEvent) {
        match *event {
            RunEvent::Started => info!("Start RCE model run."),
            RunEvent::IterationStarted { niter } if niter % 100 == 0 => {
                info!("Enter iteration {}.", niter)
            }
            RunEvent::IterationStarted { niter } => debug!("Enter iteration {}.", niter),
            RunEvent::Written { niter, hours } => {
                debug!("Wrote iteration {} ({} hours).", niter, hours)
            }
            RunEvent::Converged { niter } => info!("Converged after {} iterations.", niter),
            RunEvent::Exhausted { .. } => info!("Stopped after maximum number of iterations."),
        }
    }
}
