//! Control parameters of a model run.

use crate::errors::{RCEError, RCEResult};
use crate::profile::FloatValue;
use serde::{Deserialize, Serialize};

/// How often the state is written to the output.
///
/// In configuration files an integer selects an iteration cadence and a float a cadence in
/// days:
///
/// ```rust
/// use rce_core::parameters::WriteEvery;
///
/// let every_third: WriteEvery = serde_json::from_str("3").unwrap();
/// assert_eq!(every_third, WriteEvery::Iterations(3));
///
/// let twice_a_week: WriteEvery = serde_json::from_str("3.5").unwrap();
/// assert_eq!(twice_a_week, WriteEvery::Days(3.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriteEvery {
    /// Write every nth iteration
    Iterations(usize),
    /// Write every nth day
    Days(FloatValue),
}

impl Default for WriteEvery {
    fn default() -> Self {
        WriteEvery::Iterations(1)
    }
}

impl WriteEvery {
    /// Test if iteration `niter` falls on the write cadence.
    ///
    /// For a cadence in days, half a time step is added to the elapsed time before taking
    /// the remainder. Otherwise floating point residues right at a boundary
    /// (e.g. `3.3 % 3 < 0.3`) produce spurious writes.
    pub fn is_due(&self, niter: usize, timestep: FloatValue) -> bool {
        match *self {
            WriteEvery::Iterations(cadence) => niter % cadence == 0,
            WriteEvery::Days(cadence) => {
                ((niter as FloatValue + 0.5) * timestep) % cadence < timestep
            }
        }
    }

    fn validate(&self) -> RCEResult<()> {
        match *self {
            WriteEvery::Iterations(0) => Err(RCEError::configuration(
                "writeevery must be a positive number of iterations",
            )),
            WriteEvery::Days(days) if !(days.is_finite() && days > 0.0) => {
                Err(RCEError::configuration(format!(
                    "writeevery must be a positive number of days, got {}",
                    days
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Parameters controlling the iteration loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RCEParameters {
    /// Iteration time step (days)
    pub timestep: FloatValue,
    /// Stop criterion.
    /// The run has converged once the temperature change of every level in an iteration is
    /// below this threshold (K).
    pub delta: FloatValue,
    pub writeevery: WriteEvery,
    pub max_iterations: usize,
    /// Experiment description, stored in the output metadata
    pub experiment: String,
}

impl Default for RCEParameters {
    fn default() -> Self {
        Self {
            timestep: 1.0,
            delta: 0.01,
            writeevery: WriteEvery::default(),
            max_iterations: 5000,
            experiment: String::new(),
        }
    }
}

impl RCEParameters {
    pub fn validate(&self) -> RCEResult<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(RCEError::configuration(format!(
                "timestep must be a positive number of days, got {}",
                self.timestep
            )));
        }
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(RCEError::configuration(format!(
                "delta must be positive, got {}",
                self.delta
            )));
        }
        if self.max_iterations == 0 {
            return Err(RCEError::configuration("max_iterations must be at least 1"));
        }
        self.writeevery.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_cadence() {
        let cadence = WriteEvery::Iterations(3);
        let due: Vec<usize> = (0..10).filter(|n| cadence.is_due(*n, 0.5)).collect();
        assert_eq!(due, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_day_cadence_matches_formula() {
        let timestep = 1.0;
        let cadence = WriteEvery::Days(2.5);
        for niter in 0..12 {
            let expected = ((niter as f64 + 0.5) * timestep) % 2.5 < timestep;
            assert_eq!(
                cadence.is_due(niter, timestep),
                expected,
                "cadence mismatch at iteration {}",
                niter
            );
        }
    }

    #[test]
    fn test_day_cadence_avoids_float_residue() {
        // Without the half-step offset 3.3 % 3 < 0.3 would schedule iteration 11.
        let timestep = 0.3;
        let cadence = WriteEvery::Days(3.0);
        let due: Vec<usize> = (0..25).filter(|n| cadence.is_due(*n, timestep)).collect();
        assert_eq!(due, vec![0, 10, 20]);
    }

    #[test]
    fn test_deserialize_cadence() {
        let iterations: WriteEvery = serde_json::from_str("4").unwrap();
        assert_eq!(iterations, WriteEvery::Iterations(4));

        let days: WriteEvery = serde_json::from_str("0.5").unwrap();
        assert_eq!(days, WriteEvery::Days(0.5));

        assert!(serde_json::from_str::<WriteEvery>("\"daily\"").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(RCEParameters::default().validate().is_ok());

        let invalid = [
            RCEParameters {
                timestep: 0.0,
                ..Default::default()
            },
            RCEParameters {
                delta: -1.0,
                ..Default::default()
            },
            RCEParameters {
                max_iterations: 0,
                ..Default::default()
            },
            RCEParameters {
                writeevery: WriteEvery::Iterations(0),
                ..Default::default()
            },
            RCEParameters {
                writeevery: WriteEvery::Days(f64::NAN),
                ..Default::default()
            },
        ];
        for parameters in invalid {
            assert!(
                matches!(parameters.validate(), Err(RCEError::Configuration(_))),
                "{:?} should be rejected",
                parameters
            );
        }
    }
}
