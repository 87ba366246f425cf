//! Scalar and profile types shared by every part of the model.

use crate::errors::{RCEError, RCEResult};
use ndarray::Array1;

pub type FloatValue = f64;

/// A value per pressure level (or per half level), ordered like the level array.
pub type Profile = Array1<FloatValue>;

/// Fail with [`RCEError::ProfileLengthMismatch`] unless `values` has `expected` entries.
pub fn check_length(name: &str, values: &Profile, expected: usize) -> RCEResult<()> {
    if values.len() != expected {
        return Err(RCEError::ProfileLengthMismatch {
            name: name.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Test if a profile is strictly decreasing.
pub fn is_strictly_decreasing(values: &Profile) -> bool {
    values
        .iter()
        .zip(values.iter().skip(1))
        .all(|(lower, upper)| lower > upper)
}
