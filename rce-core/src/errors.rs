use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum RCEError {
    #[error("{0}")]
    Error(String),
    /// A submodel, the control parameters or the atmosphere do not satisfy their contract.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Profile `{name}` has {actual} values, expected {expected}")]
    ProfileLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("Output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not (de)serialise record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RCEError {
    pub fn configuration(message: impl Into<String>) -> Self {
        RCEError::Configuration(message.into())
    }
}

/// Convenience type for `Result<T, RCEError>`.
pub type RCEResult<T> = Result<T, RCEError>;
