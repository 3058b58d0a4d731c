//! Indicator error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndicatorError {
    /// No indicator registered under this name
    #[error("indicator not found: {0}")]
    NotFound(String),

    /// Name already taken in the registry
    #[error("indicator already registered: {0}")]
    DuplicateIndicator(String),

    /// Data of the wrong shape for the indicator
    #[error("invalid input for {indicator}: {reason}")]
    InvalidInput { indicator: String, reason: String },

    /// Rejected construction parameters
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl IndicatorError {
    pub fn invalid_input(indicator: impl Into<String>, reason: impl Into<String>) -> Self {
        IndicatorError::InvalidInput {
            indicator: indicator.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        IndicatorError::InvalidParams(msg.into())
    }
}

/// Reject a zero-length window at construction time.
pub(crate) fn require_period(indicator: &str, name: &str, value: usize) -> Result<usize, IndicatorError> {
    if value == 0 {
        return Err(IndicatorError::invalid_params(format!(
            "{indicator} {name} must be > 0"
        )));
    }
    Ok(value)
}
