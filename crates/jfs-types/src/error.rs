use thiserror::Error;

/// A validator rejected an object.
///
/// Stores surface this value unchanged so the caller sees exactly what the
/// validator reported.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid object: {reason}")]
pub struct ValidationError {
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
