//! Error types for fieldlog

use thiserror::Error;

use crate::SessionId;

/// Core error type for fieldlog operations
#[derive(Debug, Error)]
pub enum FieldlogError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
}

impl FieldlogError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// True for errors caused by caller input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}

pub type Result<T> = std::result::Result<T, FieldlogError>;
