//! Error types for mapping operations.

use pm_core::error::PmError;
use pm_model::ModelError;
use thiserror::Error;

/// Errors that can occur while mapping a phase diagram.
#[derive(Error, Debug)]
pub enum MapError {
    /// Conditions that cannot describe a binary map.
    #[error("Condition error: {what}")]
    Condition { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type MapResult<T> = Result<T, MapError>;

impl MapError {
    pub fn condition(what: impl Into<String>) -> Self {
        MapError::Condition { what: what.into() }
    }
}

impl From<MapError> for PmError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::Condition { what: _ } => PmError::InvalidArg { what: "conditions" },
            MapError::InvalidArg { what } => PmError::InvalidArg { what },
            MapError::Invariant { what: _ } => PmError::Invariant { what: "mapping" },
            MapError::Model(_) => PmError::InvalidArg { what: "model" },
        }
    }
}
