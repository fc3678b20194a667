use thiserror::Error;

pub type PmResult<T> = Result<T, PmError>;

/// Failures of the numeric helpers shared by every phasemap crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PmError {
    #[error("{what} is not finite: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("{what} must lie in [0, 1], got {value}")]
    NotAFraction { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
