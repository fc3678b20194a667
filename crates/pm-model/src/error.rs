//! Thermodynamic model errors.

use pm_core::PmError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the model, the facet search, or the equilibrium solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Conditions that cannot describe a calculation (wrong counts, empty axes).
    #[error("Condition error: {what}")]
    Condition { what: String },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A phase the model does not define.
    #[error("Unknown phase: {name}")]
    UnknownPhase { name: String },

    /// A component the system does not contain.
    #[error("Unknown component: {name}")]
    UnknownComponent { name: String },

    /// Non-physical values (non-finite energy, fractions outside [0, 1]).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Target composition outside the sampled composition range.
    #[error("Composition {value} outside sampled range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    /// Facet or tangent system without a unique solution.
    #[error("Degenerate facet: {what}")]
    Degenerate { what: &'static str },

    /// Operation not supported (e.g., more than two components).
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Core error: {0}")]
    Core(#[from] PmError),
}

impl ModelError {
    pub fn condition(what: impl Into<String>) -> Self {
        ModelError::Condition { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::UnknownPhase {
            name: "LIQUID".into(),
        };
        assert!(err.to_string().contains("LIQUID"));

        let err = ModelError::condition("Number of dependent components is 2");
        assert!(err.to_string().starts_with("Condition error"));
    }

    #[test]
    fn core_error_converts() {
        let core = PmError::InvalidArg { what: "linspace" };
        let err: ModelError = core.into();
        assert!(matches!(err, ModelError::Core(_)));
    }
}
