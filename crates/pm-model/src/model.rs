//! Gibbs energy model trait and validation helpers.

use crate::conditions::{Parameters, ThermoConditions};
use crate::error::{ModelError, ModelResult};

/// Molar Gibbs energy and overall composition of one phase configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PhasePoint {
    /// Molar Gibbs energy [J/mol]
    pub gm: f64,
    /// Mole fraction of each component, in sorted component order
    pub composition: Vec<f64>,
}

/// Trait for Gibbs energy models.
///
/// A model owns a set of phases, each described by a vector of internal
/// degrees of freedom (site fractions). The mapping core only ever samples
/// the model through this trait.
///
/// Implementations must be thread-safe (Send + Sync) so independent mapping
/// runs can share one model.
pub trait GibbsModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Components of the system, sorted, without vacancies.
    fn components(&self) -> &[String];

    /// Names of all phases the model defines.
    fn phase_names(&self) -> Vec<&str>;

    /// Check if this model defines the given phase.
    fn has_phase(&self, phase: &str) -> bool {
        self.phase_names().iter().any(|p| *p == phase)
    }

    /// Site-fraction configurations covering the phase's internal space.
    ///
    /// `point_density` controls fineness; how it maps to a point count is
    /// up to the model.
    fn sample_site_fractions(&self, phase: &str, point_density: usize)
    -> ModelResult<Vec<Vec<f64>>>;

    /// Site-fraction configurations within `span` of `center`.
    fn refine_site_fractions(
        &self,
        phase: &str,
        center: &[f64],
        span: f64,
        points: usize,
    ) -> ModelResult<Vec<Vec<f64>>>;

    /// Evaluate molar Gibbs energy and composition at one configuration.
    fn evaluate(
        &self,
        phase: &str,
        site_fractions: &[f64],
        state: &ThermoConditions,
        parameters: &Parameters,
    ) -> ModelResult<PhasePoint>;
}

/// Validation helpers for model inputs and outputs.
pub(crate) mod validation {
    use super::*;

    /// Ensure every site fraction lies in [0, 1] and is finite.
    pub fn validate_site_fractions(y: &[f64]) -> ModelResult<()> {
        if y.iter().any(|v| !v.is_finite() || *v < 0.0 || *v > 1.0) {
            return Err(ModelError::NonPhysical {
                what: "site fractions must lie in [0, 1]",
            });
        }
        Ok(())
    }

    /// Ensure an evaluated energy is finite (can be negative).
    pub fn validate_energy(gm: f64) -> ModelResult<()> {
        if !gm.is_finite() {
            return Err(ModelError::NonPhysical {
                what: "molar Gibbs energy must be finite",
            });
        }
        Ok(())
    }
}
