//! Point-grid evaluation of a model over the phases' internal space.

use crate::conditions::{Parameters, ThermoConditions};
use crate::error::{ModelError, ModelResult};
use crate::model::{GibbsModel, PhasePoint};

/// Label of the fictitious pure-component points added for hull correctness.
pub const FAKE_PHASE: &str = "_FAKE_";

/// Energy of fictitious points; above any real configuration.
pub const FAKE_POINT_ENERGY: f64 = 1e10;

/// Sampled energies, compositions, and site fractions, one entry per point.
///
/// Site-fraction vectors are ragged: each holds exactly the phase's internal
/// degrees of freedom (empty for fake points).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSample {
    pub phases: Vec<String>,
    pub energies: Vec<f64>,
    pub compositions: Vec<Vec<f64>>,
    pub site_fractions: Vec<Vec<f64>>,
}

impl PointSample {
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn push(&mut self, phase: &str, site_fractions: Vec<f64>, point: PhasePoint) {
        self.phases.push(phase.to_string());
        self.energies.push(point.gm);
        self.compositions.push(point.composition);
        self.site_fractions.push(site_fractions);
    }

    pub fn extend(&mut self, other: PointSample) {
        self.phases.extend(other.phases);
        self.energies.extend(other.energies);
        self.compositions.extend(other.compositions);
        self.site_fractions.extend(other.site_fractions);
    }

    /// True if point `i` is a fictitious endpoint rather than a phase configuration.
    pub fn is_fake(&self, i: usize) -> bool {
        self.phases.get(i).is_some_and(|p| p == FAKE_PHASE)
    }

    /// Add one fictitious point at each pure-component corner.
    pub fn push_fake_points(&mut self, num_components: usize) {
        for i in 0..num_components {
            let mut composition = vec![0.0; num_components];
            composition[i] = 1.0;
            self.push(
                FAKE_PHASE,
                Vec::new(),
                PhasePoint {
                    gm: FAKE_POINT_ENERGY,
                    composition,
                },
            );
        }
    }
}

/// Options for point-grid evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculateOptions {
    /// Sampling fineness per phase
    pub point_density: usize,
    /// Prepend fictitious pure-component points
    pub fake_points: bool,
}

impl Default for CalculateOptions {
    fn default() -> Self {
        Self {
            point_density: 500,
            fake_points: true,
        }
    }
}

/// Evaluate every listed phase on its sampled configurations.
pub fn calculate(
    model: &dyn GibbsModel,
    phases: &[String],
    state: &ThermoConditions,
    parameters: &Parameters,
    options: &CalculateOptions,
) -> ModelResult<PointSample> {
    if phases.is_empty() {
        return Err(ModelError::condition("no phases to calculate"));
    }
    if options.point_density == 0 {
        return Err(ModelError::InvalidArg {
            what: "point density must be positive",
        });
    }

    let mut sample = PointSample::default();
    if options.fake_points {
        sample.push_fake_points(model.components().len());
    }
    for phase in phases {
        if !model.has_phase(phase) {
            return Err(ModelError::UnknownPhase {
                name: phase.clone(),
            });
        }
        let configurations = model.sample_site_fractions(phase, options.point_density)?;
        evaluate_into(model, phase, configurations, state, parameters, &mut sample)?;
    }

    tracing::trace!(
        model = model.name(),
        points = sample.len(),
        t_k = state.temperature_k(),
        "calculated point grid"
    );
    Ok(sample)
}

/// Evaluate `phase` at each configuration and append the results to `sample`.
pub fn evaluate_into(
    model: &dyn GibbsModel,
    phase: &str,
    configurations: Vec<Vec<f64>>,
    state: &ThermoConditions,
    parameters: &Parameters,
    sample: &mut PointSample,
) -> ModelResult<()> {
    for y in configurations {
        let point = model.evaluate(phase, &y, state, parameters)?;
        sample.push(phase, y, point);
    }
    Ok(())
}
