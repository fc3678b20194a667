//! Fixed-composition equilibrium on a refined point grid.
//!
//! [`HullEquilibrium`] starts from a dense sample, then repeatedly resamples
//! each facet vertex's neighborhood on a shrinking span and recomputes the
//! facet. Vertices that converge onto the same configuration of one phase are
//! collapsed into a single slot.

use crate::composition::composition_vector;
use crate::conditions::{EquilibriumConditions, Parameters};
use crate::error::{ModelError, ModelResult};
use crate::hyperplane::{Facet, Hyperplane};
use crate::model::GibbsModel;
use crate::sample::{CalculateOptions, FAKE_PHASE, PointSample, calculate, evaluate_into};
use pm_core::numeric::{MIN_SITE_FRACTION, max_abs_diff};

/// One vertex of an equilibrium or hull assemblage.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSlot {
    /// Phase name; empty or [`FAKE_PHASE`] marks an unoccupied slot
    pub phase: String,
    pub fraction: f64,
    pub composition: Vec<f64>,
    pub site_fractions: Vec<f64>,
    /// Molar Gibbs energy of this configuration [J/mol]
    pub gm: f64,
}

impl PhaseSlot {
    pub fn is_occupied(&self) -> bool {
        !self.phase.is_empty() && self.phase != FAKE_PHASE
    }
}

/// Slots for each facet vertex, in facet order.
pub fn slots_from_facet(sample: &PointSample, facet: &Facet) -> Vec<PhaseSlot> {
    facet
        .vertices
        .iter()
        .zip(&facet.fractions)
        .map(|(&v, &fraction)| PhaseSlot {
            phase: sample.phases[v].clone(),
            fraction,
            composition: sample.compositions[v].clone(),
            site_fractions: sample.site_fractions[v].clone(),
            gm: sample.energies[v],
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumResult {
    pub phases: Vec<PhaseSlot>,
    pub chemical_potentials: Vec<f64>,
}

impl EquilibriumResult {
    pub fn occupied(&self) -> impl Iterator<Item = &PhaseSlot> {
        self.phases.iter().filter(|slot| slot.is_occupied())
    }

    /// Number of stable phases (occupied slots).
    pub fn phase_count(&self) -> usize {
        self.occupied().count()
    }
}

/// Trait for exact single-point equilibrium solvers.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait EquilibriumSolver: Send + Sync {
    fn equilibrium(
        &self,
        phases: &[String],
        conditions: &EquilibriumConditions,
        parameters: &Parameters,
    ) -> ModelResult<EquilibriumResult>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumOptions {
    /// Initial sampling fineness per phase
    pub point_density: usize,
    /// Number of local resampling passes
    pub refinement_iterations: usize,
    /// Points per vertex per pass
    pub refinement_points: usize,
    /// Same-phase vertices closer than this in composition are merged
    pub collapse_tol: f64,
}

impl Default for EquilibriumOptions {
    fn default() -> Self {
        Self {
            point_density: 2000,
            refinement_iterations: 4,
            refinement_points: 21,
            collapse_tol: 1e-3,
        }
    }
}

/// Equilibrium solver built on a model and a facet search.
pub struct HullEquilibrium<'a> {
    model: &'a dyn GibbsModel,
    hyperplane: &'a dyn Hyperplane,
    options: EquilibriumOptions,
}

impl<'a> HullEquilibrium<'a> {
    pub fn new(model: &'a dyn GibbsModel, hyperplane: &'a dyn Hyperplane) -> Self {
        Self {
            model,
            hyperplane,
            options: EquilibriumOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EquilibriumOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EquilibriumOptions {
        &self.options
    }

    fn validate_options(&self) -> ModelResult<()> {
        let o = &self.options;
        if o.point_density < 2 {
            return Err(ModelError::InvalidArg {
                what: "equilibrium point density must be at least 2",
            });
        }
        if o.refinement_points < 2 {
            return Err(ModelError::InvalidArg {
                what: "refinement needs at least 2 points",
            });
        }
        if !o.collapse_tol.is_finite() || o.collapse_tol < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "collapse tolerance must be non-negative",
            });
        }
        Ok(())
    }
}

impl EquilibriumSolver for HullEquilibrium<'_> {
    fn equilibrium(
        &self,
        phases: &[String],
        conditions: &EquilibriumConditions,
        parameters: &Parameters,
    ) -> ModelResult<EquilibriumResult> {
        self.validate_options()?;
        let target = composition_vector(
            self.model.components(),
            &conditions.component,
            conditions.mole_fraction,
        )?;
        let state = &conditions.state;

        let mut sample = calculate(
            self.model,
            phases,
            state,
            parameters,
            &CalculateOptions {
                point_density: self.options.point_density,
                fake_points: true,
            },
        )?;
        let mut facet = self.hyperplane.facet(&sample, &target)?;

        let mut span = 2.0 / self.options.point_density as f64;
        let shrink = ((self.options.refinement_points - 1) as f64 / 4.0).max(2.0);
        for _ in 0..self.options.refinement_iterations {
            let mut refined = PointSample::default();
            for &v in &facet.vertices {
                if sample.is_fake(v) {
                    continue;
                }
                let phase = &sample.phases[v];
                let configurations = self.model.refine_site_fractions(
                    phase,
                    &sample.site_fractions[v],
                    span,
                    self.options.refinement_points,
                )?;
                evaluate_into(
                    self.model,
                    phase,
                    configurations,
                    state,
                    parameters,
                    &mut refined,
                )?;
            }
            if refined.is_empty() {
                break;
            }
            sample.extend(refined);
            facet = self.hyperplane.facet(&sample, &target)?;
            span /= shrink;
        }

        let slots = collapse_slots(slots_from_facet(&sample, &facet), self.options.collapse_tol);
        tracing::trace!(
            x = conditions.mole_fraction,
            t_k = state.temperature_k(),
            phases = slots.len(),
            points = sample.len(),
            "equilibrium"
        );
        Ok(EquilibriumResult {
            phases: slots,
            chemical_potentials: facet.chemical_potentials,
        })
    }
}

/// Merge same-phase slots that sit on one configuration, and drop slots
/// with negligible fraction.
pub fn collapse_slots(slots: Vec<PhaseSlot>, collapse_tol: f64) -> Vec<PhaseSlot> {
    let mut merged: Vec<PhaseSlot> = Vec::with_capacity(slots.len());
    for slot in slots {
        let twin = merged.iter_mut().find(|m| {
            m.phase == slot.phase
                && max_abs_diff(&m.composition, &slot.composition) < collapse_tol
        });
        match twin {
            Some(m) => {
                let total = m.fraction + slot.fraction;
                if total > 0.0 {
                    let (wa, wb) = (m.fraction / total, slot.fraction / total);
                    blend(&mut m.composition, &slot.composition, wa, wb);
                    blend(&mut m.site_fractions, &slot.site_fractions, wa, wb);
                    m.gm = wa * m.gm + wb * slot.gm;
                }
                m.fraction = total;
            }
            None => merged.push(slot),
        }
    }

    if merged.len() > 1 {
        let largest = merged
            .iter()
            .map(|s| s.fraction)
            .fold(f64::NEG_INFINITY, f64::max);
        merged.retain(|s| s.fraction >= MIN_SITE_FRACTION || s.fraction == largest);
    }
    merged
}

fn blend(into: &mut [f64], other: &[f64], wa: f64, wb: f64) {
    for (a, b) in into.iter_mut().zip(other) {
        *a = wa * *a + wb * b;
    }
}
