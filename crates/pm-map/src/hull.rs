//! Convex hull sampling of one temperature/pressure slice.

use crate::conditions::HullOptions;
use crate::error::{MapError, MapResult};
use pm_core::Timer;
use pm_model::{
    CalculateOptions, CompositionCondition, GibbsModel, Hyperplane, PhaseSlot, ThermoConditions,
    build_composition_grid, calculate, slots_from_facet,
};

/// Locally stable assemblage at one target composition.
#[derive(Debug, Clone, PartialEq)]
pub struct HullPoint {
    /// At most N+1 slots, one per facet vertex
    pub slots: Vec<PhaseSlot>,
    pub chemical_potentials: Vec<f64>,
}

/// Hull output for every point of the composition grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HullSample {
    pub temperature: f64,
    /// Target composition vectors, in grid order
    pub compositions: Vec<Vec<f64>>,
    pub points: Vec<HullPoint>,
    /// Wall-clock time spent building the sample [s]
    pub elapsed_s: f64,
}

impl HullSample {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Approximate global equilibrium along one composition axis at fixed T and P.
pub fn convex_hull(
    model: &dyn GibbsModel,
    hyperplane: &dyn Hyperplane,
    phases: &[String],
    state: &ThermoConditions,
    composition_conditions: &[CompositionCondition],
    options: &HullOptions,
) -> MapResult<HullSample> {
    if composition_conditions.len() != 1 {
        return Err(MapError::condition(
            "Convex hull independent components different than one.",
        ));
    }
    let timer = Timer::start("convex_hull");

    let sample = calculate(
        model,
        phases,
        state,
        &options.parameters,
        &CalculateOptions {
            point_density: options.point_density,
            fake_points: true,
        },
    )?;
    let compositions = build_composition_grid(model.components(), composition_conditions)?;

    // Gibbs phase rule at fixed T and P
    let max_phases = composition_conditions.len() + 1;
    let mut points = Vec::with_capacity(compositions.len());
    for target in &compositions {
        let facet = hyperplane.facet(&sample, target)?;
        if facet.vertices.len() > max_phases {
            return Err(MapError::Invariant {
                what: format!(
                    "hull facet has {} vertices, at most {} allowed",
                    facet.vertices.len(),
                    max_phases
                ),
            });
        }
        points.push(HullPoint {
            slots: slots_from_facet(&sample, &facet),
            chemical_potentials: facet.chemical_potentials,
        });
    }

    let elapsed_s = timer.stop();
    tracing::debug!(
        t_k = state.temperature_k(),
        grid_points = points.len(),
        candidates = sample.len(),
        elapsed_s,
        "convex hull sampled"
    );
    Ok(HullSample {
        temperature: state.temperature_k(),
        compositions,
        points,
        elapsed_s,
    })
}
