//! Compile a validated project into model, conditions, and options.

use crate::ProjectResult;
use crate::schema::Project;
use pm_map::{HullOptions, MapOptions, MappingConditions};
use pm_model::{EquilibriumOptions, SolutionModel};

/// Everything a mapping run needs, built from one project.
#[derive(Debug, Clone)]
pub struct CompiledProject {
    pub model: SolutionModel,
    /// Phases considered by the mapper
    pub phases: Vec<String>,
    pub conditions: MappingConditions,
    pub options: MapOptions,
    pub equilibrium: EquilibriumOptions,
}

pub fn compile(project: &Project) -> ProjectResult<CompiledProject> {
    let model = SolutionModel::new(
        project.name.clone(),
        &project.system.components,
        project.system.phases.clone(),
    )?;
    let phases = match &project.map_phases {
        Some(phases) => phases.clone(),
        None => project.system.phases.iter().map(|p| p.name.clone()).collect(),
    };

    let conds = &project.conditions;
    let axis = conds
        .composition
        .first()
        .ok_or_else(|| pm_map::MapError::condition("no composition condition"))?;
    let conditions = MappingConditions::new(
        &conds.temperature,
        &conds.pressure,
        axis.component.clone(),
        &axis.values,
    )?;

    let opts = &project.options;
    let options = MapOptions {
        hull: HullOptions {
            point_density: opts.point_density,
            parameters: project.parameters.clone(),
        },
        discrepancy_tol: opts.discrepancy_tol,
        misc_gap_tol: opts.misc_gap_tol,
        xtol: opts.xtol,
        ttol: opts.ttol,
        verbose: false,
        summary: false,
    };

    let eq = &project.equilibrium;
    let equilibrium = EquilibriumOptions {
        point_density: eq.point_density,
        refinement_iterations: eq.refinement_iterations,
        refinement_points: eq.refinement_points,
        collapse_tol: eq.collapse_tol,
    };

    Ok(CompiledProject {
        model,
        phases,
        conditions,
        options,
        equilibrium,
    })
}
