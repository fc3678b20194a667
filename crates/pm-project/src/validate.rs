//! Project validation logic.

use crate::schema::{ConditionsDef, EquilibriumDef, LATEST_VERSION, OptionsDef, Project};
use pm_model::{ConditionValue, SolutionModel, VACANCY};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut component_ids = HashSet::new();
    for component in &project.system.components {
        if !component_ids.insert(component) {
            return Err(ValidationError::DuplicateId {
                id: component.clone(),
                context: "system components".to_string(),
            });
        }
    }
    let real_components = component_ids
        .iter()
        .filter(|c| c.as_str() != VACANCY)
        .count();
    if real_components != 2 {
        return Err(ValidationError::Unsupported {
            feature: format!("{} components", real_components),
            reason: "only binary systems can be mapped".to_string(),
        });
    }

    let mut phase_ids = HashSet::new();
    for phase in &project.system.phases {
        if !phase_ids.insert(&phase.name) {
            return Err(ValidationError::DuplicateId {
                id: phase.name.clone(),
                context: "system phases".to_string(),
            });
        }
    }
    let model = SolutionModel::new(
        project.name.clone(),
        &project.system.components,
        project.system.phases.clone(),
    )
    .map_err(|e| ValidationError::InvalidValue {
        field: "system.phases".to_string(),
        value: format!("{} phases", project.system.phases.len()),
        reason: e.to_string(),
    })?;

    if let Some(map_phases) = &project.map_phases {
        if map_phases.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "map_phases".to_string(),
                value: "[]".to_string(),
                reason: "at least one phase must be mapped".to_string(),
            });
        }
        for phase in map_phases {
            if !phase_ids.contains(phase) {
                return Err(ValidationError::MissingReference {
                    id: phase.clone(),
                    context: "map_phases".to_string(),
                });
            }
        }
    }

    let known_parameters: HashSet<String> = model.parameter_names().into_iter().collect();
    for (name, value) in &project.parameters {
        if !known_parameters.contains(name) {
            return Err(ValidationError::MissingReference {
                id: name.clone(),
                context: "parameters".to_string(),
            });
        }
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("parameters.{}", name),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }

    validate_conditions(&project.conditions, &component_ids)?;
    validate_options(&project.options)?;
    validate_equilibrium(&project.equilibrium)?;
    Ok(())
}

fn validate_conditions(
    conditions: &ConditionsDef,
    components: &HashSet<&String>,
) -> Result<(), ValidationError> {
    let temperatures = unpack("conditions.temperature", &conditions.temperature)?;
    if let Some(t) = temperatures.iter().find(|t| **t <= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "conditions.temperature".to_string(),
            value: t.to_string(),
            reason: "must be positive".to_string(),
        });
    }

    let pressures = unpack("conditions.pressure", &conditions.pressure)?;
    if pressures.len() != 1 {
        return Err(ValidationError::Unsupported {
            feature: format!("{} pressure values", pressures.len()),
            reason: "maps are drawn at one fixed pressure".to_string(),
        });
    }
    if pressures[0] <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "conditions.pressure".to_string(),
            value: pressures[0].to_string(),
            reason: "must be positive".to_string(),
        });
    }

    if conditions.composition.len() != 1 {
        return Err(ValidationError::Unsupported {
            feature: format!("{} composition conditions", conditions.composition.len()),
            reason: "a binary map takes exactly one mole fraction axis".to_string(),
        });
    }
    let axis = &conditions.composition[0];
    if !components.contains(&axis.component) || axis.component == VACANCY {
        return Err(ValidationError::MissingReference {
            id: axis.component.clone(),
            context: "conditions.composition".to_string(),
        });
    }
    let values = unpack("conditions.composition.values", &axis.values)?;
    if values.len() < 2 || values[1] <= values[0] {
        return Err(ValidationError::InvalidValue {
            field: "conditions.composition.values".to_string(),
            value: axis.values.to_string(),
            reason: "need at least two values, starting in increasing order".to_string(),
        });
    }
    if let Some(x) = values.iter().find(|x| !(0.0..=1.0).contains(*x)) {
        return Err(ValidationError::InvalidValue {
            field: "conditions.composition.values".to_string(),
            value: x.to_string(),
            reason: "mole fractions must lie in [0, 1]".to_string(),
        });
    }
    Ok(())
}

fn validate_options(options: &OptionsDef) -> Result<(), ValidationError> {
    if options.point_density < 2 {
        return Err(ValidationError::InvalidValue {
            field: "options.point_density".to_string(),
            value: options.point_density.to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    let tolerances = [
        ("options.discrepancy_tol", Some(options.discrepancy_tol)),
        ("options.misc_gap_tol", options.misc_gap_tol),
        ("options.xtol", Some(options.xtol)),
        ("options.ttol", options.ttol),
    ];
    for (field, value) in tolerances {
        if let Some(v) = value {
            non_negative(field, v)?;
        }
    }
    Ok(())
}

fn validate_equilibrium(equilibrium: &EquilibriumDef) -> Result<(), ValidationError> {
    if equilibrium.point_density < 2 {
        return Err(ValidationError::InvalidValue {
            field: "equilibrium.point_density".to_string(),
            value: equilibrium.point_density.to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    if equilibrium.refinement_points < 2 {
        return Err(ValidationError::InvalidValue {
            field: "equilibrium.refinement_points".to_string(),
            value: equilibrium.refinement_points.to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    non_negative("equilibrium.collapse_tol", equilibrium.collapse_tol)
}

fn unpack(field: &str, value: &ConditionValue) -> Result<Vec<f64>, ValidationError> {
    value.unpack().map_err(|e| ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}
