use pm_model::{ConditionValue, LinearT, SolutionPhase};
use pm_project::schema::*;
use pm_project::{ValidationError, validate_project};
use std::collections::BTreeMap;

fn base() -> Project {
    Project {
        version: 1,
        name: "Wells".to_string(),
        system: SystemDef {
            components: vec!["A".to_string(), "B".to_string()],
            phases: vec![
                SolutionPhase::quadratic("ALPHA", LinearT::constant(0.0), 0.3, 1e4),
                SolutionPhase::quadratic("BETA", LinearT::constant(0.0), 0.7, 1e4),
            ],
        },
        conditions: ConditionsDef {
            temperature: ConditionValue::Scalar(1000.0),
            pressure: ConditionValue::Scalar(101_325.0),
            composition: vec![MoleFractionDef {
                component: "B".to_string(),
                values: ConditionValue::Range {
                    start: 0.0,
                    stop: 1.0,
                    step: 0.02,
                },
            }],
        },
        map_phases: None,
        options: OptionsDef::default(),
        equilibrium: EquilibriumDef::default(),
        parameters: BTreeMap::new(),
    }
}

#[test]
fn base_project_is_valid() {
    validate_project(&base()).unwrap();
}

#[test]
fn version_must_be_supported() {
    let mut project = base();
    project.version = 7;
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::UnsupportedVersion { version: 7 })
    ));
}

#[test]
fn ternary_is_unsupported() {
    let mut project = base();
    project.system.components.push("C".to_string());
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::Unsupported { .. })
    ));
}

#[test]
fn duplicate_phase_is_rejected() {
    let mut project = base();
    project
        .system
        .phases
        .push(SolutionPhase::quadratic("ALPHA", LinearT::constant(0.0), 0.5, 1.0));
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn map_phases_must_exist() {
    let mut project = base();
    project.map_phases = Some(vec!["GAMMA".to_string()]);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn unknown_parameter_is_rejected() {
    let mut project = base();
    project.parameters.insert("L(ALPHA,0)".to_string(), 1.0);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::MissingReference { .. })
    ));
    project.parameters.clear();
    project.parameters.insert("X0(ALPHA)".to_string(), 0.25);
    validate_project(&project).unwrap();
}

#[test]
fn exactly_one_composition_axis() {
    let mut project = base();
    let axis = project.conditions.composition[0].clone();
    project.conditions.composition.push(axis);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::Unsupported { .. })
    ));

    project.conditions.composition.clear();
    assert!(validate_project(&project).is_err());
}

#[test]
fn composition_axis_checks() {
    let mut project = base();
    project.conditions.composition[0].component = "C".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::MissingReference { .. })
    ));

    let mut project = base();
    project.conditions.composition[0].values = ConditionValue::Scalar(0.5);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));

    let mut project = base();
    project.conditions.composition[0].values = ConditionValue::Values(vec![0.5, 1.5]);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn pressure_and_temperature_checks() {
    let mut project = base();
    project.conditions.pressure = ConditionValue::Values(vec![1e5, 2e5]);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::Unsupported { .. })
    ));

    let mut project = base();
    project.conditions.temperature = ConditionValue::Range {
        start: 900.0,
        stop: 800.0,
        step: 10.0,
    };
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn negative_tolerance_is_rejected() {
    let mut project = base();
    project.options.misc_gap_tol = Some(-0.1);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn runaway_temperature_range_is_a_validation_error() {
    let mut project = base();
    project.conditions.temperature = ConditionValue::Range {
        start: 300.0,
        stop: 3000.0,
        step: 1e-300,
    };
    match validate_project(&project) {
        Err(ValidationError::InvalidValue { field, .. }) => {
            assert_eq!(field, "conditions.temperature")
        }
        other => panic!("expected invalid temperature axis, got {other:?}"),
    }
}
