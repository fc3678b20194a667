//! End-to-end mapping of small binary systems.

use pm_map::{
    BinaryMapper, MapOptions, MappingConditions, PhasePair, ZpfBoundarySets, map_binary,
};
use pm_model::{
    ConditionValue, HullEquilibrium, LinearT, LowerHull, SolutionModel, SolutionPhase,
};

fn components() -> Vec<String> {
    vec!["A".to_string(), "B".to_string()]
}

fn composition_axis() -> ConditionValue {
    ConditionValue::Range {
        start: 0.0,
        stop: 1.0,
        step: 0.02,
    }
}

fn wells() -> SolutionModel {
    SolutionModel::new(
        "wells",
        &components(),
        vec![
            SolutionPhase::quadratic("ALPHA", LinearT::constant(0.0), 0.3, 1e4),
            SolutionPhase::quadratic("BETA", LinearT::constant(0.0), 0.7, 1e4),
        ],
    )
    .unwrap()
}

fn gap() -> SolutionModel {
    SolutionModel::new(
        "gap",
        &components(),
        vec![SolutionPhase::regular(
            "FCC",
            [LinearT::constant(0.0), LinearT::constant(0.0)],
            vec![LinearT::constant(20_000.0)],
        )],
    )
    .unwrap()
}

/// ALPHA and GAMMA flank a lower BETA well, giving two windows per row.
fn three_wells() -> SolutionModel {
    SolutionModel::new(
        "three wells",
        &components(),
        vec![
            SolutionPhase::quadratic("ALPHA", LinearT::constant(0.0), 0.15, 1e4),
            SolutionPhase::quadratic("BETA", LinearT::constant(-500.0), 0.5, 1e4),
            SolutionPhase::quadratic("GAMMA", LinearT::constant(0.0), 0.85, 1e4),
        ],
    )
    .unwrap()
}

fn at(temperature: ConditionValue) -> MappingConditions {
    MappingConditions::new(&temperature, &101_325.0.into(), "B", &composition_axis()).unwrap()
}

fn run(model: &SolutionModel, phases: &[&str], conditions: &MappingConditions) -> ZpfBoundarySets {
    let hull = LowerHull::default();
    let solver = HullEquilibrium::new(model, &hull);
    let phases: Vec<String> = phases.iter().map(|p| p.to_string()).collect();
    map_binary(model, &solver, &hull, &phases, conditions, &MapOptions::default()).unwrap()
}

#[test]
fn two_wells_give_one_tieline() {
    let zpf = run(&wells(), &["ALPHA", "BETA"], &at(1000.0.into()));

    assert_eq!(zpf.len(), 1);
    let records = zpf.records(&PhasePair::new("ALPHA", "BETA"));
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.temperature, 1000.0);
    assert_eq!(r.phases, ["ALPHA".to_string(), "BETA".to_string()]);
    assert!((r.compositions[0] - 0.3).abs() < 0.01);
    assert!((r.compositions[1] - 0.7).abs() < 0.01);
}

#[test]
fn single_phase_has_no_boundaries() {
    let zpf = run(&wells(), &["ALPHA"], &at(1000.0.into()));
    assert!(zpf.is_empty());
    assert_eq!(zpf.phase_pairs().count(), 0);
}

#[test]
fn miscibility_gap_is_symmetric() {
    let zpf = run(&gap(), &["FCC"], &at(800.0.into()));

    let records = zpf.records(&PhasePair::new("FCC", "FCC"));
    assert_eq!(records.len(), 1);
    let [lo, hi] = records[0].compositions;
    assert!((lo - 0.0701).abs() < 0.005, "lower gap boundary {lo}");
    assert!((lo + hi - 1.0).abs() < 0.005, "gap not symmetric: {lo} {hi}");
}

#[test]
fn gap_narrows_with_temperature() {
    let conditions = at(ConditionValue::Range {
        start: 600.0,
        stop: 1000.0,
        step: 100.0,
    });
    let zpf = run(&gap(), &["FCC"], &conditions);

    let records = zpf.records(&PhasePair::new("FCC", "FCC"));
    let temps: Vec<f64> = records.iter().map(|r| r.temperature).collect();
    assert_eq!(temps, vec![600.0, 700.0, 800.0, 900.0]);
    let expected = [0.0210, 0.0409, 0.0701, 0.1112];
    for (r, x) in records.iter().zip(expected) {
        assert!((r.compositions[0] - x).abs() < 0.005);
    }
    assert!(records.windows(2).all(|w| w[1].compositions[0] > w[0].compositions[0]));

    // Consecutive tie-lines chain into a single curve
    let curves = zpf.curves(0.1, 150.0);
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].records.len(), 4);
}

#[test]
fn row_resumes_scanning_after_first_region() {
    let model = three_wells();
    let hull = LowerHull::default();
    let solver = HullEquilibrium::new(&model, &hull);
    let phases = vec!["ALPHA".to_string(), "BETA".to_string(), "GAMMA".to_string()];
    let conditions = at(1000.0.into());
    let mapper = BinaryMapper::new(
        &model,
        &solver,
        &hull,
        &phases,
        &conditions,
        &MapOptions::default(),
    )
    .unwrap();
    let mut zpf = mapper.new_boundary_sets();
    let row = mapper.map_temperature(1000.0, &mut zpf).unwrap();

    assert_eq!(row.stats.boundaries_appended, 2);
    assert!(row.cursor_history.windows(2).all(|w| w[1] > w[0]));

    let left = zpf.records(&PhasePair::new("ALPHA", "BETA"));
    assert_eq!(left.len(), 1);
    assert!((left[0].compositions[0] - 0.0786).abs() < 0.01);
    assert!((left[0].compositions[1] - 0.4286).abs() < 0.01);

    let right = zpf.records(&PhasePair::new("BETA", "GAMMA"));
    assert_eq!(right.len(), 1);
    assert!((right[0].compositions[0] - 0.5714).abs() < 0.01);
    assert!((right[0].compositions[1] - 0.9214).abs() < 0.01);

    // The second region is found from a cursor already past the first one
    let past_left = row
        .cursor_history
        .iter()
        .position(|&x| x > left[0].compositions[1]);
    assert!(past_left.is_some_and(|i| row.cursor_history[i] < right[0].compositions[0]));
    assert!(zpf.records(&PhasePair::new("ALPHA", "GAMMA")).is_empty());
}

#[test]
fn remapping_into_same_sets_adds_nothing() {
    let model = wells();
    let hull = LowerHull::default();
    let solver = HullEquilibrium::new(&model, &hull);
    let phases = vec!["ALPHA".to_string(), "BETA".to_string()];
    let conditions = at(1000.0.into());
    let mapper = BinaryMapper::new(
        &model,
        &solver,
        &hull,
        &phases,
        &conditions,
        &MapOptions::default(),
    )
    .unwrap();

    let mut zpf = mapper.new_boundary_sets();
    let first = mapper.map(&mut zpf).unwrap();
    let second = mapper.map(&mut zpf).unwrap();
    assert_eq!(first.boundaries_appended, 1);
    assert_eq!(second.boundaries_appended, 0);
    assert_eq!(second.boundaries_replaced, 1);
    assert_eq!(zpf.len(), 1);
    assert_eq!(first.rows, 1);
    assert_eq!(first.hulls.count(), 1);
    assert!(first.equilibria.count() >= 2);
}

#[test]
fn cursor_moves_forward_and_row_ends() {
    let model = gap();
    let hull = LowerHull::default();
    let solver = HullEquilibrium::new(&model, &hull);
    let conditions = at(800.0.into());
    let mapper = BinaryMapper::new(
        &model,
        &solver,
        &hull,
        &["FCC".to_string()],
        &conditions,
        &MapOptions::default(),
    )
    .unwrap();
    let mut zpf = mapper.new_boundary_sets();
    let row = mapper.map_temperature(800.0, &mut zpf).unwrap();

    assert_eq!(row.cursor_history[0], 0.0);
    assert!(row.cursor_history.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(row.boundaries_added(), 1);
    // Past the gap's rich side after the first record
    assert!(row.cursor_history[1] > 0.92);
}

#[test]
fn per_temperature_runs_merge_into_full_sweep() {
    let model = gap();
    let sweep = at(ConditionValue::Values(vec![700.0, 800.0]));
    let full = run(&model, &["FCC"], &sweep);

    let mut merged = ZpfBoundarySets::new(&components(), "B");
    for t in [700.0, 800.0] {
        let part = run(&model, &["FCC"], &at(t.into()));
        merged.merge(&part, 0.10, 50.0).unwrap();
    }
    assert_eq!(merged.len(), full.len());
    let pair = PhasePair::new("FCC", "FCC");
    for (a, b) in merged.records(&pair).iter().zip(full.records(&pair)) {
        assert_eq!(a.temperature, b.temperature);
        assert!((a.compositions[0] - b.compositions[0]).abs() < 1e-9);
    }
}

#[test]
fn export_serializes_to_json() {
    let zpf = run(&wells(), &["ALPHA", "BETA"], &at(1000.0.into()));
    let json = serde_json::to_value(zpf.export()).unwrap();
    let first = &json[0];
    assert_eq!(first["pair"]["first"], "ALPHA");
    assert_eq!(first["indep_comp"], "B");
    assert_eq!(first["records"].as_array().unwrap().len(), 1);
}
