//! Composition grids over the component simplex.

use crate::error::{ModelError, ModelResult};
use pm_core::numeric::{MIN_SITE_FRACTION, normalize};

/// Vacancies occupy sites but are not components of the system.
pub const VACANCY: &str = "VA";

/// Candidate mole fractions for one non-dependent component.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionCondition {
    pub component: String,
    pub values: Vec<f64>,
}

impl CompositionCondition {
    pub fn new(component: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            component: component.into(),
            values,
        }
    }
}

/// Sorted, de-duplicated component names without vacancies.
pub fn system_components(components: &[String]) -> Vec<String> {
    let mut comps: Vec<String> = components
        .iter()
        .filter(|c| c.as_str() != VACANCY)
        .cloned()
        .collect();
    comps.sort();
    comps.dedup();
    comps
}

/// Build the cartesian grid of full composition vectors.
///
/// Each row holds one fraction per component in sorted component order. The
/// single unconstrained component takes `1 - sum(specified)`; entries below
/// [`MIN_SITE_FRACTION`] are lifted to ten times the floor before the row is
/// renormalized.
pub fn build_composition_grid(
    components: &[String],
    conditions: &[CompositionCondition],
) -> ModelResult<Vec<Vec<f64>>> {
    let all_comps = system_components(components);

    let mut conds: Vec<&CompositionCondition> = conditions.iter().collect();
    conds.sort_by(|a, b| a.component.cmp(&b.component));
    for pair in conds.windows(2) {
        if pair[0].component == pair[1].component {
            return Err(ModelError::condition(format!(
                "composition of {} specified twice",
                pair[0].component
            )));
        }
    }
    for cond in &conds {
        if !all_comps.contains(&cond.component) {
            return Err(ModelError::UnknownComponent {
                name: cond.component.clone(),
            });
        }
        if cond.values.is_empty() {
            return Err(ModelError::condition(format!(
                "composition condition for {} has no values",
                cond.component
            )));
        }
    }

    let dependent: Vec<&String> = all_comps
        .iter()
        .filter(|c| !conds.iter().any(|cond| &cond.component == *c))
        .collect();
    if dependent.len() != 1 {
        return Err(ModelError::condition(format!(
            "Number of dependent components is {} (expected one)",
            dependent.len()
        )));
    }
    let insert_idx = all_comps
        .iter()
        .position(|c| c == dependent[0])
        .ok_or(ModelError::InvalidArg {
            what: "dependent component missing from component list",
        })?;

    let axes: Vec<&[f64]> = conds.iter().map(|c| c.values.as_slice()).collect();
    let mut grid = Vec::new();
    for specified in cartesian(&axes) {
        let dependent_fraction = 1.0 - specified.iter().sum::<f64>();
        let mut row = specified;
        row.insert(insert_idx, dependent_fraction);
        // Prevent compositions near an edge from going negative
        for x in row.iter_mut() {
            if !x.is_finite() {
                return Err(ModelError::NonPhysical {
                    what: "non-finite composition condition",
                });
            }
            if *x < MIN_SITE_FRACTION {
                *x = MIN_SITE_FRACTION * 10.0;
            }
        }
        normalize(&mut row)?;
        grid.push(row);
    }
    Ok(grid)
}

/// Full composition vector for a single fixed mole fraction of `component`.
pub fn composition_vector(
    components: &[String],
    component: &str,
    mole_fraction: f64,
) -> ModelResult<Vec<f64>> {
    let cond = CompositionCondition::new(component, vec![mole_fraction]);
    build_composition_grid(components, &[cond])?
        .pop()
        .ok_or(ModelError::InvalidArg {
            what: "empty composition grid",
        })
}

/// Cartesian product of the axes, last axis varying fastest.
fn cartesian(axes: &[&[f64]]) -> Vec<Vec<f64>> {
    let mut rows: Vec<Vec<f64>> = vec![Vec::with_capacity(axes.len())];
    for axis in axes {
        let mut next = Vec::with_capacity(rows.len() * axis.len());
        for row in &rows {
            for v in axis.iter() {
                let mut extended = row.clone();
                extended.push(*v);
                next.push(extended);
            }
        }
        rows = next;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comps(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn binary_grid_inserts_dependent_component() {
        let grid = build_composition_grid(
            &comps(&["CU", "NI", "VA"]),
            &[CompositionCondition::new("NI", vec![0.25, 0.5])],
        )
        .unwrap();
        assert_eq!(grid.len(), 2);
        assert!((grid[0][0] - 0.75).abs() < 1e-12);
        assert!((grid[0][1] - 0.25).abs() < 1e-12);
        assert!((grid[1][0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn dependent_component_sorted_position() {
        // Dependent component sorts first here.
        let grid = build_composition_grid(
            &comps(&["B", "A"]),
            &[CompositionCondition::new("B", vec![0.2])],
        )
        .unwrap();
        assert!((grid[0][0] - 0.8).abs() < 1e-12);
        assert!((grid[0][1] - 0.2).abs() < 1e-12);

        // And last here.
        let grid = build_composition_grid(
            &comps(&["A", "B"]),
            &[CompositionCondition::new("A", vec![0.2])],
        )
        .unwrap();
        assert!((grid[0][0] - 0.2).abs() < 1e-12);
        assert!((grid[0][1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn edges_are_clamped_above_floor() {
        let grid = build_composition_grid(
            &comps(&["A", "B"]),
            &[CompositionCondition::new("B", vec![0.0, 1.0, 1.2])],
        )
        .unwrap();
        for row in &grid {
            assert!(row.iter().all(|x| *x >= MIN_SITE_FRACTION));
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert!((grid[0][1] - 10.0 * MIN_SITE_FRACTION).abs() < 1e-20);
    }

    #[test]
    fn ternary_grid_is_cartesian() {
        let grid = build_composition_grid(
            &comps(&["A", "B", "C"]),
            &[
                CompositionCondition::new("C", vec![0.1, 0.2, 0.3]),
                CompositionCondition::new("B", vec![0.1, 0.2]),
            ],
        )
        .unwrap();
        assert_eq!(grid.len(), 6);
        // B varies slowest because conditions are sorted by component.
        assert!((grid[0][1] - 0.1).abs() < 1e-12);
        assert!((grid[0][2] - 0.1).abs() < 1e-12);
        assert!((grid[1][2] - 0.2).abs() < 1e-12);
        assert!((grid[5][0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn wrong_dependent_count_is_condition_error() {
        let err = build_composition_grid(&comps(&["A", "B", "C"]), &[CompositionCondition::new("B", vec![0.5])])
            .unwrap_err();
        assert!(matches!(err, ModelError::Condition { .. }));

        let err = build_composition_grid(
            &comps(&["A", "B"]),
            &[
                CompositionCondition::new("A", vec![0.5]),
                CompositionCondition::new("B", vec![0.5]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Condition { .. }));
    }

    #[test]
    fn unknown_component_rejected() {
        let err = build_composition_grid(&comps(&["A", "B"]), &[CompositionCondition::new("Q", vec![0.5])])
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownComponent { name: "Q".into() });
    }

    #[test]
    fn single_point_vector() {
        let x = composition_vector(&comps(&["A", "B"]), "B", 0.3).unwrap();
        assert_eq!(x.len(), 2);
        assert!((x[1] - 0.3).abs() < 1e-12);
    }
}
