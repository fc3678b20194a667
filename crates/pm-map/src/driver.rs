//! Binary T-X mapping driver.
//!
//! For each temperature the driver samples the convex hull once, then walks a
//! composition cursor from zero to the end of the axis:
//!
//! 1. Scan the hull from the cursor for a two-phase window. None: row done.
//! 2. Solve exactly at the window's mean composition. No pair: advance the
//!    cursor by `dX` and scan again.
//! 3. While the exact solve yields a pair, record it, move the cursor past the
//!    pair's richer side, and solve again at the cursor.
//!
//! The cursor moves by at least `dX` per step, so every row terminates.

use crate::boundary::ZpfBoundarySets;
use crate::compsets::CompositionSetPair;
use crate::conditions::{MapOptions, MappingConditions};
use crate::error::{MapError, MapResult};
use crate::hull::{HullSample, convex_hull};
use crate::locator::TwoPhaseLocator;
use crate::stats::MappingStats;
use pm_core::Timer;
use pm_model::{
    EquilibriumConditions, EquilibriumSolver, GibbsModel, Hyperplane, ModelError,
    ThermoConditions,
};

/// Where a row's refinement starts.
#[derive(Debug, Clone, PartialEq)]
pub enum StartingPoint {
    /// Two-phase window found in the hull
    Candidate(CompositionSetPair),
    /// Nothing multi-phase at or beyond the cursor
    Exhausted,
}

/// What happened along one temperature row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTrace {
    pub temperature: f64,
    /// Cursor positions in the order visited, starting at zero
    pub cursor_history: Vec<f64>,
    pub stats: MappingStats,
}

impl RowTrace {
    fn new(temperature: f64) -> Self {
        Self {
            temperature,
            cursor_history: vec![0.0],
            stats: MappingStats {
                rows: 1,
                ..MappingStats::default()
            },
        }
    }

    /// Records appended or replaced on this row.
    pub fn boundaries_added(&self) -> usize {
        self.stats.boundaries_appended + self.stats.boundaries_replaced
    }
}

/// Maps the two-phase boundaries of a binary system over a T-X grid.
pub struct BinaryMapper<'a> {
    model: &'a dyn GibbsModel,
    solver: &'a dyn EquilibriumSolver,
    hyperplane: &'a dyn Hyperplane,
    phases: Vec<String>,
    conditions: MappingConditions,
    options: MapOptions,
    locator: TwoPhaseLocator,
    xtol: f64,
    ttol: f64,
}

impl<'a> BinaryMapper<'a> {
    /// Validate the setup once; nothing is sampled here.
    pub fn new(
        model: &'a dyn GibbsModel,
        solver: &'a dyn EquilibriumSolver,
        hyperplane: &'a dyn Hyperplane,
        phases: &[String],
        conditions: &MappingConditions,
        options: &MapOptions,
    ) -> MapResult<Self> {
        options.validate()?;
        if phases.is_empty() {
            return Err(MapError::condition("no phases to map"));
        }
        if let Some(unknown) = phases.iter().find(|p| !model.has_phase(p)) {
            return Err(ModelError::UnknownPhase {
                name: unknown.clone(),
            }
            .into());
        }

        let components = model.components();
        if components.len() != 2 {
            return Err(MapError::condition(format!(
                "binary mapping needs two components, model has {}",
                components.len()
            )));
        }
        let indep_comp = conditions.independent_component();
        let indep_idx = components
            .iter()
            .position(|c| c == indep_comp)
            .ok_or_else(|| ModelError::UnknownComponent {
                name: indep_comp.to_string(),
            })?;

        let locator = TwoPhaseLocator::new(indep_comp, indep_idx).with_tolerances(
            options.discrepancy_tol,
            options.resolved_misc_gap_tol(conditions),
        );
        Ok(Self {
            model,
            solver,
            hyperplane,
            phases: phases.to_vec(),
            conditions: conditions.clone(),
            options: options.clone(),
            locator,
            xtol: options.xtol,
            ttol: options.resolved_ttol(conditions),
        })
    }

    pub fn conditions(&self) -> &MappingConditions {
        &self.conditions
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Record merge tolerances `(xtol, ttol)` in effect.
    pub fn tolerances(&self) -> (f64, f64) {
        (self.xtol, self.ttol)
    }

    /// Empty boundary sets matching this mapper's system.
    pub fn new_boundary_sets(&self) -> ZpfBoundarySets {
        ZpfBoundarySets::new(
            self.model.components(),
            self.conditions.independent_component(),
        )
    }

    /// Run the full temperature sweep into `zpf`.
    pub fn map(&self, zpf: &mut ZpfBoundarySets) -> MapResult<MappingStats> {
        let mut stats = MappingStats::default();
        for &temperature in &self.conditions.temperatures {
            let row = self.map_temperature(temperature, zpf)?;
            stats.absorb(&row.stats);
        }
        if self.options.verbose || self.options.summary {
            stats.log_summary();
        }
        Ok(stats)
    }

    /// Map one temperature row into `zpf`.
    pub fn map_temperature(
        &self,
        temperature: f64,
        zpf: &mut ZpfBoundarySets,
    ) -> MapResult<RowTrace> {
        if zpf.indep_comp() != self.conditions.independent_component() {
            return Err(MapError::Invariant {
                what: format!(
                    "boundary sets track {} but the map is over {}",
                    zpf.indep_comp(),
                    self.conditions.independent_component()
                ),
            });
        }
        if self.options.verbose {
            tracing::info!(t_k = temperature, "mapping temperature");
        }

        let state = self.conditions.state(temperature)?;
        let mut row = RowTrace::new(temperature);
        let hull = convex_hull(
            self.model,
            self.hyperplane,
            &self.phases,
            &state,
            &[self.conditions.composition_condition()],
            &self.options.hull,
        )?;
        row.stats.hulls.record(hull.elapsed_s);

        let dx = self.conditions.composition_step();
        let x_max = self.conditions.max_composition();
        let mut cursor = 0.0;
        while cursor < x_max {
            let candidate = match self.starting_point(&hull, cursor) {
                StartingPoint::Candidate(pair) => pair,
                StartingPoint::Exhausted => {
                    tracing::debug!(t_k = temperature, cursor, "no multiphase window in hull");
                    break;
                }
            };

            let x_eq = candidate.mean_composition();
            let found = self.solve_pair(&state, x_eq, &mut row)?;
            tracing::debug!(
                t_k = temperature,
                cursor,
                hull = %candidate,
                equilibrium = ?found.as_ref().map(ToString::to_string),
                "hull candidate checked"
            );
            let Some(mut pair) = found else {
                cursor += dx;
                row.cursor_history.push(cursor);
                continue;
            };

            loop {
                let next = (pair.max_composition() + dx).max(cursor + dx);
                let insertion = zpf.add_compsets(pair, self.xtol, self.ttol)?;
                row.stats.record_insertion(insertion);
                cursor = next;
                row.cursor_history.push(cursor);
                if cursor >= x_max {
                    break;
                }
                match self.solve_pair(&state, cursor, &mut row)? {
                    Some(p) => {
                        tracing::debug!(t_k = temperature, x = cursor, pair = %p, "boundary continued");
                        pair = p;
                    }
                    None => break,
                }
            }
        }

        tracing::debug!(
            t_k = temperature,
            appended = row.stats.boundaries_appended,
            replaced = row.stats.boundaries_replaced,
            equilibria = row.stats.equilibria.count(),
            "row finished"
        );
        Ok(row)
    }

    /// First two-phase window at or beyond `cursor`.
    pub fn starting_point(&self, hull: &HullSample, cursor: f64) -> StartingPoint {
        match self.locator.find(hull, Some(cursor)) {
            Some(pair) => StartingPoint::Candidate(pair),
            None => StartingPoint::Exhausted,
        }
    }

    fn solve_pair(
        &self,
        state: &ThermoConditions,
        mole_fraction: f64,
        row: &mut RowTrace,
    ) -> MapResult<Option<CompositionSetPair>> {
        let conditions = EquilibriumConditions {
            state: *state,
            component: self.locator.indep_comp.clone(),
            mole_fraction,
        };
        let timer = Timer::start("equilibrium");
        let eq = self
            .solver
            .equilibrium(&self.phases, &conditions, &self.options.hull.parameters)?;
        row.stats.equilibria.record(timer.stop());
        Ok(CompositionSetPair::from_slots(
            &eq.phases,
            state.temperature_k(),
            &self.locator.indep_comp,
            self.locator.indep_idx,
        ))
    }
}

/// Map a binary system into fresh boundary sets.
pub fn map_binary(
    model: &dyn GibbsModel,
    solver: &dyn EquilibriumSolver,
    hyperplane: &dyn Hyperplane,
    phases: &[String],
    conditions: &MappingConditions,
    options: &MapOptions,
) -> MapResult<ZpfBoundarySets> {
    let mapper = BinaryMapper::new(model, solver, hyperplane, phases, conditions, options)?;
    let mut zpf = mapper.new_boundary_sets();
    mapper.map(&mut zpf)?;
    Ok(zpf)
}
