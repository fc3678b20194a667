//! Composition sets: comparable snapshots of stable phases at one point.

use crate::error::{MapError, MapResult};
use pm_model::PhaseSlot;
use std::collections::BTreeSet;
use std::fmt;

/// One stable phase at one temperature, projected onto the independent component.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionSet {
    pub phase: String,
    pub temperature: f64,
    /// Independent component tracked on the composition axis
    pub indep_comp: String,
    /// Mole fraction of `indep_comp` in this phase
    pub composition: f64,
    pub site_fractions: Vec<f64>,
}

impl CompositionSet {
    /// Snapshot of an occupied slot; `None` for empty or fictitious slots.
    pub fn from_slot(
        slot: &PhaseSlot,
        temperature: f64,
        indep_comp: &str,
        indep_idx: usize,
    ) -> Option<Self> {
        if !slot.is_occupied() {
            return None;
        }
        Some(Self {
            phase: slot.phase.clone(),
            temperature,
            indep_comp: indep_comp.to_string(),
            composition: *slot.composition.get(indep_idx)?,
            site_fractions: slot.site_fractions.clone(),
        })
    }
}

impl fmt::Display for CompositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(T={:.2}, X({})={:.4})",
            self.phase, self.temperature, self.indep_comp, self.composition
        )
    }
}

/// Exactly two composition sets at one temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionSetPair {
    sets: [CompositionSet; 2],
}

impl CompositionSetPair {
    pub fn new(a: CompositionSet, b: CompositionSet) -> MapResult<Self> {
        if a.temperature != b.temperature {
            return Err(MapError::Invariant {
                what: format!(
                    "composition sets at different temperatures ({} and {})",
                    a.temperature, b.temperature
                ),
            });
        }
        if a.indep_comp != b.indep_comp {
            return Err(MapError::Invariant {
                what: format!(
                    "composition sets track different components ({} and {})",
                    a.indep_comp, b.indep_comp
                ),
            });
        }
        Ok(Self { sets: [a, b] })
    }

    /// A pair if there are exactly two compatible sets, else `None`.
    pub fn from_compsets(sets: Vec<CompositionSet>) -> Option<Self> {
        let [a, b]: [CompositionSet; 2] = sets.try_into().ok()?;
        Self::new(a, b).ok()
    }

    /// Pair built from the occupied slots of a hull point or equilibrium result.
    pub fn from_slots(
        slots: &[PhaseSlot],
        temperature: f64,
        indep_comp: &str,
        indep_idx: usize,
    ) -> Option<Self> {
        let sets = slots
            .iter()
            .filter_map(|s| CompositionSet::from_slot(s, temperature, indep_comp, indep_idx))
            .collect();
        Self::from_compsets(sets)
    }

    pub fn sets(&self) -> &[CompositionSet; 2] {
        &self.sets
    }

    pub fn into_sets(self) -> [CompositionSet; 2] {
        self.sets
    }

    pub fn temperature(&self) -> f64 {
        self.sets[0].temperature
    }

    pub fn indep_comp(&self) -> &str {
        &self.sets[0].indep_comp
    }

    pub fn compositions(&self) -> [f64; 2] {
        [self.sets[0].composition, self.sets[1].composition]
    }

    pub fn mean_composition(&self) -> f64 {
        0.5 * (self.sets[0].composition + self.sets[1].composition)
    }

    pub fn max_composition(&self) -> f64 {
        self.sets[0].composition.max(self.sets[1].composition)
    }

    pub fn min_composition(&self) -> f64 {
        self.sets[0].composition.min(self.sets[1].composition)
    }

    pub fn unique_phases(&self) -> BTreeSet<&str> {
        self.sets.iter().map(|s| s.phase.as_str()).collect()
    }

    /// Both members are the same phase.
    pub fn is_miscibility_gap(&self) -> bool {
        self.sets[0].phase == self.sets[1].phase
    }

    pub fn x_discrepancy(&self) -> f64 {
        (self.sets[0].composition - self.sets[1].composition).abs()
    }

    /// Element-wise site-fraction difference.
    pub fn y_discrepancy(&self) -> Vec<f64> {
        self.sets[0]
            .site_fractions
            .iter()
            .zip(&self.sets[1].site_fractions)
            .map(|(a, b)| (a - b).abs())
            .collect()
    }

    /// Same pair with members ordered by phase name, then composition.
    pub fn canonical(self) -> Self {
        let [a, b] = self.sets;
        let swap = match a.phase.cmp(&b.phase) {
            std::cmp::Ordering::Equal => a.composition > b.composition,
            ord => ord.is_gt(),
        };
        if swap {
            Self { sets: [b, a] }
        } else {
            Self { sets: [a, b] }
        }
    }
}

impl fmt::Display for CompositionSetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.sets[0], self.sets[1])
    }
}
