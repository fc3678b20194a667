//! Two-phase window search on a hull sample.

use crate::compsets::CompositionSetPair;
use crate::hull::HullSample;

/// Scans a hull sample along the composition axis for a multi-phase point.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPhaseLocator {
    pub indep_comp: String,
    /// Position of `indep_comp` in the sorted component list
    pub indep_idx: usize,
    /// Distinct phases must differ in composition by more than this
    pub discrepancy_tol: f64,
    /// A same-phase pair must differ in some site fraction by more than this
    pub misc_gap_tol: f64,
}

impl TwoPhaseLocator {
    pub fn new(indep_comp: impl Into<String>, indep_idx: usize) -> Self {
        Self {
            indep_comp: indep_comp.into(),
            indep_idx,
            discrepancy_tol: 0.001,
            misc_gap_tol: 0.1,
        }
    }

    pub fn with_tolerances(mut self, discrepancy_tol: f64, misc_gap_tol: f64) -> Self {
        self.discrepancy_tol = discrepancy_tol;
        self.misc_gap_tol = misc_gap_tol;
        self
    }

    /// First confidently two-phase pair at or beyond `minimum_composition`.
    ///
    /// Points whose occupied slots all lie below the cursor are skipped.
    pub fn find(
        &self,
        hull: &HullSample,
        minimum_composition: Option<f64>,
    ) -> Option<CompositionSetPair> {
        let mut order: Vec<usize> = (0..hull.len()).collect();
        order.sort_by(|&a, &b| {
            let xa = hull.compositions[a].get(self.indep_idx).copied().unwrap_or(0.0);
            let xb = hull.compositions[b].get(self.indep_idx).copied().unwrap_or(0.0);
            xa.total_cmp(&xb)
        });

        for i in order {
            let slots = &hull.points[i].slots;
            if let Some(cursor) = minimum_composition {
                let behind = slots
                    .iter()
                    .filter(|s| s.is_occupied())
                    .filter_map(|s| s.composition.get(self.indep_idx))
                    .all(|x| *x < cursor);
                if behind {
                    continue;
                }
            }
            let Some(pair) = CompositionSetPair::from_slots(
                slots,
                hull.temperature,
                &self.indep_comp,
                self.indep_idx,
            ) else {
                continue;
            };
            if self.accepts(&pair) {
                return Some(pair);
            }
        }
        None
    }

    /// Distinct phases need `x_discrepancy > discrepancy_tol`; a same-phase
    /// pair needs some `y_discrepancy > misc_gap_tol`.
    pub fn accepts(&self, pair: &CompositionSetPair) -> bool {
        if pair.is_miscibility_gap() {
            pair.y_discrepancy().iter().any(|dy| *dy > self.misc_gap_tol)
        } else {
            pair.x_discrepancy() > self.discrepancy_tol
        }
    }
}
