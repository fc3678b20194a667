//! Sweep bookkeeping.

use crate::boundary::Insertion;
use pm_core::AccumulatingTimer;

/// Counts and timings gathered over a mapping run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MappingStats {
    pub hulls: AccumulatingTimer,
    pub equilibria: AccumulatingTimer,
    /// Temperatures mapped
    pub rows: usize,
    pub boundaries_appended: usize,
    pub boundaries_replaced: usize,
}

impl MappingStats {
    pub fn record_insertion(&mut self, insertion: Insertion) {
        match insertion {
            Insertion::Appended => self.boundaries_appended += 1,
            Insertion::Replaced => self.boundaries_replaced += 1,
        }
    }

    pub fn absorb(&mut self, other: &MappingStats) {
        self.hulls.absorb(&other.hulls);
        self.equilibria.absorb(&other.equilibria);
        self.rows += other.rows;
        self.boundaries_appended += other.boundaries_appended;
        self.boundaries_replaced += other.boundaries_replaced;
    }

    pub fn log_summary(&self) {
        tracing::info!(
            count = self.hulls.count(),
            elapsed_s = self.hulls.total_seconds(),
            "convex hulls calculated"
        );
        tracing::info!(
            count = self.equilibria.count(),
            elapsed_s = self.equilibria.total_seconds(),
            "equilibria calculated"
        );
        tracing::info!(
            rows = self.rows,
            appended = self.boundaries_appended,
            replaced = self.boundaries_replaced,
            "boundary records"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_sums_everything() {
        let mut a = MappingStats::default();
        a.hulls.record(0.5);
        a.rows = 1;
        a.record_insertion(Insertion::Appended);

        let mut b = MappingStats::default();
        b.hulls.record(0.25);
        b.equilibria.record(0.1);
        b.rows = 2;
        b.record_insertion(Insertion::Replaced);

        a.absorb(&b);
        assert_eq!(a.hulls.count(), 2);
        assert!((a.hulls.total_seconds() - 0.75).abs() < 1e-12);
        assert_eq!(a.equilibria.count(), 1);
        assert_eq!(a.rows, 3);
        assert_eq!(a.boundaries_appended, 1);
        assert_eq!(a.boundaries_replaced, 1);
    }
}
