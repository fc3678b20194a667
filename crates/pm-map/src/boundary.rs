//! Zero-phase-fraction boundary accumulation.
//!
//! Records are keyed by the unordered phase pair and kept ordered by
//! temperature, then composition. No two records of one pair ever lie within
//! `(xtol, ttol)` of each other: a near-duplicate replaces what it is close to.

use crate::compsets::CompositionSetPair;
use crate::error::{MapError, MapResult};
use pm_model::system_components;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Unordered pair of phase names, stored sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhasePair {
    pub first: String,
    pub second: String,
}

impl PhasePair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn is_miscibility_gap(&self) -> bool {
        self.first == self.second
    }
}

impl fmt::Display for PhasePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.first, self.second)
    }
}

/// One tie-line end pair on a phase boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRecord {
    pub temperature: f64,
    pub phases: [String; 2],
    /// Independent-component mole fraction of each phase
    pub compositions: [f64; 2],
    pub site_fractions: [Vec<f64>; 2],
}

impl BoundaryRecord {
    /// Record of a pair, members ordered by phase name then composition.
    pub fn from_pair(pair: CompositionSetPair) -> Self {
        let [a, b] = pair.canonical().into_sets();
        Self {
            temperature: a.temperature,
            phases: [a.phase, b.phase],
            compositions: [a.composition, b.composition],
            site_fractions: [a.site_fractions, b.site_fractions],
        }
    }

    pub fn phase_pair(&self) -> PhasePair {
        PhasePair::new(self.phases[0].clone(), self.phases[1].clone())
    }

    /// Within `ttol` in temperature and `xtol` in each aligned composition.
    pub fn is_near(&self, other: &BoundaryRecord, xtol: f64, ttol: f64) -> bool {
        (self.temperature - other.temperature).abs() < ttol
            && self
                .compositions
                .iter()
                .zip(&other.compositions)
                .all(|(a, b)| (a - b).abs() < xtol)
    }

    fn distance(&self, other: &BoundaryRecord) -> f64 {
        self.compositions
            .iter()
            .zip(&other.compositions)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    fn order(&self, other: &BoundaryRecord) -> Ordering {
        self.temperature
            .total_cmp(&other.temperature)
            .then(self.compositions[0].total_cmp(&other.compositions[0]))
            .then(self.compositions[1].total_cmp(&other.compositions[1]))
    }
}

/// Outcome of adding one pair to the boundary sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Appended,
    Replaced,
}

/// One phase-boundary point for scatter plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub phase: String,
    pub temperature: f64,
    pub composition: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tieline {
    pub phases: [String; 2],
    pub temperature: f64,
    pub compositions: [f64; 2],
}

/// Connected run of records of one phase pair, in temperature order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryCurve {
    pub pair: PhasePair,
    pub records: Vec<BoundaryRecord>,
}

/// Serializable view of all records of one phase pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryExport {
    pub pair: PhasePair,
    pub indep_comp: String,
    pub records: Vec<BoundaryRecord>,
}

/// Caller-owned aggregate of boundary records.
#[derive(Debug, Clone, PartialEq)]
pub struct ZpfBoundarySets {
    components: Vec<String>,
    indep_comp: String,
    boundaries: BTreeMap<PhasePair, Vec<BoundaryRecord>>,
}

impl ZpfBoundarySets {
    pub fn new(components: &[String], indep_comp: impl Into<String>) -> Self {
        Self {
            components: system_components(components),
            indep_comp: indep_comp.into(),
            boundaries: BTreeMap::new(),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn indep_comp(&self) -> &str {
        &self.indep_comp
    }

    /// Total number of records over all phase pairs.
    pub fn len(&self) -> usize {
        self.boundaries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.values().all(Vec::is_empty)
    }

    pub fn phase_pairs(&self) -> impl Iterator<Item = &PhasePair> {
        self.boundaries.keys()
    }

    pub fn records(&self, pair: &PhasePair) -> &[BoundaryRecord] {
        self.boundaries.get(pair).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PhasePair, &[BoundaryRecord])> {
        self.boundaries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Add a pair, replacing any record within `(xtol, ttol)` of it.
    pub fn add_compsets(
        &mut self,
        pair: CompositionSetPair,
        xtol: f64,
        ttol: f64,
    ) -> MapResult<Insertion> {
        if pair.indep_comp() != self.indep_comp {
            return Err(MapError::Invariant {
                what: format!(
                    "pair tracks {} but boundary sets track {}",
                    pair.indep_comp(),
                    self.indep_comp
                ),
            });
        }
        Ok(self.add_record(BoundaryRecord::from_pair(pair), xtol, ttol))
    }

    fn add_record(&mut self, record: BoundaryRecord, xtol: f64, ttol: f64) -> Insertion {
        let records = self.boundaries.entry(record.phase_pair()).or_default();
        let near: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_near(&record, xtol, ttol))
            .map(|(i, _)| i)
            .collect();

        let insertion = match near.split_first() {
            None => {
                let at = records.partition_point(|r| r.order(&record).is_lt());
                records.insert(at, record);
                return Insertion::Appended;
            }
            Some((&first, rest)) => {
                records[first] = record;
                for &i in rest.iter().rev() {
                    records.remove(i);
                }
                Insertion::Replaced
            }
        };
        records.sort_by(BoundaryRecord::order);
        insertion
    }

    /// Fold another aggregate into this one with [`Self::add_compsets`] semantics.
    pub fn merge(&mut self, other: &ZpfBoundarySets, xtol: f64, ttol: f64) -> MapResult<()> {
        if other.indep_comp != self.indep_comp {
            return Err(MapError::Invariant {
                what: format!(
                    "cannot merge boundary sets over {} into sets over {}",
                    other.indep_comp, self.indep_comp
                ),
            });
        }
        for records in other.boundaries.values() {
            for record in records {
                self.add_record(record.clone(), xtol, ttol);
            }
        }
        Ok(())
    }

    /// Every boundary point as `(phase, T, x)`.
    pub fn scatter_points(&self) -> Vec<ScatterPoint> {
        self.boundaries
            .values()
            .flatten()
            .flat_map(|r| {
                (0..2).map(move |i| ScatterPoint {
                    phase: r.phases[i].clone(),
                    temperature: r.temperature,
                    composition: r.compositions[i],
                })
            })
            .collect()
    }

    pub fn tielines(&self) -> Vec<Tieline> {
        self.boundaries
            .values()
            .flatten()
            .map(|r| Tieline {
                phases: r.phases.clone(),
                temperature: r.temperature,
                compositions: r.compositions,
            })
            .collect()
    }

    /// Records of each pair grouped into connected curves.
    ///
    /// Walking in temperature order, a record joins the curve whose last
    /// record is nearest within `(xtol, ttol)`, or starts a new curve.
    pub fn curves(&self, xtol: f64, ttol: f64) -> Vec<BoundaryCurve> {
        let mut curves = Vec::new();
        for (pair, records) in &self.boundaries {
            let mut groups: Vec<Vec<BoundaryRecord>> = Vec::new();
            for record in records {
                let best = groups
                    .iter_mut()
                    .filter_map(|g| {
                        let last = g.last()?;
                        if !last.is_near(record, xtol, ttol) {
                            return None;
                        }
                        let d = last.distance(record);
                        Some((d, g))
                    })
                    .min_by(|a, b| a.0.total_cmp(&b.0));
                match best {
                    Some((_, group)) => group.push(record.clone()),
                    None => groups.push(vec![record.clone()]),
                }
            }
            curves.extend(groups.into_iter().map(|records| BoundaryCurve {
                pair: pair.clone(),
                records,
            }));
        }
        curves
    }

    pub fn export(&self) -> Vec<BoundaryExport> {
        self.boundaries
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(pair, records)| BoundaryExport {
                pair: pair.clone(),
                indep_comp: self.indep_comp.clone(),
                records: records.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compsets::tests::pair;
    use proptest::prelude::*;

    fn sets() -> ZpfBoundarySets {
        ZpfBoundarySets::new(&["A".to_string(), "B".to_string()], "B")
    }

    #[test]
    fn phase_pair_is_unordered() {
        assert_eq!(PhasePair::new("LIQUID", "FCC"), PhasePair::new("FCC", "LIQUID"));
        assert_eq!(PhasePair::new("LIQUID", "FCC").to_string(), "FCC+LIQUID");
        assert!(PhasePair::new("FCC", "FCC").is_miscibility_gap());
    }

    #[test]
    fn same_pair_twice_is_one_record() {
        let mut zpf = sets();
        let p = pair(("ALPHA", 0.3), ("BETA", 0.7), 1000.0);
        assert_eq!(zpf.add_compsets(p.clone(), 0.1, 1.0).unwrap(), Insertion::Appended);
        assert_eq!(zpf.add_compsets(p, 0.1, 1.0).unwrap(), Insertion::Replaced);
        assert_eq!(zpf.len(), 1);
    }

    #[test]
    fn member_order_does_not_matter() {
        let mut zpf = sets();
        zpf.add_compsets(pair(("BETA", 0.7), ("ALPHA", 0.3), 1000.0), 0.1, 1.0)
            .unwrap();
        zpf.add_compsets(pair(("ALPHA", 0.3), ("BETA", 0.7), 1000.0), 0.1, 1.0)
            .unwrap();
        let key = PhasePair::new("ALPHA", "BETA");
        let records = zpf.records(&key);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phases, ["ALPHA".to_string(), "BETA".to_string()]);
        assert_eq!(records[0].compositions, [0.3, 0.7]);
    }

    #[test]
    fn near_record_is_replaced_far_record_kept() {
        let (xtol, ttol) = (0.1, 10.0);
        let mut zpf = sets();
        zpf.add_compsets(pair(("ALPHA", 0.3), ("BETA", 0.7), 1000.0), xtol, ttol)
            .unwrap();
        let half = zpf
            .add_compsets(pair(("ALPHA", 0.35), ("BETA", 0.75), 1005.0), xtol, ttol)
            .unwrap();
        assert_eq!(half, Insertion::Replaced);
        let key = PhasePair::new("ALPHA", "BETA");
        assert_eq!(zpf.records(&key).len(), 1);
        assert_eq!(zpf.records(&key)[0].temperature, 1005.0);

        let far = zpf
            .add_compsets(pair(("ALPHA", 0.35), ("BETA", 0.75), 1025.0), xtol, ttol)
            .unwrap();
        assert_eq!(far, Insertion::Appended);
        assert_eq!(zpf.records(&key).len(), 2);
    }

    #[test]
    fn tolerance_edges_are_exclusive() {
        let mut zpf = sets();
        zpf.add_compsets(pair(("ALPHA", 0.25), ("BETA", 0.5), 1000.0), 0.25, 8.0)
            .unwrap();
        let at_ttol = zpf
            .add_compsets(pair(("ALPHA", 0.25), ("BETA", 0.5), 1008.0), 0.25, 8.0)
            .unwrap();
        assert_eq!(at_ttol, Insertion::Appended);
    }

    #[test]
    fn miscibility_gap_records_are_ordered_by_composition() {
        let mut zpf = sets();
        zpf.add_compsets(pair(("FCC", 0.9), ("FCC", 0.1), 800.0), 0.1, 1.0)
            .unwrap();
        let records = zpf.records(&PhasePair::new("FCC", "FCC"));
        assert_eq!(records[0].compositions, [0.1, 0.9]);
    }

    #[test]
    fn records_sorted_by_temperature() {
        let mut zpf = sets();
        for t in [900.0, 700.0, 800.0] {
            zpf.add_compsets(pair(("ALPHA", 0.3), ("BETA", 0.7), t), 0.1, 10.0)
                .unwrap();
        }
        let temps: Vec<f64> = zpf
            .records(&PhasePair::new("ALPHA", "BETA"))
            .iter()
            .map(|r| r.temperature)
            .collect();
        assert_eq!(temps, vec![700.0, 800.0, 900.0]);
    }

    #[test]
    fn rejects_other_component() {
        let mut zpf = ZpfBoundarySets::new(&["A".to_string(), "B".to_string()], "A");
        let err = zpf
            .add_compsets(pair(("ALPHA", 0.3), ("BETA", 0.7), 1000.0), 0.1, 1.0)
            .unwrap_err();
        assert!(matches!(err, MapError::Invariant { .. }));
        assert!(zpf.merge(&sets(), 0.1, 1.0).is_err());
    }

    #[test]
    fn merge_folds_with_dedup() {
        let mut left = sets();
        left.add_compsets(pair(("ALPHA", 0.3), ("BETA", 0.7), 1000.0), 0.1, 5.0)
            .unwrap();
        let mut right = sets();
        right
            .add_compsets(pair(("ALPHA", 0.31), ("BETA", 0.69), 1000.0), 0.1, 5.0)
            .unwrap();
        right
            .add_compsets(pair(("LIQUID", 0.5), ("BETA", 0.8), 1100.0), 0.1, 5.0)
            .unwrap();
        left.merge(&right, 0.1, 5.0).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left.phase_pairs().count(), 2);
    }

    #[test]
    fn plotting_views() {
        let mut zpf = sets();
        for (i, t) in [700.0, 710.0, 720.0].into_iter().enumerate() {
            let d = 0.01 * i as f64;
            zpf.add_compsets(pair(("ALPHA", 0.3 - d), ("BETA", 0.7 + d), t), 0.1, 5.0)
                .unwrap();
        }
        // Separate branch far away in composition
        zpf.add_compsets(pair(("ALPHA", 0.05), ("BETA", 0.1), 710.0), 0.02, 5.0)
            .unwrap();

        assert_eq!(zpf.scatter_points().len(), 8);
        let tielines = zpf.tielines();
        assert_eq!(tielines.len(), 4);
        assert!(tielines.iter().all(|t| t.phases[0] == "ALPHA"));

        let curves = zpf.curves(0.1, 15.0);
        assert_eq!(curves.len(), 2);
        let long = curves.iter().find(|c| c.records.len() == 3).unwrap();
        assert!(long.records.windows(2).all(|w| w[0].temperature < w[1].temperature));

        let export = zpf.export();
        assert_eq!(export.len(), 1);
        assert_eq!(export[0].indep_comp, "B");
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"first\":\"ALPHA\""));
    }

    proptest! {
        #[test]
        fn no_two_records_within_tolerance(
            points in prop::collection::vec((0.0_f64..100.0, 0.0_f64..0.5, 0.5_f64..1.0), 1..40)
        ) {
            let (xtol, ttol) = (0.05, 5.0);
            let mut zpf = sets();
            for (t, xa, xb) in points {
                zpf.add_compsets(pair(("ALPHA", xa), ("BETA", xb), 500.0 + t), xtol, ttol)
                    .unwrap();
            }
            let records = zpf.records(&PhasePair::new("ALPHA", "BETA"));
            for (i, a) in records.iter().enumerate() {
                for b in &records[i + 1..] {
                    prop_assert!(!a.is_near(b, xtol, ttol));
                }
            }
            prop_assert!(records.windows(2).all(|w| w[0].temperature <= w[1].temperature));
        }
    }
}
