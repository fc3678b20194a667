//! Facet search: the lower convex envelope simplex covering a target composition.

use crate::error::{ModelError, ModelResult};
use crate::sample::PointSample;
use nalgebra::{DMatrix, DVector};

/// Minimal-energy assemblage at one target composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    /// Indices into the sample, one per simplex vertex
    pub vertices: Vec<usize>,
    /// Barycentric weight of each vertex (phase fractions)
    pub fractions: Vec<f64>,
    /// Chemical potential of each component on the tangent hyperplane
    pub chemical_potentials: Vec<f64>,
}

/// Trait for facet search over a sampled energy surface.
pub trait Hyperplane: Send + Sync {
    /// Find the lower-envelope simplex whose vertices bracket `target`.
    fn facet(&self, sample: &PointSample, target: &[f64]) -> ModelResult<Facet>;
}

/// Binary facet search by monotone-chain lower convex hull in (x, G).
///
/// `x` is the mole fraction of the second component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowerHull {
    /// Points closer than this in `x` are treated as the same composition
    pub coordinate_tol: f64,
}

impl Default for LowerHull {
    fn default() -> Self {
        Self {
            coordinate_tol: 1e-14,
        }
    }
}

impl LowerHull {
    /// Indices of the lower hull vertices, in increasing composition.
    pub fn lower_hull(&self, sample: &PointSample) -> Vec<usize> {
        let x = |i: usize| sample.compositions[i][1];
        let g = |i: usize| sample.energies[i];

        let mut order: Vec<usize> = (0..sample.len())
            .filter(|&i| sample.energies[i].is_finite() && sample.compositions[i].len() == 2)
            .collect();
        order.sort_by(|&a, &b| x(a).total_cmp(&x(b)).then(g(a).total_cmp(&g(b))));

        let mut hull: Vec<usize> = Vec::with_capacity(order.len());
        for i in order {
            // Sorted by energy within equal compositions: the first one is lowest.
            if let Some(&last) = hull.last() {
                if (x(i) - x(last)).abs() <= self.coordinate_tol {
                    continue;
                }
            }
            while hull.len() >= 2 {
                let o = hull[hull.len() - 2];
                let a = hull[hull.len() - 1];
                let cross = (x(a) - x(o)) * (g(i) - g(o)) - (g(a) - g(o)) * (x(i) - x(o));
                if cross <= 0.0 {
                    hull.pop();
                } else {
                    break;
                }
            }
            hull.push(i);
        }
        hull
    }
}

impl Hyperplane for LowerHull {
    fn facet(&self, sample: &PointSample, target: &[f64]) -> ModelResult<Facet> {
        if target.len() != 2 {
            return Err(ModelError::NotSupported {
                what: "lower hull facets are only defined for binary systems",
            });
        }
        let hull = self.lower_hull(sample);
        if hull.len() < 2 {
            return Err(ModelError::Degenerate {
                what: "fewer than two distinct compositions sampled",
            });
        }

        let x = |i: usize| sample.compositions[i][1];
        let x_target = target[1];
        let (x_min, x_max) = (x(hull[0]), x(hull[hull.len() - 1]));
        if x_target < x_min - self.coordinate_tol || x_target > x_max + self.coordinate_tol {
            return Err(ModelError::OutOfRange {
                value: x_target,
                min: x_min,
                max: x_max,
            });
        }

        let edge = hull
            .windows(2)
            .position(|w| x(w[1]) >= x_target)
            .unwrap_or(hull.len() - 2);
        let vertices = vec![hull[edge], hull[edge + 1]];

        // Columns are vertex compositions: M w = target, M^T mu = G.
        let m = DMatrix::from_fn(2, 2, |r, c| sample.compositions[vertices[c]][r]);
        let weights = m
            .clone()
            .lu()
            .solve(&DVector::from_column_slice(target))
            .ok_or(ModelError::Degenerate {
                what: "singular phase-fraction system",
            })?;
        let energies = DVector::from_iterator(2, vertices.iter().map(|&v| sample.energies[v]));
        let mu = m
            .transpose()
            .lu()
            .solve(&energies)
            .ok_or(ModelError::Degenerate {
                what: "singular tangent-plane system",
            })?;

        Ok(Facet {
            vertices,
            fractions: weights.iter().map(|w| w.clamp(0.0, 1.0)).collect(),
            chemical_potentials: mu.iter().copied().collect(),
        })
    }
}
