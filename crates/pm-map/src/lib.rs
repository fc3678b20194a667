//! Binary phase-diagram boundary mapping.
//!
//! This crate traces two-phase (zero phase fraction) boundaries of a binary
//! system over a temperature-composition grid. Each temperature row samples
//! the convex hull once, locates two-phase windows on it, and confirms them
//! with exact equilibrium solves. Confirmed tie-lines accumulate in
//! caller-owned [`ZpfBoundarySets`].
//!
//! The Gibbs energy model, facet search, and equilibrium solver are reached
//! only through the `pm-model` traits.

pub mod boundary;
pub mod compsets;
pub mod conditions;
pub mod driver;
pub mod error;
pub mod hull;
pub mod locator;
pub mod stats;

pub use boundary::{
    BoundaryCurve, BoundaryExport, BoundaryRecord, Insertion, PhasePair, ScatterPoint, Tieline,
    ZpfBoundarySets,
};
pub use compsets::{CompositionSet, CompositionSetPair};
pub use conditions::{CompositionAxis, Condition, HullOptions, MapOptions, MappingConditions};
pub use driver::{BinaryMapper, RowTrace, StartingPoint, map_binary};
pub use error::{MapError, MapResult};
pub use hull::{HullPoint, HullSample, convex_hull};
pub use locator::TwoPhaseLocator;
pub use stats::MappingStats;
