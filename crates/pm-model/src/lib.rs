//! pm-model: Gibbs energy models and equilibrium collaborators for phasemap.
//!
//! Provides:
//! - `GibbsModel` trait: sampling and evaluation of phase configurations
//! - Composition grids and condition axes
//! - Point-grid calculation with fictitious pure-component points
//! - `Hyperplane` facet search (binary lower convex hull)
//! - `EquilibriumSolver` trait and a refining hull-based implementation
//! - `SolutionModel`: binary regular-solution and quadratic-well phases
//!
//! # Architecture
//!
//! The mapping core never looks inside a model. It samples energies through
//! `GibbsModel`, finds tangent facets through `Hyperplane`, and asks an
//! `EquilibriumSolver` for exact assemblages. Any of the three can be
//! replaced without touching the mapper.
//!
//! # Example
//!
//! ```no_run
//! use pm_model::{
//!     EquilibriumConditions, EquilibriumSolver, HullEquilibrium, LinearT, LowerHull,
//!     Parameters, SolutionModel, SolutionPhase, ThermoConditions,
//! };
//!
//! let model = SolutionModel::new(
//!     "gap",
//!     &["A".to_string(), "B".to_string()],
//!     vec![SolutionPhase::regular(
//!         "FCC",
//!         [LinearT::constant(0.0), LinearT::constant(0.0)],
//!         vec![LinearT::constant(20_000.0)],
//!     )],
//! )
//! .unwrap();
//! let hull = LowerHull::default();
//! let solver = HullEquilibrium::new(&model, &hull);
//! let conditions = EquilibriumConditions {
//!     state: ThermoConditions::new(800.0, 101_325.0).unwrap(),
//!     component: "B".to_string(),
//!     mole_fraction: 0.5,
//! };
//! let eq = solver
//!     .equilibrium(&["FCC".to_string()], &conditions, &Parameters::new())
//!     .unwrap();
//! println!("{} stable phases", eq.phase_count());
//! ```

pub mod axis;
pub mod composition;
pub mod conditions;
pub mod equilibrium;
pub mod error;
pub mod hyperplane;
pub mod model;
pub mod sample;
pub mod solution;

// Re-exports for ergonomics
pub use axis::{ConditionValue, MAX_AXIS_POINTS};
pub use composition::{
    CompositionCondition, VACANCY, build_composition_grid, composition_vector, system_components,
};
pub use conditions::{EquilibriumConditions, Parameters, ThermoConditions};
pub use equilibrium::{
    EquilibriumOptions, EquilibriumResult, EquilibriumSolver, HullEquilibrium, PhaseSlot,
    collapse_slots, slots_from_facet,
};
pub use error::{ModelError, ModelResult};
pub use hyperplane::{Facet, Hyperplane, LowerHull};
pub use model::{GibbsModel, PhasePoint};
pub use sample::{CalculateOptions, FAKE_PHASE, FAKE_POINT_ENERGY, PointSample, calculate, evaluate_into};
pub use solution::{LinearT, PhaseEnergy, SolutionModel, SolutionPhase};
