//! Project schema definitions.

use pm_core::units::constants::P_STANDARD_PA;
use pm_model::{ConditionValue, SolutionPhase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub system: SystemDef,
    pub conditions: ConditionsDef,
    /// Phases to map; all system phases when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_phases: Option<Vec<String>>,
    #[serde(default)]
    pub options: OptionsDef,
    #[serde(default)]
    pub equilibrium: EquilibriumDef,
    /// Named model constant overrides, e.g. `L(FCC,0)`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemDef {
    pub components: Vec<String>,
    pub phases: Vec<SolutionPhase>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionsDef {
    pub temperature: ConditionValue,
    #[serde(default = "default_pressure")]
    pub pressure: ConditionValue,
    /// Mole fraction conditions; a binary map takes exactly one
    pub composition: Vec<MoleFractionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoleFractionDef {
    pub component: String,
    pub values: ConditionValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionsDef {
    #[serde(default = "default_hull_density")]
    pub point_density: usize,
    #[serde(default = "default_discrepancy_tol")]
    pub discrepancy_tol: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc_gap_tol: Option<f64>,
    #[serde(default = "default_xtol")]
    pub xtol: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttol: Option<f64>,
}

impl Default for OptionsDef {
    fn default() -> Self {
        Self {
            point_density: default_hull_density(),
            discrepancy_tol: default_discrepancy_tol(),
            misc_gap_tol: None,
            xtol: default_xtol(),
            ttol: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquilibriumDef {
    #[serde(default = "default_equilibrium_density")]
    pub point_density: usize,
    #[serde(default = "default_refinement_iterations")]
    pub refinement_iterations: usize,
    #[serde(default = "default_refinement_points")]
    pub refinement_points: usize,
    #[serde(default = "default_collapse_tol")]
    pub collapse_tol: f64,
}

impl Default for EquilibriumDef {
    fn default() -> Self {
        Self {
            point_density: default_equilibrium_density(),
            refinement_iterations: default_refinement_iterations(),
            refinement_points: default_refinement_points(),
            collapse_tol: default_collapse_tol(),
        }
    }
}

fn default_pressure() -> ConditionValue {
    ConditionValue::Scalar(P_STANDARD_PA)
}

fn default_hull_density() -> usize {
    500
}

fn default_discrepancy_tol() -> f64 {
    0.001
}

fn default_xtol() -> f64 {
    0.10
}

fn default_equilibrium_density() -> usize {
    2000
}

fn default_refinement_iterations() -> usize {
    4
}

fn default_refinement_points() -> usize {
    21
}

fn default_collapse_tol() -> f64 {
    1e-3
}
