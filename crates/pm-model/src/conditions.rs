//! Fixed state-variable conditions and parameter overrides.

use crate::error::{ModelError, ModelResult};
use pm_core::units::{Pressure, Temperature, k, pa};
use std::collections::BTreeMap;

/// Overrides of named model constants, keyed by parameter name.
pub type Parameters = BTreeMap<String, f64>;

/// A fixed temperature/pressure slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermoConditions {
    pub t: Temperature,
    pub p: Pressure,
}

impl ThermoConditions {
    /// Create conditions from kelvin and pascal, rejecting non-positive or non-finite values.
    pub fn new(t_k: f64, p_pa: f64) -> ModelResult<Self> {
        if !t_k.is_finite() || t_k <= 0.0 {
            return Err(ModelError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if !p_pa.is_finite() || p_pa <= 0.0 {
            return Err(ModelError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(Self {
            t: k(t_k),
            p: pa(p_pa),
        })
    }

    pub fn temperature_k(&self) -> f64 {
        self.t.value
    }

    pub fn pressure_pa(&self) -> f64 {
        self.p.value
    }

    /// Same pressure, different temperature.
    pub fn at_temperature(&self, t_k: f64) -> ModelResult<Self> {
        Self::new(t_k, self.pressure_pa())
    }
}

/// Fixed conditions for one exact equilibrium solve in a binary system.
#[derive(Clone, Debug, PartialEq)]
pub struct EquilibriumConditions {
    pub state: ThermoConditions,
    /// Independent component whose mole fraction is fixed.
    pub component: String,
    pub mole_fraction: f64,
}
