//! Validated mapping conditions and tuning options.

use crate::error::{MapError, MapResult};
use pm_core::ensure_fraction;
use pm_core::units::constants::P_STANDARD_PA;
use pm_model::ModelError;
use pm_model::{CompositionCondition, ConditionValue, Parameters, ThermoConditions};

/// One user-supplied state-variable condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Temperature(ConditionValue),
    Pressure(ConditionValue),
    /// Mole fraction of one independent component
    MoleFraction {
        component: String,
        values: ConditionValue,
    },
}

/// Values of the independent component along the composition axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionAxis {
    pub component: String,
    pub values: Vec<f64>,
}

/// Temperature grid, fixed pressure, and one composition axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingConditions {
    pub temperatures: Vec<f64>,
    pub pressure: f64,
    pub composition: CompositionAxis,
}

impl MappingConditions {
    pub fn new(
        temperature: &ConditionValue,
        pressure: &ConditionValue,
        component: impl Into<String>,
        composition: &ConditionValue,
    ) -> MapResult<Self> {
        let temperatures = temperature.unpack()?;
        let pressures = pressure.unpack()?;
        if pressures.len() != 1 {
            return Err(MapError::condition(format!(
                "pressure must be a single value, got {}",
                pressures.len()
            )));
        }
        let pressure = pressures[0];
        for &t in &temperatures {
            ThermoConditions::new(t, pressure)?;
        }

        let values = composition.unpack()?;
        for &x in &values {
            ensure_fraction(x, "mole fraction").map_err(ModelError::from)?;
        }
        if values.len() < 2 {
            return Err(MapError::condition(
                "composition axis needs at least two values",
            ));
        }
        if values[1] <= values[0] {
            return Err(MapError::condition(
                "composition axis must start with increasing values",
            ));
        }

        Ok(Self {
            temperatures,
            pressure,
            composition: CompositionAxis {
                component: component.into(),
                values,
            },
        })
    }

    /// Build from an unordered condition list.
    ///
    /// Temperature and exactly one mole fraction are required. Pressure
    /// defaults to one standard atmosphere.
    pub fn from_conditions(conditions: &[Condition]) -> MapResult<Self> {
        let mut temperature = None;
        let mut pressure = None;
        let mut fractions = Vec::new();
        for condition in conditions {
            match condition {
                Condition::Temperature(v) => {
                    if temperature.replace(v).is_some() {
                        return Err(MapError::condition("temperature specified twice"));
                    }
                }
                Condition::Pressure(v) => {
                    if pressure.replace(v).is_some() {
                        return Err(MapError::condition("pressure specified twice"));
                    }
                }
                Condition::MoleFraction { component, values } => {
                    fractions.push((component, values));
                }
            }
        }

        let temperature =
            temperature.ok_or_else(|| MapError::condition("temperature condition missing"))?;
        if fractions.len() != 1 {
            return Err(MapError::condition(format!(
                "binary mapping needs exactly one composition condition, got {}",
                fractions.len()
            )));
        }
        let (component, values) = fractions[0];
        let standard = ConditionValue::Scalar(P_STANDARD_PA);
        Self::new(
            temperature,
            pressure.unwrap_or(&standard),
            component.clone(),
            values,
        )
    }

    /// Spacing of the temperature grid, if it has more than one value.
    pub fn temperature_step(&self) -> Option<f64> {
        match self.temperatures.as_slice() {
            [t0, t1, ..] => Some((t1 - t0).abs()),
            _ => None,
        }
    }

    /// Spacing `dX` of the composition axis.
    pub fn composition_step(&self) -> f64 {
        self.composition.values[1] - self.composition.values[0]
    }

    /// Largest composition on the axis.
    pub fn max_composition(&self) -> f64 {
        self.composition
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn independent_component(&self) -> &str {
        &self.composition.component
    }

    /// Composition condition in the form the hull sampler expects.
    pub fn composition_condition(&self) -> CompositionCondition {
        CompositionCondition::new(
            self.composition.component.clone(),
            self.composition.values.clone(),
        )
    }

    pub fn state(&self, temperature: f64) -> MapResult<ThermoConditions> {
        Ok(ThermoConditions::new(temperature, self.pressure)?)
    }
}

/// Hull sampling options.
#[derive(Debug, Clone, PartialEq)]
pub struct HullOptions {
    /// Sampling fineness per phase
    pub point_density: usize,
    /// Named model constant overrides
    pub parameters: Parameters,
}

impl Default for HullOptions {
    fn default() -> Self {
        Self {
            point_density: 500,
            parameters: Parameters::new(),
        }
    }
}

/// Mapping driver options.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub hull: HullOptions,
    /// Minimum composition difference for two distinct phases in the hull
    pub discrepancy_tol: f64,
    /// Minimum site-fraction difference for a miscibility gap; `2·dX` if unset
    pub misc_gap_tol: Option<f64>,
    /// Composition tolerance for merging boundary records
    pub xtol: f64,
    /// Temperature tolerance for merging boundary records; half the
    /// temperature step if unset
    pub ttol: Option<f64>,
    /// Log every row and solve at debug level
    pub verbose: bool,
    /// Log a summary at the end of the sweep
    pub summary: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            hull: HullOptions::default(),
            discrepancy_tol: 0.001,
            misc_gap_tol: None,
            xtol: 0.10,
            ttol: None,
            verbose: false,
            summary: false,
        }
    }
}

impl MapOptions {
    pub fn validate(&self) -> MapResult<()> {
        if self.hull.point_density < 2 {
            return Err(MapError::InvalidArg {
                what: "hull point density must be at least 2",
            });
        }
        let tols = [
            Some(self.discrepancy_tol),
            self.misc_gap_tol,
            Some(self.xtol),
            self.ttol,
        ];
        if tols.iter().flatten().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(MapError::InvalidArg {
                what: "tolerances must be finite and non-negative",
            });
        }
        Ok(())
    }

    pub fn resolved_misc_gap_tol(&self, conditions: &MappingConditions) -> f64 {
        self.misc_gap_tol
            .unwrap_or_else(|| 2.0 * conditions.composition_step())
    }

    pub fn resolved_ttol(&self, conditions: &MappingConditions) -> f64 {
        self.ttol.unwrap_or_else(|| {
            conditions
                .temperature_step()
                .map_or(1.0, |dt| 0.5 * dt)
        })
    }
}
