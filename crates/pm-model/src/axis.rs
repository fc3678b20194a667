//! Condition value axes.
//!
//! A condition is a scalar, an explicit list, or a half-open `start..stop`
//! range with a fixed step, the same three shapes a user writes in a project
//! file.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of values a range may expand to.
pub const MAX_AXIS_POINTS: usize = 1_000_000;

/// Values taken by one state variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// A single value
    Scalar(f64),
    /// Explicit values, used in the given order
    Values(Vec<f64>),
    /// Uniformly spaced values from `start` up to, not including, `stop`
    Range { start: f64, stop: f64, step: f64 },
}

impl ConditionValue {
    /// Generate all values on the axis.
    pub fn unpack(&self) -> ModelResult<Vec<f64>> {
        match self {
            Self::Scalar(v) => {
                ensure_axis_finite(*v)?;
                Ok(vec![*v])
            }
            Self::Values(values) => {
                if values.is_empty() {
                    return Err(ModelError::condition("condition has no values"));
                }
                for v in values {
                    ensure_axis_finite(*v)?;
                }
                Ok(values.clone())
            }
            Self::Range { start, stop, step } => {
                ensure_axis_finite(*start)?;
                ensure_axis_finite(*stop)?;
                ensure_axis_finite(*step)?;
                if *step <= 0.0 {
                    return Err(ModelError::condition(format!(
                        "range step must be positive, got {step}"
                    )));
                }
                if stop <= start {
                    return Err(ModelError::condition(format!(
                        "range stop {stop} must exceed start {start}"
                    )));
                }
                // Small slack keeps floating error from adding a point at `stop`.
                let count = ((stop - start) / step - 1e-9).ceil().max(1.0);
                if !count.is_finite() || count > MAX_AXIS_POINTS as f64 {
                    return Err(ModelError::condition(format!(
                        "range {self} expands to more than {MAX_AXIS_POINTS} values"
                    )));
                }
                let n = count as usize;
                Ok((0..n).map(|i| start + i as f64 * step).collect())
            }
        }
    }
}

fn ensure_axis_finite(v: f64) -> ModelResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ModelError::condition(format!("non-finite condition value {v}")))
    }
}

impl From<f64> for ConditionValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for ConditionValue {
    fn from(values: Vec<f64>) -> Self {
        Self::Values(values)
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Values(values) => write!(f, "{} values", values.len()),
            Self::Range { start, stop, step } => write!(f, "{start}..{stop} step {step}"),
        }
    }
}
