//! Binary single-sublattice solution models.
//!
//! Two phase descriptions are available:
//! - a regular (Redlich-Kister) solution with ideal mixing, which produces
//!   miscibility gaps when the interaction is strongly positive;
//! - a quadratic well `G0 + K (x - X0)^2`, whose common tangents are known
//!   in closed form and make phase boundaries easy to check.
//!
//! Every coefficient is linear in temperature (`a + b*T`) and can be replaced
//! at evaluation time through [`Parameters`] using the names
//! `G(PHASE,COMP)`, `L(PHASE,k)`, `G0(PHASE)`, `X0(PHASE)` and `K(PHASE)`.

use crate::composition::system_components;
use crate::conditions::{Parameters, ThermoConditions};
use crate::error::{ModelError, ModelResult};
use crate::model::validation::{validate_energy, validate_site_fractions};
use crate::model::{GibbsModel, PhasePoint};
use crate::sample::FAKE_PHASE;
use pm_core::numeric::{MIN_SITE_FRACTION, linspace};
use pm_core::units::{constants::R_GAS, rt};
use serde::{Deserialize, Serialize};

/// Coefficient linear in temperature: `a + b*T`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearT {
    pub a: f64,
    #[serde(default)]
    pub b: f64,
}

impl LinearT {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub const fn constant(a: f64) -> Self {
        Self { a, b: 0.0 }
    }

    pub fn at(&self, t_k: f64) -> f64 {
        self.a + self.b * t_k
    }

    fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

/// Energy description of one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PhaseEnergy {
    /// `x_A G_A + x_B G_B + RT(x_A ln x_A + x_B ln x_B) + x_A x_B sum_k L_k (x_A - x_B)^k`
    RegularSolution {
        endmembers: [LinearT; 2],
        #[serde(default)]
        interactions: Vec<LinearT>,
    },
    /// `G0 + K (x_B - X0)^2`
    Quadratic {
        minimum: LinearT,
        center: f64,
        curvature: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionPhase {
    pub name: String,
    pub energy: PhaseEnergy,
}

impl SolutionPhase {
    pub fn regular(
        name: impl Into<String>,
        endmembers: [LinearT; 2],
        interactions: Vec<LinearT>,
    ) -> Self {
        Self {
            name: name.into(),
            energy: PhaseEnergy::RegularSolution {
                endmembers,
                interactions,
            },
        }
    }

    pub fn quadratic(name: impl Into<String>, minimum: LinearT, center: f64, curvature: f64) -> Self {
        Self {
            name: name.into(),
            energy: PhaseEnergy::Quadratic {
                minimum,
                center,
                curvature,
            },
        }
    }
}

/// A binary system of substitutional phases.
#[derive(Debug, Clone)]
pub struct SolutionModel {
    name: String,
    components: Vec<String>,
    phases: Vec<SolutionPhase>,
}

impl SolutionModel {
    pub fn new(
        name: impl Into<String>,
        components: &[String],
        phases: Vec<SolutionPhase>,
    ) -> ModelResult<Self> {
        let components = system_components(components);
        if components.len() != 2 {
            return Err(ModelError::NotSupported {
                what: "solution models describe exactly two components",
            });
        }
        if phases.is_empty() {
            return Err(ModelError::InvalidArg {
                what: "solution model needs at least one phase",
            });
        }
        for (i, phase) in phases.iter().enumerate() {
            if phase.name.is_empty() || phase.name == FAKE_PHASE {
                return Err(ModelError::InvalidArg {
                    what: "phase name is empty or reserved",
                });
            }
            if phases[..i].iter().any(|p| p.name == phase.name) {
                return Err(ModelError::InvalidArg {
                    what: "duplicate phase name",
                });
            }
            validate_phase_energy(&phase.energy)?;
        }
        Ok(Self {
            name: name.into(),
            components,
            phases,
        })
    }

    pub fn phase(&self, name: &str) -> ModelResult<&SolutionPhase> {
        self.phases
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ModelError::UnknownPhase {
                name: name.to_string(),
            })
    }

    pub fn phases(&self) -> &[SolutionPhase] {
        &self.phases
    }

    /// Every overridable parameter name, in phase order.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for phase in &self.phases {
            match &phase.energy {
                PhaseEnergy::RegularSolution { interactions, .. } => {
                    for comp in &self.components {
                        names.push(format!("G({},{})", phase.name, comp));
                    }
                    for order in 0..interactions.len() {
                        names.push(format!("L({},{})", phase.name, order));
                    }
                }
                PhaseEnergy::Quadratic { .. } => {
                    names.push(format!("G0({})", phase.name));
                    names.push(format!("X0({})", phase.name));
                    names.push(format!("K({})", phase.name));
                }
            }
        }
        names
    }

    fn check_configuration(&self, phase: &str, y: &[f64]) -> ModelResult<()> {
        if y.len() != self.components.len() {
            return Err(ModelError::InvalidArg {
                what: "site fraction vector length differs from component count",
            });
        }
        validate_site_fractions(y)?;
        self.phase(phase).map(|_| ())
    }
}

fn validate_phase_energy(energy: &PhaseEnergy) -> ModelResult<()> {
    match energy {
        PhaseEnergy::RegularSolution {
            endmembers,
            interactions,
        } => {
            if endmembers.iter().chain(interactions).any(|c| !c.is_finite()) {
                return Err(ModelError::NonPhysical {
                    what: "regular solution coefficients must be finite",
                });
            }
        }
        PhaseEnergy::Quadratic {
            minimum,
            center,
            curvature,
        } => {
            if !minimum.is_finite() {
                return Err(ModelError::NonPhysical {
                    what: "quadratic minimum must be finite",
                });
            }
            if !(center.is_finite() && *center > 0.0 && *center < 1.0) {
                return Err(ModelError::NonPhysical {
                    what: "quadratic center must lie strictly inside (0, 1)",
                });
            }
            if !(curvature.is_finite() && *curvature > 0.0) {
                return Err(ModelError::NonPhysical {
                    what: "quadratic curvature must be positive",
                });
            }
        }
    }
    Ok(())
}

fn resolve(parameters: &Parameters, name: impl FnOnce() -> String, value: f64) -> f64 {
    if parameters.is_empty() {
        return value;
    }
    parameters.get(&name()).copied().unwrap_or(value)
}

fn x_ln_x(x: f64) -> f64 {
    if x <= 0.0 { 0.0 } else { x * x.ln() }
}

impl GibbsModel for SolutionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn components(&self) -> &[String] {
        &self.components
    }

    fn phase_names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name.as_str()).collect()
    }

    fn sample_site_fractions(
        &self,
        phase: &str,
        point_density: usize,
    ) -> ModelResult<Vec<Vec<f64>>> {
        self.phase(phase)?;
        let points = linspace(MIN_SITE_FRACTION, 1.0 - MIN_SITE_FRACTION, point_density.max(2))?;
        Ok(points.into_iter().map(|x| vec![1.0 - x, x]).collect())
    }

    fn refine_site_fractions(
        &self,
        phase: &str,
        center: &[f64],
        span: f64,
        points: usize,
    ) -> ModelResult<Vec<Vec<f64>>> {
        self.check_configuration(phase, center)?;
        if !span.is_finite() || span <= 0.0 {
            return Err(ModelError::InvalidArg {
                what: "refinement span must be positive",
            });
        }
        let lo = (center[1] - span).max(MIN_SITE_FRACTION);
        let hi = (center[1] + span).min(1.0 - MIN_SITE_FRACTION);
        if hi <= lo {
            return Ok(vec![center.to_vec()]);
        }
        let xs = linspace(lo, hi, points.max(2))?;
        Ok(xs.into_iter().map(|x| vec![1.0 - x, x]).collect())
    }

    fn evaluate(
        &self,
        phase: &str,
        site_fractions: &[f64],
        state: &ThermoConditions,
        parameters: &Parameters,
    ) -> ModelResult<PhasePoint> {
        self.check_configuration(phase, site_fractions)?;
        let solution_phase = self.phase(phase)?;
        let t = state.temperature_k();
        let (xa, xb) = (site_fractions[0], site_fractions[1]);

        let gm = match &solution_phase.energy {
            PhaseEnergy::RegularSolution {
                endmembers,
                interactions,
            } => {
                let ga = resolve(
                    parameters,
                    || format!("G({},{})", phase, self.components[0]),
                    endmembers[0].at(t),
                );
                let gb = resolve(
                    parameters,
                    || format!("G({},{})", phase, self.components[1]),
                    endmembers[1].at(t),
                );
                let excess: f64 = interactions
                    .iter()
                    .enumerate()
                    .map(|(order, l)| {
                        let lk = resolve(parameters, || format!("L({},{})", phase, order), l.at(t));
                        lk * (xa - xb).powi(order as i32)
                    })
                    .sum();
                xa * ga + xb * gb + rt(t) * (x_ln_x(xa) + x_ln_x(xb)) + xa * xb * excess
            }
            PhaseEnergy::Quadratic {
                minimum,
                center,
                curvature,
            } => {
                let g0 = resolve(parameters, || format!("G0({})", phase), minimum.at(t));
                let x0 = resolve(parameters, || format!("X0({})", phase), *center);
                let kk = resolve(parameters, || format!("K({})", phase), *curvature);
                g0 + kk * (xb - x0).powi(2)
            }
        };
        validate_energy(gm)?;

        Ok(PhasePoint {
            gm,
            composition: site_fractions.to_vec(),
        })
    }
}
