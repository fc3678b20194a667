//! SI quantities for the state variables of a mapping run.
//!
//! Everything downstream works in plain kelvin and pascal `f64`s; the
//! `uom` types only guard the boundary where conditions are built.

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};

pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

/// Thermal energy `R·T` in J/mol at `t_k` kelvin.
#[inline]
pub fn rt(t_k: f64) -> f64 {
    constants::R_GAS * t_k
}

pub mod constants {
    /// Molar gas constant [J/(mol·K)]
    pub const R_GAS: f64 = 8.314_462_618;

    /// Standard atmosphere [Pa]
    pub const P_STANDARD_PA: f64 = 101_325.0;
}
