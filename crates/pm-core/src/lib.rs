//! pm-core: numeric foundation shared by the phasemap crates.
//!
//! - units: uom state variables, `R·T`, standard pressure
//! - numeric: fraction checks, site-fraction floor, grid helpers
//! - timing: wall-clock timers for hull and equilibrium bookkeeping
//! - error: [`PmError`]

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

pub use error::{PmError, PmResult};
pub use numeric::*;
pub use timing::{AccumulatingTimer, Timer};
pub use units::*;
