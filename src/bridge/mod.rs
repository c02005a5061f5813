//! Translation between host values and the native solver.
//!
//! A call to [`csolve`] runs the stages below in order, each filling a
//! per-call [`Workspace`]:
//!
//! * [`Problem::assemble`] validates `(m, n, Ax, Ai, Ap, b, c)` and
//!   converts the arrays to the native element types, borrowing them
//!   where no conversion is needed;
//! * [`ConeSpec::parse`] reads the cone mapping;
//! * [`parse_opts`] reads the option mapping;
//! * [`WarmStart::load`] reads initial guesses, ignoring malformed ones;
//! * a [`ConeSolver`] solves and [`package`] hands the result back.
//!
//! The workspace is released on every exit path.

mod coerce;
mod cones;
mod error;
mod native;
mod params;
mod problem;
mod result;
mod settings;
mod solve;
mod types;
mod warmstart;
mod workspace;

pub use coerce::*;
pub use cones::*;
pub use error::*;
pub use native::*;
pub use params::*;
pub use problem::*;
pub use result::*;
pub use settings::*;
pub use solve::*;
pub use types::*;
pub use warmstart::*;
pub use workspace::*;
