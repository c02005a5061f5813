//! Native solver backends implementing [`ConeSolver`](crate::bridge::ConeSolver).

#[cfg(feature = "clarabel")]
mod clarabel;
#[cfg(feature = "clarabel")]
pub use self::clarabel::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "clarabel")] {
        /// Backend used by [`solve_default`](crate::bridge::solve_default).
        pub type DefaultBackend = ClarabelSolver;
    }
}
