use super::cones::ConeSpec;
use super::settings::SolverOptions;
use super::types::{NativeFloat, NativeIndex};
use super::BackendError;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------
// native problem layout
// ---------------------------------

/// Borrowed compressed sparse column matrix.
///
/// The three slices are passed through exactly as assembled; their
/// mutual consistency is not checked.
#[derive(Debug, Clone, Copy)]
pub struct CscView<'a> {
    /// nonzero values
    pub values: &'a [NativeFloat],
    /// row index of each nonzero
    pub row_index: &'a [NativeIndex],
    /// start of each column in `values`, plus one past the last entry
    pub col_pointer: &'a [NativeIndex],
}

/// Problem data as seen by a native solver.
#[derive(Debug, Clone, Copy)]
pub struct NativeProblem<'a> {
    pub m: usize,
    pub n: usize,
    pub a: CscView<'a>,
    pub b: &'a [NativeFloat],
    pub c: &'a [NativeFloat],
}

/// Initial guesses handed to the native solver.  Absent fields are zero.
#[derive(Debug, Clone, Copy)]
pub struct WarmStartView<'a> {
    pub x: &'a [NativeFloat],
    pub y: &'a [NativeFloat],
    pub s: &'a [NativeFloat],
}

// ---------------------------------
// native outputs
// ---------------------------------

/// Solution buffers allocated by the native solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeSolution {
    pub x: Vec<NativeFloat>,
    pub y: Vec<NativeFloat>,
    pub s: Vec<NativeFloat>,
}

/// Diagnostics reported by the native solver.  Times are in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeInfo {
    pub status: StatusCode,
    pub iter: usize,
    pub pobj: f64,
    pub dobj: f64,
    pub res_pri: f64,
    pub res_dual: f64,
    pub rel_gap: f64,
    pub solve_time_ms: f64,
    pub setup_time_ms: f64,
}

impl Default for NativeInfo {
    fn default() -> Self {
        Self {
            status: StatusCode::Unfinished,
            iter: 0,
            pobj: f64::NAN,
            dobj: f64::NAN,
            res_pri: f64::NAN,
            res_dual: f64::NAN,
            rel_gap: f64::NAN,
            solve_time_ms: 0.,
            setup_time_ms: 0.,
        }
    }
}

/// Termination status of a solve, with the native integer codes.
#[repr(i32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatusCode {
    /// terminated with a solution
    Solved = 1,
    /// terminated with a solution of reduced accuracy
    SolvedInaccurate = 2,
    /// solver has not terminated
    Unfinished = 0,
    /// problem is unbounded; the solution is a certificate
    Unbounded = -1,
    /// problem is infeasible; the solution is a certificate
    Infeasible = -2,
    /// neither a solution nor a certificate could be found
    Indeterminate = -3,
    /// solver failed
    Failed = -4,
    /// interrupted by a signal
    Interrupted = -5,
    /// unbounded, reduced accuracy
    UnboundedInaccurate = -6,
    /// infeasible, reduced accuracy
    InfeasibleInaccurate = -7,
}

impl StatusCode {
    pub fn from_code(code: i64) -> Option<Self> {
        FromPrimitive::from_i64(code)
    }

    pub fn code(&self) -> i64 {
        self.to_i64().unwrap_or(-4)
    }

    /// human readable status text
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Solved => "Solved",
            StatusCode::SolvedInaccurate => "Solved/Inaccurate",
            StatusCode::Unfinished => "Unfinished",
            StatusCode::Unbounded => "Unbounded",
            StatusCode::Infeasible => "Infeasible",
            StatusCode::Indeterminate => "Indeterminate",
            StatusCode::Failed => "Failure",
            StatusCode::Interrupted => "Interrupted",
            StatusCode::UnboundedInaccurate => "Unbounded/Inaccurate",
            StatusCode::InfeasibleInaccurate => "Infeasible/Inaccurate",
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, StatusCode::Solved | StatusCode::SolvedInaccurate)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------
// solver interface
// ---------------------------------

/// A native conic solver.
///
/// Implementations receive fully validated and converted inputs and
/// return freshly allocated solution buffers.  The warm start is only
/// meaningful when `options.warm_start` is set.
pub trait ConeSolver {
    /// short name used in error messages
    fn name(&self) -> &'static str;

    fn solve(
        &mut self,
        problem: &NativeProblem<'_>,
        cone: &ConeSpec,
        options: &SolverOptions,
        warm: &WarmStartView<'_>,
    ) -> Result<(NativeSolution, NativeInfo), BackendError>;
}

impl<S: ConeSolver + ?Sized> ConeSolver for &mut S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(
        &mut self,
        problem: &NativeProblem<'_>,
        cone: &ConeSpec,
        options: &SolverOptions,
        warm: &WarmStartView<'_>,
    ) -> Result<(NativeSolution, NativeInfo), BackendError> {
        (**self).solve(problem, cone, options, warm)
    }
}

#[test]
fn test_status_codes() {
    for code in -7..=2 {
        let status = StatusCode::from_code(code).unwrap();
        assert_eq!(status.code(), code);
    }
    assert!(StatusCode::from_code(3).is_none());
    assert!(StatusCode::from_code(-8).is_none());
    assert_eq!(StatusCode::Solved.code(), 1);
    assert_eq!(StatusCode::SolvedInaccurate.to_string(), "Solved/Inaccurate");
    assert!(StatusCode::SolvedInaccurate.is_solved());
    assert!(!StatusCode::Infeasible.is_solved());
}
