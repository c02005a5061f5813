use super::native::ConeSolver;
use super::result::SolveOutput;
use super::types::NativeTypes;
use super::workspace::{ReleaseReport, Workspace};
use super::BridgeError;
use crate::host::{HostArray, HostDict};

/// Arguments of a solve, as received from the host.
///
/// `A` is given in compressed sparse column form by `Ax` (values), `Ai`
/// (row indices) and `Ap` (column pointers).  `cone` describes the cone
/// `K`, `opts` holds solver options and `warm` optional initial guesses
/// for `x`, `y` and `s`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveArgs {
    /// `(m, n)`
    pub shape: (i64, i64),
    pub ax: HostArray,
    pub ai: HostArray,
    pub ap: HostArray,
    pub b: HostArray,
    pub c: HostArray,
    pub cone: HostDict,
    pub opts: Option<HostDict>,
    pub warm: Option<HostDict>,
}

impl SolveArgs {
    pub fn new(
        shape: (i64, i64),
        ax: HostArray,
        ai: HostArray,
        ap: HostArray,
        b: HostArray,
        c: HostArray,
        cone: HostDict,
    ) -> Self {
        Self {
            shape,
            ax,
            ai,
            ap,
            b,
            c,
            cone,
            opts: None,
            warm: None,
        }
    }

    pub fn with_opts(mut self, opts: HostDict) -> Self {
        self.opts = Some(opts);
        self
    }

    pub fn with_warm(mut self, warm: HostDict) -> Self {
        self.warm = Some(warm);
        self
    }
}

/// Solve the conic problem described by `args` with `solver`.
///
/// The arguments are validated in the order `m, n, Ax, Ai, Ap, c, b`, then
/// the cone (`f, l, q, s, ep, ed`) and the options are parsed and the warm
/// start is loaded.  Any failure aborts the call, except a malformed warm
/// start field, which is ignored with a warning.  Every intermediate
/// buffer is released before returning, on success and on failure.
///
/// # Preconditions
///
/// The sparse matrix is __not__ checked for consistency.  The caller must
/// ensure that `Ap` has `n + 1` non-decreasing entries starting at 0, that
/// `Ai` and `Ax` both have `Ap[n]` entries, and that every row index lies
/// in `[0, m)`.  Violating this is forwarded to the solver unchanged.
pub fn csolve<S: ConeSolver + ?Sized>(
    args: &SolveArgs,
    solver: &mut S,
) -> Result<SolveOutput, BridgeError> {
    csolve_with_report(args, solver).0
}

/// As [`csolve`], also returning what was released at the end of the call.
pub fn csolve_with_report<S: ConeSolver + ?Sized>(
    args: &SolveArgs,
    solver: &mut S,
) -> (Result<SolveOutput, BridgeError>, ReleaseReport) {
    let mut ws = Workspace::new(NativeTypes::get());
    let result = run(&mut ws, args, solver);
    let report = ws.release_all();
    if let Err(e) = &result {
        log::debug!("solve with {} backend failed: {}", solver.name(), e);
    }
    (result, report)
}

fn run<'a, S: ConeSolver + ?Sized>(
    ws: &mut Workspace<'a>,
    args: &'a SolveArgs,
    solver: &mut S,
) -> Result<SolveOutput, BridgeError> {
    ws.assemble(args.shape, &args.ax, &args.ai, &args.ap, &args.b, &args.c)?;
    ws.parse_cone(&args.cone)?;
    ws.parse_opts(args.opts.as_ref())?;
    ws.load_warm_start(args.warm.as_ref())?;
    ws.solve(solver)
}

/// Solve with the default backend.
#[cfg(feature = "clarabel")]
pub fn solve_default(args: &SolveArgs) -> Result<SolveOutput, BridgeError> {
    let mut solver = crate::backends::DefaultBackend::default();
    csolve(args, &mut solver)
}
