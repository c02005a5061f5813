#![allow(non_snake_case)]

use crate::bridge::{
    BackendError, ConeSolver, ConeSpec, NativeIndex, NativeInfo, NativeProblem, NativeSolution,
    SolverOptions, StatusCode, WarmStartView,
};
use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettings, DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus,
    SupportedConeT,
};
use std::time::Instant;

/// Native backend running the Clarabel interior point solver.
///
/// Supports the zero, nonnegative, second-order and primal exponential
/// cones.  Semidefinite and dual exponential cones are rejected.  Options
/// without a Clarabel counterpart (`scale`, `cg_rate`, `alpha`, `rho_x`)
/// are ignored, and Clarabel does not accept initial guesses, so warm
/// starts are ignored too.
#[derive(Debug, Default, Clone)]
pub struct ClarabelSolver {
    /// settings overriding the ones derived from the options
    pub settings: Option<DefaultSettings<f64>>,
}

impl ClarabelSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DefaultSettings<f64>) -> Self {
        Self {
            settings: Some(settings),
        }
    }
}

impl ConeSolver for ClarabelSolver {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn solve(
        &mut self,
        problem: &NativeProblem<'_>,
        cone: &ConeSpec,
        options: &SolverOptions,
        warm: &WarmStartView<'_>,
    ) -> Result<(NativeSolution, NativeInfo), BackendError> {
        let (m, n) = (problem.m, problem.n);

        check_unsupported(cone, self.name())?;
        match cone.dim() {
            Some(dim) if dim == m => {}
            Some(dim) => return Err(BackendError::ConeDimension { cones: dim, m }),
            None => return Err(BackendError::ConeOverflow { m }),
        }
        let cones = to_clarabel_cones(cone);

        let A = to_clarabel_csc(problem)?;
        let P = CscMatrix {
            m: n,
            n,
            colptr: vec![0; n + 1],
            rowval: vec![],
            nzval: vec![],
        };

        let settings = match &self.settings {
            Some(s) => s.clone(),
            None => to_clarabel_settings(options)?,
        };
        if options.warm_start {
            log::debug!(
                "clarabel backend ignores the warm start (|x| = {}, |y| = {}, |s| = {})",
                warm.x.len(),
                warm.y.len(),
                warm.s.len()
            );
        }

        let start = Instant::now();
        let mut solver =
            DefaultSolver::new(&P, problem.c, &A, problem.b, &cones, settings).into_solver()?;
        let setup_time_ms = start.elapsed().as_secs_f64() * 1e3;

        let start = Instant::now();
        solver.solve();
        let solve_time_ms = start.elapsed().as_secs_f64() * 1e3;

        let info = NativeInfo {
            status: to_status_code(solver.solution.status),
            iter: solver.info.iterations as usize,
            pobj: solver.info.cost_primal,
            dobj: solver.info.cost_dual,
            res_pri: solver.info.res_primal,
            res_dual: solver.info.res_dual,
            rel_gap: solver.info.gap_rel,
            solve_time_ms,
            setup_time_ms,
        };

        // Clarabel's z is the dual variable on Ax + s = b, s in K
        let solution = NativeSolution {
            x: std::mem::take(&mut solver.solution.x),
            y: std::mem::take(&mut solver.solution.z),
            s: std::mem::take(&mut solver.solution.s),
        };
        Ok((solution, info))
    }
}

// DefaultSolver::new returns the solver itself in some clarabel
// releases and a Result in others.
trait IntoSolver {
    fn into_solver(self) -> Result<DefaultSolver<f64>, BackendError>;
}

impl IntoSolver for DefaultSolver<f64> {
    fn into_solver(self) -> Result<DefaultSolver<f64>, BackendError> {
        Ok(self)
    }
}

impl<E: std::fmt::Display> IntoSolver for Result<DefaultSolver<f64>, E> {
    fn into_solver(self) -> Result<DefaultSolver<f64>, BackendError> {
        self.map_err(|e| BackendError::Other(e.to_string()))
    }
}

fn check_unsupported(cone: &ConeSpec, backend: &'static str) -> Result<(), BackendError> {
    if !cone.s.is_empty() {
        return Err(BackendError::UnsupportedCone { field: "s", backend });
    }
    if cone.ed > 0 {
        return Err(BackendError::UnsupportedCone { field: "ed", backend });
    }
    Ok(())
}

// the cone sizes must already be checked against m
fn to_clarabel_cones(cone: &ConeSpec) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();
    if cone.f > 0 {
        cones.push(SupportedConeT::ZeroConeT(cone.f));
    }
    if cone.l > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(cone.l));
    }
    for &q in cone.q.iter().filter(|&&q| q > 0) {
        cones.push(SupportedConeT::SecondOrderConeT(q));
    }
    for _ in 0..cone.ep {
        cones.push(SupportedConeT::ExponentialConeT());
    }
    cones
}

fn to_clarabel_csc(problem: &NativeProblem<'_>) -> Result<CscMatrix<f64>, BackendError> {
    let a = &problem.a;
    let to_usize = |v: &[NativeIndex], what: &str| -> Result<Vec<usize>, BackendError> {
        v.iter()
            .map(|&i| usize::try_from(i))
            .collect::<Result<Vec<usize>, _>>()
            .map_err(|_| BackendError::MalformedMatrix(format!("negative entry in {}", what)))
    };

    // built directly rather than with CscMatrix::new, which panics on bad lengths
    let A = CscMatrix {
        m: problem.m,
        n: problem.n,
        colptr: to_usize(a.col_pointer, "Ap")?,
        rowval: to_usize(a.row_index, "Ai")?,
        nzval: a.values.to_vec(),
    };
    A.check_format()
        .map_err(|e| BackendError::MalformedMatrix(e.to_string()))?;
    Ok(A)
}

fn to_clarabel_settings(options: &SolverOptions) -> Result<DefaultSettings<f64>, BackendError> {
    let max_iter = u32::try_from(options.max_iters).unwrap_or(u32::MAX);
    DefaultSettingsBuilder::default()
        .verbose(options.verbose > 0)
        .max_iter(max_iter)
        .tol_gap_abs(options.eps)
        .tol_gap_rel(options.eps)
        .tol_feas(options.eps)
        .equilibrate_enable(options.normalize > 0)
        .build()
        .map_err(|e| BackendError::Settings(e.to_string()))
}

#[allow(unreachable_patterns)]
fn to_status_code(status: SolverStatus) -> StatusCode {
    match status {
        SolverStatus::Solved => StatusCode::Solved,
        SolverStatus::AlmostSolved => StatusCode::SolvedInaccurate,
        SolverStatus::PrimalInfeasible => StatusCode::Infeasible,
        SolverStatus::DualInfeasible => StatusCode::Unbounded,
        SolverStatus::AlmostPrimalInfeasible => StatusCode::InfeasibleInaccurate,
        SolverStatus::AlmostDualInfeasible => StatusCode::UnboundedInaccurate,
        SolverStatus::MaxIterations | SolverStatus::MaxTime => StatusCode::Indeterminate,
        SolverStatus::Unsolved => StatusCode::Unfinished,
        _ => StatusCode::Failed,
    }
}
