use super::coerce::Coerced;
use super::cones::ConeSpec;
use super::native::ConeSolver;
use super::problem::Problem;
use super::result::{package, SolveOutput};
use super::settings::{parse_opts, SolverOptions};
use super::types::NativeTypes;
use super::warmstart::WarmStart;
use super::{BackendError, BridgeError};
use crate::host::{HostArray, HostDict};

/// Counts of what a call to [`Workspace::release_all`] freed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseReport {
    /// buffers allocated by the bridge and freed
    pub owned: usize,
    /// borrowed views of caller arrays that were dropped
    pub views: usize,
    /// cone block size arrays (`q`, `s`) freed
    pub cone_arrays: usize,
}

impl ReleaseReport {
    pub fn is_empty(&self) -> bool {
        *self == ReleaseReport::default()
    }

    fn count<T>(&mut self, buf: Option<Coerced<'_, T>>) {
        match buf {
            Some(Coerced::Owned(_)) => self.owned += 1,
            Some(Coerced::View(_)) => self.views += 1,
            None => {}
        }
    }
}

/// Per-call state of a solve.
///
/// Holds everything built between validating the arguments and handing
/// the result back: the assembled problem, the cone, the options and the
/// warm start.  Stages fill the workspace in order and may stop part way;
/// [`release_all`](Workspace::release_all) frees whatever was built,
/// and runs again on drop.
#[derive(Debug)]
pub struct Workspace<'a> {
    types: NativeTypes,
    problem: Problem<'a>,
    cone: Option<ConeSpec>,
    options: Option<SolverOptions>,
    warm: WarmStart<'a>,
}

impl<'a> Workspace<'a> {
    pub fn new(types: &NativeTypes) -> Self {
        Self {
            types: *types,
            problem: Problem::default(),
            cone: None,
            options: None,
            warm: WarmStart::default(),
        }
    }

    pub fn problem(&self) -> &Problem<'a> {
        &self.problem
    }

    pub fn cone(&self) -> Option<&ConeSpec> {
        self.cone.as_ref()
    }

    pub fn options(&self) -> Option<&SolverOptions> {
        self.options.as_ref()
    }

    pub fn warm_start(&self) -> &WarmStart<'a> {
        &self.warm
    }

    /// validate and convert `(m, n, Ax, Ai, Ap, b, c)`
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        &mut self,
        shape: (i64, i64),
        ax: &'a HostArray,
        ai: &'a HostArray,
        ap: &'a HostArray,
        b: &'a HostArray,
        c: &'a HostArray,
    ) -> Result<(), BridgeError> {
        self.problem.fill(&self.types, shape, ax, ai, ap, b, c)
    }

    pub fn parse_cone(&mut self, mapping: &HostDict) -> Result<(), BridgeError> {
        let cone = self.cone.insert(ConeSpec::default());
        cone.fill(mapping).map_err(|e| e.within("cone"))
    }

    pub fn parse_opts(&mut self, mapping: Option<&HostDict>) -> Result<(), BridgeError> {
        let opts = parse_opts(mapping).map_err(|e| e.within("opts"))?;
        self.options = Some(opts);
        Ok(())
    }

    /// Load the warm start and flag the options accordingly.  Call after
    /// assembling and parsing the options.
    pub fn load_warm_start(&mut self, mapping: Option<&'a HostDict>) -> Result<(), BridgeError> {
        let (n, m) = (self.problem.n, self.problem.m);
        self.warm.fill(&self.types, mapping, n, m)?;
        if let Some(opts) = self.options.as_mut() {
            opts.warm_start = self.warm.is_warm();
        }
        Ok(())
    }

    /// Run `solver` on the workspace contents and package the result.
    pub fn solve<S: ConeSolver + ?Sized>(&self, solver: &mut S) -> Result<SolveOutput, BridgeError> {
        let incomplete = || BackendError::Other("solve called on an incomplete workspace".into());

        let problem = self.problem.native().ok_or_else(incomplete)?;
        let cone = self.cone.as_ref().ok_or_else(incomplete)?;
        let options = self.options.as_ref().ok_or_else(incomplete)?;
        let warm = self.warm.view().ok_or_else(incomplete)?;

        let (solution, info) = solver.solve(&problem, cone, options, &warm)?;
        let output = package(solution, &info, problem.m, problem.n)?;
        Ok(output)
    }

    /// Release every buffer and structure built so far.
    ///
    /// Safe on a partially filled workspace.  A second call finds nothing
    /// left and returns an empty report.
    pub fn release_all(&mut self) -> ReleaseReport {
        let mut report = ReleaseReport::default();

        let problem = std::mem::take(&mut self.problem);
        report.count(problem.ax);
        report.count(problem.ai);
        report.count(problem.ap);
        report.count(problem.b);
        report.count(problem.c);

        let warm = std::mem::take(&mut self.warm);
        report.count(warm.x);
        report.count(warm.y);
        report.count(warm.s);

        if let Some(cone) = self.cone.take() {
            report.cone_arrays += [&cone.q, &cone.s].iter().filter(|v| !v.is_empty()).count();
        }
        self.options = None;

        if !report.is_empty() {
            log::debug!(
                "released {} owned buffers, {} views, {} cone arrays",
                report.owned,
                report.views,
                report.cone_arrays
            );
        }
        report
    }
}

impl Drop for Workspace<'_> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::native::{NativeInfo, NativeProblem, NativeSolution, StatusCode, WarmStartView};
    use crate::host::Value;

    struct Args {
        ax: HostArray,
        ai: HostArray,
        ap: HostArray,
        b: HostArray,
        c: HostArray,
    }

    fn args() -> Args {
        Args {
            ax: HostArray::from_vec(vec![1., 1.]),
            ai: HostArray::from_vec(vec![0i64, 1]),
            ap: HostArray::from_vec(vec![0i64, 1, 2]),
            b: HostArray::from_vec(vec![1., 1.]),
            c: HostArray::from_vec(vec![1., 1.]),
        }
    }

    struct Echo;

    impl ConeSolver for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn solve(
            &mut self,
            problem: &NativeProblem<'_>,
            _cone: &ConeSpec,
            options: &SolverOptions,
            warm: &WarmStartView<'_>,
        ) -> Result<(NativeSolution, NativeInfo), BackendError> {
            assert!(options.warm_start);
            let sol = NativeSolution {
                x: warm.x.to_vec(),
                y: problem.b.to_vec(),
                s: vec![0.; problem.m],
            };
            let info = NativeInfo {
                status: StatusCode::Solved,
                ..NativeInfo::default()
            };
            Ok((sol, info))
        }
    }

    #[test]
    fn test_stages_and_release() {
        let a = args();
        let cone = HostDict::new().with("l", 2).with("q", Vec::<Value>::new());
        let warm = HostDict::new().with("x", vec![3., 4.]);

        let mut ws = Workspace::new(NativeTypes::get());
        ws.assemble((2, 2), &a.ax, &a.ai, &a.ap, &a.b, &a.c).unwrap();
        ws.parse_cone(&cone).unwrap();
        ws.parse_opts(None).unwrap();
        ws.load_warm_start(Some(&warm)).unwrap();
        assert!(ws.options().unwrap().warm_start);

        let out = ws.solve(&mut Echo).unwrap();
        assert_eq!(out.x, vec![3., 4.]);
        assert_eq!(out.y, vec![1., 1.]);

        let report = ws.release_all();
        // Ax, b and c are borrowed; the list x and zero y, s are owned
        assert_eq!(report.views + report.owned, 8);
        assert!(report.views >= 3);
        assert_eq!(report.cone_arrays, 0);

        // second release is a no-op
        assert!(ws.release_all().is_empty());
        assert!(ws.problem().native().is_none());
        assert!(ws.cone().is_none());
    }

    #[test]
    fn test_release_partial() {
        let mut a = args();
        a.b = HostArray::from_vec(vec![1.]);
        let mut ws = Workspace::new(NativeTypes::get());
        assert!(ws.assemble((2, 2), &a.ax, &a.ai, &a.ap, &a.b, &a.c).is_err());
        let report = ws.release_all();
        // Ax, Ai, Ap and c were converted before b failed
        assert_eq!(report.owned + report.views, 4);
        assert_eq!(ws.release_all(), ReleaseReport::default());
    }

    #[test]
    fn test_release_cone_arrays() {
        let mut ws = Workspace::new(NativeTypes::get());
        let cone = HostDict::new().with("q", vec![2]).with("s", vec![1, -1]);
        let err = ws.parse_cone(&cone).unwrap_err();
        assert_eq!(err.argument(), Some("s"));
        let report = ws.release_all();
        assert_eq!(report.cone_arrays, 1);
        assert_eq!(report.owned, 0);
    }

    #[test]
    fn test_solve_incomplete() {
        let ws = Workspace::new(NativeTypes::get());
        let err = ws.solve(&mut Echo).unwrap_err();
        assert_eq!(err.kind(), crate::bridge::ErrorKind::Backend);
    }
}
