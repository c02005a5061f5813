use conebridge::{bridge::*, host::*};

// A backend that records what it was given and returns a fixed
// solution, so the warm start path can be checked without a solver.

#[derive(Default)]
struct Recorder {
    warm_start: Option<bool>,
    x: Vec<f64>,
    y: Vec<f64>,
    s: Vec<f64>,
    calls: usize,
}

impl ConeSolver for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn solve(
        &mut self,
        problem: &NativeProblem<'_>,
        _cone: &ConeSpec,
        options: &SolverOptions,
        warm: &WarmStartView<'_>,
    ) -> Result<(NativeSolution, NativeInfo), BackendError> {
        self.calls += 1;
        self.warm_start = Some(options.warm_start);
        self.x = warm.x.to_vec();
        self.y = warm.y.to_vec();
        self.s = warm.s.to_vec();

        let solution = NativeSolution {
            x: vec![1.; problem.n],
            y: vec![0.; problem.m],
            s: vec![0.; problem.m],
        };
        let info = NativeInfo {
            status: StatusCode::Solved,
            iter: 7,
            pobj: 2.,
            dobj: 2.,
            solve_time_ms: 1500.,
            ..NativeInfo::default()
        };
        Ok((solution, info))
    }
}

fn warm_start_data() -> SolveArgs {
    SolveArgs::new(
        (3, 2),
        HostArray::from_vec(vec![-1., 1., -1., 1.]),
        HostArray::from_vec(vec![0i64, 2, 1, 2]),
        HostArray::from_vec(vec![0i64, 2, 4]),
        HostArray::from_vec(vec![-1., -1., 4.]),
        HostArray::from_vec(vec![1., 1.]),
        HostDict::new().with("l", 3),
    )
}

#[test]
fn test_no_warm_start() {
    let args = warm_start_data();
    let mut solver = Recorder::default();
    let out = csolve(&args, &mut solver).unwrap();

    assert_eq!(solver.calls, 1);
    assert_eq!(solver.warm_start, Some(false));
    assert_eq!(solver.x, vec![0.; 2]);
    assert_eq!(solver.y, vec![0.; 3]);
    assert_eq!(solver.s, vec![0.; 3]);

    assert_eq!(out.info.status_val, 1);
    assert_eq!(out.info.solve_time, 1.5);
    assert_eq!(out.x.len(), 2);
    assert_eq!(out.y.len(), 3);
}

#[test]
fn test_warm_start_all_fields() {
    let warm = HostDict::new()
        .with("x", HostArray::from_vec(vec![1., 2.]))
        .with("y", HostArray::from_vec(vec![0.1f32, 0.2, 0.3]))
        .with("s", vec![1.0, 1.0, 2.0]);
    let args = warm_start_data().with_warm(warm);
    let mut solver = Recorder::default();
    csolve(&args, &mut solver).unwrap();

    assert_eq!(solver.warm_start, Some(true));
    assert_eq!(solver.x, vec![1., 2.]);
    assert_eq!(solver.y, vec![0.1f32 as f64, 0.2f32 as f64, 0.3f32 as f64]);
    assert_eq!(solver.s, vec![1., 1., 2.]);
}

#[test]
fn test_warm_start_wrong_length_is_ignored() {
    // x has length 3 but n = 2: treated as absent, the call still succeeds
    let warm = HostDict::new().with("x", vec![1.0, 2.0, 3.0]);
    let args = warm_start_data().with_warm(warm);
    let mut solver = Recorder::default();
    let out = csolve(&args, &mut solver).unwrap();

    assert_eq!(solver.x, vec![0.; 2]);
    assert_eq!(solver.warm_start, Some(false));
    assert!(out.info.is_solved());
}

#[test]
fn test_warm_start_partial() {
    // a bad x does not prevent a good s from being used
    let warm = HostDict::new()
        .with("x", HostArray::from_vec(vec![1i64, 2]))
        .with("s", HostArray::from_vec(vec![3., 3., 3.]));
    let args = warm_start_data().with_warm(warm);
    let mut solver = Recorder::default();
    csolve(&args, &mut solver).unwrap();

    assert_eq!(solver.warm_start, Some(true));
    assert_eq!(solver.x, vec![0.; 2]);
    assert_eq!(solver.y, vec![0.; 3]);
    assert_eq!(solver.s, vec![3.; 3]);
}

#[test]
fn test_warm_start_strided() {
    // every other element of a longer buffer
    let x = HostArray::from_strided_vec(vec![5., -1., 6., -1.], vec![2], vec![2], 0).unwrap();
    let args = warm_start_data().with_warm(HostDict::new().with("x", x));
    let mut solver = Recorder::default();
    let (result, report) = csolve_with_report(&args, &mut solver);
    result.unwrap();

    assert_eq!(solver.x, vec![5., 6.]);
    // the gathered x and zero filled y, s are owned; nothing remains afterwards
    assert!(report.owned >= 3);
}
