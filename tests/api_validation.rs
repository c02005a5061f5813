#![allow(non_snake_case)]
#![allow(clippy::type_complexity)]
use conebridge::{bridge::*, host::*};

// a collection of tests to ensure that arguments of incompatible
// shape or type are rejected before reaching the solver, and that
// nothing built on the way is leaked

struct Unreachable;

impl ConeSolver for Unreachable {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn solve(
        &mut self,
        _problem: &NativeProblem<'_>,
        _cone: &ConeSpec,
        _options: &SolverOptions,
        _warm: &WarmStartView<'_>,
    ) -> Result<(NativeSolution, NativeInfo), BackendError> {
        panic!("solver called with invalid arguments");
    }
}

fn api_check_data() -> SolveArgs {
    // A = [-1 0; 0 -1; 1 1]
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

fn check_fails(args: &SolveArgs, kind: ErrorKind, arg: &str) -> ReleaseReport {
    let (result, report) = csolve_with_report(args, &mut Unreachable);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), kind, "{}", err);
    assert_eq!(err.argument(), Some(arg), "{}", err);
    report
}

#[test]
fn api_check_negative_m() {
    let mut args = api_check_data();
    args.shape = (-1, 2);
    let (result, report) = csolve_with_report(&args, &mut Unreachable);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(err.to_string().contains('m'));
    // nothing was converted
    assert!(report.is_empty());
}

#[test]
fn api_check_negative_n() {
    let mut args = api_check_data();
    args.shape = (3, -2);
    check_fails(&args, ErrorKind::Shape, "n");
}

#[test]
fn api_check_bad_c_length() {
    let mut args = api_check_data();
    args.c = HostArray::from_vec(vec![1., 1., 1.]);
    let report = check_fails(&args, ErrorKind::Shape, "c");
    // Ax, Ai and Ap were converted before c was rejected
    assert_eq!(report.owned + report.views, 3);
    assert_eq!(report.cone_arrays, 0);
}

#[test]
fn api_check_bad_b_length() {
    let mut args = api_check_data();
    args.b = HostArray::from_vec(vec![1., 1.]);
    let report = check_fails(&args, ErrorKind::Shape, "b");
    // c was converted as well
    assert_eq!(report.owned + report.views, 4);
}

#[test]
fn api_check_array_types() {
    let mut args = api_check_data();
    args.ax = HostArray::from_vec(vec![-1i32, 1, -1, 1]);
    check_fails(&args, ErrorKind::Type, "Ax");

    let mut args = api_check_data();
    args.ai = HostArray::from_vec(vec![0., 2., 1., 2.]);
    check_fails(&args, ErrorKind::Type, "Ai");

    let mut args = api_check_data();
    args.ap = HostArray::from_shape_vec(vec![3, 1], vec![0i64, 2, 4]).unwrap();
    check_fails(&args, ErrorKind::Type, "Ap");

    let mut args = api_check_data();
    args.b = HostArray::from_vec(vec![true, false, true]);
    check_fails(&args, ErrorKind::Type, "b");
}

#[test]
fn api_check_index_overflow() {
    // an index that does not fit the native index type
    let mut args = api_check_data();
    args.ai = HostArray::from_vec(vec![0u64, 2, 1, u64::MAX]);
    check_fails(&args, ErrorKind::Type, "Ai");
}

#[test]
fn api_check_check_order() {
    // several arguments are bad; the first in check order is reported
    let mut args = api_check_data();
    args.b = HostArray::from_vec(vec![1.]);
    args.c = HostArray::from_vec(vec![1.]);
    args.ap = HostArray::from_vec(vec![0., 2., 4.]);
    check_fails(&args, ErrorKind::Type, "Ap");

    args.ap = HostArray::from_vec(vec![0i64, 2, 4]);
    check_fails(&args, ErrorKind::Shape, "c");
}

#[test]
fn api_check_bad_cone() {
    let mut args = api_check_data();
    args.cone = HostDict::new().with("l", 1).with("q", vec![3, -1]);
    let report = check_fails(&args, ErrorKind::Parse, "q");
    // every problem buffer was released along with the cone
    assert_eq!(report.owned + report.views, 5);
    assert_eq!(report.cone_arrays, 0);

    let mut args = api_check_data();
    args.cone = HostDict::new().with("q", vec![3]).with("ep", 1.5);
    let report = check_fails(&args, ErrorKind::Parse, "ep");
    assert_eq!(report.cone_arrays, 1);

    // tuples and other sequence types are not accepted for q and s
    let mut args = api_check_data();
    args.cone = HostDict::new().with("s", Value::Other("tuple".into()));
    check_fails(&args, ErrorKind::Parse, "s");
}

#[test]
fn api_check_bad_opts() {
    let args = api_check_data().with_opts(HostDict::new().with("MAX_ITERS", 100.0));
    let (result, _) = csolve_with_report(&args, &mut Unreachable);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.argument(), Some("MAX_ITERS"));
    assert!(err.to_string().contains("opts"));

    let args = api_check_data().with_opts(HostDict::new().with("EPS", -1e-4));
    check_fails(&args, ErrorKind::Parse, "EPS");
}
