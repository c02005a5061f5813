#![allow(non_snake_case)]

use conebridge::backends::ClarabelSolver;
use conebridge::bridge::*;
use conebridge::host::*;

fn problem_data() -> SolveArgs {
    //a 2-d box constraint, separated into 4 inequalities.
    //A = [I; -I]
    let Ax = HostArray::from_vec(vec![1., -1., 1., -1.]);
    let Ai = HostArray::from_vec(vec![0i64, 2, 1, 3]);
    let Ap = HostArray::from_vec(vec![0i64, 2, 4]);

    let b = HostArray::from_vec(vec![1.; 4]);
    let c = HostArray::from_vec(vec![1., -1.]);

    let cone = HostDict::new().with("l", 4);

    SolveArgs::new((4, 2), Ax, Ai, Ap, b, c, cone)
}

fn main() {
    let opts = HostDict::new()
        .with("MAX_ITERS", 50)
        .with("NORMALIZE", 1)
        .with("VERBOSE", 1);

    let args = problem_data().with_opts(opts);

    let mut solver = ClarabelSolver::new();

    match csolve(&args, &mut solver) {
        Ok(out) => {
            println!("status: {} ({})", out.info.status, out.info.status_val);
            println!("x = {:?}", out.x);
        }
        Err(e) => eprintln!("solve failed: {}", e),
    }
}
