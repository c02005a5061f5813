#![allow(non_snake_case)]

use super::convert_py::{to_host_array, to_host_dict};
use super::to_py_err;
use crate::backends::DefaultBackend;
use crate::bridge::{csolve, BridgeError, SolveArgs, SolveOutput};
use numpy::PyArray1;
use pyo3::prelude::*;
use pyo3::types::PyDict;

fn output_to_dict<'py>(py: Python<'py>, out: SolveOutput) -> PyResult<Bound<'py, PyDict>> {
    let info = PyDict::new(py);
    info.set_item("statusVal", out.info.status_val)?;
    info.set_item("iter", out.info.iter)?;
    info.set_item("pobj", out.info.pobj)?;
    info.set_item("dobj", out.info.dobj)?;
    info.set_item("resPri", out.info.res_pri)?;
    info.set_item("resDual", out.info.res_dual)?;
    info.set_item("relGap", out.info.rel_gap)?;
    info.set_item("solveTime", out.info.solve_time)?;
    info.set_item("setupTime", out.info.setup_time)?;
    info.set_item("status", out.info.status)?;

    // the solution vectors are handed to numpy without copying
    let result = PyDict::new(py);
    result.set_item("x", PyArray1::from_vec(py, out.x))?;
    result.set_item("y", PyArray1::from_vec(py, out.y))?;
    result.set_item("s", PyArray1::from_vec(py, out.s))?;
    result.set_item("info", info)?;
    Ok(result)
}

/// Solve a conic problem
///
///     minimize c'x  subject to  Ax + s = b, s in K
///
/// with A given in CSC form by (Ax, Ai, Ap) and K described by `cone`.
#[pyfunction(name = "csolve")]
#[pyo3(signature = (shape, Ax, Ai, Ap, b, c, cone, opts = None, warm = None))]
#[allow(clippy::too_many_arguments)]
fn csolve_py<'py>(
    py: Python<'py>,
    shape: (i64, i64),
    Ax: &Bound<'py, PyAny>,
    Ai: &Bound<'py, PyAny>,
    Ap: &Bound<'py, PyAny>,
    b: &Bound<'py, PyAny>,
    c: &Bound<'py, PyAny>,
    cone: &Bound<'py, PyDict>,
    opts: Option<&Bound<'py, PyDict>>,
    warm: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyDict>> {
    // dimensions are reported before any array argument
    for (arg, value) in [("m", shape.0), ("n", shape.1)] {
        if value < 0 {
            return Err(to_py_err(BridgeError::NegativeDimension { arg, value }));
        }
    }

    let mut args = SolveArgs::new(
        shape,
        to_host_array(Ax, "Ax")?,
        to_host_array(Ai, "Ai")?,
        to_host_array(Ap, "Ap")?,
        to_host_array(b, "b")?,
        to_host_array(c, "c")?,
        to_host_dict(cone)?,
    );
    args.opts = opts.map(to_host_dict).transpose()?;
    args.warm = warm.map(to_host_dict).transpose()?;

    let mut solver = DefaultBackend::default();
    let out = py
        .allow_threads(|| csolve(&args, &mut solver))
        .map_err(to_py_err)?;

    output_to_dict(py, out)
}

// Python module and registry
#[pymodule]
fn _conebridge(_py: Python, m: &Bound<PyModule>) -> PyResult<()> {
    //module version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_function(wrap_pyfunction!(csolve_py, m)?)?;

    Ok(())
}
