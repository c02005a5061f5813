//! Python interface.
//!
//! Compiling the crate with `--features python` builds an extension
//! module `_conebridge` using [PyO3](https://pyo3.rs/).  The module
//! exposes a single function,
//!
//! ```text
//! csolve(shape, Ax, Ai, Ap, b, c, cone, opts=None, warm=None) -> dict
//! ```
//!
//! taking numpy arrays and dicts and returning a dict with numpy arrays
//! `x`, `y`, `s` and an `info` dict.  This module has no public Rust API.

mod convert_py;
mod module_py;

use crate::bridge::{BridgeError, ErrorKind};
use pyo3::exceptions::{PyMemoryError, PyValueError};
use pyo3::PyErr;

pub(crate) fn to_py_err(e: BridgeError) -> PyErr {
    match e.kind() {
        ErrorKind::Allocation => PyMemoryError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}
