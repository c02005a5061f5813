//!  __conebridge__ is the boundary layer between array based host
//! environments and native conic solvers.  It solves problems of the form
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & c^T x\\\\\[2ex\]
//!  \text{subject to} & Ax + s = b \\\\\[1ex\]
//!         & s \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! with decision variables
//! $x \in \mathbb{R}^n$,
//! $s \in \mathbb{R}^m$
//! and data $c \in \mathbb{R}^n$,
//! $A \in \mathbb{R}^{m \times n}$ in compressed sparse column form and
//! $b \in \mathbb{R}^m$.
//! The convex set $\mathcal{K}$ is a product of zero, nonnegative,
//! second-order, semidefinite and exponential cones.
//!
//! Inputs arrive as loosely typed [host values](crate::host): arrays of any
//! element type and layout, and mappings of integers, floats and lists.
//! The [`bridge`] validates them, converts them to the native solver's
//! layout (borrowing where no conversion is needed), parses the cone,
//! option and warm start mappings, calls a [`ConeSolver`](bridge::ConeSolver)
//! and packages the result.  All intermediate buffers are released on every
//! exit path.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "clarabel")] {
//! use conebridge::bridge::{solve_default, SolveArgs};
//! use conebridge::host::{HostArray, HostDict};
//!
//! // minimize x1 + x2 subject to x1 >= 1, x2 >= 1, x1 + x2 <= 4
//! let args = SolveArgs::new(
//!     (3, 2),
//!     HostArray::from_vec(vec![-1., 1., -1., 1.]),
//!     HostArray::from_vec(vec![0i64, 2, 1, 2]),
//!     HostArray::from_vec(vec![0i64, 2, 4]),
//!     HostArray::from_vec(vec![-1., -1., 4.]),
//!     HostArray::from_vec(vec![1., 1.]),
//!     HostDict::new().with("l", 3),
//! );
//! let out = solve_default(&args).unwrap();
//! println!("{} {:?}", out.info.status, out.x);
//! # }
//! ```
//!
//! # Features
//!
//! * `clarabel` (default): the [`ClarabelSolver`](backends::ClarabelSolver) backend.
//! * `serde` (default): JSON reading and writing of problems and results.
//! * `dlong`: 64 bit native sparse indices.
//! * `python`: the `_conebridge` Python extension module.
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

pub mod backends;
pub mod bridge;
pub mod host;

#[cfg(feature = "serde")]
pub mod io;

#[cfg(feature = "python")]
pub mod python;
