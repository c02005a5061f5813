use super::coerce::{coerce, Coerced};
use super::native::{CscView, NativeProblem};
use super::types::{NativeFloat, NativeIndex, NativeTypes};
use super::BridgeError;
use crate::host::{ElementKind, HostArray};

/// Problem data in the native solver's layout.
///
/// Fields are filled one at a time during assembly, so any of the
/// buffers may still be unset if assembly stopped early.
#[derive(Debug, Default)]
pub struct Problem<'a> {
    /// number of constraint rows
    pub m: usize,
    /// number of variables
    pub n: usize,
    pub(crate) ax: Option<Coerced<'a, NativeFloat>>,
    pub(crate) ai: Option<Coerced<'a, NativeIndex>>,
    pub(crate) ap: Option<Coerced<'a, NativeIndex>>,
    pub(crate) b: Option<Coerced<'a, NativeFloat>>,
    pub(crate) c: Option<Coerced<'a, NativeFloat>>,
}

impl<'a> Problem<'a> {
    /// Validate and convert the problem arguments.
    ///
    /// Checks, in order: `m >= 0` and `n >= 0`; `Ax` is a one-dimensional
    /// float array; `Ai` and `Ap` are one-dimensional integer arrays; `c`
    /// is a one-dimensional float array of length `n`; `b` is a
    /// one-dimensional float array of length `m`.  The CSC arrays are
    /// converted after their checks pass, then `c`, then `b`.
    ///
    /// The internal consistency of the CSC data is __not__ checked: the
    /// caller must ensure that `Ap` has length `n + 1` and is
    /// non-decreasing, that `Ai` and `Ax` have length `Ap[n]`, and that
    /// every entry of `Ai` lies in `[0, m)`.  Malformed matrices are
    /// forwarded to the native solver as they are.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        types: &NativeTypes,
        shape: (i64, i64),
        ax: &'a HostArray,
        ai: &'a HostArray,
        ap: &'a HostArray,
        b: &'a HostArray,
        c: &'a HostArray,
    ) -> Result<Self, BridgeError> {
        let mut problem = Problem::default();
        problem.fill(types, shape, ax, ai, ap, b, c)?;
        Ok(problem)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn fill(
        &mut self,
        types: &NativeTypes,
        shape: (i64, i64),
        ax: &'a HostArray,
        ai: &'a HostArray,
        ap: &'a HostArray,
        b: &'a HostArray,
        c: &'a HostArray,
    ) -> Result<(), BridgeError> {
        self.m = check_dim("m", shape.0)?;
        self.n = check_dim("n", shape.1)?;

        // set A
        check_vector("Ax", ax, ElementKind::Float)?;
        check_vector("Ai", ai, ElementKind::Integer)?;
        check_vector("Ap", ap, ElementKind::Integer)?;
        self.ax = Some(coerce(ax, types.float, "Ax")?);
        self.ai = Some(coerce(ai, types.index, "Ai")?);
        self.ap = Some(coerce(ap, types.index, "Ap")?);

        // set c
        check_vector("c", c, ElementKind::Float)?;
        check_len("c", c, self.n)?;
        self.c = Some(coerce(c, types.float, "c")?);

        // set b
        check_vector("b", b, ElementKind::Float)?;
        check_len("b", b, self.m)?;
        self.b = Some(coerce(b, types.float, "b")?);

        Ok(())
    }

    /// borrowed native view, available once every buffer is set
    pub fn native(&self) -> Option<NativeProblem<'_>> {
        let a = CscView {
            values: self.ax.as_deref()?,
            row_index: self.ai.as_deref()?,
            col_pointer: self.ap.as_deref()?,
        };
        Some(NativeProblem {
            m: self.m,
            n: self.n,
            a,
            b: self.b.as_deref()?,
            c: self.c.as_deref()?,
        })
    }

    pub fn b(&self) -> Option<&[NativeFloat]> {
        self.b.as_deref()
    }

    pub fn c(&self) -> Option<&[NativeFloat]> {
        self.c.as_deref()
    }

    /// all coerced buffers currently held, for release accounting
    #[cfg(test)]
    pub(crate) fn buffers_owned(&self) -> [Option<bool>; 5] {
        [
            self.ax.as_ref().map(Coerced::is_owned),
            self.ai.as_ref().map(Coerced::is_owned),
            self.ap.as_ref().map(Coerced::is_owned),
            self.b.as_ref().map(Coerced::is_owned),
            self.c.as_ref().map(Coerced::is_owned),
        ]
    }
}

fn check_dim(arg: &'static str, value: i64) -> Result<usize, BridgeError> {
    usize::try_from(value).map_err(|_| BridgeError::NegativeDimension { arg, value })
}

fn check_vector(arg: &'static str, arr: &HostArray, kind: ElementKind) -> Result<(), BridgeError> {
    if arr.ndim() != 1 || arr.dtype().kind() != kind {
        return Err(BridgeError::BadArray {
            arg,
            expected: kind,
            ndim: arr.ndim(),
            dtype: arr.dtype(),
        });
    }
    Ok(())
}

fn check_len(arg: &'static str, arr: &HostArray, expected: usize) -> Result<(), BridgeError> {
    if arr.len() != expected {
        return Err(BridgeError::DimensionMismatch {
            arg,
            expected,
            actual: arr.len(),
        });
    }
    Ok(())
}
