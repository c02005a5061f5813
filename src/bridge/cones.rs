use super::params::{as_pos_int, get_pos_int_param, ParamError};
use super::ParseReason;
use crate::host::{HostDict, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sizes of the cones making up `K`.
///
/// The slack vector `s` is partitioned in the order of the fields:
/// free/zero cone, nonnegative orthant, second-order cone blocks,
/// semidefinite blocks (packed triangles), primal exponential cones and
/// dual exponential cones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConeSpec {
    /// size of the free (zero) cone
    pub f: usize,
    /// size of the nonnegative cone
    pub l: usize,
    /// second-order cone block sizes
    pub q: Vec<usize>,
    /// semidefinite cone block sizes (matrix side lengths)
    pub s: Vec<usize>,
    /// number of primal exponential cones
    pub ep: usize,
    /// number of dual exponential cones
    pub ed: usize,
}

impl ConeSpec {
    /// Parse a cone mapping with optional keys `f, l, q, s, ep, ed`.
    pub fn parse(mapping: &HostDict) -> Result<Self, ParamError> {
        let mut cone = ConeSpec::default();
        cone.fill(mapping)?;
        Ok(cone)
    }

    /// Fill fields from `mapping` in the order `f, l, q, s, ep, ed`,
    /// stopping at the first failure.  Fields parsed before the failure
    /// keep their values.
    pub(crate) fn fill(&mut self, mapping: &HostDict) -> Result<(), ParamError> {
        self.f = get_pos_int_param("f", 0, Some(mapping))?;
        self.l = get_pos_int_param("l", 0, Some(mapping))?;
        self.q = get_cone_arr_dim("q", mapping)?;
        self.s = get_cone_arr_dim("s", mapping)?;
        self.ep = get_pos_int_param("ep", 0, Some(mapping))?;
        self.ed = get_pos_int_param("ed", 0, Some(mapping))?;
        Ok(())
    }

    /// Total length of the slack vector described by the cones, or
    /// `None` if it does not fit in a `usize`.
    pub fn dim(&self) -> Option<usize> {
        let q = self
            .q
            .iter()
            .try_fold(0usize, |acc, &k| acc.checked_add(k))?;
        let s = self.s.iter().try_fold(0usize, |acc, &k| {
            let tri = k.checked_mul(k.checked_add(1)?)? / 2;
            acc.checked_add(tri)
        })?;
        let exp = self.ep.checked_add(self.ed)?.checked_mul(3)?;
        self.f
            .checked_add(self.l)?
            .checked_add(q)?
            .checked_add(s)?
            .checked_add(exp)
    }
}

/// Read `mapping[key]` as a list of nonnegative integers.
///
/// An absent key gives an empty list and a single integer a list of one.
/// A list, or a one-dimensional integer array, must hold nonnegative
/// integers only; on the first bad element nothing is returned.
pub fn get_cone_arr_dim(key: &str, mapping: &HostDict) -> Result<Vec<usize>, ParamError> {
    let element_err = |index: usize, reason: ParseReason| {
        ParamError::new(
            key,
            ParseReason::Element {
                index,
                reason: Box::new(reason),
            },
        )
    };

    match mapping.get(key) {
        None => Ok(Vec::new()),
        Some(Value::List(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| as_pos_int(v).map_err(|r| element_err(i, r)))
            .collect(),
        Some(Value::Array(arr)) if arr.ndim() == 1 && arr.dtype().is_integer() => arr
            .scalars()
            .enumerate()
            .map(|(i, s)| as_pos_int(&Value::from(s)).map_err(|r| element_err(i, r)))
            .collect(),
        Some(v @ Value::Int(_)) => {
            let k = as_pos_int(v).map_err(|r| ParamError::new(key, r))?;
            Ok(vec![k])
        }
        Some(other) => Err(ParamError::new(
            key,
            ParseReason::NotASequence(other.type_name().to_string()),
        )),
    }
}
