use super::native::{NativeInfo, NativeSolution, StatusCode};
use super::types::NativeFloat;
use super::BackendError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Solver diagnostics returned to the caller.
///
/// Serializes with the host-facing key names (`statusVal`, `resPri`,
/// `solveTime`, ...).  Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SolveInfo {
    pub status_val: i64,
    pub iter: usize,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::float_or_null"))]
    pub pobj: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::float_or_null"))]
    pub dobj: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::float_or_null"))]
    pub res_pri: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::float_or_null"))]
    pub res_dual: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::float_or_null"))]
    pub rel_gap: f64,
    pub solve_time: f64,
    pub setup_time: f64,
    pub status: String,
}

impl SolveInfo {
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_code(self.status_val)
    }

    pub fn is_solved(&self) -> bool {
        self.status_code().map_or(false, |s| s.is_solved())
    }
}

impl From<&NativeInfo> for SolveInfo {
    fn from(info: &NativeInfo) -> Self {
        Self {
            status_val: info.status.code(),
            iter: info.iter,
            pobj: info.pobj,
            dobj: info.dobj,
            res_pri: info.res_pri,
            res_dual: info.res_dual,
            rel_gap: info.rel_gap,
            solve_time: info.solve_time_ms / 1e3,
            setup_time: info.setup_time_ms / 1e3,
            status: info.status.as_str().to_string(),
        }
    }
}

/// Result of a solve: primal `x`, dual `y`, slack `s` and diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveOutput {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::floats_or_null"))]
    pub x: Vec<NativeFloat>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::floats_or_null"))]
    pub y: Vec<NativeFloat>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::io::floats_or_null"))]
    pub s: Vec<NativeFloat>,
    pub info: SolveInfo,
}

/// Hand the native outputs over to the caller.
///
/// The solution vectors are moved, not copied.  Fails if the backend
/// returned vectors of the wrong length for an `m x n` problem.
pub fn package(
    solution: NativeSolution,
    info: &NativeInfo,
    m: usize,
    n: usize,
) -> Result<SolveOutput, BackendError> {
    let NativeSolution { x, y, s } = solution;
    check_output("x", &x, n)?;
    check_output("y", &y, m)?;
    check_output("s", &s, m)?;
    Ok(SolveOutput {
        x,
        y,
        s,
        info: SolveInfo::from(info),
    })
}

fn check_output(field: &'static str, v: &[NativeFloat], expected: usize) -> Result<(), BackendError> {
    if v.len() != expected {
        return Err(BackendError::OutputLength {
            field,
            expected,
            actual: v.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution() -> NativeSolution {
        NativeSolution {
            x: vec![1., 1.],
            y: vec![0., 0., 1.],
            s: vec![0., 0., 2.],
        }
    }

    #[test]
    fn test_times_in_seconds() {
        let info = NativeInfo {
            status: StatusCode::Solved,
            iter: 12,
            solve_time_ms: 1500.,
            setup_time_ms: 20.,
            ..NativeInfo::default()
        };
        let out = package(solution(), &info, 3, 2).unwrap();
        assert_eq!(out.info.solve_time, 1.5);
        assert_eq!(out.info.setup_time, 0.02);
        assert_eq!(out.info.status_val, 1);
        assert_eq!(out.info.status, "Solved");
        assert_eq!(out.info.iter, 12);
        assert!(out.info.is_solved());
        assert_eq!(out.x, vec![1., 1.]);
    }

    #[test]
    fn test_solution_moved() {
        let sol = solution();
        let ptr = sol.x.as_ptr();
        let out = package(sol, &NativeInfo::default(), 3, 2).unwrap();
        assert_eq!(out.x.as_ptr(), ptr);
        assert_eq!(out.info.status_code(), Some(StatusCode::Unfinished));
    }

    #[test]
    fn test_wrong_output_length() {
        let err = package(solution(), &NativeInfo::default(), 3, 3).unwrap_err();
        assert_eq!(
            err,
            BackendError::OutputLength {
                field: "x",
                expected: 3,
                actual: 2
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_info_keys() {
        let out = package(solution(), &NativeInfo::default(), 3, 2).unwrap();
        let json = serde_json::to_value(&out.info).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "statusVal", "iter", "pobj", "dobj", "resPri", "resDual", "relGap", "solveTime",
            "setupTime", "status",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
    }
}
