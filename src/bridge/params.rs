use super::{BridgeError, ParseReason};
use crate::host::{HostDict, Value};

/// A mapping field that failed to parse, before it is attributed to a
/// section (`cone` or `opts`) of the call.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamError {
    pub key: String,
    pub reason: ParseReason,
}

impl ParamError {
    pub(crate) fn new(key: &str, reason: ParseReason) -> Self {
        Self {
            key: key.to_string(),
            reason,
        }
    }

    /// attribute the failure to a section of the call
    pub fn within(self, section: &'static str) -> BridgeError {
        log::debug!("error parsing {} field '{}': {}", section, self.key, self.reason);
        BridgeError::Parse {
            section,
            key: self.key,
            reason: self.reason,
        }
    }
}

/// Nonnegative integer conversion shared by scalar fields and array elements.
pub(crate) fn as_pos_int(value: &Value) -> Result<usize, ParseReason> {
    match value {
        Value::Int(v) if *v < 0 => Err(ParseReason::NegativeInteger(*v)),
        Value::Int(v) => usize::try_from(*v).map_err(|_| ParseReason::OutOfRange(*v)),
        other => Err(ParseReason::NotAnInteger(other.type_name().to_string())),
    }
}

/// Read `mapping[key]` as a nonnegative integer, or `default` if absent.
///
/// Floats are rejected even when integral.
pub fn get_pos_int_param(
    key: &str,
    default: usize,
    mapping: Option<&HostDict>,
) -> Result<usize, ParamError> {
    match mapping.and_then(|m| m.get(key)) {
        None => Ok(default),
        Some(v) => as_pos_int(v).map_err(|reason| ParamError::new(key, reason)),
    }
}

/// Read `mapping[key]` as a nonnegative float, or `default` if absent.
///
/// Integers are accepted and converted.  NaN is rejected.
pub fn get_opt_float_param(
    key: &str,
    default: f64,
    mapping: Option<&HostDict>,
) -> Result<f64, ParamError> {
    let reason = match mapping.and_then(|m| m.get(key)) {
        None => return Ok(default),
        Some(Value::Int(v)) if *v >= 0 => return Ok(*v as f64),
        Some(Value::Float(v)) if *v >= 0. => return Ok(*v),
        Some(Value::Int(v)) => ParseReason::NegativeFloat(*v as f64),
        Some(Value::Float(v)) => ParseReason::NegativeFloat(*v),
        Some(other) => ParseReason::NotAFloat(other.type_name().to_string()),
    };
    Err(ParamError::new(key, reason))
}
