use crate::host::{DType, ElementKind};
use thiserror::Error;

/// Broad error categories reported by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// a negative problem dimension or an array length mismatch
    Shape,
    /// an array of the wrong rank or element kind
    Type,
    /// a cone or option field that could not be converted
    Parse,
    /// exhausted allocator while building native structures
    Allocation,
    /// failure reported by the native solver backend
    Backend,
}

/// Error type returned by [`csolve`](crate::bridge::csolve) and the
/// individual assembly stages.
///
/// Every variant names the argument or field that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("{arg} must be a nonnegative integer (got {value})")]
    NegativeDimension { arg: &'static str, value: i64 },

    #[error("{arg} has incompatible dimension with A: expected length {expected}, got {actual}")]
    DimensionMismatch {
        arg: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{arg} must be a one-dimensional array of {expected} (got {ndim}-d {dtype} array)")]
    BadArray {
        arg: &'static str,
        expected: ElementKind,
        ndim: usize,
        dtype: DType,
    },

    #[error("{arg} must be an array (got {found})")]
    NotAnArray { arg: &'static str, found: String },

    #[error("{arg} holds a value that is not representable as {target}")]
    BadElement { arg: &'static str, target: DType },

    #[error("failed to parse {section} field '{key}': {reason}")]
    Parse {
        section: &'static str,
        key: String,
        reason: ParseReason,
    },

    #[error("failed to allocate {len} elements for {arg}")]
    Allocation { arg: &'static str, len: usize },

    #[error("native solve failed: {0}")]
    Backend(#[from] BackendError),
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::NegativeDimension { .. } | BridgeError::DimensionMismatch { .. } => {
                ErrorKind::Shape
            }
            BridgeError::BadArray { .. }
            | BridgeError::NotAnArray { .. }
            | BridgeError::BadElement { .. } => ErrorKind::Type,
            BridgeError::Parse { .. } => ErrorKind::Parse,
            BridgeError::Allocation { .. } => ErrorKind::Allocation,
            BridgeError::Backend(_) => ErrorKind::Backend,
        }
    }

    /// name of the offending argument or mapping key, if any
    pub fn argument(&self) -> Option<&str> {
        match self {
            BridgeError::NegativeDimension { arg, .. }
            | BridgeError::DimensionMismatch { arg, .. }
            | BridgeError::BadArray { arg, .. }
            | BridgeError::NotAnArray { arg, .. }
            | BridgeError::BadElement { arg, .. }
            | BridgeError::Allocation { arg, .. } => Some(*arg),
            BridgeError::Parse { key, .. } => Some(key.as_str()),
            BridgeError::Backend(_) => None,
        }
    }
}

/// Reason a mapping field failed to parse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseReason {
    #[error("expected a nonnegative integer, got {0}")]
    NotAnInteger(String),
    #[error("expected a nonnegative integer, got {0}")]
    NegativeInteger(i64),
    #[error("expected a nonnegative float, got {0}")]
    NotAFloat(String),
    #[error("expected a nonnegative float, got {0}")]
    NegativeFloat(f64),
    #[error("value {0} is out of range")]
    OutOfRange(i64),
    #[error("expected an integer or a list of integers, got {0}")]
    NotASequence(String),
    #[error("element {index}: {reason}")]
    Element {
        index: usize,
        reason: Box<ParseReason>,
    },
}

/// Error type returned by native solver backends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("cone field '{field}' is not supported by the {backend} backend")]
    UnsupportedCone {
        field: &'static str,
        backend: &'static str,
    },
    #[error("cone dimensions sum to {cones} but the problem has {m} rows")]
    ConeDimension { cones: usize, m: usize },
    #[error("cone dimensions overflow the index range (problem has {m} rows)")]
    ConeOverflow { m: usize },
    #[error("sparse matrix data is malformed ({0})")]
    MalformedMatrix(String),
    #[error("invalid solver settings ({0})")]
    Settings(String),
    #[error("solver returned {field} of length {actual}, expected {expected}")]
    OutputLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{0}")]
    Other(String),
}

#[test]
fn test_error_messages() {
    let e = BridgeError::NegativeDimension { arg: "m", value: -1 };
    assert_eq!(e.kind(), ErrorKind::Shape);
    assert_eq!(e.argument(), Some("m"));
    assert!(e.to_string().starts_with("m must be"));

    let e = BridgeError::BadArray {
        arg: "Ax",
        expected: ElementKind::Float,
        ndim: 2,
        dtype: DType::Float64,
    };
    assert_eq!(e.kind(), ErrorKind::Type);
    assert!(e.to_string().contains("Ax must be a one-dimensional array of floats"));

    let e = BridgeError::Parse {
        section: "cone",
        key: "q".to_string(),
        reason: ParseReason::Element {
            index: 1,
            reason: Box::new(ParseReason::NegativeInteger(-3)),
        },
    };
    assert_eq!(e.kind(), ErrorKind::Parse);
    assert_eq!(
        e.to_string(),
        "failed to parse cone field 'q': element 1: expected a nonnegative integer, got -3"
    );

    let e: BridgeError = BackendError::ConeDimension { cones: 2, m: 3 }.into();
    assert_eq!(e.kind(), ErrorKind::Backend);
    assert_eq!(e.argument(), None);
}
