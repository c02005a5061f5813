#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a [`HostArray`](crate::host::HostArray).
///
/// Mirrors the subset of numpy dtypes that can reach the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

/// Coarse classification used by argument validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Bool,
    Integer,
    Float,
}

impl DType {
    pub fn kind(&self) -> ElementKind {
        match self {
            DType::Bool => ElementKind::Bool,
            DType::Float32 | DType::Float64 => ElementKind::Float,
            _ => ElementKind::Integer,
        }
    }

    /// true for signed and unsigned integer types, but not `Bool`
    pub fn is_integer(&self) -> bool {
        self.kind() == ElementKind::Integer
    }

    pub fn is_float(&self) -> bool {
        self.kind() == ElementKind::Float
    }

    /// element width in bytes
    pub fn itemsize(&self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 => 8,
        }
    }

    /// signed integer type of the given width in bytes, if any
    pub fn signed_of_width(bytes: usize) -> Option<DType> {
        match bytes {
            1 => Some(DType::Int8),
            2 => Some(DType::Int16),
            4 => Some(DType::Int32),
            8 => Some(DType::Int64),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }
}

impl ElementKind {
    /// Classify a numpy dtype kind character (`dtype.kind`).
    pub fn from_kind_char(c: u8) -> Option<ElementKind> {
        match c {
            b'b' => Some(ElementKind::Bool),
            b'i' | b'u' => Some(ElementKind::Integer),
            b'f' => Some(ElementKind::Float),
            _ => None,
        }
    }

    /// element type that arrays of this kind with an unsupported width
    /// (`float16`, `longdouble`, ...) are cast to
    pub fn widest(&self) -> DType {
        match self {
            ElementKind::Bool => DType::Bool,
            ElementKind::Integer => DType::Int64,
            ElementKind::Float => DType::Float64,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Bool => "bools",
            ElementKind::Integer => "ints",
            ElementKind::Float => "floats",
        };
        f.write_str(s)
    }
}

#[test]
fn test_dtype_kinds() {
    assert!(DType::UInt16.is_integer());
    assert!(DType::Int64.is_integer());
    assert!(!DType::Bool.is_integer());
    assert!(DType::Float32.is_float());
    assert!(!DType::Int32.is_float());
    assert_eq!(DType::signed_of_width(4), Some(DType::Int32));
    assert_eq!(DType::signed_of_width(3), None);
    assert_eq!(DType::Float64.itemsize(), 8);
}

#[test]
fn test_kind_chars() {
    // float16 and longdouble arrays have kind 'f' and are cast to float64
    assert_eq!(ElementKind::from_kind_char(b'f'), Some(ElementKind::Float));
    assert_eq!(ElementKind::Float.widest(), DType::Float64);
    assert_eq!(ElementKind::from_kind_char(b'u'), Some(ElementKind::Integer));
    assert_eq!(ElementKind::Integer.widest(), DType::Int64);
    assert_eq!(ElementKind::from_kind_char(b'b').map(|k| k.widest()), Some(DType::Bool));
    // complex, object and string arrays are not numeric inputs
    assert_eq!(ElementKind::from_kind_char(b'c'), None);
    assert_eq!(ElementKind::from_kind_char(b'O'), None);
}
