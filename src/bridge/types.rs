use crate::host::DType;
use lazy_static::lazy_static;

cfg_if::cfg_if! {
    if #[cfg(feature = "dlong")] {
        /// Integer type used by the native solver for sparse indices and sizes.
        pub type NativeIndex = i64;
    } else {
        /// Integer type used by the native solver for sparse indices and sizes.
        pub type NativeIndex = i32;
    }
}

/// Floating point type used by the native solver.
pub type NativeFloat = f64;

/// Element types of the native solver's buffers.
///
/// Fixed when the crate is compiled; the value is computed once and then
/// passed explicitly to everything that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeTypes {
    pub index: DType,
    pub float: DType,
}

impl NativeTypes {
    fn detect() -> Self {
        // an index type with an unexpected width falls back to 4 bytes
        let index = DType::signed_of_width(std::mem::size_of::<NativeIndex>())
            .unwrap_or(DType::Int32);
        Self {
            index,
            float: DType::Float64,
        }
    }

    /// the process-wide native type configuration
    pub fn get() -> &'static NativeTypes {
        &NATIVE_TYPES
    }
}

lazy_static! {
    static ref NATIVE_TYPES: NativeTypes = NativeTypes::detect();
}

#[test]
fn test_native_types() {
    let types = NativeTypes::get();
    assert_eq!(types.float, DType::Float64);
    assert_eq!(types.index.itemsize(), std::mem::size_of::<NativeIndex>());
    assert!(types.index.is_integer());
}
