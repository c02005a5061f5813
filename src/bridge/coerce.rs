use super::BridgeError;
use crate::host::{DType, Element, HostArray, Scalar};
use num_traits::{NumCast, Zero};
use std::ops::Deref;

/// Element types that can be handed to the native solver.
pub trait NativeElement: Element + NumCast + Zero {}

impl NativeElement for i32 {}
impl NativeElement for i64 {}
impl NativeElement for f64 {}

/// A contiguous buffer of native elements.
///
/// A `View` borrows the caller's array without copying and is only
/// produced when the input already had the native element type and a
/// contiguous layout.  An `Owned` buffer was allocated by the bridge and is
/// freed when the structure holding it is released.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<'a, T> {
    View(&'a [T]),
    Owned(Vec<T>),
}

impl<'a, T> Coerced<'a, T> {
    pub fn is_owned(&self) -> bool {
        matches!(self, Coerced::Owned(_))
    }
}

impl<'a, T: NativeElement> Coerced<'a, T> {
    /// zero filled buffer of length `len`
    pub fn zeros(len: usize, arg: &'static str) -> Result<Self, BridgeError> {
        let mut v = try_alloc::<T>(len, arg)?;
        v.resize(len, T::zero());
        Ok(Coerced::Owned(v))
    }

    /// detach from the borrowed input, copying if necessary
    pub fn into_owned(self) -> Coerced<'static, T> {
        match self {
            Coerced::View(v) => Coerced::Owned(v.to_vec()),
            Coerced::Owned(v) => Coerced::Owned(v),
        }
    }

    /// the buffer contents, moved out if owned
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Coerced::View(v) => v.to_vec(),
            Coerced::Owned(v) => v,
        }
    }
}

impl<'a, T> Deref for Coerced<'a, T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        match self {
            Coerced::View(v) => v,
            Coerced::Owned(v) => v,
        }
    }
}

/// Produce a contiguous buffer of element type `target` from `arr`.
///
/// Arrays of any rank are flattened in C order.  No shape validation is
/// made here; callers check rank and length before coercing.  Fails if an
/// element is not representable in the target type, or if a new buffer
/// cannot be allocated.
pub fn coerce<'a, T: NativeElement>(
    arr: &'a HostArray,
    target: DType,
    arg: &'static str,
) -> Result<Coerced<'a, T>, BridgeError> {
    debug_assert_eq!(T::DTYPE, target);

    if arr.dtype() == target {
        if let (Some(range), Some(storage)) = (arr.contiguous_range(), T::storage_slice(arr.data())) {
            return Ok(Coerced::View(&storage[range]));
        }
    }

    let len = arr.numel();
    let mut out = try_alloc::<T>(len, arg)?;
    for s in arr.scalars() {
        let v = cast_scalar::<T>(s).ok_or(BridgeError::BadElement { arg, target })?;
        out.push(v);
    }
    log::debug!(
        "{}: copied {} elements ({} -> {}, contiguous: {})",
        arg,
        len,
        arr.dtype(),
        target,
        arr.is_c_contiguous()
    );
    Ok(Coerced::Owned(out))
}

fn try_alloc<T>(len: usize, arg: &'static str) -> Result<Vec<T>, BridgeError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| BridgeError::Allocation { arg, len })?;
    Ok(v)
}

pub(crate) fn cast_scalar<T: NumCast>(s: Scalar) -> Option<T> {
    match s {
        Scalar::Bool(b) => <T as NumCast>::from(b as u8),
        Scalar::Int(v) => <T as NumCast>::from(v),
        Scalar::UInt(v) => <T as NumCast>::from(v),
        Scalar::Float(v) => <T as NumCast>::from(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_same_type_is_view() {
        let arr = HostArray::from_vec(vec![1., 2., 3.]);
        let c = coerce::<f64>(&arr, DType::Float64, "b").unwrap();
        assert!(!c.is_owned());
        assert_eq!(&*c, &[1., 2., 3.]);
    }

    #[test]
    fn test_cast_and_strided_are_copies() {
        let arr = HostArray::from_vec(vec![1f32, 2., 3.]);
        let c = coerce::<f64>(&arr, DType::Float64, "b").unwrap();
        assert!(c.is_owned());
        assert_eq!(&*c, &[1., 2., 3.]);

        let arr = HostArray::from_strided_vec(vec![1., 9., 2., 9., 3.], vec![3], vec![2], 0).unwrap();
        let c = coerce::<f64>(&arr, DType::Float64, "c").unwrap();
        assert!(c.is_owned());
        assert_eq!(&*c, &[1., 2., 3.]);

        // integers into floats
        let arr = HostArray::from_vec(vec![1u8, 0, 7]);
        let c = coerce::<f64>(&arr, DType::Float64, "c").unwrap();
        assert_eq!(&*c, &[1., 0., 7.]);
    }

    #[test]
    fn test_index_narrowing() {
        let arr = HostArray::from_vec(vec![0i64, 2, 4]);
        let c = coerce::<i32>(&arr, DType::Int32, "Ap").unwrap();
        assert!(c.is_owned());
        assert_eq!(&*c, &[0, 2, 4]);

        let arr = HostArray::from_vec(vec![0i64, i64::MAX]);
        let err = coerce::<i32>(&arr, DType::Int32, "Ap").unwrap_err();
        assert_eq!(
            err,
            BridgeError::BadElement {
                arg: "Ap",
                target: DType::Int32
            }
        );

        let arr = HostArray::from_vec(vec![u64::MAX]);
        assert!(coerce::<i64>(&arr, DType::Int64, "Ai").is_err());
    }

    #[test]
    fn test_offset_view() {
        // contiguous window starting part way into the storage
        let arr = HostArray::from_strided_vec(vec![0i32, 1, 2, 3], vec![2], vec![1], 2).unwrap();
        let c = coerce::<i32>(&arr, DType::Int32, "Ai").unwrap();
        assert!(!c.is_owned());
        assert_eq!(&*c, &[2, 3]);
    }

    #[test]
    fn test_zeros_and_owned() {
        let z = Coerced::<f64>::zeros(4, "x").unwrap();
        assert!(z.is_owned());
        assert_eq!(&*z, &[0.; 4]);

        let arr = HostArray::from_vec(vec![5., 6.]);
        let c = coerce::<f64>(&arr, DType::Float64, "x").unwrap().into_owned();
        assert!(c.is_owned());
        assert_eq!(c.into_vec(), vec![5., 6.]);
    }
}
