use super::DType;
use enum_dispatch::*;
use itertools::Itertools;
use std::ops::Range;
use thiserror::Error;

/// A single array element widened to a common representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// Primitive types that can be stored in a [`HostArray`].
pub trait Element: Copy + std::fmt::Debug + Send + Sync + 'static {
    const DTYPE: DType;
    fn to_scalar(self) -> Scalar;
    /// borrow the flat storage if it holds elements of this type
    fn storage_slice(data: &ArrayData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($t:ty, $dtype:ident, $variant:ident, $scalar:ident, $wide:ty) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            fn to_scalar(self) -> Scalar {
                Scalar::$scalar(self as $wide)
            }
            fn storage_slice(data: &ArrayData) -> Option<&[Self]> {
                match data {
                    ArrayData::$variant(s) => Some(&s.0),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(i8, Int8, I8, Int, i64);
impl_element!(i16, Int16, I16, Int, i64);
impl_element!(i32, Int32, I32, Int, i64);
impl_element!(i64, Int64, I64, Int, i64);
impl_element!(u8, UInt8, U8, UInt, u64);
impl_element!(u16, UInt16, U16, UInt, u64);
impl_element!(u32, UInt32, U32, UInt, u64);
impl_element!(u64, UInt64, U64, UInt, u64);
impl_element!(f32, Float32, F32, Float, f64);
impl_element!(f64, Float64, F64, Float, f64);

impl Element for bool {
    const DTYPE: DType = DType::Bool;
    fn to_scalar(self) -> Scalar {
        Scalar::Bool(self)
    }
    fn storage_slice(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Bool(s) => Some(&s.0),
            _ => None,
        }
    }
}

/// Flat, typed element storage backing a [`HostArray`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypedStorage<T>(pub Vec<T>);

#[enum_dispatch]
pub trait Storage {
    fn dtype(&self) -> DType;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn scalar_at(&self, i: usize) -> Option<Scalar>;
}

impl<T: Element> Storage for TypedStorage<T> {
    fn dtype(&self) -> DType {
        T::DTYPE
    }
    fn len(&self) -> usize {
        self.0.len()
    }
    fn scalar_at(&self, i: usize) -> Option<Scalar> {
        self.0.get(i).map(|v| v.to_scalar())
    }
}

#[enum_dispatch(Storage)]
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(TypedStorage<bool>),
    I8(TypedStorage<i8>),
    I16(TypedStorage<i16>),
    I32(TypedStorage<i32>),
    I64(TypedStorage<i64>),
    U8(TypedStorage<u8>),
    U16(TypedStorage<u16>),
    U32(TypedStorage<u32>),
    U64(TypedStorage<u64>),
    F32(TypedStorage<f32>),
    F64(TypedStorage<f64>),
}

/// Error type returned when a strided array layout is inconsistent
/// with its backing storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("shape has {shape} dimensions but strides have {strides}")]
    RankMismatch { shape: usize, strides: usize },
    #[error("shape requires {required} elements but storage holds {available}")]
    ShapeMismatch { required: usize, available: usize },
    #[error("strided layout addresses elements outside of storage")]
    OutOfBounds,
}

/// An n-dimensional array as handed over by the host environment.
///
/// Elements live in a flat typed storage and are addressed through
/// per-dimension element strides (which may be negative) and a starting
/// offset, so that non-contiguous views such as `a[::2]` or transposes
/// can be represented without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    data: ArrayData,
    shape: Vec<usize>,
    strides: Vec<isize>,
    offset: usize,
}

impl HostArray {
    /// one-dimensional contiguous array
    pub fn from_vec<T: Element>(v: Vec<T>) -> Self
    where
        ArrayData: From<TypedStorage<T>>,
    {
        let shape = vec![v.len()];
        let strides = vec![1];
        Self {
            data: TypedStorage(v).into(),
            shape,
            strides,
            offset: 0,
        }
    }

    /// C ordered array of the given shape
    pub fn from_shape_vec<T: Element>(shape: Vec<usize>, v: Vec<T>) -> Result<Self, LayoutError>
    where
        ArrayData: From<TypedStorage<T>>,
    {
        let required: usize = shape.iter().product();
        if required != v.len() {
            return Err(LayoutError::ShapeMismatch {
                required,
                available: v.len(),
            });
        }
        let strides = c_strides(&shape);
        Ok(Self {
            data: TypedStorage(v).into(),
            shape,
            strides,
            offset: 0,
        })
    }

    /// general strided view over a flat storage vector
    pub fn from_strided_vec<T: Element>(
        v: Vec<T>,
        shape: Vec<usize>,
        strides: Vec<isize>,
        offset: usize,
    ) -> Result<Self, LayoutError>
    where
        ArrayData: From<TypedStorage<T>>,
    {
        let arr = Self {
            data: TypedStorage(v).into(),
            shape,
            strides,
            offset,
        };
        arr.check_layout()?;
        Ok(arr)
    }

    fn check_layout(&self) -> Result<(), LayoutError> {
        if self.shape.len() != self.strides.len() {
            return Err(LayoutError::RankMismatch {
                shape: self.shape.len(),
                strides: self.strides.len(),
            });
        }
        if self.numel() == 0 {
            return Ok(());
        }
        // lowest and highest addressed elements
        let mut lo = self.offset as isize;
        let mut hi = self.offset as isize;
        for (&d, &st) in self.shape.iter().zip(&self.strides) {
            let reach = (d as isize - 1) * st;
            if reach < 0 {
                lo += reach;
            } else {
                hi += reach;
            }
        }
        if lo < 0 || hi >= self.data.len() as isize {
            return Err(LayoutError::OutOfBounds);
        }
        Ok(())
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// total number of logical elements
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// length of the first dimension (0 for scalars)
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// true if elements are laid out in C order without gaps
    pub fn is_c_contiguous(&self) -> bool {
        if self.numel() <= 1 {
            return true;
        }
        let mut expected = 1isize;
        for (&d, &st) in self.shape.iter().zip(&self.strides).rev() {
            if d != 1 && st != expected {
                return false;
            }
            expected *= d as isize;
        }
        true
    }

    /// storage range holding the logical elements, if contiguous
    pub(crate) fn contiguous_range(&self) -> Option<Range<usize>> {
        if self.numel() == 0 {
            return Some(0..0);
        }
        self.is_c_contiguous()
            .then(|| self.offset..self.offset + self.numel())
    }

    /// storage indices of all logical elements, in C order
    pub(crate) fn storage_indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        if let Some(range) = self.contiguous_range() {
            return Box::new(range);
        }
        let base = self.offset as isize;
        Box::new(
            self.shape
                .iter()
                .map(|&d| 0..d)
                .multi_cartesian_product()
                .map(move |idx| {
                    let delta: isize = idx
                        .iter()
                        .zip(&self.strides)
                        .map(|(&i, &st)| i as isize * st)
                        .sum();
                    (base + delta) as usize
                }),
        )
    }

    /// all logical elements in C order
    pub fn scalars(&self) -> impl Iterator<Item = Scalar> + '_ {
        // layout was checked at construction, so every index is in bounds
        self.storage_indices()
            .filter_map(move |i| self.data.scalar_at(i))
    }
}

fn c_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![1isize; shape.len()];
    let mut acc = 1isize;
    for (st, &d) in strides.iter_mut().zip(shape).rev() {
        *st = acc;
        acc *= d.max(1) as isize;
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguity() {
        let a = HostArray::from_vec(vec![1., 2., 3.]);
        assert!(a.is_c_contiguous());
        assert_eq!(a.dtype(), DType::Float64);
        assert_eq!(a.ndim(), 1);
        assert_eq!(a.len(), 3);

        // every other element of a length 6 vector
        let a = HostArray::from_strided_vec(vec![0i32, 1, 2, 3, 4, 5], vec![3], vec![2], 0).unwrap();
        assert!(!a.is_c_contiguous());
        let vals: Vec<Scalar> = a.scalars().collect();
        assert_eq!(vals, vec![Scalar::Int(0), Scalar::Int(2), Scalar::Int(4)]);

        // reversed view
        let a = HostArray::from_strided_vec(vec![1u8, 2, 3], vec![3], vec![-1], 2).unwrap();
        let vals: Vec<Scalar> = a.scalars().collect();
        assert_eq!(vals, vec![Scalar::UInt(3), Scalar::UInt(2), Scalar::UInt(1)]);
    }

    #[test]
    fn test_transposed_gather() {
        // 2x3 C-ordered storage viewed as its 3x2 transpose
        let a = HostArray::from_strided_vec(
            vec![1., 2., 3., 4., 5., 6.],
            vec![3, 2],
            vec![1, 3],
            0,
        )
        .unwrap();
        assert!(!a.is_c_contiguous());
        let vals: Vec<Scalar> = a.scalars().collect();
        let expected: Vec<Scalar> = [1., 4., 2., 5., 3., 6.]
            .iter()
            .map(|&v| Scalar::Float(v))
            .collect();
        assert_eq!(vals, expected);
    }

    #[test]
    fn test_bad_layouts() {
        assert_eq!(
            HostArray::from_strided_vec(vec![1., 2.], vec![3], vec![1], 0),
            Err(LayoutError::OutOfBounds)
        );
        assert_eq!(
            HostArray::from_strided_vec(vec![1., 2.], vec![2], vec![-1], 0),
            Err(LayoutError::OutOfBounds)
        );
        assert!(matches!(
            HostArray::from_shape_vec(vec![2, 2], vec![1, 2, 3]),
            Err(LayoutError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            HostArray::from_strided_vec(vec![1., 2.], vec![2], vec![], 0),
            Err(LayoutError::RankMismatch { .. })
        ));
        // zero sized arrays address nothing
        assert!(HostArray::from_strided_vec(Vec::<f64>::new(), vec![0], vec![1], 0).is_ok());
    }

    #[test]
    fn test_shape_vec_strides() {
        let a = HostArray::from_shape_vec(vec![2, 3], vec![0i64; 6]).unwrap();
        assert_eq!(a.strides(), &[3, 1]);
        assert!(a.is_c_contiguous());
        assert_eq!(a.numel(), 6);
        assert_eq!(a.len(), 2);
    }
}
