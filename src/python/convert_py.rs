use crate::bridge::BridgeError;
use crate::host::{ArrayData, Element, ElementKind, HostArray, HostDict, TypedStorage, Value};
use numpy::{PyArrayDescrMethods, PyArrayDyn, PyArrayMethods, PyUntypedArray, PyUntypedArrayMethods};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList};

// Host values are copied out of the python objects while holding the
// GIL, so the solve itself can run with the GIL released.

fn copy_array<T>(arr: &Bound<'_, PyArrayDyn<T>>) -> PyResult<HostArray>
where
    T: Element + numpy::Element,
    ArrayData: From<TypedStorage<T>>,
{
    let ro = arr.try_readonly()?;
    let view = ro.as_array();
    let shape = view.shape().to_vec();
    // logical elements in C order, whatever the source strides
    let data: Vec<T> = view.iter().copied().collect();
    HostArray::from_shape_vec(shape, data)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

macro_rules! try_copy_array {
    ($obj:expr, $($t:ty),*) => {
        $(
            if let Ok(arr) = $obj.downcast::<PyArrayDyn<$t>>() {
                return copy_array(arr).map(Some);
            }
        )*
    };
}

fn copy_known_dtype(obj: &Bound<'_, PyAny>) -> PyResult<Option<HostArray>> {
    try_copy_array!(obj, f64, f32, i64, i32, i16, i8, u64, u32, u16, u8, bool);
    Ok(None)
}

/// numpy array of a numeric element type, or `None` for anything else
///
/// Numeric dtypes without a host counterpart (`float16`, `longdouble`)
/// are cast by numpy to the widest host type of their kind.
fn extract_array(obj: &Bound<'_, PyAny>) -> PyResult<Option<HostArray>> {
    if let Some(arr) = copy_known_dtype(obj)? {
        return Ok(Some(arr));
    }
    let Ok(untyped) = obj.downcast::<PyUntypedArray>() else {
        return Ok(None);
    };
    match ElementKind::from_kind_char(untyped.dtype().kind()) {
        Some(kind) => {
            let cast = obj.call_method1("astype", (kind.widest().name(),))?;
            copy_known_dtype(&cast)
        }
        None => Ok(None),
    }
}

fn type_name(obj: &Bound<'_, PyAny>) -> String {
    if let Ok(arr) = obj.downcast::<PyUntypedArray>() {
        return format!("ndarray of {}", arr.dtype());
    }
    obj.get_type()
        .name()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "object".to_string())
}

/// Convert one of the array arguments (`Ax`, `Ai`, `Ap`, `b`, `c`).
pub(crate) fn to_host_array(obj: &Bound<'_, PyAny>, arg: &'static str) -> PyResult<HostArray> {
    match extract_array(obj)? {
        Some(arr) => Ok(arr),
        None => Err(super::to_py_err(BridgeError::NotAnArray {
            arg,
            found: type_name(obj),
        })),
    }
}

pub(crate) fn to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    // bool is a subclass of int and must be checked first
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(Value::Int(b.is_true() as i64));
    }
    if obj.is_instance_of::<PyInt>() {
        return Ok(match obj.extract::<i64>() {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Other("int (out of range)".to_string()),
        });
    }
    if let Ok(f) = obj.downcast::<PyFloat>() {
        return Ok(Value::Float(f.value()));
    }
    if let Ok(list) = obj.downcast::<PyList>() {
        let items = list
            .iter()
            .map(|item| to_value(&item))
            .collect::<PyResult<Vec<Value>>>()?;
        return Ok(Value::List(items));
    }
    if let Some(arr) = extract_array(obj)? {
        return Ok(Value::Array(arr));
    }
    Ok(Value::Other(type_name(obj)))
}

/// Convert a dict argument (`cone`, `opts`, `warm`).  Keys that are not
/// strings are skipped since they can never name a field.
pub(crate) fn to_host_dict(dict: &Bound<'_, PyDict>) -> PyResult<HostDict> {
    let mut out = HostDict::new();
    for (key, value) in dict.iter() {
        if let Ok(key) = key.extract::<String>() {
            out.insert(key, to_value(&value)?);
        }
    }
    Ok(out)
}
