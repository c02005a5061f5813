use super::coerce::{coerce, Coerced};
use super::native::WarmStartView;
use super::types::{NativeFloat, NativeTypes};
use super::BridgeError;
use crate::host::{HostArray, HostDict, Value};

/// Initial guesses for `x`, `y` and `s`.
///
/// Each buffer is either taken from the `warm` mapping or zero filled.
/// Fields are loaded in the order `x, y, s`; a buffer left unset means
/// loading stopped before reaching it.
#[derive(Debug, Default)]
pub struct WarmStart<'a> {
    pub(crate) x: Option<Coerced<'a, NativeFloat>>,
    pub(crate) y: Option<Coerced<'a, NativeFloat>>,
    pub(crate) s: Option<Coerced<'a, NativeFloat>>,
    warm: bool,
}

impl<'a> WarmStart<'a> {
    /// Load all three guesses for a problem with `n` variables and `m` rows.
    pub fn load(
        types: &NativeTypes,
        mapping: Option<&'a HostDict>,
        n: usize,
        m: usize,
    ) -> Result<Self, BridgeError> {
        let mut ws = WarmStart::default();
        ws.fill(types, mapping, n, m)?;
        Ok(ws)
    }

    pub(crate) fn fill(
        &mut self,
        types: &NativeTypes,
        mapping: Option<&'a HostDict>,
        n: usize,
        m: usize,
    ) -> Result<(), BridgeError> {
        let (x, has_x) = load_warm_start(types, "x", n, mapping)?;
        self.x = Some(x);
        let (y, has_y) = load_warm_start(types, "y", m, mapping)?;
        self.y = Some(y);
        let (s, has_s) = load_warm_start(types, "s", m, mapping)?;
        self.s = Some(s);
        self.warm = has_x || has_y || has_s;
        Ok(())
    }

    /// true if at least one guess came from the mapping
    pub fn is_warm(&self) -> bool {
        self.warm
    }

    /// borrowed view, available once all three buffers are loaded
    pub fn view(&self) -> Option<WarmStartView<'_>> {
        Some(WarmStartView {
            x: self.x.as_deref()?,
            y: self.y.as_deref()?,
            s: self.s.as_deref()?,
        })
    }

    #[cfg(test)]
    pub(crate) fn buffers_owned(&self) -> [Option<bool>; 3] {
        [
            self.x.as_ref().map(Coerced::is_owned),
            self.y.as_ref().map(Coerced::is_owned),
            self.s.as_ref().map(Coerced::is_owned),
        ]
    }
}

/// Read `mapping[key]` as an initial guess of length `expected_len`.
///
/// Returns the buffer and whether it came from the mapping.  A missing
/// key gives zeros.  A value that is not a one-dimensional float array
/// (or a list of numbers containing a float) of exactly `expected_len`
/// elements is ignored with a warning and also gives zeros.  Only
/// allocation failures are errors.
pub fn load_warm_start<'a>(
    types: &NativeTypes,
    key: &'static str,
    expected_len: usize,
    mapping: Option<&'a HostDict>,
) -> Result<(Coerced<'a, NativeFloat>, bool), BridgeError> {
    let value = match mapping.and_then(|m| m.get(key)) {
        None => return Ok((Coerced::zeros(expected_len, key)?, false)),
        Some(v) => v,
    };

    let loaded = match value {
        Value::Array(arr) if is_usable(arr, expected_len) => Some(coerce(arr, types.float, key)?),
        Value::List(items) => match Value::list_as_array(items) {
            Some(arr) if is_usable(&arr, expected_len) => {
                Some(coerce(&arr, types.float, key)?.into_owned())
            }
            _ => None,
        },
        _ => None,
    };

    match loaded {
        Some(buf) => Ok((buf, true)),
        None => {
            log::warn!(
                "Error parsing warm-start input: '{}' must be a one-dimensional float array of length {}, ignoring",
                key,
                expected_len
            );
            Ok((Coerced::zeros(expected_len, key)?, false))
        }
    }
}

fn is_usable(arr: &HostArray, expected_len: usize) -> bool {
    arr.ndim() == 1 && arr.dtype().is_float() && arr.len() == expected_len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> &'static NativeTypes {
        NativeTypes::get()
    }

    #[test]
    fn test_absent() {
        let (buf, present) = load_warm_start(types(), "x", 3, None).unwrap();
        assert!(!present);
        assert_eq!(&*buf, &[0.; 3]);

        let warm = HostDict::new();
        let (buf, present) = load_warm_start(types(), "y", 2, Some(&warm)).unwrap();
        assert!(!present);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_present() {
        let warm = HostDict::new()
            .with("x", HostArray::from_vec(vec![1., 2.]))
            .with("y", vec![0.5, 1.0, 2.0])
            .with("s", HostArray::from_vec(vec![1f32, 2., 3.]));

        let (x, present) = load_warm_start(types(), "x", 2, Some(&warm)).unwrap();
        assert!(present);
        assert!(!x.is_owned());
        assert_eq!(&*x, &[1., 2.]);

        let (y, present) = load_warm_start(types(), "y", 3, Some(&warm)).unwrap();
        assert!(present);
        assert_eq!(&*y, &[0.5, 1., 2.]);

        let (s, present) = load_warm_start(types(), "s", 3, Some(&warm)).unwrap();
        assert!(present);
        assert!(s.is_owned());
        assert_eq!(&*s, &[1., 2., 3.]);
    }

    #[test]
    fn test_malformed_degrades() {
        let warm = HostDict::new()
            .with("x", vec![1.0, 2.0, 3.0])
            .with("y", HostArray::from_vec(vec![1i64, 2]))
            .with("s", 4.0);

        let (x, present) = load_warm_start(types(), "x", 2, Some(&warm)).unwrap();
        assert!(!present);
        assert_eq!(&*x, &[0., 0.]);

        let (y, present) = load_warm_start(types(), "y", 2, Some(&warm)).unwrap();
        assert!(!present);
        assert_eq!(&*y, &[0., 0.]);

        let (_, present) = load_warm_start(types(), "s", 1, Some(&warm)).unwrap();
        assert!(!present);
    }

    #[test]
    fn test_load_all() {
        let warm = HostDict::new().with("y", vec![1.0, 1.0, 1.0]);
        let ws = WarmStart::load(types(), Some(&warm), 2, 3).unwrap();
        assert!(ws.is_warm());
        let view = ws.view().unwrap();
        assert_eq!(view.x, &[0., 0.]);
        assert_eq!(view.y, &[1., 1., 1.]);
        assert_eq!(view.s, &[0., 0., 0.]);

        let ws = WarmStart::load(types(), None, 2, 3).unwrap();
        assert!(!ws.is_warm());
        assert_eq!(ws.buffers_owned(), [Some(true); 3]);
    }
}
