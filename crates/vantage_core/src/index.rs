//! Wrapping index arithmetic
//!
//! Every navigation in a carousel goes through [`next_index`]: single steps
//! pass `delta = ±1`, direct jumps pass `current = 0` and the target as
//! `delta`. The result always lands in `[0, length)`, wrapping in both
//! directions.

use crate::error::IndexError;

/// Move `delta` steps from `current` within a collection of `length` items
///
/// Returns the unique `r` in `[0, length)` with `r ≡ current + delta (mod length)`.
/// A `length` of zero or less has no valid index and yields `0`.
///
/// ```
/// use vantage_core::next_index;
///
/// assert_eq!(next_index(4, 1, 5), 0);
/// assert_eq!(next_index(1, -2, 5), 4);
/// assert_eq!(next_index(2, 3, 0), 0);
/// ```
pub fn next_index(current: i64, delta: i64, length: i64) -> usize {
    wrap_exact(i128::from(current), i128::from(delta), i128::from(length))
}

/// Wrap an arbitrary position into `[0, length)`
pub fn wrap_index(position: i64, length: usize) -> usize {
    match i64::try_from(length) {
        Ok(length) => next_index(position, 0, length),
        Err(_) => next_index(position, 0, i64::MAX),
    }
}

/// A dynamically typed index argument
///
/// Hosts that read positions from loosely typed sources (data attributes,
/// JSON payloads) convert them into `IndexArg` and go through
/// [`try_next_index`], which rejects anything that is not an integer.
#[derive(Clone, Debug, PartialEq)]
pub enum IndexArg {
    Int(i128),
    Float(f64),
    Text(String),
    /// Any other value, kept as its textual rendering
    Other(String),
}

/// An integral argument, exact where it fits in `i128`
#[derive(Clone, Copy, Debug, PartialEq)]
enum Integral {
    Exact(i128),
    /// Integral float beyond the `i128` range
    Wide(f64),
}

impl Integral {
    fn as_f64(self) -> f64 {
        match self {
            Integral::Exact(v) => v as f64,
            Integral::Wide(f) => f,
        }
    }
}

impl IndexArg {
    /// Whether the value is an integer (fractional and non-finite floats are not)
    pub fn is_integer(&self) -> bool {
        match self {
            IndexArg::Int(_) => true,
            IndexArg::Float(f) => f.is_finite() && f.fract() == 0.0,
            IndexArg::Text(_) | IndexArg::Other(_) => false,
        }
    }

    fn to_integral(&self, argument: &'static str) -> Result<Integral, IndexError> {
        match self {
            IndexArg::Int(v) => Ok(Integral::Exact(*v)),
            IndexArg::Float(f) if self.is_integer() => {
                if *f >= i128::MIN as f64 && *f < i128::MAX as f64 {
                    Ok(Integral::Exact(*f as i128))
                } else {
                    Ok(Integral::Wide(*f))
                }
            }
            other => Err(IndexError::InvalidArgument {
                argument,
                value: other.describe(),
            }),
        }
    }

    fn describe(&self) -> String {
        match self {
            IndexArg::Int(v) => v.to_string(),
            IndexArg::Float(f) => f.to_string(),
            IndexArg::Text(s) => format!("{:?}", s),
            IndexArg::Other(s) => s.clone(),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for IndexArg {
                fn from(value: $ty) -> Self {
                    IndexArg::Int(i128::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<isize> for IndexArg {
    fn from(value: isize) -> Self {
        IndexArg::Int(value as i128)
    }
}

impl From<usize> for IndexArg {
    fn from(value: usize) -> Self {
        IndexArg::Int(value as i128)
    }
}

impl From<f32> for IndexArg {
    fn from(value: f32) -> Self {
        IndexArg::Float(f64::from(value))
    }
}

impl From<f64> for IndexArg {
    fn from(value: f64) -> Self {
        IndexArg::Float(value)
    }
}

impl From<&str> for IndexArg {
    fn from(value: &str) -> Self {
        IndexArg::Text(value.to_string())
    }
}

impl From<String> for IndexArg {
    fn from(value: String) -> Self {
        IndexArg::Text(value)
    }
}

impl From<&serde_json::Value> for IndexArg {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    IndexArg::Int(i128::from(v))
                } else if let Some(v) = n.as_u64() {
                    IndexArg::Int(i128::from(v))
                } else if let Some(f) = n.as_f64() {
                    IndexArg::Float(f)
                } else {
                    IndexArg::Other(n.to_string())
                }
            }
            Value::String(s) => IndexArg::Text(s.clone()),
            other => IndexArg::Other(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for IndexArg {
    fn from(value: serde_json::Value) -> Self {
        IndexArg::from(&value)
    }
}

/// Checked form of [`next_index`] for dynamically typed input
///
/// Fails with [`IndexError::InvalidArgument`] if any argument is not an
/// integer. Every integer is accepted, including integral floats such as
/// `3.0` or `1e20` and values beyond `i64`. A result that does not fit in
/// `usize` saturates.
pub fn try_next_index(
    current: impl Into<IndexArg>,
    delta: impl Into<IndexArg>,
    length: impl Into<IndexArg>,
) -> Result<usize, IndexError> {
    let current = current.into().to_integral("current")?;
    let delta = delta.into().to_integral("delta")?;
    let length = length.into().to_integral("length")?;

    Ok(match (current, delta, length) {
        (Integral::Exact(c), Integral::Exact(d), Integral::Exact(l)) => wrap_exact(c, d, l),
        (c, d, l) => wrap_wide(c.as_f64(), d.as_f64(), l.as_f64()),
    })
}

fn wrap_exact(current: i128, delta: i128, length: i128) -> usize {
    if length <= 0 {
        return 0;
    }
    // Each term is reduced first; their sum fits in u128
    let modulus = length as u128;
    let sum = current.rem_euclid(length) as u128 + delta.rem_euclid(length) as u128;
    usize::try_from(sum % modulus).unwrap_or(usize::MAX)
}

fn wrap_wide(current: f64, delta: f64, length: f64) -> usize {
    if length <= 0.0 {
        return 0;
    }
    let sum = current.rem_euclid(length) + delta.rem_euclid(length);
    // `as` saturates for values beyond usize
    sum.rem_euclid(length) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_wrap() {
        assert_eq!(next_index(0, 1, 5), 1);
        assert_eq!(next_index(4, 1, 5), 0);
    }

    #[test]
    fn test_backward_wrap() {
        assert_eq!(next_index(0, -1, 5), 4);
        assert_eq!(next_index(1, -2, 5), 4);
    }

    #[test]
    fn test_zero_length_sentinel() {
        assert_eq!(next_index(2, 3, 0), 0);
        assert_eq!(next_index(-7, -9, 0), 0);
        assert_eq!(next_index(2, 3, -4), 0);
    }

    #[test]
    fn test_result_in_range_and_congruent() {
        for length in 1..=7i64 {
            for current in -20..=20i64 {
                for delta in -20..=20i64 {
                    let r = next_index(current, delta, length) as i64;
                    assert!((0..length).contains(&r));
                    assert_eq!((current + delta - r) % length, 0);
                }
            }
        }
    }

    #[test]
    fn test_extreme_inputs_do_not_overflow() {
        assert_eq!(next_index(i64::MAX, i64::MAX, 2), 0);
        assert_eq!(next_index(i64::MIN, -1, 3), next_index(i64::MIN % 3 - 1, 0, 3));
        assert!(next_index(i64::MIN, i64::MIN, i64::MAX) < i64::MAX as usize);
    }

    #[test]
    fn test_direct_jump() {
        assert_eq!(next_index(0, 3, 5), 3);
        assert_eq!(next_index(0, 7, 5), 2);
        assert_eq!(next_index(0, -1, 5), 4);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(2, 3), 2);
        assert_eq!(wrap_index(5, 3), 2);
        assert_eq!(wrap_index(-1, 3), 2);
        assert_eq!(wrap_index(9, 0), 0);
    }

    #[test]
    fn test_checked_rejects_non_integers() {
        assert!(matches!(
            try_next_index("a", 1, 5),
            Err(IndexError::InvalidArgument {
                argument: "current",
                ..
            })
        ));
        assert!(matches!(
            try_next_index(0, 0.5, 5),
            Err(IndexError::InvalidArgument {
                argument: "delta",
                ..
            })
        ));
        assert!(matches!(
            try_next_index(0, 1, f64::NAN),
            Err(IndexError::InvalidArgument {
                argument: "length",
                ..
            })
        ));
        assert!(try_next_index(0, 1, f64::INFINITY).is_err());
    }

    #[test]
    fn test_checked_accepts_integral_values() {
        assert_eq!(try_next_index(4, 1, 5), Ok(0));
        assert_eq!(try_next_index(4.0, 1.0, 5.0), Ok(0));
        assert_eq!(try_next_index(1usize, -2i32, 5u32), Ok(4));
    }

    #[test]
    fn test_checked_json_values() {
        let current = serde_json::json!(1);
        let delta = serde_json::json!(-2);
        let length = serde_json::json!(5);
        assert_eq!(try_next_index(&current, &delta, &length), Ok(4));

        let text = serde_json::json!("3");
        assert!(try_next_index(&text, &delta, &length).is_err());
        let null = serde_json::Value::Null;
        assert!(try_next_index(&current, &null, &length).is_err());
    }

    #[test]
    fn test_checked_accepts_integers_beyond_i64() {
        assert_eq!(try_next_index(u64::MAX, 1, 5), Ok(1));
        assert_eq!(try_next_index(0, 1, u64::MAX), Ok(1));
        assert_eq!(try_next_index(u64::MAX, u64::MAX, u64::MAX), Ok(0));
        // 10^20 ≡ 2 (mod 7)
        assert_eq!(try_next_index(0, 1e20, 7), Ok(2));
        assert_eq!(try_next_index(-1e20, 0, 1), Ok(0));
        assert_eq!(try_next_index(1e300, 0, 1), Ok(0));
        assert_eq!(try_next_index(0, 1e300, -3), Ok(0));
    }

    #[test]
    fn test_checked_matches_unchecked_for_i64() {
        let cases = [
            (4i64, 1i64, 5i64),
            (1, -2, 5),
            (i64::MIN, -1, 3),
            (i64::MAX, i64::MAX, 2),
        ];
        for (c, d, l) in cases {
            assert_eq!(try_next_index(c, d, l), Ok(next_index(c, d, l)));
        }
    }
}
