//! A diagnostic value that may not have been obtainable.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a single diagnostic measurement.
///
/// A failed measurement is recorded as `Unknown` with the reason instead of
/// aborting the whole analysis.
///
/// # Example
///
/// ```
/// use neuromesh_repair::Measured;
///
/// let volume: Measured<f64> = Measured::Known(12.5);
/// assert_eq!(volume.known(), Some(&12.5));
///
/// let genus: Measured<u64> = Measured::unknown("mesh is not watertight");
/// assert!(!genus.is_known());
/// assert_eq!(genus.to_string(), "unknown (mesh is not watertight)");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", content = "value", rename_all = "snake_case"))]
pub enum Measured<T> {
    /// The measurement succeeded.
    Known(T),
    /// The measurement could not be made.
    Unknown {
        /// Why the value is missing.
        reason: String,
    },
}

impl<T> Measured<T> {
    /// An unknown value with the given reason.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    /// Whether the value is known.
    #[inline]
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrow the value if known.
    #[inline]
    #[must_use]
    pub const fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown { .. } => None,
        }
    }

    /// Take the value if known.
    #[inline]
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown { .. } => None,
        }
    }

    /// Reason the value is missing, if it is.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Known(_) => None,
            Self::Unknown { reason } => Some(reason),
        }
    }

    /// Transform a known value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Measured<U> {
        match self {
            Self::Known(value) => Measured::Known(f(value)),
            Self::Unknown { reason } => Measured::Unknown { reason },
        }
    }
}

impl<T: Copy> Measured<T> {
    /// Copy the value out if known.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.known().copied()
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Measured<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Known(value),
            Err(err) => Self::unknown(err.to_string()),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Measured<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => value.fmt(f),
            Self::Unknown { reason } => write!(f, "unknown ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_result() {
        let ok: Measured<i32> = Ok::<_, String>(3).into();
        assert_eq!(ok, Measured::Known(3));

        let err: Measured<i32> = Err::<i32, _>("boom").into();
        assert_eq!(err.reason(), Some("boom"));
        assert_eq!(err.get(), None);
    }

    #[test]
    fn map_preserves_reason() {
        let m: Measured<i32> = Measured::unknown("nope");
        assert_eq!(m.map(|v| v * 2).reason(), Some("nope"));
        assert_eq!(Measured::Known(2).map(|v| v * 2), Measured::Known(4));
    }

    #[test]
    fn display_precision_passes_through() {
        assert_eq!(format!("{:.2}", Measured::Known(1.23456)), "1.23");
    }
}
