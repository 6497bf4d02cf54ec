//! Per-axis bounds of a vertex set.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis (default; neurite fixtures run along Z).
    #[default]
    Z,
}

impl Axis {
    /// All three axes in order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index of this axis (0, 1 or 2).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Unit vector along this axis.
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Self::X => Vector3::x(),
            Self::Y => Vector3::y(),
            Self::Z => Vector3::z(),
        }
    }

    /// Lower-case axis name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Three independent (min, max) pairs, one per axis.
///
/// Bounds are always derived from a vertex set and never stored
/// redundantly next to it; an empty vertex set has no bounds at all
/// (see [`Bounds::from_points`]), so `min <= max` holds on every axis of
/// a value that exists.
///
/// # Example
///
/// ```
/// use neuromesh_types::{Bounds, Point3};
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 5.0, 3.0),
///     Point3::new(-2.0, 8.0, 1.0),
/// ];
///
/// let bounds = Bounds::from_points(points.iter()).unwrap();
/// assert_eq!(bounds.x(), (-2.0, 10.0));
/// assert_eq!(bounds.z(), (0.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Bounds {
    /// Create bounds from two corners, correcting any axis where min > max.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Compute bounds over an iterator of points.
    ///
    /// Returns `None` when the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in points {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.min.z = bounds.min.z.min(p.z);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
            bounds.max.z = bounds.max.z.max(p.z);
        }
        Some(bounds)
    }

    /// (min, max) along `axis`.
    #[inline]
    #[must_use]
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        let i = axis.index();
        (self.min[i], self.max[i])
    }

    /// (min, max) along X.
    #[inline]
    #[must_use]
    pub fn x(&self) -> (f64, f64) {
        self.range(Axis::X)
    }

    /// (min, max) along Y.
    #[inline]
    #[must_use]
    pub fn y(&self) -> (f64, f64) {
        self.range(Axis::Y)
    }

    /// (min, max) along Z.
    #[inline]
    #[must_use]
    pub fn z(&self) -> (f64, f64) {
        self.range(Axis::Z)
    }

    /// Mean of (min, max) on every axis.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Extent along each axis.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Length of the longest extent.
    #[inline]
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.1}, {:.1}, {:.1}] to [{:.1}, {:.1}, {:.1}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}
