//! Vector primitives and rotation construction.
//!
//! Rotations are built with Rodrigues' formula,
//! `R = I + sin(θ)K + (1 − cos θ)K²`, where `K` is the skew-symmetric
//! cross-product matrix of the unit rotation axis.

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

use crate::error::{GeometryError, GeometryResult};

/// Absolute tolerance used when comparing unit vectors.
pub const ALLCLOSE_ATOL: f64 = 1e-8;

/// Relative tolerance used when comparing unit vectors.
pub const ALLCLOSE_RTOL: f64 = 1e-5;

/// Scale `v` to unit length.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateVector`] if the norm is zero (to
/// machine precision) or not finite.
///
/// # Example
///
/// ```
/// use neuromesh_geometry::normalize;
/// use nalgebra::Vector3;
///
/// let n = normalize(&Vector3::new(3.0, 0.0, 4.0)).unwrap();
/// assert!((n.norm() - 1.0).abs() < 1e-12);
/// assert!(normalize(&Vector3::zeros()).is_err());
/// ```
pub fn normalize(v: &Vector3<f64>) -> GeometryResult<Vector3<f64>> {
    let norm = v.norm();
    if norm <= f64::EPSILON || !norm.is_finite() {
        return Err(GeometryError::DegenerateVector { norm });
    }
    Ok(v / norm)
}

/// Skew-symmetric matrix `K` such that `K·x = axis × x`.
#[inline]
#[must_use]
pub fn skew(axis: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -axis.z, axis.y, //
        axis.z, 0.0, -axis.x, //
        -axis.y, axis.x, 0.0,
    )
}

/// Rotation of `angle` radians about the unit vector `axis`.
#[must_use]
pub fn rodrigues(axis: &Vector3<f64>, angle: f64) -> Matrix3<f64> {
    let k = skew(axis);
    Matrix3::identity() + k * angle.sin() + k * k * (1.0 - angle.cos())
}

/// Element-wise closeness with the same semantics as a typical `allclose`:
/// `|a − b| ≤ atol + rtol·|b|` on every component.
fn allclose(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() <= ALLCLOSE_ATOL + ALLCLOSE_RTOL * y.abs())
}

/// Rotation matrix `R` with `R·â = b̂`.
///
/// Both inputs are normalized first. Parallel inputs give the identity.
/// Antiparallel inputs rotate by π about an axis perpendicular to `a`,
/// built from world X (or world Y when `a` is nearly along X).
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateVector`] if either input is zero.
///
/// # Example
///
/// ```
/// use neuromesh_geometry::rotation_between;
/// use nalgebra::Vector3;
///
/// let r = rotation_between(&Vector3::x(), &Vector3::z()).unwrap();
/// let v = r * Vector3::x();
/// assert!((v - Vector3::z()).norm() < 1e-12);
/// ```
pub fn rotation_between(a: &Vector3<f64>, b: &Vector3<f64>) -> GeometryResult<Matrix3<f64>> {
    let a = normalize(a)?;
    let b = normalize(b)?;

    if allclose(&a, &b) {
        return Ok(Matrix3::identity());
    }

    if allclose(&a, &(-b)) {
        let helper = if a.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let axis = normalize(&a.cross(&helper))?;
        return Ok(rodrigues(&axis, PI));
    }

    let axis = normalize(&a.cross(&b))?;
    let angle = a.dot(&b).clamp(-1.0, 1.0).acos();
    Ok(rodrigues(&axis, angle))
}
