//! Bounds, centering, scaling and principal-axis alignment.
//!
//! Every operation mutates the vertex positions in place and leaves the
//! face list untouched. Bounds are never cached here; callers that cache
//! them recompute after each call.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Vector3};
use neuromesh_geometry::rotation_between;
use neuromesh_types::{Bounds, Mesh};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::pca::pca_axes;

/// What point [`center`] moves to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CenterMode {
    /// Area-weighted surface centroid.
    #[default]
    Centroid,
    /// Midpoint of the bounds on every axis.
    BoundsCenter,
    /// The origin itself (no translation).
    Origin,
}

impl CenterMode {
    /// Name accepted by [`CenterMode::from_str`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::BoundsCenter => "bounds_center",
            Self::Origin => "origin",
        }
    }
}

impl fmt::Display for CenterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CenterMode {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "centroid" => Ok(Self::Centroid),
            "bounds_center" => Ok(Self::BoundsCenter),
            "origin" => Ok(Self::Origin),
            other => Err(TransformError::InvalidMode {
                mode: other.to_owned(),
            }),
        }
    }
}

/// Per-axis bounds of the vertices.
///
/// # Errors
///
/// Returns [`TransformError::EmptyMesh`] if the mesh has no vertices.
pub fn compute_bounds(mesh: &Mesh) -> TransformResult<Bounds> {
    mesh.bounds().ok_or(TransformError::EmptyMesh)
}

/// Translate the mesh so the point chosen by `mode` lands on the origin.
///
/// Returns the translation that was applied.
///
/// # Errors
///
/// Returns [`TransformError::EmptyMesh`] if the mesh has no vertices.
///
/// # Example
///
/// ```
/// use neuromesh_transform::{CenterMode, center};
/// use neuromesh_types::unit_cube;
///
/// let mut cube = unit_cube();
/// let offset = center(&mut cube, CenterMode::BoundsCenter).unwrap();
/// assert_eq!(offset.x, -0.5);
/// assert_eq!(cube.bounds().unwrap().center().coords.norm(), 0.0);
/// ```
pub fn center(mesh: &mut Mesh, mode: CenterMode) -> TransformResult<Vector3<f64>> {
    let target = match mode {
        CenterMode::Centroid => mesh.centroid().ok_or(TransformError::EmptyMesh)?.coords,
        CenterMode::BoundsCenter => compute_bounds(mesh)?.center().coords,
        CenterMode::Origin => {
            if mesh.vertices.is_empty() {
                return Err(TransformError::EmptyMesh);
            }
            Vector3::zeros()
        }
    };

    let offset = -target;
    mesh.translate(offset);
    debug!("Centered mesh on {} (offset {:?})", mode, offset);
    Ok(offset)
}

/// Multiply every coordinate by `factor`.
///
/// Volume scales by `factor³`. A negative factor mirrors the mesh and turns
/// it inside-out; that is left for diagnostics to report.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] if `factor` is zero or
/// not finite, and [`TransformError::EmptyMesh`] if there are no vertices.
pub fn scale(mesh: &mut Mesh, factor: f64) -> TransformResult<()> {
    if factor == 0.0 || !factor.is_finite() {
        return Err(TransformError::InvalidScaleFactor { factor });
    }
    if mesh.vertices.is_empty() {
        return Err(TransformError::EmptyMesh);
    }
    mesh.scale(factor);
    debug!("Scaled mesh by {}", factor);
    Ok(())
}

/// Rotate the mesh about its vertex centroid so its principal axis points
/// along `target`.
///
/// The principal axis is the eigenvector of the largest eigenvalue of the
/// vertex covariance. Its sign is arbitrary, and so is the roll about the
/// axis, so a mesh may end up pointing along `-target` or spun about it.
/// Returns the rotation that was applied.
///
/// # Errors
///
/// Returns [`TransformError::InsufficientPoints`] for fewer than 3
/// vertices, and [`TransformError::Alignment`] if `target` is zero.
///
/// # Example
///
/// ```
/// use neuromesh_transform::align_principal_axis;
/// use neuromesh_types::{Axis, CylinderParams, Vector3, cylinder};
///
/// let mut mesh = cylinder(&CylinderParams::default().with_axis(Axis::X)).unwrap();
/// align_principal_axis(&mut mesh, &Vector3::z()).unwrap();
///
/// let b = mesh.bounds().unwrap();
/// assert!((b.z().1 - b.z().0 - 100.0).abs() < 1e-6);
/// ```
pub fn align_principal_axis(
    mesh: &mut Mesh,
    target: &Vector3<f64>,
) -> TransformResult<Matrix3<f64>> {
    let pca = pca_axes(mesh)?;
    let rotation = rotation_between(&pca.principal_axis(), target)
        .map_err(|source| TransformError::Alignment { source })?;

    let pivot = pca.centroid;
    for vertex in &mut mesh.vertices {
        let local = vertex.position - pivot;
        vertex.position = pivot + rotation * local;
    }

    debug!(
        "Aligned principal axis {:?} with {:?}",
        pca.principal_axis(),
        target
    );
    Ok(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use neuromesh_geometry::GeometryError;
    use neuromesh_types::{Axis, CylinderParams, TorusParams, cylinder, torus, unit_cube};

    #[test]
    fn center_mode_names_round_trip() {
        for mode in [CenterMode::Centroid, CenterMode::BoundsCenter, CenterMode::Origin] {
            assert_eq!(mode.name().parse::<CenterMode>().unwrap(), mode);
        }
        assert_eq!(
            "middle".parse::<CenterMode>(),
            Err(TransformError::InvalidMode {
                mode: "middle".to_string()
            })
        );
    }

    #[test]
    fn centroid_centering_reaches_origin() {
        let params = CylinderParams::default().with_center(Point3::new(3.0, -7.0, 12.0));
        let mut mesh = cylinder(&params).unwrap();
        center(&mut mesh, CenterMode::Centroid).unwrap();
        assert_relative_eq!(mesh.centroid().unwrap().coords.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn bounds_centering_reaches_origin() {
        let mut mesh = torus(&TorusParams::default().with_center(Point3::new(1.0, 2.0, 3.0))).unwrap();
        center(&mut mesh, CenterMode::BoundsCenter).unwrap();
        let c = compute_bounds(&mesh).unwrap().center();
        assert_relative_eq!(c.coords.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn origin_mode_is_noop() {
        let mut cube = unit_cube();
        let offset = center(&mut cube, CenterMode::Origin).unwrap();
        assert_eq!(offset, Vector3::zeros());
        assert_eq!(cube, unit_cube());
    }

    #[test]
    fn empty_mesh_errors() {
        let mut mesh = Mesh::new();
        assert_eq!(compute_bounds(&mesh), Err(TransformError::EmptyMesh));
        assert_eq!(center(&mut mesh, CenterMode::Origin), Err(TransformError::EmptyMesh));
        assert_eq!(scale(&mut mesh, 2.0), Err(TransformError::EmptyMesh));
    }

    #[test]
    fn scale_cubes_volume() {
        let mut mesh = cylinder(&CylinderParams::default()).unwrap();
        let before = mesh.signed_volume();
        scale(&mut mesh, 1.5).unwrap();
        assert_relative_eq!(mesh.signed_volume(), before * 1.5_f64.powi(3), max_relative = 1e-9);
    }

    #[test]
    fn negative_scale_inverts_volume() {
        let mut cube = unit_cube();
        scale(&mut cube, -2.0).unwrap();
        assert_relative_eq!(cube.signed_volume(), -8.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_scale_factors() {
        let mut cube = unit_cube();
        for factor in [0.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                scale(&mut cube, factor),
                Err(TransformError::InvalidScaleFactor { .. })
            ));
        }
    }

    #[test]
    fn alignment_puts_long_axis_on_target() {
        for axis in [Axis::X, Axis::Y] {
            let mut mesh = cylinder(&CylinderParams::default().with_axis(axis)).unwrap();
            let volume = mesh.signed_volume();
            align_principal_axis(&mut mesh, &Vector3::z()).unwrap();

            let pca = pca_axes(&mesh).unwrap();
            assert_relative_eq!(pca.principal_axis().z.abs(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(mesh.signed_volume(), volume, max_relative = 1e-9);
        }
    }

    #[test]
    fn alignment_keeps_centroid() {
        let params = CylinderParams::default()
            .with_axis(Axis::Y)
            .with_center(Point3::new(4.0, 5.0, 6.0));
        let mut mesh = cylinder(&params).unwrap();
        let before = mesh.vertex_centroid().unwrap();
        align_principal_axis(&mut mesh, &Vector3::x()).unwrap();
        let after = mesh.vertex_centroid().unwrap();
        assert_relative_eq!((after - before).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_target_is_alignment_error() {
        let mut mesh = cylinder(&CylinderParams::default()).unwrap();
        let err = align_principal_axis(&mut mesh, &Vector3::zeros()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Alignment {
                source: GeometryError::DegenerateVector { .. }
            }
        ));
    }
}
