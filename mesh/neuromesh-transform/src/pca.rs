//! Principal Component Analysis for mesh vertices.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use neuromesh_types::Mesh;

use crate::error::{TransformError, TransformResult};

/// Result of PCA on a vertex cloud.
///
/// Axes are sorted by variance (largest first).
#[derive(Debug, Clone, PartialEq)]
pub struct PcaResult {
    /// Mean of the vertex positions.
    pub centroid: Point3<f64>,
    /// Unit eigenvectors, sorted by eigenvalue descending.
    /// `axes[0]` is the direction of maximum variance.
    pub axes: [Vector3<f64>; 3],
    /// Variances along each axis, sorted descending.
    pub eigenvalues: [f64; 3],
}

impl PcaResult {
    /// Direction of maximum variance.
    ///
    /// Its sign is arbitrary.
    #[must_use]
    pub const fn principal_axis(&self) -> Vector3<f64> {
        self.axes[0]
    }

    /// Largest eigenvalue divided by the second largest.
    ///
    /// Near 1 the principal axis is poorly defined.
    #[must_use]
    pub fn elongation(&self) -> f64 {
        if self.eigenvalues[1] <= f64::EPSILON {
            f64::INFINITY
        } else {
            self.eigenvalues[0] / self.eigenvalues[1]
        }
    }
}

/// Compute PCA over the vertices of `mesh`.
///
/// # Errors
///
/// Returns [`TransformError::InsufficientPoints`] if the mesh has fewer
/// than 3 vertices.
///
/// # Example
///
/// ```
/// use neuromesh_transform::pca_axes;
/// use neuromesh_types::{Axis, CylinderParams, cylinder};
///
/// let mesh = cylinder(&CylinderParams::default().with_axis(Axis::X)).unwrap();
/// let pca = pca_axes(&mesh).unwrap();
/// assert!(pca.principal_axis().x.abs() > 0.99);
/// ```
#[allow(clippy::cast_precision_loss)]
// Precision loss: vertex counts beyond 2^52 are unsupported
pub fn pca_axes(mesh: &Mesh) -> TransformResult<PcaResult> {
    let count = mesh.vertices.len();
    if count < 3 {
        return Err(TransformError::InsufficientPoints {
            required: 3,
            actual: count,
        });
    }

    let n = count as f64;
    let mean: Vector3<f64> = mesh.positions().map(|p| p.coords).sum::<Vector3<f64>>() / n;

    let mut covariance = Matrix3::zeros();
    for p in mesh.positions() {
        let d = p.coords - mean;
        covariance += d * d.transpose();
    }
    covariance /= n;

    let eigen = SymmetricEigen::new(covariance);
    let eigenvalues = eigen.eigenvalues;
    let eigenvectors = eigen.eigenvectors;

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));

    Ok(PcaResult {
        centroid: Point3::from(mean),
        axes: order.map(|i| eigenvectors.column(i).into_owned()),
        eigenvalues: order.map(|i| eigenvalues[i]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use neuromesh_types::{Axis, CylinderParams, Vertex, cylinder};

    #[test]
    fn too_few_vertices() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert_eq!(
            pca_axes(&mesh),
            Err(TransformError::InsufficientPoints {
                required: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn cylinder_axis_is_principal() {
        for axis in Axis::ALL {
            let mesh = cylinder(&CylinderParams::default().with_axis(axis)).unwrap();
            let pca = pca_axes(&mesh).unwrap();
            assert_relative_eq!(pca.principal_axis()[axis.index()].abs(), 1.0, epsilon = 1e-9);
            assert!(pca.eigenvalues[0] >= pca.eigenvalues[1]);
            assert!(pca.eigenvalues[1] >= pca.eigenvalues[2]);
            assert!(pca.elongation() > 10.0);
        }
    }

    #[test]
    fn axes_are_orthonormal() {
        let mesh = cylinder(&CylinderParams::default()).unwrap();
        let pca = pca_axes(&mesh).unwrap();
        for (i, a) in pca.axes.iter().enumerate() {
            assert_relative_eq!(a.norm(), 1.0, epsilon = 1e-12);
            for b in &pca.axes[i + 1..] {
                assert_relative_eq!(a.dot(b), 0.0, epsilon = 1e-9);
            }
        }
    }
}
