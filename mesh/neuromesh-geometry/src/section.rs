//! Planar sections.
//!
//! Intersects every triangle with a plane and chains the resulting segments
//! into ordered polylines. Closed contours repeat their first point at the
//! end.

use nalgebra::{Point3, Vector3};
use neuromesh_types::Mesh;

use crate::error::GeometryResult;
use crate::vector::normalize;

/// Endpoint matching tolerance when chaining segments.
const CHAIN_EPSILON: f64 = 1e-6;

/// Slice `mesh` with the plane through `origin` with normal `normal`.
///
/// # Errors
///
/// Returns [`crate::GeometryError::DegenerateVector`] if `normal` is zero.
///
/// # Example
///
/// ```
/// use neuromesh_geometry::section_loops;
/// use neuromesh_types::{unit_cube, Point3, Vector3};
///
/// let loops = section_loops(&unit_cube(), Point3::new(0.5, 0.5, 0.5), Vector3::z()).unwrap();
/// assert_eq!(loops.len(), 1);
/// ```
pub fn section_loops(
    mesh: &Mesh,
    origin: Point3<f64>,
    normal: Vector3<f64>,
) -> GeometryResult<Vec<Vec<Point3<f64>>>> {
    let normal = normalize(&normal)?;

    let mut segments: Vec<(Point3<f64>, Point3<f64>)> = Vec::new();
    for tri in mesh.triangles() {
        let mut hits: Vec<Point3<f64>> = Vec::with_capacity(3);
        for (a, b) in [(tri.v0, tri.v1), (tri.v1, tri.v2), (tri.v2, tri.v0)] {
            if let Some(p) = plane_edge_intersection(origin, normal, a, b)
                && !hits.iter().any(|h| (h - p).norm() < CHAIN_EPSILON)
            {
                hits.push(p);
            }
        }
        if hits.len() == 2 {
            segments.push((hits[0], hits[1]));
        }
    }

    Ok(chain_segments(segments))
}

fn plane_edge_intersection(
    plane_point: Point3<f64>,
    plane_normal: Vector3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
) -> Option<Point3<f64>> {
    let d_a = (a - plane_point).dot(&plane_normal);
    let d_b = (b - plane_point).dot(&plane_normal);

    if d_a * d_b > 0.0 {
        return None;
    }
    if (d_a - d_b).abs() < 1e-10 {
        return None;
    }

    let t = d_a / (d_a - d_b);
    Some(a + (b - a) * t)
}

fn chain_segments(mut remaining: Vec<(Point3<f64>, Point3<f64>)>) -> Vec<Vec<Point3<f64>>> {
    let mut contours = Vec::new();

    while let Some((first, second)) = remaining.pop() {
        let mut contour = vec![first, second];

        let mut changed = true;
        while changed {
            changed = false;
            let start = contour[0];
            let end = contour[contour.len() - 1];
            if contour.len() > 2 && (start - end).norm() < CHAIN_EPSILON {
                break;
            }

            for i in (0..remaining.len()).rev() {
                let (p, q) = remaining[i];
                let end = contour[contour.len() - 1];
                if (p - end).norm() < CHAIN_EPSILON {
                    contour.push(q);
                } else if (q - end).norm() < CHAIN_EPSILON {
                    contour.push(p);
                } else if (p - start).norm() < CHAIN_EPSILON {
                    contour.insert(0, q);
                } else if (q - start).norm() < CHAIN_EPSILON {
                    contour.insert(0, p);
                } else {
                    continue;
                }
                remaining.swap_remove(i);
                changed = true;
                break;
            }
        }

        contours.push(contour);
    }

    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_types::{CylinderParams, cylinder, unit_cube};

    #[test]
    fn cube_midsection_is_closed_square() {
        let loops = section_loops(&unit_cube(), Point3::new(0.0, 0.0, 0.5), Vector3::z()).unwrap();
        assert_eq!(loops.len(), 1);
        let contour = &loops[0];
        let first = contour[0];
        let last = contour[contour.len() - 1];
        assert!((first - last).norm() < CHAIN_EPSILON);
        assert!(contour.iter().all(|p| (p.z - 0.5).abs() < 1e-12));
    }

    #[test]
    fn plane_outside_mesh_is_empty() {
        let loops = section_loops(&unit_cube(), Point3::new(0.0, 0.0, 5.0), Vector3::z()).unwrap();
        assert!(loops.is_empty());
    }

    #[test]
    fn cylinder_cross_section_is_circle() {
        let mesh = cylinder(&CylinderParams::default()).unwrap();
        let loops = section_loops(&mesh, Point3::origin(), Vector3::z()).unwrap();
        assert_eq!(loops.len(), 1);
        for p in &loops[0] {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!(r <= 5.0 + 1e-9 && r > 4.9);
        }
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(section_loops(&unit_cube(), Point3::origin(), Vector3::zeros()).is_err());
    }
}
