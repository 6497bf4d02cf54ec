//! The geometry kernel contract and its native implementation.

use hashbrown::HashSet;
use nalgebra::{Point3, Vector3};
use neuromesh_types::Mesh;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::adjacency::MeshAdjacency;
use crate::components::split_into_components;
use crate::error::{GeometryError, GeometryResult};
use crate::holes::fill_holes;
use crate::section::section_loops;
use crate::winding::fix_winding_order;

/// Raw measurements and in-place fixes that diagnostics and repair are
/// built on.
///
/// Every method may fail; callers decide whether a failure is fatal. All
/// in-place operations return how many faces or holes they touched.
pub trait GeometryKernel {
    /// Signed enclosed volume (negative when inside-out).
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn signed_volume(&self, mesh: &Mesh) -> GeometryResult<f64>;

    /// Every edge is shared by exactly two faces.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn is_watertight(&self, mesh: &Mesh) -> GeometryResult<bool>;

    /// Neighboring faces agree on orientation.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn is_winding_consistent(&self, mesh: &Mesh) -> GeometryResult<bool>;

    /// Manifoldness, or `None` when the kernel cannot decide.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn is_manifold(&self, mesh: &Mesh) -> GeometryResult<Option<bool>>;

    /// `V − E + F`.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn euler_characteristic(&self, mesh: &Mesh) -> GeometryResult<i64>;

    /// Area of every face, in face order.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn face_areas(&self, mesh: &Mesh) -> GeometryResult<Vec<f64>>;

    /// Unit normal of every face, in face order.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn face_normals(&self, mesh: &Mesh) -> GeometryResult<Vec<Vector3<f64>>>;

    /// Drop repeated faces, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn remove_duplicate_faces(&self, mesh: &mut Mesh) -> GeometryResult<usize>;

    /// Drop near-zero-area faces, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn remove_degenerate_faces(&self, mesh: &mut Mesh) -> GeometryResult<usize>;

    /// Close boundary loops, returning how many were filled.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex or a hole cannot be
    /// triangulated.
    fn fill_holes(&self, mesh: &mut Mesh) -> GeometryResult<usize>;

    /// Re-orient faces consistently, returning how many were reversed.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex or the surface is not
    /// orientable.
    fn fix_normals(&self, mesh: &mut Mesh) -> GeometryResult<usize>;

    /// Connected components, ordered by their first face.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn split(&self, mesh: &Mesh) -> GeometryResult<Vec<Mesh>>;

    /// Reverse the winding of every face.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn invert(&self, mesh: &mut Mesh) -> GeometryResult<()>;

    /// Ordered point loops where the plane cuts the surface.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex or `normal` is zero.
    fn section(
        &self,
        mesh: &Mesh,
        origin: Point3<f64>,
        normal: Vector3<f64>,
    ) -> GeometryResult<Vec<Vec<Point3<f64>>>>;

    /// Validate the mesh and drop unreferenced vertices, returning how many
    /// were removed. A mesh left without faces loses all its vertices.
    ///
    /// # Errors
    ///
    /// Fails when a face references a missing vertex.
    fn process(&self, mesh: &mut Mesh) -> GeometryResult<usize>;
}

/// Native [`GeometryKernel`] built on edge adjacency.
///
/// # Example
///
/// ```
/// use neuromesh_geometry::{GeometryKernel, TopologyKernel};
/// use neuromesh_types::unit_cube;
///
/// let kernel = TopologyKernel::default();
/// let cube = unit_cube();
///
/// assert!(kernel.is_watertight(&cube).unwrap());
/// assert_eq!(kernel.euler_characteristic(&cube).unwrap(), 2);
/// assert!((kernel.signed_volume(&cube).unwrap() - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopologyKernel {
    /// Faces with area below this are degenerate.
    /// Default: `1e-8`
    pub degenerate_area_threshold: f64,

    /// Holes with more edges than this are left open.
    /// Default: `1000`
    pub max_hole_edges: usize,
}

impl Default for TopologyKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyKernel {
    /// Kernel with default thresholds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            degenerate_area_threshold: 1e-8,
            max_hole_edges: 1000,
        }
    }

    /// Set the degenerate-face area threshold.
    #[must_use]
    pub const fn with_degenerate_area_threshold(mut self, threshold: f64) -> Self {
        self.degenerate_area_threshold = threshold;
        self
    }

    /// Set the largest hole (in edges) that will be filled.
    #[must_use]
    pub const fn with_max_hole_edges(mut self, max: usize) -> Self {
        self.max_hole_edges = max;
        self
    }
}

fn checked(mesh: &Mesh) -> GeometryResult<()> {
    mesh.validate_indices().map_err(GeometryError::from)
}

/// Face with its smallest index first, keeping its cyclic order.
fn rotate_to_min(face: [u32; 3]) -> [u32; 3] {
    let min_idx = if face[0] <= face[1] && face[0] <= face[2] {
        0
    } else if face[1] <= face[2] {
        1
    } else {
        2
    };
    [face[min_idx], face[(min_idx + 1) % 3], face[(min_idx + 2) % 3]]
}

impl GeometryKernel for TopologyKernel {
    fn signed_volume(&self, mesh: &Mesh) -> GeometryResult<f64> {
        checked(mesh)?;
        Ok(mesh.signed_volume())
    }

    fn is_watertight(&self, mesh: &Mesh) -> GeometryResult<bool> {
        checked(mesh)?;
        Ok(MeshAdjacency::build(&mesh.faces).is_watertight())
    }

    fn is_winding_consistent(&self, mesh: &Mesh) -> GeometryResult<bool> {
        checked(mesh)?;
        Ok(MeshAdjacency::build(&mesh.faces).is_winding_consistent())
    }

    fn is_manifold(&self, mesh: &Mesh) -> GeometryResult<Option<bool>> {
        checked(mesh)?;
        Ok(Some(MeshAdjacency::build(&mesh.faces).is_manifold(&mesh.faces)))
    }

    #[allow(clippy::cast_possible_wrap)]
    fn euler_characteristic(&self, mesh: &Mesh) -> GeometryResult<i64> {
        checked(mesh)?;
        let adj = MeshAdjacency::build(&mesh.faces);
        let v = adj.vertex_count() as i64;
        let e = adj.edge_count() as i64;
        let f = mesh.faces.len() as i64;
        Ok(v - e + f)
    }

    fn face_areas(&self, mesh: &Mesh) -> GeometryResult<Vec<f64>> {
        checked(mesh)?;
        Ok(mesh.triangles().map(|tri| tri.area()).collect())
    }

    fn face_normals(&self, mesh: &Mesh) -> GeometryResult<Vec<Vector3<f64>>> {
        checked(mesh)?;
        Ok(mesh
            .triangles()
            .map(|tri| tri.normal().unwrap_or_else(Vector3::zeros))
            .collect())
    }

    fn remove_duplicate_faces(&self, mesh: &mut Mesh) -> GeometryResult<usize> {
        checked(mesh)?;
        let before = mesh.faces.len();
        let mut seen: HashSet<[u32; 3]> = HashSet::new();
        mesh.faces.retain(|&face| {
            let fwd = rotate_to_min(face);
            let rev = rotate_to_min([face[0], face[2], face[1]]);
            if seen.contains(&fwd) || seen.contains(&rev) {
                false
            } else {
                seen.insert(fwd);
                true
            }
        });
        let removed = before - mesh.faces.len();
        debug!("Removed {} duplicate faces", removed);
        Ok(removed)
    }

    fn remove_degenerate_faces(&self, mesh: &mut Mesh) -> GeometryResult<usize> {
        checked(mesh)?;
        let before = mesh.faces.len();
        let threshold = self.degenerate_area_threshold;
        let vertices = &mesh.vertices;
        mesh.faces.retain(|&[a, b, c]| {
            let (p0, p1, p2) = (
                vertices[a as usize].position,
                vertices[b as usize].position,
                vertices[c as usize].position,
            );
            (p1 - p0).cross(&(p2 - p0)).norm() * 0.5 >= threshold
        });
        let removed = before - mesh.faces.len();
        debug!("Removed {} degenerate faces", removed);
        Ok(removed)
    }

    fn fill_holes(&self, mesh: &mut Mesh) -> GeometryResult<usize> {
        checked(mesh)?;
        fill_holes(mesh, self.max_hole_edges)
    }

    fn fix_normals(&self, mesh: &mut Mesh) -> GeometryResult<usize> {
        checked(mesh)?;
        fix_winding_order(mesh)
    }

    fn split(&self, mesh: &Mesh) -> GeometryResult<Vec<Mesh>> {
        checked(mesh)?;
        Ok(split_into_components(mesh))
    }

    fn invert(&self, mesh: &mut Mesh) -> GeometryResult<()> {
        checked(mesh)?;
        mesh.invert();
        Ok(())
    }

    fn section(
        &self,
        mesh: &Mesh,
        origin: Point3<f64>,
        normal: Vector3<f64>,
    ) -> GeometryResult<Vec<Vec<Point3<f64>>>> {
        checked(mesh)?;
        section_loops(mesh, origin, normal)
    }

    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
    #[allow(clippy::cast_possible_truncation)]
    fn process(&self, mesh: &mut Mesh) -> GeometryResult<usize> {
        checked(mesh)?;

        let mut referenced = vec![false; mesh.vertices.len()];
        for face in &mesh.faces {
            for &v in face {
                referenced[v as usize] = true;
            }
        }

        let mut remap = vec![0u32; mesh.vertices.len()];
        let mut next = 0u32;
        for (old, &keep) in referenced.iter().enumerate() {
            if keep {
                remap[old] = next;
                next += 1;
            }
        }

        let before = mesh.vertices.len();
        if next as usize == before {
            return Ok(0);
        }

        let mut keep = referenced.iter();
        mesh.vertices.retain(|_| keep.next().copied().unwrap_or(false));
        for face in &mut mesh.faces {
            *face = face.map(|v| remap[v as usize]);
        }

        let removed = before - mesh.vertices.len();
        debug!("Removed {} unreferenced vertices", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_types::{CylinderParams, TorusParams, Vertex, cylinder, torus, unit_cube};

    fn kernel() -> TopologyKernel {
        TopologyKernel::default()
    }

    #[test]
    fn euler_characteristic_of_fixtures() {
        let k = kernel();
        assert_eq!(k.euler_characteristic(&unit_cube()).unwrap(), 2);
        let cyl = cylinder(&CylinderParams::default()).unwrap();
        assert_eq!(k.euler_characteristic(&cyl).unwrap(), 2);
        let tor = torus(&TorusParams::default()).unwrap();
        assert_eq!(k.euler_characteristic(&tor).unwrap(), 0);
    }

    #[test]
    fn fixtures_are_watertight_consistent_manifold() {
        let k = kernel();
        for mesh in [
            unit_cube(),
            cylinder(&CylinderParams::default()).unwrap(),
            torus(&TorusParams::default()).unwrap(),
        ] {
            assert!(k.is_watertight(&mesh).unwrap());
            assert!(k.is_winding_consistent(&mesh).unwrap());
            assert_eq!(k.is_manifold(&mesh).unwrap(), Some(true));
        }
    }

    #[test]
    fn bad_index_is_an_error_not_a_panic() {
        let k = kernel();
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 42]);

        assert!(matches!(
            k.signed_volume(&mesh),
            Err(GeometryError::InvalidIndex { face: 12, index: 42, .. })
        ));
        assert!(k.face_areas(&mesh).is_err());
        assert!(k.remove_degenerate_faces(&mut mesh).is_err());
        assert!(k.process(&mut mesh).is_err());
    }

    #[test]
    fn duplicate_faces_in_any_orientation() {
        let k = kernel();
        let mut mesh = unit_cube();
        mesh.faces.push(mesh.faces[0]);
        mesh.faces.push([mesh.faces[1][1], mesh.faces[1][2], mesh.faces[1][0]]);
        mesh.faces.push([mesh.faces[2][0], mesh.faces[2][2], mesh.faces[2][1]]);
        assert_eq!(k.remove_duplicate_faces(&mut mesh).unwrap(), 3);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn degenerate_faces_removed_by_area() {
        let k = kernel();
        let mut mesh = unit_cube();
        mesh.vertices.push(Vertex::from_coords(0.5, 0.0, 0.0));
        mesh.faces.push([0, 1, 8]);
        assert_eq!(k.remove_degenerate_faces(&mut mesh).unwrap(), 1);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn normals_of_degenerate_faces_are_zero() {
        let k = kernel();
        let mut mesh = unit_cube();
        mesh.faces.push([0, 0, 1]);
        let normals = k.face_normals(&mesh).unwrap();
        assert_eq!(normals.len(), 13);
        assert_eq!(normals[12], Vector3::zeros());
        assert!((normals[0].norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn process_compacts_vertices() {
        let k = kernel();
        let mut mesh = unit_cube();
        mesh.vertices.insert(0, Vertex::from_coords(9.0, 9.0, 9.0));
        for face in &mut mesh.faces {
            *face = face.map(|v| v + 1);
        }
        assert_eq!(k.process(&mut mesh).unwrap(), 1);
        assert_eq!(mesh, unit_cube());
    }

    #[test]
    fn process_accepts_faceless_mesh() {
        assert_eq!(kernel().process(&mut Mesh::new()), Ok(0));

        let mut mesh = unit_cube();
        mesh.faces.clear();
        assert_eq!(kernel().process(&mut mesh), Ok(8));
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn open_surface_is_not_watertight() {
        let mut mesh = unit_cube();
        mesh.faces.pop();
        assert!(!kernel().is_watertight(&mesh).unwrap());
        assert_eq!(kernel().euler_characteristic(&mesh).unwrap(), 1);
    }
}
