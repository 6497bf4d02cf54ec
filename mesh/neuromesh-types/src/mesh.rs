//! Indexed triangle mesh.

use crate::{Bounds, MeshError, MeshResult, Metadata, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. Faces never point back at anything, so the mesh is
/// a plain value: cloning it yields a fully independent copy.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Vertex positions
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
/// - `metadata`: [`Metadata`] - Provenance information (repair log, fixture parameters)
///
/// The fields are public. Code that builds faces by hand can break the
/// in-range index invariant; [`Mesh::validate_indices`] detects that.
///
/// # Example
///
/// ```
/// use neuromesh_types::{Mesh, Vertex};
///
/// let mut mesh = Mesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// assert!(mesh.validate_indices().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,

    /// Informational key/value map.
    pub metadata: Metadata,
}

impl Mesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            metadata: Metadata::new(),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            metadata: Metadata::new(),
        }
    }

    /// Create a mesh from flat coordinate and index buffers.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::RaggedBuffer`] if either buffer length is not a
    /// multiple of three.
    ///
    /// # Example
    ///
    /// ```
    /// use neuromesh_types::Mesh;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = Mesh::from_raw(&positions, &[0, 1, 2]).unwrap();
    /// assert_eq!(mesh.vertex_count(), 3);
    ///
    /// assert!(Mesh::from_raw(&positions[..4], &[0, 1, 2]).is_err());
    /// ```
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> MeshResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::RaggedBuffer {
                what: "position",
                len: positions.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedBuffer {
                what: "index",
                len: indices.len(),
            });
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();
        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Ok(Self::from_parts(vertices, faces))
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// A mesh is empty when it has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Check that every face index refers to an existing vertex.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfRange`] for the first offending face.
    pub fn validate_indices(&self) -> MeshResult<()> {
        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Resolve a face into a [`Triangle`].
    ///
    /// Returns `None` if the face or any of its vertices does not exist.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle {
            v0: self.vertices.get(i0 as usize)?.position,
            v1: self.vertices.get(i1 as usize)?.position,
            v2: self.vertices.get(i2 as usize)?.position,
        })
    }

    /// Iterate over all resolvable faces as triangles.
    ///
    /// Faces with out-of-range indices are skipped; use
    /// [`Mesh::validate_indices`] first when that matters.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    /// Iterate over vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.vertices.iter().map(|v| &v.position)
    }

    /// Per-axis bounds of the vertices, or `None` without vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.positions())
    }

    /// Arithmetic mean of the vertex positions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vertex_centroid(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.positions().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.vertices.len() as f64))
    }

    /// Area-weighted centroid of the surface.
    ///
    /// Each face contributes its centroid weighted by its area. Falls back
    /// to [`Mesh::vertex_centroid`] when the surface has no area.
    #[must_use]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        let mut weighted = Vector3::zeros();
        let mut total_area = 0.0;
        for tri in self.triangles() {
            let area = tri.area();
            weighted += tri.centroid().coords * area;
            total_area += area;
        }

        if total_area > f64::EPSILON {
            Some(Point3::from(weighted / total_area))
        } else {
            self.vertex_centroid()
        }
    }

    /// Signed volume by the divergence theorem.
    ///
    /// Positive for a closed mesh with outward (CCW) winding, negative when
    /// inside-out. Not meaningful for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|tri| tri.signed_volume_from_origin())
            .sum()
    }

    /// Absolute value of [`Mesh::signed_volume`].
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Multiply every coordinate by `factor` (scaling about the origin).
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Reverse the winding of every face.
    pub fn invert(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// Metadata of `other` is not merged.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
    pub fn merge(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_cube;
    use approx::assert_relative_eq;

    #[test]
    fn mesh_is_empty() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = Mesh::new();
        mesh2.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(mesh2.is_empty());

        mesh2.faces.push([0, 0, 0]);
        assert!(!mesh2.is_empty());
    }

    #[test]
    fn validate_reports_first_bad_face() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 99]);
        let err = mesh.validate_indices().unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                face: 12,
                index: 99,
                vertex_count: 8
            }
        );
    }

    #[test]
    fn bad_faces_are_skipped_by_triangles() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 99]);
        assert_eq!(mesh.triangles().count(), 12);
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn empty_mesh_has_no_bounds_or_centroid() {
        let mesh = Mesh::new();
        assert!(mesh.bounds().is_none());
        assert!(mesh.centroid().is_none());
    }

    #[test]
    fn unit_cube_volume_and_area() {
        let cube = unit_cube();
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(cube.surface_area(), 6.0, epsilon = 1e-10);
    }

    #[test]
    fn unit_cube_centroid() {
        let c = unit_cube().centroid().unwrap();
        assert_relative_eq!(c.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.z, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn invert_negates_volume() {
        let mut cube = unit_cube();
        cube.invert();
        assert_relative_eq!(cube.signed_volume(), -1.0, epsilon = 1e-10);
    }

    #[test]
    fn scale_cubes_volume() {
        let mut cube = unit_cube();
        cube.scale(2.0);
        assert_relative_eq!(cube.volume(), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn merge_offsets_indices() {
        let mut a = unit_cube();
        let b = unit_cube();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 16);
        assert_eq!(a.face_count(), 24);
        assert_eq!(a.faces[12], [8, 10, 9]);
    }

    #[test]
    fn translate_moves_bounds() {
        let mut cube = unit_cube();
        cube.translate(Vector3::new(1.0, 2.0, 3.0));
        let b = cube.bounds().unwrap();
        assert_eq!(b.x(), (1.0, 2.0));
        assert_eq!(b.z(), (3.0, 4.0));
    }

    #[test]
    fn clone_is_independent() {
        let original = unit_cube();
        let mut copy = original.clone();
        copy.scale(3.0);
        assert_ne!(copy, original);
        assert_relative_eq!(original.volume(), 1.0, epsilon = 1e-10);
    }
}
