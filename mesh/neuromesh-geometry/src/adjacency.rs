//! Edge and vertex adjacency for indexed faces.
//!
//! Every topological query in the kernel (watertightness, winding
//! consistency, manifoldness, Euler characteristic, boundary loops) is
//! answered from one [`MeshAdjacency`] pass over the face list.

use hashbrown::{HashMap, HashSet};

/// An undirected edge with `0 <= 1`.
pub type EdgeKey = (u32, u32);

/// Adjacency information for a face list.
///
/// Provides lookups for:
/// - Faces adjacent to an undirected edge
/// - Faces adjacent to a vertex
/// - How often each directed edge is traversed
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Undirected edge to the faces using it.
    edge_to_faces: HashMap<EdgeKey, Vec<usize>>,
    /// Vertex to the faces using it.
    vertex_to_faces: HashMap<u32, Vec<usize>>,
    /// Directed edge to traversal count.
    directed: HashMap<(u32, u32), u32>,
}

impl MeshAdjacency {
    /// Build adjacency from a face list.
    ///
    /// Collapsed edges (both ends the same vertex) are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use neuromesh_geometry::MeshAdjacency;
    ///
    /// let adj = MeshAdjacency::build(&[[0, 1, 2], [1, 3, 2]]);
    /// assert_eq!(adj.edge_count(), 5);
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// assert!(adj.is_winding_consistent());
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut adj = Self::default();

        for (face_idx, face) in faces.iter().enumerate() {
            for &v in face {
                let list = adj.vertex_to_faces.entry(v).or_default();
                if list.last() != Some(&face_idx) {
                    list.push(face_idx);
                }
            }

            for (a, b) in face_edges(*face) {
                if a == b {
                    continue;
                }
                adj.edge_to_faces
                    .entry(edge_key(a, b))
                    .or_default()
                    .push(face_idx);
                *adj.directed.entry((a, b)).or_default() += 1;
            }
        }

        adj
    }

    /// Faces adjacent to an edge, in either direction.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_to_faces
            .get(&edge_key(v0, v1))
            .map(Vec::as_slice)
    }

    /// Faces adjacent to a vertex; empty if the vertex is unreferenced.
    #[must_use]
    pub fn faces_for_vertex(&self, v: u32) -> &[usize] {
        self.vertex_to_faces.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Edges with exactly one adjacent face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Number of boundary edges.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Number of edges shared by more than two faces.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Every edge is shared by exactly two faces.
    ///
    /// A face list with no edges is not watertight.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        !self.edge_to_faces.is_empty() && self.edge_to_faces.values().all(|f| f.len() == 2)
    }

    /// No directed edge is traversed more than once.
    ///
    /// Two neighbors that agree on orientation traverse their shared edge
    /// in opposite directions.
    #[must_use]
    pub fn is_winding_consistent(&self) -> bool {
        self.directed.values().all(|&count| count == 1)
    }

    /// Every edge has at most two faces and every vertex is a single fan.
    #[must_use]
    pub fn is_manifold(&self, faces: &[[u32; 3]]) -> bool {
        self.non_manifold_edge_count() == 0
            && self
                .vertex_to_faces
                .iter()
                .all(|(&v, incident)| fan_count(v, incident, faces) <= 1)
    }

    /// Number of unique undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Number of vertices referenced by at least one face.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_to_faces.len()
    }
}

/// The three directed edges of a face.
#[inline]
pub(crate) fn face_edges(face: [u32; 3]) -> [(u32, u32); 3] {
    [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
}

/// Normalize edge direction so v0 < v1.
#[inline]
pub(crate) fn edge_key(v0: u32, v1: u32) -> EdgeKey {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}

/// Number of edge-connected fans of faces around `vertex`.
///
/// Two incident faces belong to the same fan when they share an edge
/// that ends at `vertex`.
fn fan_count(vertex: u32, incident: &[usize], faces: &[[u32; 3]]) -> usize {
    let mut parent: Vec<usize> = (0..incident.len()).collect();
    let mut first_by_spoke: HashMap<u32, usize> = HashMap::new();

    for (slot, &face_idx) in incident.iter().enumerate() {
        let Some(face) = faces.get(face_idx) else {
            continue;
        };
        for &other in face.iter().filter(|&&w| w != vertex) {
            match first_by_spoke.get(&other) {
                Some(&seen) => union(&mut parent, seen, slot),
                None => {
                    first_by_spoke.insert(other, slot);
                }
            }
        }
    }

    let roots: HashSet<usize> = (0..incident.len()).map(|i| find(&mut parent, i)).collect();
    roots.len()
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[rb] = ra;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_types::unit_cube;

    #[test]
    fn single_triangle() {
        let adj = MeshAdjacency::build(&[[0, 1, 2]]);
        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.vertex_count(), 3);
        assert_eq!(adj.boundary_edge_count(), 3);
        assert!(!adj.is_watertight());
    }

    #[test]
    fn edge_lookup_ignores_direction() {
        let adj = MeshAdjacency::build(&[[0, 1, 2], [1, 3, 2]]);
        assert_eq!(adj.faces_for_edge(2, 1), Some(&[0, 1][..]));
        assert_eq!(adj.faces_for_edge(0, 1).map(<[usize]>::len), Some(1));
        assert!(adj.faces_for_edge(0, 3).is_none());
        assert_eq!(adj.faces_for_vertex(2).len(), 2);
        assert!(adj.faces_for_vertex(99).is_empty());
    }

    #[test]
    fn cube_is_closed_and_consistent() {
        let cube = unit_cube();
        let adj = MeshAdjacency::build(&cube.faces);
        assert!(adj.is_watertight());
        assert!(adj.is_winding_consistent());
        assert!(adj.is_manifold(&cube.faces));
        assert_eq!(adj.edge_count(), 18);
    }

    #[test]
    fn flipped_face_breaks_consistency_only() {
        let mut cube = unit_cube();
        cube.faces[0].swap(1, 2);
        let adj = MeshAdjacency::build(&cube.faces);
        assert!(adj.is_watertight());
        assert!(!adj.is_winding_consistent());
    }

    #[test]
    fn three_faces_on_one_edge_are_non_manifold() {
        let faces = [[0, 1, 2], [0, 1, 3], [0, 1, 4]];
        let adj = MeshAdjacency::build(&faces);
        assert_eq!(adj.non_manifold_edge_count(), 1);
        assert!(!adj.is_manifold(&faces));
    }

    #[test]
    fn bowtie_vertex_is_non_manifold() {
        // Two triangles touching only at vertex 0.
        let faces = [[0, 1, 2], [0, 3, 4]];
        let adj = MeshAdjacency::build(&faces);
        assert_eq!(adj.non_manifold_edge_count(), 0);
        assert!(!adj.is_manifold(&faces));
    }

    #[test]
    fn empty_is_not_watertight() {
        let adj = MeshAdjacency::build(&[]);
        assert!(!adj.is_watertight());
        assert!(adj.is_winding_consistent());
    }

    #[test]
    fn collapsed_edges_are_skipped() {
        let adj = MeshAdjacency::build(&[[0, 0, 1]]);
        assert_eq!(adj.edge_count(), 1);
    }
}
