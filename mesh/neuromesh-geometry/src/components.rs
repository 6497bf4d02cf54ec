//! Connected component analysis.
//!
//! Two faces are connected when they share an edge. Components are listed
//! in order of their lowest face index, regardless of whether each piece
//! is itself watertight.

use hashbrown::HashMap;
use neuromesh_types::Mesh;

use crate::adjacency::{MeshAdjacency, face_edges};

/// Group face indices into edge-connected components.
///
/// # Example
///
/// ```
/// use neuromesh_geometry::find_connected_components;
///
/// // Two triangles sharing an edge, plus a lone triangle.
/// let faces = [[0, 1, 2], [1, 3, 2], [4, 5, 6]];
/// let components = find_connected_components(&faces);
/// assert_eq!(components, vec![vec![0, 1], vec![2]]);
/// ```
#[must_use]
pub fn find_connected_components(faces: &[[u32; 3]]) -> Vec<Vec<usize>> {
    let adjacency = MeshAdjacency::build(faces);
    let mut component_of: Vec<Option<usize>> = vec![None; faces.len()];
    let mut components: Vec<Vec<usize>> = Vec::new();

    for seed in 0..faces.len() {
        if component_of[seed].is_some() {
            continue;
        }
        let id = components.len();
        component_of[seed] = Some(id);
        let mut members = Vec::new();
        let mut stack = vec![seed];

        while let Some(face_idx) = stack.pop() {
            members.push(face_idx);
            for (a, b) in face_edges(faces[face_idx]) {
                if a == b {
                    continue;
                }
                for &neighbor in adjacency.faces_for_edge(a, b).unwrap_or(&[]) {
                    if component_of[neighbor].is_none() {
                        component_of[neighbor] = Some(id);
                        stack.push(neighbor);
                    }
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    components
}

/// Split a mesh into one compacted mesh per connected component.
///
/// Each piece keeps only the vertices its faces reference, in their
/// original relative order, and inherits a copy of the parent metadata.
/// Faces must reference existing vertices.
#[must_use]
pub fn split_into_components(mesh: &Mesh) -> Vec<Mesh> {
    find_connected_components(&mesh.faces)
        .iter()
        .map(|members| extract(mesh, members))
        .collect()
}

// Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
#[allow(clippy::cast_possible_truncation)]
fn extract(mesh: &Mesh, members: &[usize]) -> Mesh {
    let mut used: Vec<u32> = members
        .iter()
        .flat_map(|&f| mesh.faces[f])
        .collect();
    used.sort_unstable();
    used.dedup();

    let remap: HashMap<u32, u32> = used
        .iter()
        .enumerate()
        .map(|(new, &old)| (old, new as u32))
        .collect();

    let mut piece = Mesh::with_capacity(used.len(), members.len());
    piece
        .vertices
        .extend(used.iter().map(|&old| mesh.vertices[old as usize]));
    piece.faces.extend(
        members
            .iter()
            .map(|&f| mesh.faces[f].map(|v| remap.get(&v).copied().unwrap_or(v))),
    );
    piece.metadata = mesh.metadata.clone();
    piece
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use neuromesh_types::unit_cube;

    fn two_cubes() -> Mesh {
        let mut a = unit_cube();
        let mut b = unit_cube();
        b.scale(2.0);
        b.translate(Vector3::new(5.0, 0.0, 0.0));
        a.merge(&b);
        a
    }

    #[test]
    fn single_cube_is_one_component() {
        assert_eq!(find_connected_components(&unit_cube().faces).len(), 1);
    }

    #[test]
    fn disjoint_cubes_split_in_order() {
        let pieces = split_into_components(&two_cubes());
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].vertex_count(), 8);
        assert_eq!(pieces[1].vertex_count(), 8);
        assert!((pieces[0].signed_volume() - 1.0).abs() < 1e-10);
        assert!((pieces[1].signed_volume() - 8.0).abs() < 1e-10);
        assert!(pieces[1].validate_indices().is_ok());
    }

    #[test]
    fn vertex_contact_is_not_connection() {
        // Bowtie: two triangles share only vertex 0.
        let faces = [[0, 1, 2], [0, 3, 4]];
        assert_eq!(find_connected_components(&faces).len(), 2);
    }

    #[test]
    fn metadata_is_inherited() {
        let mut mesh = two_cubes();
        mesh.metadata.insert("morphology_type", "test");
        for piece in split_into_components(&mesh) {
            assert_eq!(piece.metadata.text("morphology_type"), Some("test"));
        }
    }

    #[test]
    fn empty_mesh_has_no_components() {
        assert!(split_into_components(&Mesh::new()).is_empty());
    }
}
