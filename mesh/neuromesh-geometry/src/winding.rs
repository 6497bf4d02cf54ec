//! Winding order repair.
//!
//! Faces are re-oriented breadth-first from a seed face across edges shared
//! by exactly two faces. Afterwards every closed patch with a negative
//! signed volume is flipped so its normals point outward.

use std::collections::VecDeque;

use hashbrown::HashMap;
use neuromesh_types::Mesh;
use tracing::{debug, info};

use crate::adjacency::{MeshAdjacency, edge_key, face_edges};
use crate::error::{GeometryError, GeometryResult};

/// Whether `face` traverses the directed edge `a -> b`.
#[inline]
fn has_directed_edge(face: [u32; 3], a: u32, b: u32) -> bool {
    face_edges(face).contains(&(a, b))
}

/// Count faces that disagree with a neighbor about their shared edge.
///
/// Each conflicting edge is attributed to the later of its two faces.
#[must_use]
pub fn count_inconsistent_faces(faces: &[[u32; 3]]) -> usize {
    let adjacency = MeshAdjacency::build(faces);
    let mut flagged = vec![false; faces.len()];

    for (idx, face) in faces.iter().enumerate() {
        for (a, b) in face_edges(*face) {
            let Some(neighbors) = adjacency.faces_for_edge(a, b) else {
                continue;
            };
            if neighbors.len() != 2 {
                continue;
            }
            let other = if neighbors[0] == idx { neighbors[1] } else { neighbors[0] };
            if other < idx && has_directed_edge(faces[other], a, b) {
                flagged[idx] = true;
            }
        }
    }

    flagged.into_iter().filter(|&f| f).count()
}

/// Make face winding consistent and orient closed patches outward.
///
/// Returns the number of faces whose winding was reversed.
///
/// # Errors
///
/// Returns [`GeometryError::WindingRepairFailed`] when a patch cannot be
/// oriented consistently (a non-orientable surface such as a Möbius strip).
/// The mesh is left partially re-oriented in that case.
pub fn fix_winding_order(mesh: &mut Mesh) -> GeometryResult<usize> {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let face_count = mesh.faces.len();
    let mut visited = vec![false; face_count];
    let mut flipped = vec![false; face_count];
    let mut conflicts = 0usize;
    let mut patches: Vec<Vec<usize>> = Vec::new();

    for seed in 0..face_count {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut patch = vec![seed];
        let mut queue = VecDeque::from([seed]);

        while let Some(current) = queue.pop_front() {
            let face = mesh.faces[current];
            for (a, b) in face_edges(face) {
                let Some(neighbors) = adjacency.faces_for_edge(a, b) else {
                    continue;
                };
                if a == b || neighbors.len() != 2 {
                    continue;
                }
                let other = if neighbors[0] == current { neighbors[1] } else { neighbors[0] };
                if other == current {
                    continue;
                }

                // A consistent neighbor walks the shared edge as b -> a.
                let agrees = !has_directed_edge(mesh.faces[other], a, b);
                if visited[other] {
                    if !agrees {
                        conflicts += 1;
                    }
                    continue;
                }

                if !agrees {
                    mesh.faces[other].swap(1, 2);
                    flipped[other] = !flipped[other];
                }
                visited[other] = true;
                patch.push(other);
                queue.push_back(other);
            }
        }

        patches.push(patch);
    }

    if conflicts > 0 {
        return Err(GeometryError::WindingRepairFailed {
            reason: format!("surface is not orientable ({conflicts} conflicting edges)"),
        });
    }

    for patch in &patches {
        if !is_closed_patch(&mesh.faces, patch) {
            continue;
        }
        let volume: f64 = patch
            .iter()
            .filter_map(|&f| mesh.triangle(f))
            .map(|tri| tri.signed_volume_from_origin())
            .sum();
        if volume < 0.0 {
            debug!("Flipping inward patch of {} faces (volume {:.3})", patch.len(), volume);
            for &f in patch {
                mesh.faces[f].swap(1, 2);
                flipped[f] = !flipped[f];
            }
        }
    }

    let reversed = flipped.into_iter().filter(|&f| f).count();
    if reversed > 0 {
        info!("Reversed winding of {} faces across {} patches", reversed, patches.len());
    }
    Ok(reversed)
}

/// Every edge of the patch is used by exactly two of its faces.
fn is_closed_patch(faces: &[[u32; 3]], patch: &[usize]) -> bool {
    let mut uses: HashMap<(u32, u32), u32> = HashMap::new();
    for &f in patch {
        for (a, b) in face_edges(faces[f]) {
            if a != b {
                *uses.entry(edge_key(a, b)).or_default() += 1;
            }
        }
    }
    !uses.is_empty() && uses.values().all(|&n| n == 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_types::{TorusParams, torus, unit_cube};

    #[test]
    fn consistent_cube_is_untouched() {
        let mut cube = unit_cube();
        assert_eq!(count_inconsistent_faces(&cube.faces), 0);
        assert_eq!(fix_winding_order(&mut cube).unwrap(), 0);
        assert_eq!(cube, unit_cube());
    }

    #[test]
    fn single_flipped_face_is_restored() {
        let mut cube = unit_cube();
        cube.faces[5].swap(1, 2);
        assert!(count_inconsistent_faces(&cube.faces) > 0);

        let reversed = fix_winding_order(&mut cube).unwrap();
        assert!(reversed >= 1);
        assert!(MeshAdjacency::build(&cube.faces).is_winding_consistent());
        assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn fully_inverted_cube_is_turned_outward() {
        let mut cube = unit_cube();
        cube.invert();
        assert_eq!(fix_winding_order(&mut cube).unwrap(), 12);
        assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn torus_with_scattered_flips() {
        let mut mesh = torus(&TorusParams::default().with_segments(12, 8)).unwrap();
        for f in [0, 7, 30, 101] {
            mesh.faces[f].swap(1, 2);
        }
        fix_winding_order(&mut mesh).unwrap();
        assert!(MeshAdjacency::build(&mesh.faces).is_winding_consistent());
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn open_patch_keeps_orientation() {
        let mut mesh = unit_cube();
        mesh.faces.truncate(2);
        mesh.invert();
        assert_eq!(fix_winding_order(&mut mesh).unwrap(), 0);
    }
}
