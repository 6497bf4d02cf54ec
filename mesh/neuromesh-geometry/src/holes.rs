//! Hole detection and filling.
//!
//! A hole is a closed loop of boundary edges (edges with only one adjacent
//! face). Loops are traced against the winding of the faces that border
//! them, so the triangles that fill a loop continue the surrounding
//! orientation.

// Mesh indices are u32; loop sizes are tiny compared to f64 precision.
#![allow(clippy::cast_precision_loss)]

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};
use neuromesh_types::{Mesh, Triangle};
use tracing::{debug, info, warn};

use crate::adjacency::{MeshAdjacency, face_edges};
use crate::error::{GeometryError, GeometryResult};

/// A boundary loop representing a hole in the mesh.
///
/// Consecutive vertices `vertices[i] -> vertices[i + 1]` run opposite to
/// the boundary edge of the adjacent face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    /// Ordered list of vertex indices forming the loop.
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// A loop needs at least three vertices to be filled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }
}

/// Trace all boundary loops of `faces`.
///
/// Holes that touch at a single vertex are traced as separate loops. Open
/// chains (boundaries that do not close up) are dropped with a warning.
///
/// # Example
///
/// ```
/// use neuromesh_geometry::{MeshAdjacency, detect_holes};
///
/// let faces = [[0, 1, 2]];
/// let holes = detect_holes(&faces, &MeshAdjacency::build(&faces));
/// assert_eq!(holes.len(), 1);
/// // The loop runs against the face: 1 -> 0 -> 2.
/// assert_eq!(holes[0].vertices, vec![1, 0, 2]);
/// ```
#[must_use]
pub fn detect_holes(faces: &[[u32; 3]], adjacency: &MeshAdjacency) -> Vec<BoundaryLoop> {
    // Boundary half-edges reversed: for face edge a -> b the hole runs b -> a.
    let mut outgoing: HashMap<u32, Vec<u32>> = HashMap::new();
    let mut starts: Vec<(u32, u32)> = Vec::new();
    for face in faces {
        for (a, b) in face_edges(*face) {
            if a == b {
                continue;
            }
            if adjacency.faces_for_edge(a, b).is_some_and(|f| f.len() == 1) {
                outgoing.entry(b).or_default().push(a);
                starts.push((b, a));
            }
        }
    }

    if starts.is_empty() {
        return Vec::new();
    }
    debug!("Found {} boundary edges", starts.len());

    let mut used: HashSet<(u32, u32)> = HashSet::new();
    let mut loops = Vec::new();

    for &(start, first) in &starts {
        if used.contains(&(start, first)) {
            continue;
        }

        let mut loop_vertices = vec![start];
        used.insert((start, first));
        let mut current = first;
        let mut closed = false;

        // Each step consumes one boundary edge.
        for _ in 0..=starts.len() {
            if current == start {
                closed = true;
                break;
            }
            // Pinch vertex shared by two holes: split off the inner loop.
            match loop_vertices.iter().position(|&v| v == current) {
                Some(k) => {
                    let inner = loop_vertices.split_off(k);
                    loop_vertices.push(current);
                    if inner.len() >= 3 {
                        loops.push(BoundaryLoop { vertices: inner });
                    }
                }
                None => loop_vertices.push(current),
            }

            let next = outgoing
                .get(&current)
                .and_then(|targets| targets.iter().find(|&&t| !used.contains(&(current, t))));
            match next {
                Some(&n) => {
                    used.insert((current, n));
                    current = n;
                }
                None => break,
            }
        }

        if !closed {
            warn!("Boundary chain starting at vertex {} is not closed", start);
            continue;
        }
        if loop_vertices.len() >= 3 {
            loops.push(BoundaryLoop {
                vertices: loop_vertices,
            });
        }
    }

    info!(
        "Detected {} holes (boundary loops), sizes: {:?}",
        loops.len(),
        loops.iter().map(BoundaryLoop::edge_count).collect::<Vec<_>>()
    );

    loops
}

/// Triangulate a boundary loop by ear clipping.
///
/// Falls back to a fan when no ear can be found (for example on a
/// self-overlapping loop). Returns the new faces.
#[must_use]
pub fn fill_hole_ear_clipping(mesh: &Mesh, boundary: &BoundaryLoop) -> Vec<[u32; 3]> {
    let n = boundary.vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let positions: Vec<Point3<f64>> = boundary
        .vertices
        .iter()
        .filter_map(|&idx| mesh.vertices.get(idx as usize).map(|v| v.position))
        .collect();
    if positions.len() != n {
        return Vec::new();
    }

    let normal = loop_normal(&positions);
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            let prev = remaining[(i + len - 1) % len];
            let next = remaining[(i + 1) % len];
            is_ear(&positions, &remaining, prev, remaining[i], next, &normal)
        });

        let Some(i) = ear else {
            warn!(
                "Ear clipping stuck with {} vertices remaining, using fan triangulation",
                remaining.len()
            );
            break;
        };

        let prev = remaining[(i + len - 1) % len];
        let next = remaining[(i + 1) % len];
        triangles.push([
            boundary.vertices[prev],
            boundary.vertices[remaining[i]],
            boundary.vertices[next],
        ]);
        remaining.remove(i);
    }

    let hub = remaining[0];
    for pair in remaining[1..].windows(2) {
        triangles.push([
            boundary.vertices[hub],
            boundary.vertices[pair[0]],
            boundary.vertices[pair[1]],
        ]);
    }

    debug!("Filled hole with {} edges using {} triangles", n, triangles.len());
    triangles
}

/// Newell normal of a polygon; +Z for a degenerate one.
fn loop_normal(positions: &[Point3<f64>]) -> Vector3<f64> {
    let n = positions.len();
    let centroid = positions.iter().map(|p| p.coords).sum::<Vector3<f64>>() / n as f64;

    let mut normal = Vector3::zeros();
    for i in 0..n {
        let v0 = positions[i].coords - centroid;
        let v1 = positions[(i + 1) % n].coords - centroid;
        normal += v0.cross(&v1);
    }

    let len = normal.norm();
    if len > f64::EPSILON {
        normal / len
    } else {
        Vector3::z()
    }
}

fn is_ear(
    positions: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    normal: &Vector3<f64>,
) -> bool {
    let (a, b, c) = (positions[prev], positions[curr], positions[next]);

    let Some(tri_normal) = Triangle::new(a, b, c).normal() else {
        return false;
    };
    if tri_normal.dot(normal) < 0.0 {
        return false;
    }

    remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .all(|&idx| !point_in_triangle(&positions[idx], &a, &b, &c, normal))
}

/// Point-in-triangle test after projecting along the dominant normal axis.
fn point_in_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    let drop = normal.iamax();
    let project = |q: &Point3<f64>| match drop {
        0 => (q.y, q.z),
        1 => (q.x, q.z),
        _ => (q.x, q.y),
    };
    let (p, a, b, c) = (project(p), project(a), project(b), project(c));

    let sign = |p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)| {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    };
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Fill every hole with at most `max_hole_edges` edges.
///
/// Returns the number of holes filled.
///
/// # Errors
///
/// Returns [`GeometryError::HoleFillFailed`] if a hole cannot be
/// triangulated.
pub fn fill_holes(mesh: &mut Mesh, max_hole_edges: usize) -> GeometryResult<usize> {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let holes = detect_holes(&mesh.faces, &adjacency);

    let (fillable, skipped): (Vec<_>, Vec<_>) = holes
        .into_iter()
        .partition(|hole| hole.edge_count() <= max_hole_edges);

    for hole in &skipped {
        warn!(
            "Skipping large hole with {} edges (max: {})",
            hole.edge_count(),
            max_hole_edges
        );
    }

    let mut filled = 0;
    for hole in &fillable {
        let triangles = fill_hole_ear_clipping(mesh, hole);
        if triangles.is_empty() {
            return Err(GeometryError::HoleFillFailed {
                reason: format!("could not triangulate hole with {} edges", hole.edge_count()),
            });
        }
        mesh.faces.extend(triangles);
        filled += 1;
    }

    if filled > 0 {
        info!("Filled {} holes", filled);
    }
    Ok(filled)
}
