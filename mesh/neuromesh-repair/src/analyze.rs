//! Mesh diagnostics.
//!
//! Each measurement runs in isolation. A failure marks that field unknown,
//! adds an issue and moves on to the next measurement.

use hashbrown::HashSet;
use neuromesh_geometry::{GeometryKernel, GeometryResult, TopologyKernel};
use neuromesh_types::{Mesh, Vector3};
use tracing::{debug, warn};

use crate::measurement::Measured;
use crate::report::{DiagnosticReport, NormalDirection, NormalStats};

/// Faces with area below this are counted as degenerate.
pub const DEGENERATE_AREA_THRESHOLD: f64 = 1e-8;

/// Analyze a mesh with the default [`TopologyKernel`].
///
/// # Example
///
/// ```
/// use neuromesh_repair::analyze_mesh;
/// use neuromesh_types::unit_cube;
///
/// let report = analyze_mesh(&unit_cube());
/// assert_eq!(report.is_watertight.get(), Some(true));
/// assert_eq!(report.genus.get(), Some(0));
/// assert!(report.issues.is_empty());
/// ```
#[must_use]
pub fn analyze_mesh(mesh: &Mesh) -> DiagnosticReport {
    analyze_mesh_with(mesh, &TopologyKernel::default())
}

/// Analyze a mesh with a caller-supplied geometry kernel.
///
/// Never fails: a mesh with bad indices yields a report full of unknown
/// values and matching issues.
pub fn analyze_mesh_with<G: GeometryKernel + ?Sized>(mesh: &Mesh, kernel: &G) -> DiagnosticReport {
    let mut issues = Vec::new();

    let is_watertight = measure(kernel.is_watertight(mesh), "Watertightness check", &mut issues);
    let is_winding_consistent =
        measure(kernel.is_winding_consistent(mesh), "Winding check", &mut issues);

    let volume = match kernel.signed_volume(mesh) {
        Ok(v) => {
            if v < 0.0 {
                issues.push("Negative volume detected - face normals may be inverted".to_string());
            }
            Measured::Known(v)
        }
        Err(e) => {
            issues.push(format!("Volume calculation failed: {e}"));
            Measured::unknown(e.to_string())
        }
    };

    let is_manifold = match kernel.is_manifold(mesh) {
        Ok(Some(m)) => {
            if !m {
                issues.push("Non-manifold edges detected".to_string());
            }
            Measured::Known(m)
        }
        Ok(None) => Measured::unknown("manifold check not supported"),
        Err(e) => {
            issues.push(format!("Manifold check failed: {e}"));
            Measured::unknown(e.to_string())
        }
    };

    let (euler_characteristic, genus) = topology(kernel, mesh, &is_watertight, &mut issues);

    let normal_stats = match kernel.face_normals(mesh) {
        Ok(normals) => normal_statistics(&normals),
        Err(e) => {
            issues.push(format!("Normal analysis failed: {e}"));
            Measured::unknown(e.to_string())
        }
    };
    let normal_direction = match volume.get() {
        Some(v) => Measured::Known(NormalDirection::from_volume(v)),
        None => Measured::unknown("volume unknown"),
    };

    let duplicates = count_duplicate_vertices(mesh);
    if duplicates > 0 {
        issues.push(format!("Found {duplicates} duplicate vertices"));
    }

    let degenerate_face_count = match kernel.face_areas(mesh) {
        Ok(areas) => {
            let n = areas
                .iter()
                .filter(|&&a| a < DEGENERATE_AREA_THRESHOLD)
                .count();
            if n > 0 {
                issues.push(format!("Found {n} degenerate faces"));
            }
            Measured::Known(n)
        }
        Err(e) => {
            issues.push(format!("Degenerate face check failed: {e}"));
            Measured::unknown(e.to_string())
        }
    };

    let component_count = match kernel.split(mesh).map(|parts| parts.len()) {
        Ok(n) => {
            if n > 1 {
                issues.push(format!("Mesh has {n} disconnected components"));
            }
            Measured::Known(n)
        }
        Err(e) => {
            issues.push(format!("Component analysis failed: {e}"));
            Measured::unknown(e.to_string())
        }
    };

    debug!(
        "Analyzed mesh ({} vertices, {} faces): {} issues",
        mesh.vertex_count(),
        mesh.face_count(),
        issues.len()
    );

    DiagnosticReport {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        bounds: mesh.bounds(),
        is_watertight,
        is_winding_consistent,
        is_manifold,
        volume,
        euler_characteristic,
        genus,
        normal_direction,
        normal_stats,
        duplicate_vertex_count: Measured::Known(duplicates),
        degenerate_face_count,
        component_count,
        issues,
    }
}

fn measure<T>(result: GeometryResult<T>, what: &str, issues: &mut Vec<String>) -> Measured<T> {
    match result {
        Ok(value) => Measured::Known(value),
        Err(e) => {
            warn!("{} failed: {}", what, e);
            issues.push(format!("{what} failed: {e}"));
            Measured::unknown(e.to_string())
        }
    }
}

/// Euler characteristic and genus.
///
/// Genus is `(2 - χ) / 2` truncated toward zero, and only for watertight
/// meshes. A negative result is clamped to 0.
fn topology<G: GeometryKernel + ?Sized>(
    kernel: &G,
    mesh: &Mesh,
    is_watertight: &Measured<bool>,
    issues: &mut Vec<String>,
) -> (Measured<i64>, Measured<u64>) {
    let chi = match kernel.euler_characteristic(mesh) {
        Ok(chi) => chi,
        Err(e) => {
            issues.push(format!("Topology calculation failed: {e}"));
            return (
                Measured::unknown(e.to_string()),
                Measured::unknown(e.to_string()),
            );
        }
    };

    let genus = match is_watertight.get() {
        Some(true) => {
            let g = (2 - chi) / 2;
            if g < 0 {
                issues.push("Calculated negative genus, defaulting to 0".to_string());
                Measured::Known(0)
            } else {
                Measured::Known(g.unsigned_abs())
            }
        }
        Some(false) => {
            issues.push("Genus undefined for non-watertight mesh".to_string());
            Measured::unknown("mesh is not watertight")
        }
        None => Measured::unknown("watertightness unknown"),
    };

    (Measured::Known(chi), genus)
}

#[allow(clippy::cast_precision_loss)]
// Precision loss: face counts beyond 2^52 are unsupported
fn normal_statistics(normals: &[Vector3<f64>]) -> Measured<NormalStats> {
    if normals.is_empty() {
        return Measured::unknown("mesh has no faces");
    }
    let n = normals.len() as f64;

    let mut sum = [0.0; 3];
    for v in normals {
        for k in 0..3 {
            sum[k] += v[k];
        }
    }
    let mean = sum.map(|s| s / n);

    let mut var = [0.0; 3];
    for v in normals {
        for k in 0..3 {
            let d = v[k] - mean[k];
            var[k] += d * d;
        }
    }

    Measured::Known(NormalStats {
        mean,
        std: var.map(|s| (s / n).sqrt()),
        sum,
    })
}

/// Number of vertices whose position exactly equals an earlier vertex.
///
/// `-0.0` and `0.0` compare equal.
#[must_use]
pub fn count_duplicate_vertices(mesh: &Mesh) -> usize {
    let key = |x: f64| if x == 0.0 { 0.0_f64.to_bits() } else { x.to_bits() };
    let mut seen = HashSet::with_capacity(mesh.vertices.len());
    mesh.positions()
        .filter(|p| !seen.insert([key(p.x), key(p.y), key(p.z)]))
        .count()
}
