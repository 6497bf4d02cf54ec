//! Diagnostic report produced by [`analyze_mesh`](crate::analyze_mesh).

use std::fmt;

use neuromesh_types::Bounds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::measurement::Measured;

/// Which way the face normals point, judged by the sign of the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NormalDirection {
    /// Signed volume is non-negative.
    Outward,
    /// Signed volume is negative.
    Inward,
}

impl NormalDirection {
    /// Direction implied by a signed volume.
    #[must_use]
    pub fn from_volume(volume: f64) -> Self {
        if volume < 0.0 { Self::Inward } else { Self::Outward }
    }
}

impl fmt::Display for NormalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Outward => "outward",
            Self::Inward => "inward",
        })
    }
}

/// Component-wise statistics of the unit face normals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalStats {
    /// Mean normal.
    pub mean: [f64; 3],
    /// Population standard deviation per component.
    pub std: [f64; 3],
    /// Sum of all normals. Near zero for a closed surface.
    pub sum: [f64; 3],
}

/// Full diagnostic picture of a mesh.
///
/// Every measurement that can fail is a [`Measured`]; a failure is also
/// described in `issues`.
///
/// `Display` prints the human-readable report. The alternate form (`{:#}`)
/// also prints the normal statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagnosticReport {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of faces.
    pub face_count: usize,
    /// Vertex bounds, `None` if there are no vertices.
    pub bounds: Option<Bounds>,
    /// Every edge is shared by exactly two faces.
    pub is_watertight: Measured<bool>,
    /// Every shared edge is traversed in opposite directions.
    pub is_winding_consistent: Measured<bool>,
    /// No edge has more than two faces and every vertex fan is connected.
    pub is_manifold: Measured<bool>,
    /// Signed enclosed volume.
    pub volume: Measured<f64>,
    /// V − E + F.
    pub euler_characteristic: Measured<i64>,
    /// Number of handles; only defined for watertight meshes.
    pub genus: Measured<u64>,
    /// Normal orientation implied by the volume sign.
    pub normal_direction: Measured<NormalDirection>,
    /// Face-normal statistics.
    pub normal_stats: Measured<NormalStats>,
    /// Vertices whose position exactly repeats an earlier vertex.
    pub duplicate_vertex_count: Measured<usize>,
    /// Faces with area below the degenerate threshold.
    pub degenerate_face_count: Measured<usize>,
    /// Number of edge-connected face groups.
    pub component_count: Measured<usize>,
    /// Human-readable problems, in detection order.
    pub issues: Vec<String>,
}

impl DiagnosticReport {
    /// Whether any issue was detected.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Watertight, consistently wound, outward and a single component.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
            && self.is_watertight.get() == Some(true)
            && self.is_winding_consistent.get() == Some(true)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn write_vec(f: &mut fmt::Formatter<'_>, v: &[f64; 3]) -> fmt::Result {
    write!(f, "[{:.4}, {:.4}, {:.4}]", v[0], v[1], v[2])
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Analysis Report")?;
        writeln!(f, "====================")?;

        writeln!(f)?;
        writeln!(f, "Geometry:")?;
        writeln!(f, "  * Vertices: {}", self.vertex_count)?;
        writeln!(f, "  * Faces: {}", self.face_count)?;
        if let Some(n) = self.component_count.get() {
            writeln!(f, "  * Components: {n}")?;
        }
        if let Some(v) = self.volume.get() {
            writeln!(f, "  * Volume: {v:.2}")?;
        }
        if let Some(b) = &self.bounds {
            writeln!(f, "  * Bounds: {b}")?;
        }

        writeln!(f)?;
        writeln!(f, "Mesh Quality:")?;
        match self.is_watertight.get() {
            Some(w) => writeln!(f, "  * Watertight: {}", yes_no(w))?,
            None => writeln!(f, "  * Watertight: unknown")?,
        }
        match self.is_winding_consistent.get() {
            Some(w) => writeln!(f, "  * Winding Consistent: {}", yes_no(w))?,
            None => writeln!(f, "  * Winding Consistent: unknown")?,
        }
        if let Some(m) = self.is_manifold.get() {
            writeln!(f, "  * Manifold: {}", yes_no(m))?;
        }
        if let Some(d) = self.normal_direction.get() {
            writeln!(f, "  * Normal Direction: {d}")?;
        }
        if let Some(n) = self.duplicate_vertex_count.get() {
            writeln!(f, "  * Duplicate Vertices: {n}")?;
        }
        if let Some(n) = self.degenerate_face_count.get() {
            writeln!(f, "  * Degenerate Faces: {n}")?;
        }

        if self.genus.is_known() || self.euler_characteristic.is_known() {
            writeln!(f)?;
            writeln!(f, "Topology:")?;
            if let Some(g) = self.genus.get() {
                writeln!(f, "  * Genus: {g}")?;
            }
            if let Some(chi) = self.euler_characteristic.get() {
                writeln!(f, "  * Euler Characteristic: {chi}")?;
            }
        }

        writeln!(f)?;
        if self.issues.is_empty() {
            writeln!(f, "No issues detected")?;
        } else {
            writeln!(f, "Issues Detected ({}):", self.issues.len())?;
            for (i, issue) in self.issues.iter().enumerate() {
                writeln!(f, "  {}. {issue}", i + 1)?;
            }
        }

        if f.alternate()
            && let Some(stats) = self.normal_stats.known()
        {
            writeln!(f)?;
            writeln!(f, "Normal Statistics:")?;
            write!(f, "  * Mean: ")?;
            write_vec(f, &stats.mean)?;
            writeln!(f)?;
            write!(f, "  * Sum: ")?;
            write_vec(f, &stats.sum)?;
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "Recommendation:")?;
        if self.issues.is_empty() {
            write!(f, "  Mesh appears to be in good condition.")
        } else {
            write!(f, "  Consider repairing the mesh to fix the detected issues.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_types::Point3;

    fn clean_report() -> DiagnosticReport {
        DiagnosticReport {
            vertex_count: 8,
            face_count: 12,
            bounds: Some(Bounds::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))),
            is_watertight: Measured::Known(true),
            is_winding_consistent: Measured::Known(true),
            is_manifold: Measured::Known(true),
            volume: Measured::Known(1.0),
            euler_characteristic: Measured::Known(2),
            genus: Measured::Known(0),
            normal_direction: Measured::Known(NormalDirection::Outward),
            normal_stats: Measured::Known(NormalStats {
                mean: [0.0; 3],
                std: [0.5; 3],
                sum: [0.0; 3],
            }),
            duplicate_vertex_count: Measured::Known(0),
            degenerate_face_count: Measured::Known(0),
            component_count: Measured::Known(1),
            issues: Vec::new(),
        }
    }

    #[test]
    fn direction_from_volume() {
        assert_eq!(NormalDirection::from_volume(-0.1), NormalDirection::Inward);
        assert_eq!(NormalDirection::from_volume(0.0), NormalDirection::Outward);
    }

    #[test]
    fn display_clean() {
        let text = clean_report().to_string();
        assert!(text.starts_with("Mesh Analysis Report\n===================="));
        assert!(text.contains("  * Volume: 1.00"));
        assert!(text.contains("  * Bounds: [0.0, 0.0, 0.0] to [1.0, 1.0, 1.0]"));
        assert!(text.contains("  * Watertight: Yes"));
        assert!(text.contains("  * Genus: 0"));
        assert!(text.contains("No issues detected"));
        assert!(text.contains("good condition"));
        assert!(!text.contains("Normal Statistics"));
    }

    #[test]
    fn display_issues_and_verbose() {
        let mut report = clean_report();
        report.genus = Measured::unknown("mesh is not watertight");
        report.is_watertight = Measured::Known(false);
        report.issues.push("Genus undefined for non-watertight mesh".into());

        let text = format!("{report:#}");
        assert!(text.contains("  * Watertight: No"));
        assert!(!text.contains("Genus:"));
        assert!(text.contains("Issues Detected (1):\n  1. Genus undefined"));
        assert!(text.contains("  * Mean: [0.0000, 0.0000, 0.0000]"));
        assert!(text.contains("Consider repairing"));
        assert!(!report.is_clean());
    }
}
