//! Diagnostics, repair and spatial normalization for neuronal surface meshes.
//!
//! This umbrella crate re-exports the neuromesh-* crates and adds
//! [`MeshManager`], which owns a working mesh alongside the snapshot it was
//! loaded as.
//!
//! # Quick Start
//!
//! ```
//! use neuromesh::prelude::*;
//!
//! // A capped cylinder standing in for a neurite segment
//! let mut mesh = cylinder(&CylinderParams::default()).unwrap();
//! mesh.invert();
//!
//! let mut manager = MeshManager::with_mesh(mesh);
//! let report = manager.analyze_mesh().unwrap();
//! assert!(report.has_issues());
//!
//! manager.repair_mesh(&RepairOptions::default()).unwrap();
//! assert!(!manager.analyze_mesh().unwrap().has_issues());
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - `Mesh`, `Vertex`, `Bounds`, metadata and fixture shapes
//! - [`geometry`] - Vector helpers, rotations and the `GeometryKernel` trait
//! - [`transform`] - Bounds, centering, scaling and principal-axis alignment
//! - [`repair`] - Diagnostic reports and the repair pipeline
//!
//! # Feature Flags
//!
//! - `serde` - Serialize parameter structs, reports and logs

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod loader;
mod manager;

pub use error::{ManagerError, ManagerResult};
pub use loader::{LoadError, LoadedGeometry, MeshLoader};
pub use manager::{MeshManager, RepairStats};

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `Mesh`, `Vertex`, `Triangle`, `Bounds`.
pub use neuromesh_types as types;

/// Vector helpers, rotations and the geometry kernel.
pub use neuromesh_geometry as geometry;

/// Bounds, centering, scaling, PCA alignment.
pub use neuromesh_transform as transform;

/// Diagnostics and repair.
pub use neuromesh_repair as repair;

pub use neuromesh_repair::{DiagnosticReport, RepairLog, RepairOptions};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for mesh diagnostics and repair.
///
/// # Usage
///
/// ```
/// use neuromesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use neuromesh_types::{
        Axis, Bounds, CylinderParams, Mesh, TorusParams, Vertex, cylinder, torus,
    };

    // Geometry
    pub use neuromesh_geometry::{GeometryKernel, TopologyKernel};

    // Transform
    pub use neuromesh_transform::CenterMode;

    // Repair
    pub use neuromesh_repair::{
        DiagnosticReport, Measured, RepairLog, RepairOptions, analyze_mesh, repair_mesh,
    };

    // Manager
    pub use crate::{MeshLoader, MeshManager};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let mesh = Mesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        let manager = MeshManager::new();
        assert!(manager.mesh().is_err());
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::Mesh::new();
        let _ = geometry::TopologyKernel::default();
        let _ = transform::CenterMode::default();
        let _ = repair::RepairOptions::default();
    }
}
