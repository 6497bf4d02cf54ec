//! Diagnostics and repair for neuronal surface meshes.
//!
//! This crate provides:
//! - A diagnostic report that degrades field by field instead of failing
//!   ([`analyze_mesh`], [`DiagnosticReport`])
//! - An ordered repair pipeline that logs and skips failing steps
//!   ([`repair_mesh`], [`RepairPipeline`], [`RepairOptions`])
//!
//! Both run against any [`GeometryKernel`](neuromesh_geometry::GeometryKernel);
//! the plain entry points use [`TopologyKernel`](neuromesh_geometry::TopologyKernel).
//!
//! # Example
//!
//! ```
//! use neuromesh_repair::{RepairOptions, analyze_mesh, repair_mesh};
//! use neuromesh_types::unit_cube;
//!
//! let mut mesh = unit_cube();
//! mesh.invert();
//!
//! let report = analyze_mesh(&mesh);
//! assert!(report.has_issues());
//!
//! let (fixed, log) = repair_mesh(&mesh, &RepairOptions::default());
//! assert!(!analyze_mesh(&fixed).has_issues());
//! println!("{log}");
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod analyze;
mod error;
mod measurement;
mod repair;
mod report;

pub use analyze::{
    DEGENERATE_AREA_THRESHOLD, analyze_mesh, analyze_mesh_with, count_duplicate_vertices,
};
pub use error::{RepairError, RepairResult};
pub use measurement::Measured;
pub use repair::{
    HoleFillOutcome, NO_REPAIRS_NEEDED, RepairEntry, RepairLog, RepairOptions, RepairPipeline,
    RepairStep, StepOutcome, repair_mesh, repair_mesh_with,
};
pub use report::{DiagnosticReport, NormalDirection, NormalStats};
