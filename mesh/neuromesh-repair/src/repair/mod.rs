//! Fault-tolerant mesh repair.

mod log;
mod options;
mod pipeline;

pub use log::{NO_REPAIRS_NEEDED, RepairEntry, RepairLog, StepOutcome};
pub use options::RepairOptions;
pub use pipeline::{HoleFillOutcome, RepairPipeline, RepairStep};

use neuromesh_geometry::{GeometryKernel, TopologyKernel};
use neuromesh_types::Mesh;

/// Repair a copy of `mesh` with the default [`TopologyKernel`].
///
/// The input is left untouched. The log is returned and also stored on the
/// repaired mesh under [`neuromesh_types::REPAIR_LOG_KEY`].
///
/// # Example
///
/// ```
/// use neuromesh_repair::{RepairOptions, repair_mesh};
/// use neuromesh_types::unit_cube;
///
/// let mut open = unit_cube();
/// open.faces.pop();
///
/// let (fixed, log) = repair_mesh(&open, &RepairOptions::default());
/// assert_eq!(fixed.face_count(), 12);
/// assert!(!log.is_noop());
/// ```
#[must_use]
pub fn repair_mesh(mesh: &Mesh, options: &RepairOptions) -> (Mesh, RepairLog) {
    repair_mesh_with(mesh, options, &TopologyKernel::new())
}

/// Repair a copy of `mesh` with a caller-supplied kernel.
pub fn repair_mesh_with<G: GeometryKernel + ?Sized>(
    mesh: &Mesh,
    options: &RepairOptions,
    kernel: &G,
) -> (Mesh, RepairLog) {
    RepairPipeline::new(kernel).run(mesh.clone(), options)
}
