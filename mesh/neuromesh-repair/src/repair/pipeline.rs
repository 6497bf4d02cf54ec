//! Ordered, fault-tolerant repair steps.
//!
//! Each step runs on a scratch copy of the mesh. The copy replaces the
//! working mesh only if the step succeeds, so a failing step leaves no
//! partial changes behind and the next step still runs.

use std::fmt;

use neuromesh_geometry::{GeometryKernel, GeometryResult, TopologyKernel};
use neuromesh_types::Mesh;
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::log::{NO_REPAIRS_NEEDED, RepairLog, StepOutcome};
use super::options::RepairOptions;

/// A single repair step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RepairStep {
    /// Reverse all faces when the signed volume is negative.
    FixNegativeVolume,
    /// Drop repeated faces.
    RemoveDuplicates,
    /// Drop near-zero-area faces.
    RemoveDegenerate,
    /// Make the winding consistent.
    FixNormals,
    /// Fill boundary loops.
    FixHoles,
    /// Keep only the largest component.
    KeepLargestComponent,
    /// Final consistency pass; always runs last.
    Revalidate,
}

impl RepairStep {
    /// Corrective steps in the order they run.
    pub const CORRECTIVE: [Self; 6] = [
        Self::FixNegativeVolume,
        Self::RemoveDuplicates,
        Self::RemoveDegenerate,
        Self::FixNormals,
        Self::FixHoles,
        Self::KeepLargestComponent,
    ];

    /// Short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FixNegativeVolume => "fix_negative_volume",
            Self::RemoveDuplicates => "remove_duplicates",
            Self::RemoveDegenerate => "remove_degenerate",
            Self::FixNormals => "fix_normals",
            Self::FixHoles => "fix_holes",
            Self::KeepLargestComponent => "keep_largest_component",
            Self::Revalidate => "revalidate",
        }
    }

    /// Prefix of the log message when the step errors.
    const fn failure_prefix(self) -> &'static str {
        match self {
            Self::FixNegativeVolume => "Failed to fix negative volume",
            Self::RemoveDuplicates => "Failed to remove duplicate faces",
            Self::RemoveDegenerate => "Failed to remove degenerate faces",
            Self::FixNormals => "Failed to fix normals",
            Self::FixHoles => "Failed to fill holes",
            Self::KeepLargestComponent => "Failed to isolate largest component",
            Self::Revalidate => "Final processing failed",
        }
    }
}

impl fmt::Display for RepairStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How hole filling changed watertightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleFillOutcome {
    /// The mesh was open and is now closed.
    NowWatertight,
    /// The mesh was already closed.
    AlreadyWatertight,
    /// The mesh is still open.
    StillOpen,
}

impl HoleFillOutcome {
    /// Classify from watertightness before and after filling.
    #[must_use]
    pub const fn classify(was_watertight: bool, is_watertight: bool) -> Self {
        match (was_watertight, is_watertight) {
            (_, false) => Self::StillOpen,
            (false, true) => Self::NowWatertight,
            (true, true) => Self::AlreadyWatertight,
        }
    }

    /// Log message and outcome for this classification.
    #[must_use]
    pub const fn describe(self) -> (StepOutcome, &'static str) {
        match self {
            Self::NowWatertight => (StepOutcome::Repaired, "Filled holes - mesh is now watertight"),
            Self::AlreadyWatertight => (StepOutcome::Unchanged, "Mesh was already watertight"),
            Self::StillOpen => (
                StepOutcome::Incomplete,
                "Attempted to fill holes but mesh is still not watertight",
            ),
        }
    }
}

type StepEntry = Option<(StepOutcome, String)>;

/// Runs repair steps against a [`GeometryKernel`].
///
/// # Example
///
/// ```
/// use neuromesh_geometry::TopologyKernel;
/// use neuromesh_repair::{RepairOptions, RepairPipeline};
/// use neuromesh_types::unit_cube;
///
/// let mut mesh = unit_cube();
/// mesh.invert();
///
/// let kernel = TopologyKernel::default();
/// let (fixed, log) = RepairPipeline::new(&kernel).run(mesh, &RepairOptions::default());
/// assert!(fixed.signed_volume() > 0.0);
/// assert!(log.messages().next().unwrap().starts_with("Inverted faces"));
/// ```
#[derive(Debug, Clone)]
pub struct RepairPipeline<'k, G: ?Sized> {
    kernel: &'k G,
    steps: Vec<RepairStep>,
}

impl<'k, G: GeometryKernel + ?Sized> RepairPipeline<'k, G> {
    /// Pipeline with the corrective steps in their standard order.
    pub fn new(kernel: &'k G) -> Self {
        Self {
            kernel,
            steps: RepairStep::CORRECTIVE.to_vec(),
        }
    }

    /// Replace the corrective step order.
    ///
    /// [`RepairStep::Revalidate`] entries are ignored here; the final pass
    /// always runs once, at the end.
    #[must_use]
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = RepairStep>) -> Self {
        self.steps = steps
            .into_iter()
            .filter(|s| *s != RepairStep::Revalidate)
            .collect();
        self
    }

    /// Corrective steps in run order.
    #[must_use]
    pub fn steps(&self) -> &[RepairStep] {
        &self.steps
    }

    /// Run every enabled step, then the final pass.
    ///
    /// Never fails. Step errors are logged and the step's changes dropped.
    /// The log is also stored on the returned mesh's metadata.
    pub fn run(&self, mut mesh: Mesh, options: &RepairOptions) -> (Mesh, RepairLog) {
        let mut log = RepairLog::new();

        for &step in &self.steps {
            if options.enables(step) {
                self.apply(step, &mut mesh, &mut log);
            } else {
                debug!("Skipping disabled repair step {}", step);
            }
        }

        if log.is_noop() {
            log.push(RepairStep::Revalidate, StepOutcome::Unchanged, NO_REPAIRS_NEEDED);
        }
        self.apply(RepairStep::Revalidate, &mut mesh, &mut log);

        info!(
            "Repair finished: {} entries, {} failures",
            log.len(),
            log.failures().count()
        );
        log.attach_to(&mut mesh);
        (mesh, log)
    }

    fn apply(&self, step: RepairStep, mesh: &mut Mesh, log: &mut RepairLog) {
        let mut scratch = mesh.clone();
        match self.run_step(step, &mut scratch) {
            Ok(entry) => {
                *mesh = scratch;
                if let Some((outcome, message)) = entry {
                    info!("{}: {}", step, message);
                    log.push(step, outcome, message);
                }
            }
            Err(e) => {
                warn!("Repair step {} failed: {}", step, e);
                log.push(
                    step,
                    StepOutcome::Failed,
                    format!("{}: {e}", step.failure_prefix()),
                );
            }
        }
    }

    fn run_step(&self, step: RepairStep, mesh: &mut Mesh) -> GeometryResult<StepEntry> {
        let kernel = self.kernel;
        match step {
            RepairStep::FixNegativeVolume => {
                let before = kernel.signed_volume(mesh)?;
                if before >= 0.0 {
                    return Ok(None);
                }
                kernel.invert(mesh)?;
                let after = kernel.signed_volume(mesh)?;
                Ok(Some((
                    StepOutcome::Repaired,
                    format!("Inverted faces to fix negative volume: {before:.2} → {after:.2}"),
                )))
            }
            RepairStep::RemoveDuplicates => {
                let removed = kernel.remove_duplicate_faces(mesh)?;
                Ok((removed > 0).then(|| {
                    (
                        StepOutcome::Repaired,
                        format!("Removed {removed} duplicate faces"),
                    )
                }))
            }
            RepairStep::RemoveDegenerate => {
                let removed = kernel.remove_degenerate_faces(mesh)?;
                Ok((removed > 0).then(|| {
                    (
                        StepOutcome::Repaired,
                        format!("Removed {removed} degenerate faces"),
                    )
                }))
            }
            RepairStep::FixNormals => {
                if kernel.is_winding_consistent(mesh)? {
                    return Ok(None);
                }
                kernel.fix_normals(mesh)?;
                Ok(Some(if kernel.is_winding_consistent(mesh)? {
                    (
                        StepOutcome::Repaired,
                        "Fixed face normal winding consistency".to_string(),
                    )
                } else {
                    (
                        StepOutcome::Incomplete,
                        "Attempted to fix normals but still inconsistent".to_string(),
                    )
                }))
            }
            RepairStep::FixHoles => {
                let was = kernel.is_watertight(mesh)?;
                if was {
                    return Ok(None);
                }
                kernel.fill_holes(mesh)?;
                let now = kernel.is_watertight(mesh)?;
                let (outcome, message) = HoleFillOutcome::classify(was, now).describe();
                Ok(Some((outcome, message.to_string())))
            }
            RepairStep::KeepLargestComponent => keep_largest_component(kernel, mesh),
            RepairStep::Revalidate => {
                kernel.process(mesh)?;
                Ok(Some((
                    StepOutcome::Validated,
                    "Applied final mesh processing and validation".to_string(),
                )))
            }
        }
    }
}

impl RepairPipeline<'static, TopologyKernel> {
    /// Pipeline over a shared default [`TopologyKernel`].
    #[must_use]
    pub fn standard() -> Self {
        static KERNEL: TopologyKernel = TopologyKernel::new();
        Self::new(&KERNEL)
    }
}

/// Replace `mesh` with its largest component.
///
/// Components are ranked by absolute enclosed volume. If any volume cannot
/// be computed the ranking falls back to face count. Ties keep the first.
fn keep_largest_component<G: GeometryKernel + ?Sized>(
    kernel: &G,
    mesh: &mut Mesh,
) -> GeometryResult<StepEntry> {
    let mut components = kernel.split(mesh)?;
    let count = components.len();
    if count <= 1 {
        return Ok(None);
    }

    let volumes: GeometryResult<Vec<f64>> = components
        .iter()
        .map(|c| kernel.signed_volume(c).map(f64::abs))
        .collect();

    let message = match volumes {
        Ok(volumes) => {
            let best = argmax(&volumes);
            let kept = volumes[best];
            *mesh = components.swap_remove(best);
            format!("Kept largest of {count} components (volume: {kept:.2})")
        }
        Err(e) => {
            debug!("Ranking components by face count: {}", e);
            let sizes: Vec<usize> = components.iter().map(Mesh::face_count).collect();
            let best = sizes
                .iter()
                .enumerate()
                .fold(0, |best, (i, &n)| if n > sizes[best] { i } else { best });
            let kept = sizes[best];
            *mesh = components.swap_remove(best);
            format!("Kept largest of {count} components (faces: {kept})")
        }
    };
    Ok(Some((StepOutcome::Repaired, message)))
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > values[best] { i } else { best })
}
