//! Ordered record of what a repair did.

use std::fmt;

use neuromesh_types::{Mesh, MetadataValue, REPAIR_LOG_KEY};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::pipeline::RepairStep;

/// Message recorded when no corrective step changed anything.
pub const NO_REPAIRS_NEEDED: &str = "No repairs needed - mesh is in good condition";

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepOutcome {
    /// The step changed the mesh and fixed what it targets.
    Repaired,
    /// The step changed the mesh but the problem remains.
    Incomplete,
    /// Nothing needed changing.
    Unchanged,
    /// The step raised an error; its changes were discarded.
    Failed,
    /// The final consistency pass completed.
    Validated,
}

/// One line of the repair log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepairEntry {
    /// Step that produced the entry.
    pub step: RepairStep,
    /// How it ended.
    pub outcome: StepOutcome,
    /// Human-readable description.
    pub message: String,
}

/// Entries in the order the steps ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepairLog {
    entries: Vec<RepairEntry>,
}

impl RepairLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, step: RepairStep, outcome: StepOutcome, message: impl Into<String>) {
        self.entries.push(RepairEntry {
            step,
            outcome,
            message: message.into(),
        });
    }

    /// All entries.
    #[must_use]
    pub fn entries(&self) -> &[RepairEntry] {
        &self.entries
    }

    /// Entry messages in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.message.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for steps that raised an error.
    pub fn failures(&self) -> impl Iterator<Item = &RepairEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome == StepOutcome::Failed)
    }

    /// Whether any step failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Whether `step` fully repaired what it targets.
    #[must_use]
    pub fn repaired(&self, step: RepairStep) -> bool {
        self.entries
            .iter()
            .any(|e| e.step == step && e.outcome == StepOutcome::Repaired)
    }

    /// Whether any corrective step changed the mesh.
    #[must_use]
    pub fn has_corrections(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.outcome, StepOutcome::Repaired | StepOutcome::Incomplete))
    }

    /// No step changed the mesh and none failed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.has_corrections() && !self.has_failures()
    }

    /// Store the messages on the mesh under [`REPAIR_LOG_KEY`].
    pub fn attach_to(&self, mesh: &mut Mesh) {
        mesh.metadata.insert(
            REPAIR_LOG_KEY,
            MetadataValue::Lines(self.messages().map(str::to_owned).collect()),
        );
    }
}

impl fmt::Display for RepairLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mesh Repair Summary:")?;
        for entry in &self.entries {
            write!(f, "\n  * {}", entry.message)?;
        }
        Ok(())
    }
}
