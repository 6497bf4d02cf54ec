//! Which repair steps to run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{RepairError, RepairResult};

use super::pipeline::RepairStep;

/// Switches for the corrective repair steps.
///
/// The final consistency pass always runs and has no switch.
///
/// # Example
///
/// ```
/// use neuromesh_repair::RepairOptions;
///
/// let opts = RepairOptions::default().with_keep_largest_component(true);
/// assert!(opts.fix_holes);
/// assert!(opts.keep_largest_component);
///
/// let mut opts = RepairOptions::none();
/// opts.set("fix_normals", true).unwrap();
/// assert!(opts.fix_normals);
/// assert!(opts.set("smooth", true).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct RepairOptions {
    /// Fill boundary loops when the mesh is not watertight.
    pub fix_holes: bool,
    /// Remove faces that repeat another face's vertex set.
    pub remove_duplicates: bool,
    /// Make the winding consistent when it is not.
    pub fix_normals: bool,
    /// Remove near-zero-area faces.
    pub remove_degenerate: bool,
    /// Reverse every face when the signed volume is negative.
    pub fix_negative_volume: bool,
    /// Keep only the component with the largest enclosed volume.
    pub keep_largest_component: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            fix_holes: true,
            remove_duplicates: true,
            fix_normals: true,
            remove_degenerate: true,
            fix_negative_volume: true,
            keep_largest_component: false,
        }
    }
}

impl RepairOptions {
    /// Names accepted by [`RepairOptions::set`].
    pub const NAMES: [&'static str; 6] = [
        "fix_holes",
        "remove_duplicates",
        "fix_normals",
        "remove_degenerate",
        "fix_negative_volume",
        "keep_largest_component",
    ];

    /// Every step enabled, including component isolation.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            fix_holes: true,
            remove_duplicates: true,
            fix_normals: true,
            remove_degenerate: true,
            fix_negative_volume: true,
            keep_largest_component: true,
        }
    }

    /// Every corrective step disabled; only the final pass runs.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            fix_holes: false,
            remove_duplicates: false,
            fix_normals: false,
            remove_degenerate: false,
            fix_negative_volume: false,
            keep_largest_component: false,
        }
    }

    /// Set hole filling.
    #[must_use]
    pub const fn with_fix_holes(mut self, enabled: bool) -> Self {
        self.fix_holes = enabled;
        self
    }

    /// Set duplicate face removal.
    #[must_use]
    pub const fn with_remove_duplicates(mut self, enabled: bool) -> Self {
        self.remove_duplicates = enabled;
        self
    }

    /// Set winding repair.
    #[must_use]
    pub const fn with_fix_normals(mut self, enabled: bool) -> Self {
        self.fix_normals = enabled;
        self
    }

    /// Set degenerate face removal.
    #[must_use]
    pub const fn with_remove_degenerate(mut self, enabled: bool) -> Self {
        self.remove_degenerate = enabled;
        self
    }

    /// Set negative volume correction.
    #[must_use]
    pub const fn with_fix_negative_volume(mut self, enabled: bool) -> Self {
        self.fix_negative_volume = enabled;
        self
    }

    /// Set largest component isolation.
    #[must_use]
    pub const fn with_keep_largest_component(mut self, enabled: bool) -> Self {
        self.keep_largest_component = enabled;
        self
    }

    /// Set an option by name.
    ///
    /// # Errors
    ///
    /// Returns [`RepairError::InvalidOption`] if `name` is not one of
    /// [`RepairOptions::NAMES`].
    pub fn set(&mut self, name: &str, enabled: bool) -> RepairResult<()> {
        let slot = match name {
            "fix_holes" => &mut self.fix_holes,
            "remove_duplicates" => &mut self.remove_duplicates,
            "fix_normals" => &mut self.fix_normals,
            "remove_degenerate" => &mut self.remove_degenerate,
            "fix_negative_volume" => &mut self.fix_negative_volume,
            "keep_largest_component" => &mut self.keep_largest_component,
            other => {
                return Err(RepairError::InvalidOption {
                    name: other.to_owned(),
                });
            }
        };
        *slot = enabled;
        Ok(())
    }

    /// Whether `step` should run. The final pass always does.
    #[must_use]
    pub const fn enables(&self, step: RepairStep) -> bool {
        match step {
            RepairStep::FixNegativeVolume => self.fix_negative_volume,
            RepairStep::RemoveDuplicates => self.remove_duplicates,
            RepairStep::RemoveDegenerate => self.remove_degenerate,
            RepairStep::FixNormals => self.fix_normals,
            RepairStep::FixHoles => self.fix_holes,
            RepairStep::KeepLargestComponent => self.keep_largest_component,
            RepairStep::Revalidate => true,
        }
    }
}
