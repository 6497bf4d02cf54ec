//! Error types for repair configuration.
//!
//! Running a repair never fails; only configuring one can.

use thiserror::Error;

/// Result type for repair configuration.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors raised while configuring a repair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepairError {
    /// Unknown repair option name.
    #[error("unknown repair option '{name}'")]
    InvalidOption {
        /// The rejected name.
        name: String,
    },
}
