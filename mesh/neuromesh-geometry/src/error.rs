//! Error types for geometry primitives and kernel operations.

use neuromesh_types::MeshError;
use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised by vector primitives and by [`crate::GeometryKernel`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A vector too short to be normalized.
    #[error("cannot normalize degenerate vector (norm {norm:e})")]
    DegenerateVector {
        /// Norm of the rejected vector.
        norm: f64,
    },

    /// Mesh has no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} but mesh has {vertex_count} vertices")]
    InvalidIndex {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Hole filling failed.
    #[error("failed to fill holes: {reason}")]
    HoleFillFailed {
        /// Reason for failure.
        reason: String,
    },

    /// Winding order repair failed.
    #[error("failed to fix winding order: {reason}")]
    WindingRepairFailed {
        /// Reason for failure.
        reason: String,
    },

    /// Any other structural mesh error.
    #[error(transparent)]
    Mesh(MeshError),
}

impl From<MeshError> for GeometryError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            } => Self::InvalidIndex {
                face,
                index,
                vertex_count,
            },
            other => Self::Mesh(other),
        }
    }
}
