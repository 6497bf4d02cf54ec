//! Error types for spatial normalization.

use neuromesh_geometry::GeometryError;
use thiserror::Error;

/// Result type for normalization operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur while normalizing a mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Mesh has no vertices.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Unrecognized centering mode name.
    #[error("unknown center mode '{mode}' (expected centroid, bounds_center or origin)")]
    InvalidMode {
        /// The rejected name.
        mode: String,
    },

    /// Scale factor is zero, NaN or infinite.
    #[error("invalid scale factor {factor}: must be finite and nonzero")]
    InvalidScaleFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// Not enough points for the operation.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum number of points required.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// Building the alignment rotation failed.
    #[error("principal axis alignment failed")]
    Alignment {
        /// The underlying primitive error.
        #[source]
        source: GeometryError,
    },
}
