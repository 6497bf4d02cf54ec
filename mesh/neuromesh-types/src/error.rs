//! Error types for mesh construction and validation.

use thiserror::Error;

/// Result type for mesh type operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised by structural checks on a [`crate::Mesh`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} but mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Flat coordinate or index buffers are not a multiple of three.
    #[error("{what} buffer length {len} is not a multiple of 3")]
    RaggedBuffer {
        /// Which buffer was malformed.
        what: &'static str,
        /// Its length.
        len: usize,
    },

    /// A shape parameter is out of its valid range.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}
