//! Error types for the mesh manager.

use std::path::PathBuf;

use neuromesh_geometry::GeometryError;
use neuromesh_repair::RepairError;
use neuromesh_transform::TransformError;
use thiserror::Error;

use crate::loader::LoadError;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors raised by [`MeshManager`](crate::MeshManager).
#[derive(Debug, Error)]
pub enum ManagerError {
    /// No mesh has been loaded.
    #[error("no mesh loaded")]
    NoMesh,

    /// The loader failed.
    #[error("failed to load mesh from {}: {source}", path.display())]
    Load {
        /// Path passed to the loader.
        path: PathBuf,
        /// Underlying loader error.
        #[source]
        source: LoadError,
    },

    /// A normalization step failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A repair option was rejected.
    #[error(transparent)]
    Repair(#[from] RepairError),

    /// A geometry query failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
