//! Seam for whatever reads meshes from disk.
//!
//! No file format is parsed here. A [`MeshLoader`] turns a path into either a
//! single mesh or a scene of meshes; the manager flattens scenes.

use std::io;
use std::path::{Path, PathBuf};

use neuromesh_types::Mesh;
use thiserror::Error;

/// Errors a loader can report.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The loader does not understand the format.
    #[error("unknown file format: {format}")]
    UnknownFormat {
        /// The format hint or extension.
        format: String,
    },

    /// The file parsed but held no geometry.
    #[error("no geometry found in mesh scene")]
    EmptyScene,

    /// Invalid file content.
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// What a loader produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedGeometry {
    /// A single mesh.
    Mesh(Mesh),
    /// Several named geometries, in file order.
    Scene(Vec<Mesh>),
}

impl LoadedGeometry {
    /// The mesh itself, or the first geometry of a scene.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::EmptyScene`] for a scene with no geometry.
    pub fn into_mesh(self) -> Result<Mesh, LoadError> {
        match self {
            Self::Mesh(mesh) => Ok(mesh),
            Self::Scene(meshes) => meshes.into_iter().next().ok_or(LoadError::EmptyScene),
        }
    }
}

impl From<Mesh> for LoadedGeometry {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

/// Reads geometry from a path.
///
/// Closures with the same signature implement this trait.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use neuromesh::{LoadError, LoadedGeometry, MeshLoader};
/// use neuromesh::types::unit_cube;
///
/// let loader = |_: &Path, _: Option<&str>| Ok::<_, LoadError>(LoadedGeometry::from(unit_cube()));
/// let mesh = loader.load(Path::new("cube.stl"), None).unwrap().into_mesh().unwrap();
/// assert_eq!(mesh.face_count(), 12);
/// ```
pub trait MeshLoader {
    /// Load the geometry at `path`, optionally forcing a format.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`] the implementation raises.
    fn load(&self, path: &Path, format: Option<&str>) -> Result<LoadedGeometry, LoadError>;
}

impl<F> MeshLoader for F
where
    F: Fn(&Path, Option<&str>) -> Result<LoadedGeometry, LoadError>,
{
    fn load(&self, path: &Path, format: Option<&str>) -> Result<LoadedGeometry, LoadError> {
        self(path, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_types::unit_cube;

    #[test]
    fn scene_flattens_to_first() {
        let mut second = unit_cube();
        second.scale(2.0);
        let scene = LoadedGeometry::Scene(vec![unit_cube(), second]);
        assert_eq!(scene.into_mesh().unwrap(), unit_cube());
    }

    #[test]
    fn empty_scene_fails() {
        let err = LoadedGeometry::Scene(Vec::new()).into_mesh().unwrap_err();
        assert!(matches!(err, LoadError::EmptyScene));
    }
}
