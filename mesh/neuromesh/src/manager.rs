//! Single-owner holder of a working mesh and its original snapshot.

use std::path::Path;

use neuromesh_geometry::{GeometryKernel, TopologyKernel};
use neuromesh_repair::{
    DiagnosticReport, RepairLog, RepairOptions, RepairPipeline, RepairStep, analyze_mesh_with,
};
use neuromesh_transform::{CenterMode, align_principal_axis, center, scale};
use neuromesh_types::{Bounds, Matrix3, Mesh, Point3, REPAIR_LOG_KEY, Vector3};
use tracing::{debug, info};

use crate::error::{ManagerError, ManagerResult};
use crate::loader::{LoadedGeometry, MeshLoader};

/// Running totals over every repair made through a manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Repairs run.
    pub processed: usize,
    /// Repairs in which no step failed.
    pub successful: usize,
    /// Repairs in which at least one step failed.
    pub failed: usize,
    /// Repairs that flipped an inside-out mesh.
    pub volume_fixed: usize,
    /// Repairs that made an open mesh watertight.
    pub watertight_fixed: usize,
    /// Repairs that removed degenerate faces.
    pub degenerate_removed: usize,
}

impl RepairStats {
    fn record(&mut self, log: &RepairLog) {
        self.processed += 1;
        if log.has_failures() {
            self.failed += 1;
        } else {
            self.successful += 1;
        }
        self.volume_fixed += usize::from(log.repaired(RepairStep::FixNegativeVolume));
        self.watertight_fixed += usize::from(log.repaired(RepairStep::FixHoles));
        self.degenerate_removed += usize::from(log.repaired(RepairStep::RemoveDegenerate));
    }
}

/// Owns the working mesh, a snapshot of the mesh as loaded, and cached
/// bounds that are refreshed after every mutation.
///
/// # Example
///
/// ```
/// use neuromesh::{MeshManager, RepairOptions};
/// use neuromesh::transform::CenterMode;
/// use neuromesh::types::{CylinderParams, cylinder};
///
/// let mut manager = MeshManager::with_mesh(cylinder(&CylinderParams::default()).unwrap());
/// manager.center_mesh(CenterMode::BoundsCenter).unwrap();
/// assert_eq!(manager.z_range().unwrap(), (-50.0, 50.0));
///
/// let report = manager.analyze_mesh().unwrap();
/// assert_eq!(report.genus.get(), Some(0));
///
/// manager.repair_mesh(&RepairOptions::default()).unwrap();
/// assert_eq!(manager.stats().processed, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MeshManager<G = TopologyKernel> {
    mesh: Option<Mesh>,
    original: Option<Mesh>,
    bounds: Option<Bounds>,
    kernel: G,
    stats: RepairStats,
}

impl Default for MeshManager<TopologyKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshManager<TopologyKernel> {
    /// Empty manager with the default kernel.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_kernel(TopologyKernel::new())
    }

    /// Manager holding `mesh`, which also becomes the original snapshot.
    #[must_use]
    pub fn with_mesh(mesh: Mesh) -> Self {
        let mut manager = Self::new();
        manager.set_mesh(mesh);
        manager
    }
}

impl<G: GeometryKernel> MeshManager<G> {
    /// Empty manager over a custom kernel.
    pub const fn with_kernel(kernel: G) -> Self {
        Self {
            mesh: None,
            original: None,
            bounds: None,
            kernel,
            stats: RepairStats {
                processed: 0,
                successful: 0,
                failed: 0,
                volume_fixed: 0,
                watertight_fixed: 0,
                degenerate_removed: 0,
            },
        }
    }

    /// Load a mesh through `loader`, flattening scenes to their first
    /// geometry. The result becomes both the working mesh and the original.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Load`] if the loader fails or the scene is
    /// empty. The manager is unchanged on error.
    pub fn load<L: MeshLoader + ?Sized>(
        &mut self,
        loader: &L,
        path: impl AsRef<Path>,
        format: Option<&str>,
    ) -> ManagerResult<&Mesh> {
        let path = path.as_ref();
        let mesh = loader
            .load(path, format)
            .and_then(LoadedGeometry::into_mesh)
            .map_err(|source| ManagerError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Loaded mesh from {}: {} vertices, {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        self.set_mesh(mesh);
        self.mesh()
    }

    /// Replace both the working mesh and the original snapshot.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.original = Some(mesh.clone());
        self.mesh = Some(mesh);
        self.refresh_bounds();
    }

    /// Replace the working mesh only, returning the previous one.
    pub fn replace_mesh(&mut self, mesh: Mesh) -> Option<Mesh> {
        let previous = self.mesh.replace(mesh);
        self.refresh_bounds();
        previous
    }

    /// Independent manager whose working mesh and original are both a deep
    /// copy of this working mesh. Statistics start from zero.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if no mesh is loaded.
    pub fn copy(&self) -> ManagerResult<Self>
    where
        G: Clone,
    {
        let mut copy = Self::with_kernel(self.kernel.clone());
        copy.set_mesh(self.mesh()?.clone());
        Ok(copy)
    }

    /// The working mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if no mesh is loaded.
    pub fn mesh(&self) -> ManagerResult<&Mesh> {
        self.mesh.as_ref().ok_or(ManagerError::NoMesh)
    }

    /// The mesh as it was loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if no mesh is loaded.
    pub fn original(&self) -> ManagerResult<&Mesh> {
        self.original.as_ref().ok_or(ManagerError::NoMesh)
    }

    /// Take the working mesh out of the manager.
    #[must_use]
    pub fn into_mesh(self) -> Option<Mesh> {
        self.mesh
    }

    /// The geometry kernel in use.
    pub const fn kernel(&self) -> &G {
        &self.kernel
    }

    /// Repair counters.
    pub const fn stats(&self) -> &RepairStats {
        &self.stats
    }

    /// Cached bounds of the working mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if no mesh is loaded or it has no
    /// vertices.
    pub fn bounds(&self) -> ManagerResult<Bounds> {
        self.mesh()?;
        self.bounds.ok_or(ManagerError::NoMesh)
    }

    /// Z extent of the working mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if no mesh is loaded.
    pub fn z_range(&self) -> ManagerResult<(f64, f64)> {
        Ok(self.bounds()?.z())
    }

    /// Center the working mesh; returns the applied offset.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] without a mesh, or
    /// [`ManagerError::Transform`] if the mesh has no vertices.
    pub fn center_mesh(&mut self, mode: CenterMode) -> ManagerResult<Vector3<f64>> {
        let offset = center(self.mesh_mut()?, mode)?;
        self.refresh_bounds();
        Ok(offset)
    }

    /// [`center_mesh`](Self::center_mesh) with the mode given by name
    /// (`"centroid"`, `"bounds_center"` or `"origin"`).
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Transform`] wrapping
    /// [`InvalidMode`](neuromesh_transform::TransformError::InvalidMode) for
    /// an unknown name.
    pub fn center_mesh_by_name(&mut self, mode: &str) -> ManagerResult<Vector3<f64>> {
        let mode: CenterMode = mode.parse()?;
        self.center_mesh(mode)
    }

    /// Scale the working mesh uniformly.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] without a mesh, or
    /// [`ManagerError::Transform`] for a zero or non-finite factor.
    pub fn scale_mesh(&mut self, factor: f64) -> ManagerResult<()> {
        scale(self.mesh_mut()?, factor)?;
        self.refresh_bounds();
        Ok(())
    }

    /// Rotate the working mesh so its principal axis points along `target`
    /// (+Z when `None`). Returns the applied rotation.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] without a mesh, or
    /// [`ManagerError::Transform`] for too few vertices or a zero target.
    pub fn align_principal_axis(
        &mut self,
        target: Option<Vector3<f64>>,
    ) -> ManagerResult<Matrix3<f64>> {
        let target = target.unwrap_or_else(Vector3::z);
        let rotation = align_principal_axis(self.mesh_mut()?, &target)?;
        self.refresh_bounds();
        Ok(rotation)
    }

    /// Diagnose the working mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if no mesh is loaded; every other
    /// problem is reported inside the [`DiagnosticReport`].
    pub fn analyze_mesh(&self) -> ManagerResult<DiagnosticReport> {
        Ok(analyze_mesh_with(self.mesh()?, &self.kernel))
    }

    /// Repair the working mesh in place and return it.
    ///
    /// The log is stored on the mesh; see [`repair_log`](Self::repair_log).
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if no mesh is loaded. Step failures
    /// are recorded in the log, not returned.
    pub fn repair_mesh(&mut self, options: &RepairOptions) -> ManagerResult<&Mesh> {
        let mesh = self.mesh.take().ok_or(ManagerError::NoMesh)?;
        let (repaired, log) = RepairPipeline::new(&self.kernel).run(mesh, options);

        self.stats.record(&log);
        info!(
            "Repair complete: {} vertices, {} faces, {} log entries",
            repaired.vertex_count(),
            repaired.face_count(),
            log.len()
        );

        self.mesh = Some(repaired);
        self.refresh_bounds();
        self.mesh()
    }

    /// Repair with the default options adjusted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Repair`] for an unknown option name before
    /// anything runs, or [`ManagerError::NoMesh`].
    pub fn repair_mesh_with(&mut self, toggles: &[(&str, bool)]) -> ManagerResult<&Mesh> {
        let mut options = RepairOptions::default();
        for &(name, enabled) in toggles {
            options.set(name, enabled)?;
        }
        self.repair_mesh(&options)
    }

    /// Messages of the most recent repair of the working mesh.
    #[must_use]
    pub fn repair_log(&self) -> Option<&[String]> {
        self.mesh.as_ref()?.metadata.lines(REPAIR_LOG_KEY)
    }

    /// Restore the working mesh from the original snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] if nothing was ever loaded.
    pub fn reset(&mut self) -> ManagerResult<()> {
        let original = self.original()?.clone();
        self.mesh = Some(original);
        self.refresh_bounds();
        debug!("Reset working mesh to original");
        Ok(())
    }

    /// Loops where a plane cuts the working mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoMesh`] without a mesh, or
    /// [`ManagerError::Geometry`] for a zero normal or bad indices.
    pub fn cross_section(
        &self,
        origin: Point3<f64>,
        normal: Vector3<f64>,
    ) -> ManagerResult<Vec<Vec<Point3<f64>>>> {
        Ok(self.kernel.section(self.mesh()?, origin, normal)?)
    }

    fn mesh_mut(&mut self) -> ManagerResult<&mut Mesh> {
        self.mesh.as_mut().ok_or(ManagerError::NoMesh)
    }

    fn refresh_bounds(&mut self) {
        self.bounds = self.mesh.as_ref().and_then(Mesh::bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadError, LoadedGeometry};
    use approx::assert_relative_eq;
    use neuromesh_repair::RepairError;
    use neuromesh_transform::TransformError;
    use neuromesh_types::{Axis, CylinderParams, cylinder, unit_cube};

    #[test]
    fn empty_manager_reports_no_mesh() {
        let mut manager = MeshManager::new();
        assert!(matches!(manager.bounds(), Err(ManagerError::NoMesh)));
        assert!(matches!(manager.z_range(), Err(ManagerError::NoMesh)));
        assert!(matches!(manager.analyze_mesh(), Err(ManagerError::NoMesh)));
        assert!(matches!(
            manager.repair_mesh(&RepairOptions::default()),
            Err(ManagerError::NoMesh)
        ));
        assert!(matches!(
            manager.center_mesh(CenterMode::Centroid),
            Err(ManagerError::NoMesh)
        ));
        assert!(matches!(manager.copy(), Err(ManagerError::NoMesh)));
        assert!(manager.repair_log().is_none());
    }

    #[test]
    fn bounds_follow_mutations() {
        let mut manager = MeshManager::with_mesh(unit_cube());
        assert_eq!(manager.z_range().unwrap(), (0.0, 1.0));

        manager.scale_mesh(3.0).unwrap();
        assert_eq!(manager.z_range().unwrap(), (0.0, 3.0));

        manager.center_mesh(CenterMode::BoundsCenter).unwrap();
        assert_eq!(manager.z_range().unwrap(), (-1.5, 1.5));

        manager.reset().unwrap();
        assert_eq!(manager.z_range().unwrap(), (0.0, 1.0));
    }

    #[test]
    fn center_by_name() {
        let mut manager = MeshManager::with_mesh(unit_cube());
        manager.center_mesh_by_name("bounds_center").unwrap();
        assert_eq!(manager.z_range().unwrap(), (-0.5, 0.5));

        assert!(matches!(
            manager.center_mesh_by_name("middle"),
            Err(ManagerError::Transform(TransformError::InvalidMode { .. }))
        ));
    }

    #[test]
    fn align_defaults_to_z() {
        let mesh = cylinder(&CylinderParams::default().with_axis(Axis::X)).unwrap();
        let mut manager = MeshManager::with_mesh(mesh);
        manager.align_principal_axis(None).unwrap();
        let (lo, hi) = manager.z_range().unwrap();
        assert_relative_eq!(hi - lo, 100.0, epsilon = 1e-6);
    }

    #[test]
    fn copy_is_independent() {
        let mut manager = MeshManager::with_mesh(unit_cube());
        manager.scale_mesh(2.0).unwrap();
        let mut copy = manager.copy().unwrap();
        copy.scale_mesh(5.0).unwrap();

        assert_eq!(manager.z_range().unwrap(), (0.0, 2.0));
        assert_eq!(copy.z_range().unwrap(), (0.0, 10.0));
        assert_eq!(copy.original().unwrap().bounds().unwrap().z(), (0.0, 2.0));
    }

    #[test]
    fn repair_updates_mesh_log_and_stats() {
        let mut mesh = unit_cube();
        mesh.invert();
        mesh.faces.pop();
        let mut manager = MeshManager::with_mesh(mesh);

        manager.repair_mesh(&RepairOptions::default()).unwrap();
        assert!(manager.mesh().unwrap().signed_volume() > 0.0);
        assert!(manager.original().unwrap().signed_volume() < 0.0);

        let log = manager.repair_log().unwrap();
        assert!(log[0].starts_with("Inverted faces to fix negative volume"));
        assert_eq!(
            *manager.stats(),
            RepairStats {
                processed: 1,
                successful: 1,
                failed: 0,
                volume_fixed: 1,
                watertight_fixed: 1,
                degenerate_removed: 0,
            }
        );
    }

    #[test]
    fn repair_counts_failures() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 99]);
        let mut manager = MeshManager::with_mesh(mesh);
        manager.repair_mesh(&RepairOptions::default()).unwrap();
        assert_eq!(manager.stats().failed, 1);
        assert_eq!(manager.stats().successful, 0);
    }

    #[test]
    fn repair_by_name_rejects_unknown_option() {
        let mut manager = MeshManager::with_mesh(unit_cube());
        let err = manager.repair_mesh_with(&[("polish", true)]).unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Repair(RepairError::InvalidOption { .. })
        ));
        assert_eq!(manager.stats().processed, 0);

        manager
            .repair_mesh_with(&[("keep_largest_component", true)])
            .unwrap();
        assert_eq!(manager.stats().processed, 1);
    }

    #[test]
    fn load_flattens_scene_and_wraps_errors() {
        let loader = |path: &Path, _: Option<&str>| {
            if path.ends_with("empty.glb") {
                Ok(LoadedGeometry::Scene(Vec::new()))
            } else if path.ends_with("scene.glb") {
                Ok(LoadedGeometry::Scene(vec![unit_cube()]))
            } else {
                Err(LoadError::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
        };

        let mut manager = MeshManager::new();
        assert_eq!(manager.load(&loader, "scene.glb", None).unwrap().face_count(), 12);

        let err = manager.load(&loader, "empty.glb", Some("glb")).unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Load {
                source: LoadError::EmptyScene,
                ..
            }
        ));
        assert!(err.to_string().contains("empty.glb"));
        assert!(manager.mesh().is_ok());

        assert!(matches!(
            manager.load(&loader, "missing.stl", None),
            Err(ManagerError::Load {
                source: LoadError::FileNotFound { .. },
                ..
            })
        ));
    }

    #[test]
    fn cross_section_of_cube() {
        let manager = MeshManager::with_mesh(unit_cube());
        let loops = manager
            .cross_section(Point3::new(0.5, 0.5, 0.5), Vector3::z())
            .unwrap();
        assert_eq!(loops.len(), 1);
        assert!(matches!(
            manager.cross_section(Point3::origin(), Vector3::zeros()),
            Err(ManagerError::Geometry(_))
        ));
    }
}
