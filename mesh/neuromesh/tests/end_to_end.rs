//! End-to-end tests over the fixture morphologies.
//!
//! Each test drives the public API the way the modeling pipeline does:
//! build or load a mesh, normalize it, diagnose it, repair it and diagnose
//! again.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::f64::consts::PI;

use approx::assert_relative_eq;
use neuromesh::prelude::*;
use neuromesh::types::{Point3, Vector3};

fn within(actual: f64, expected: f64, fraction: f64) -> bool {
    (actual - expected).abs() <= expected.abs() * fraction
}

// =============================================================================
// Diagnostics on fixtures
// =============================================================================

mod diagnostics {
    use super::*;

    #[test]
    fn capped_cylinder() {
        let mesh = cylinder(&CylinderParams::default().with_length(100.0).with_radius(5.0)).unwrap();
        let report = MeshManager::with_mesh(mesh).analyze_mesh().unwrap();

        assert_eq!(report.is_watertight.get(), Some(true));
        assert_eq!(report.genus.get(), Some(0));
        assert_eq!(report.component_count.get(), Some(1));
        assert!(within(report.volume.get().unwrap(), PI * 25.0 * 100.0, 0.10));
        assert!(report.issues.is_empty());
    }

    #[test]
    fn torus() {
        let mesh = neuromesh::types::torus(&TorusParams::default().with_radii(20.0, 5.0)).unwrap();
        let report = analyze_mesh(&mesh);

        assert_eq!(report.genus.get(), Some(1));
        assert_eq!(report.euler_characteristic.get(), Some(0));
        assert!(within(
            report.volume.get().unwrap(),
            2.0 * PI * PI * 20.0 * 25.0,
            0.10
        ));
    }

    #[test]
    fn report_renders() {
        let report = analyze_mesh(&cylinder(&CylinderParams::default()).unwrap());
        let text = report.to_string();
        assert!(text.contains("Mesh Analysis Report"));
        assert!(text.contains("  * Components: 1"));
        assert!(text.contains("No issues detected"));
    }
}

// =============================================================================
// Repair scenarios
// =============================================================================

mod repair {
    use super::*;

    #[test]
    fn inverted_winding_is_fixed_and_logged() {
        let mut mesh = cylinder(&CylinderParams::default()).unwrap();
        mesh.invert();
        let mut manager = MeshManager::with_mesh(mesh);
        assert!(manager.analyze_mesh().unwrap().volume.get().unwrap() < 0.0);

        let opts = RepairOptions::none().with_fix_negative_volume(true);
        let repaired = manager.repair_mesh(&opts).unwrap();
        assert!(repaired.signed_volume() > 0.0);

        let log = manager.repair_log().unwrap();
        assert!(log[0].starts_with("Inverted faces to fix negative volume: -"));
        assert!(log[0].contains(" → "));
    }

    #[test]
    fn two_cylinders_reduce_to_larger() {
        let thin = cylinder(&CylinderParams::default().with_radius(2.0)).unwrap();
        let mut thick = cylinder(&CylinderParams::default().with_radius(6.0)).unwrap();
        thick.translate(Vector3::new(40.0, 0.0, 0.0));
        let thick_volume = thick.signed_volume();

        let mut merged = thin;
        merged.merge(&thick);
        let mut manager = MeshManager::with_mesh(merged);
        assert_eq!(manager.analyze_mesh().unwrap().component_count.get(), Some(2));

        manager
            .repair_mesh(&RepairOptions::default().with_keep_largest_component(true))
            .unwrap();
        let report = manager.analyze_mesh().unwrap();
        assert_eq!(report.component_count.get(), Some(1));
        assert_relative_eq!(report.volume.get().unwrap(), thick_volume, max_relative = 1e-9);
    }

    #[test]
    fn repair_is_idempotent_on_valid_mesh() {
        let mesh = neuromesh::types::torus(&TorusParams::default()).unwrap();
        let (first, first_log) = repair_mesh(&mesh, &RepairOptions::all());
        let (second, second_log) = repair_mesh(&first, &RepairOptions::all());

        assert!(first_log.is_noop());
        assert!(second_log.is_noop());
        assert_eq!(first.faces, mesh.faces);
        assert_eq!(second.vertices, first.vertices);
        assert_eq!(second.faces, first.faces);
    }

    #[test]
    fn damaged_mesh_comes_back_clean() {
        let mut mesh = cylinder(&CylinderParams::default().with_resolution(24)).unwrap();
        mesh.invert();
        mesh.faces.pop();
        let dup = mesh.faces[0];
        mesh.faces.push(dup);

        let before = analyze_mesh(&mesh);
        assert!(before.has_issues());

        let (fixed, log) = repair_mesh(&mesh, &RepairOptions::default());
        assert!(!log.has_failures(), "{log}");
        let after = analyze_mesh(&fixed);
        assert!(after.issues.is_empty(), "{after}");
        assert_eq!(after.genus.get(), Some(0));
    }
}

// =============================================================================
// Normalization
// =============================================================================

mod normalization {
    use super::*;

    #[test]
    fn center_then_align_then_section() {
        let params = CylinderParams::default()
            .with_axis(Axis::X)
            .with_center(Point3::new(30.0, -12.0, 7.0));
        let mut manager = MeshManager::with_mesh(cylinder(&params).unwrap());

        manager.center_mesh(CenterMode::Centroid).unwrap();
        manager.align_principal_axis(None).unwrap();

        let (lo, hi) = manager.z_range().unwrap();
        assert_relative_eq!(hi - lo, 100.0, epsilon = 1e-6);
        assert_relative_eq!(lo + hi, 0.0, epsilon = 1e-6);

        let loops = manager
            .cross_section(Point3::origin(), Vector3::z())
            .unwrap();
        assert_eq!(loops.len(), 1);
        // Points on the diagonal edges sit on chords, slightly inside the radius
        for p in &loops[0] {
            let r = p.coords.xy().norm();
            assert!(r > 4.9 && r < 5.0 + 1e-6, "radius {r}");
        }
    }

    #[test]
    fn scale_cubes_volume_through_manager() {
        let mut manager = MeshManager::with_mesh(cylinder(&CylinderParams::default()).unwrap());
        let before = manager.analyze_mesh().unwrap().volume.get().unwrap();
        manager.scale_mesh(0.5).unwrap();
        let after = manager.analyze_mesh().unwrap().volume.get().unwrap();
        assert_relative_eq!(after, before * 0.125, max_relative = 1e-9);
    }
}
