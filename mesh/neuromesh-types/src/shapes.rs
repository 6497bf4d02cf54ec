//! Fixture shapes for neuronal morphologies.
//!
//! Capped cylinders stand in for neurite segments and tori for closed
//! genus-1 test surfaces. Every shape shares vertices across its seams so
//! the result is watertight, consistently wound and outward facing.

// Segment counts are small; the usize -> f64 / u32 casts cannot lose anything meaningful.
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use std::f64::consts::PI;

use nalgebra::Point3;

use crate::{Axis, Mesh, MeshError, MeshResult, Vertex};

/// Parameters for [`cylinder`].
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderParams {
    /// Length along the axis.
    pub length: f64,
    /// Radius of the circular cross-section.
    pub radius: f64,
    /// Number of segments around the circumference.
    pub resolution: usize,
    /// Center of the cylinder.
    pub center: Point3<f64>,
    /// Axis the cylinder runs along.
    pub axis: Axis,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            length: 100.0,
            radius: 5.0,
            resolution: 32,
            center: Point3::origin(),
            axis: Axis::Z,
        }
    }
}

impl CylinderParams {
    /// Set the length.
    #[must_use]
    pub const fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Set the radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the circumferential resolution.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the center.
    #[must_use]
    pub const fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Set the axis.
    #[must_use]
    pub const fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Volume of the ideal (smooth) cylinder.
    #[must_use]
    pub fn theoretical_volume(&self) -> f64 {
        PI * self.radius * self.radius * self.length
    }
}

/// Parameters for [`torus`].
#[derive(Debug, Clone, PartialEq)]
pub struct TorusParams {
    /// Distance from the torus center to the tube center.
    pub major_radius: f64,
    /// Radius of the tube.
    pub minor_radius: f64,
    /// Segments around the major circle.
    pub major_segments: usize,
    /// Segments around the tube.
    pub minor_segments: usize,
    /// Center of the torus.
    pub center: Point3<f64>,
    /// Axis of rotational symmetry.
    pub axis: Axis,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            major_radius: 20.0,
            minor_radius: 5.0,
            major_segments: 48,
            minor_segments: 24,
            center: Point3::origin(),
            axis: Axis::Z,
        }
    }
}

impl TorusParams {
    /// Set both radii.
    #[must_use]
    pub const fn with_radii(mut self, major: f64, minor: f64) -> Self {
        self.major_radius = major;
        self.minor_radius = minor;
        self
    }

    /// Set both segment counts.
    #[must_use]
    pub const fn with_segments(mut self, major: usize, minor: usize) -> Self {
        self.major_segments = major;
        self.minor_segments = minor;
        self
    }

    /// Set the center.
    #[must_use]
    pub const fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Set the axis.
    #[must_use]
    pub const fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Volume of the ideal torus, `2π²Rr²`.
    #[must_use]
    pub fn theoretical_volume(&self) -> f64 {
        2.0 * PI * PI * self.major_radius * self.minor_radius * self.minor_radius
    }

    /// Surface area of the ideal torus, `4π²Rr`.
    #[must_use]
    pub fn theoretical_surface_area(&self) -> f64 {
        4.0 * PI * PI * self.major_radius * self.minor_radius
    }
}

/// Map local coordinates (third component along the axis) to world space.
///
/// Only cyclic permutations are used so orientation is preserved.
fn place(local: [f64; 3], axis: Axis, center: Point3<f64>) -> Vertex {
    let [a, b, c] = local;
    let [x, y, z] = match axis {
        Axis::Z => [a, b, c],
        Axis::X => [c, a, b],
        Axis::Y => [b, c, a],
    };
    Vertex::from_coords(center.x + x, center.y + y, center.z + z)
}

fn check_positive(name: &'static str, value: f64) -> MeshResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(MeshError::InvalidParameter { name, value })
    }
}

fn check_segments(name: &'static str, value: usize) -> MeshResult<()> {
    if value >= 3 {
        Ok(())
    } else {
        Err(MeshError::InvalidParameter {
            name,
            value: value as f64,
        })
    }
}

/// Build a closed, capped cylinder.
///
/// The side is two rings of `resolution` vertices joined by quads; each
/// end is closed with a fan around a center vertex.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] if the length or radius is not
/// positive and finite, or the resolution is below 3.
///
/// # Example
///
/// ```
/// use neuromesh_types::{cylinder, CylinderParams};
///
/// let mesh = cylinder(&CylinderParams::default()).unwrap();
/// let expected = std::f64::consts::PI * 25.0 * 100.0;
/// assert!((mesh.signed_volume() - expected).abs() / expected < 0.01);
/// ```
pub fn cylinder(params: &CylinderParams) -> MeshResult<Mesh> {
    check_positive("length", params.length)?;
    check_positive("radius", params.radius)?;
    check_segments("resolution", params.resolution)?;

    let n = params.resolution;
    let half = params.length * 0.5;
    let mut mesh = Mesh::with_capacity(2 * n + 2, 4 * n);

    for z in [-half, half] {
        for i in 0..n {
            let theta = 2.0 * PI * (i as f64) / (n as f64);
            let local = [params.radius * theta.cos(), params.radius * theta.sin(), z];
            mesh.vertices.push(place(local, params.axis, params.center));
        }
    }
    let bottom_center = (2 * n) as u32;
    let top_center = bottom_center + 1;
    mesh.vertices
        .push(place([0.0, 0.0, -half], params.axis, params.center));
    mesh.vertices
        .push(place([0.0, 0.0, half], params.axis, params.center));

    for i in 0..n {
        let b0 = i as u32;
        let b1 = ((i + 1) % n) as u32;
        let t0 = b0 + n as u32;
        let t1 = b1 + n as u32;

        mesh.faces.push([b0, b1, t1]);
        mesh.faces.push([b0, t1, t0]);
        mesh.faces.push([bottom_center, b1, b0]);
        mesh.faces.push([top_center, t0, t1]);
    }

    let meta = &mut mesh.metadata;
    meta.insert("morphology_type", "cylinder");
    meta.insert("length", params.length);
    meta.insert("radius", params.radius);
    meta.insert("axis", params.axis.name());
    meta.insert("volume_theoretical", params.theoretical_volume());

    Ok(mesh)
}

/// Build a closed torus.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] if a radius is not positive and
/// finite, the minor radius is not smaller than the major radius, or a
/// segment count is below 3.
///
/// # Example
///
/// ```
/// use neuromesh_types::{torus, TorusParams};
///
/// let params = TorusParams::default();
/// let mesh = torus(&params).unwrap();
/// let expected = params.theoretical_volume();
/// assert!((mesh.signed_volume() - expected).abs() / expected < 0.05);
/// ```
pub fn torus(params: &TorusParams) -> MeshResult<Mesh> {
    check_positive("major_radius", params.major_radius)?;
    check_positive("minor_radius", params.minor_radius)?;
    if params.minor_radius >= params.major_radius {
        return Err(MeshError::InvalidParameter {
            name: "minor_radius",
            value: params.minor_radius,
        });
    }
    check_segments("major_segments", params.major_segments)?;
    check_segments("minor_segments", params.minor_segments)?;

    let big = params.major_segments;
    let small = params.minor_segments;
    let mut mesh = Mesh::with_capacity(big * small, 2 * big * small);

    for u in 0..big {
        let phi = 2.0 * PI * (u as f64) / (big as f64);
        for v in 0..small {
            let theta = 2.0 * PI * (v as f64) / (small as f64);
            let ring = params.major_radius + params.minor_radius * theta.cos();
            let local = [
                ring * phi.cos(),
                ring * phi.sin(),
                params.minor_radius * theta.sin(),
            ];
            mesh.vertices.push(place(local, params.axis, params.center));
        }
    }

    let index = |u: usize, v: usize| ((u % big) * small + (v % small)) as u32;
    for u in 0..big {
        for v in 0..small {
            let a = index(u, v);
            let b = index(u + 1, v);
            let c = index(u + 1, v + 1);
            let d = index(u, v + 1);
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }
    }

    let meta = &mut mesh.metadata;
    meta.insert("morphology_type", "torus");
    meta.insert("major_radius", params.major_radius);
    meta.insert("minor_radius", params.minor_radius);
    meta.insert("axis", params.axis.name());
    meta.insert("volume_theoretical", params.theoretical_volume());
    meta.insert(
        "surface_area_theoretical",
        params.theoretical_surface_area(),
    );

    Ok(mesh)
}

/// Create a unit cube from (0,0,0) to (1,1,1) with outward-facing normals.
#[must_use]
pub fn unit_cube() -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);

    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 1.0)); // 7

    // Bottom (-Z)
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);
    // Top (+Z)
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);
    // Front (-Y)
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);
    // Back (+Y)
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);
    // Left (-X)
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);
    // Right (+X)
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}
