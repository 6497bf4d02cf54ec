//! Core mesh types for neuronal surface morphologies.
//!
//! This crate provides the foundational types shared by every other
//! `neuromesh-*` crate:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`Mesh`] - A triangle mesh with indexed vertices and a metadata map
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Bounds`] - Per-axis (min, max) extents of a vertex set
//! - [`Metadata`] - Informational key/value map attached to a mesh
//!
//! It also ships the fixture shapes used to exercise the diagnostic and
//! repair layers: a capped [`cylinder`], a [`torus`] and a [`unit_cube`].
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! Neuronal morphologies are usually expressed in micrometers.
//!
//! # Winding
//!
//! Faces are **counter-clockwise (CCW) when viewed from outside**, so a
//! closed, correctly oriented mesh has a positive signed volume.
//!
//! # Example
//!
//! ```
//! use neuromesh_types::{Mesh, Vertex};
//!
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod error;
mod mesh;
mod metadata;
mod shapes;
mod triangle;
mod vertex;

pub use bounds::{Axis, Bounds};
pub use error::{MeshError, MeshResult};
pub use mesh::Mesh;
pub use metadata::{Metadata, MetadataValue, REPAIR_LOG_KEY};
pub use shapes::{CylinderParams, TorusParams, cylinder, torus, unit_cube};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point3, Vector3};
