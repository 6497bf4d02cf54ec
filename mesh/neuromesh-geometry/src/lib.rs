//! Geometry primitives and the topology kernel.
//!
//! This crate provides:
//! - Vector primitives: [`normalize`], [`skew`], [`rodrigues`] and
//!   [`rotation_between`]
//! - The [`GeometryKernel`] contract: raw measurements (signed volume,
//!   watertightness, winding consistency, manifoldness, Euler
//!   characteristic, face areas and normals) and in-place fixes (duplicate
//!   and degenerate face removal, hole filling, winding repair, inversion)
//! - [`TopologyKernel`], the native implementation built on
//!   [`MeshAdjacency`]
//!
//! Diagnostics and repair in `neuromesh-repair` only talk to the trait, so
//! a different kernel can be substituted without touching them.
//!
//! # Example
//!
//! ```
//! use neuromesh_geometry::{GeometryKernel, TopologyKernel};
//! use neuromesh_types::{TorusParams, torus};
//!
//! let kernel = TopologyKernel::default();
//! let ring = torus(&TorusParams::default()).unwrap();
//!
//! assert!(kernel.is_watertight(&ring).unwrap());
//! assert_eq!(kernel.euler_characteristic(&ring).unwrap(), 0);
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
pub mod components;
mod error;
pub mod holes;
mod kernel;
mod section;
mod vector;
pub mod winding;

pub use adjacency::{EdgeKey, MeshAdjacency};
pub use components::{find_connected_components, split_into_components};
pub use error::{GeometryError, GeometryResult};
pub use holes::{BoundaryLoop, detect_holes, fill_holes};
pub use kernel::{GeometryKernel, TopologyKernel};
pub use section::section_loops;
pub use vector::{ALLCLOSE_ATOL, ALLCLOSE_RTOL, normalize, rodrigues, rotation_between, skew};
pub use winding::{count_inconsistent_faces, fix_winding_order};
