//! Spatial normalization for neuronal meshes.
//!
//! This crate provides tools for:
//! - Per-axis bounds ([`compute_bounds`])
//! - Centering on the centroid, the bounds center or the origin ([`center`])
//! - Uniform scaling ([`scale`])
//! - PCA and principal-axis alignment ([`pca_axes`], [`align_principal_axis`])
//!
//! # Example
//!
//! ```
//! use neuromesh_transform::{CenterMode, align_principal_axis, center, scale};
//! use neuromesh_types::{Axis, CylinderParams, Vector3, cylinder};
//!
//! let mut mesh = cylinder(&CylinderParams::default().with_axis(Axis::Y)).unwrap();
//! center(&mut mesh, CenterMode::Centroid).unwrap();
//! scale(&mut mesh, 0.5).unwrap();
//! align_principal_axis(&mut mesh, &Vector3::z()).unwrap();
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod normalize;
mod pca;

pub use error::{TransformError, TransformResult};
pub use normalize::{CenterMode, align_principal_axis, center, compute_bounds, scale};
pub use pca::{PcaResult, pca_axes};
