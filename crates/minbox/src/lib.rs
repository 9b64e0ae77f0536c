//! Minimum-area oriented bounding rectangles (2D) and minimum-volume
//! oriented bounding boxes (3D).
//!
//! The 2D search is convex hull + rotating calipers; the 3D search scans
//! box candidates flush with each hull face (rotating calipers over the
//! face-plane silhouette) and candidates supported by mutually orthogonal
//! hull-edge triples. All comparisons run in a caller-chosen
//! [`scalar::ComputeScalar`]; with `num_rational::BigRational` the reported
//! minimum is exact, with `f64` it is a fast approximation.
//!
//! Entry points: [`rect2::min_area_rect`] and [`box3::min_volume_box`],
//! plus `*_for_hull`/`*_for_mesh` variants that accept a precomputed hull.

pub mod box3;
pub mod calipers;
pub mod cfg;
pub mod error;
pub mod hull;
pub mod rect2;
pub mod sample;
pub mod scalar;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use box3::{min_volume_box, min_volume_box_for_mesh, MinBox3};
pub use cfg::{Algorithm, BoxCfg};
pub use error::MinBoxError;
pub use rect2::{min_area_rect, min_area_rect_for_hull, MinRect2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::box3::{min_volume_box, min_volume_box_for_mesh, MinBox3};
    pub use crate::cfg::{Algorithm, BoxCfg};
    pub use crate::error::MinBoxError;
    pub use crate::hull::{HullOracle2, HullOracle3, IncrementalHull, MonotoneChain};
    pub use crate::rect2::{min_area_rect, min_area_rect_for_hull, MinRect2};
    pub use crate::sample::ReplayToken;
    pub use crate::scalar::ComputeScalar;
    pub use nalgebra::{Vector2, Vector3};
}
