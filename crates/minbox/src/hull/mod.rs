//! Convex hull oracles (the black-box dependency of the box searches).
//!
//! The searches consume hulls through the [`HullOracle2`]/[`HullOracle3`]
//! strategy traits so alternate hull algorithms can be substituted without
//! touching the bounding-box logic. The shipped defaults are
//! [`hull2::MonotoneChain`] and [`hull3::IncrementalHull`].
//!
//! Both oracles first classify the point set's dimension with an
//! epsilon-fuzzy rank test; only genuinely full-dimensional inputs get a
//! hull boundary. Degenerate classifications carry the data the caller
//! needs to produce a zero-extent box directly.

pub mod hull2;
pub mod hull3;

pub use hull2::{Hull2, HullOracle2, MonotoneChain};
pub use hull3::{Hull3, HullEdge, HullMesh, HullOracle3, IncrementalHull};
