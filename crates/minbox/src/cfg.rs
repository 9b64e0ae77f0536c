//! Search configuration.
//!
//! - `Algorithm`: O(n) rotating calipers vs the O(n²) exhaustive edge scan.
//! - `BoxCfg`: centralizes the algorithm selector, the worker-thread count
//!   for the 3D face search, and the epsilon of the hull oracle's fuzzy
//!   rank classification.

use crate::scalar::ComputeScalar;

/// Which rectangle search runs over a convex polygon (2D, and per hull
/// face in 3D).
///
/// `Auto` resolves to rotating calipers only when the compute scalar is
/// exact; the O(n) loop invariant is not trusted across degenerate ties
/// under floating arithmetic, so `Auto` falls back to the exhaustive scan
/// there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Auto,
    RotatingCalipers,
    ExhaustiveEdges,
}

/// Configuration shared by the 2D and 3D entry points.
#[derive(Clone, Copy, Debug)]
pub struct BoxCfg {
    pub algorithm: Algorithm,
    /// Worker threads for the 3D face-supported search (>= 1). All other
    /// phases are single-threaded.
    pub num_threads: usize,
    /// Relative epsilon for the hull oracle's dimension classification.
    pub eps_rank: f64,
}

impl Default for BoxCfg {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Auto,
            num_threads: 1,
            eps_rank: 1e-10,
        }
    }
}

impl BoxCfg {
    /// Resolve `algorithm` for the compute scalar `S`.
    #[inline]
    pub fn use_rotating_calipers<S: ComputeScalar>(&self) -> bool {
        match self.algorithm {
            Algorithm::Auto => S::EXACT,
            Algorithm::RotatingCalipers => true,
            Algorithm::ExhaustiveEdges => false,
        }
    }
}
