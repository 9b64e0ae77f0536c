//! Generic rotating-calipers rectangle search.
//!
//! Purpose
//! - One search loop serves both the 2D minimum-area rectangle and the 3D
//!   per-face "extruded rectangle" problem. The loop is parameterized by a
//!   [`Frame`]: two in-plane axes are carried implicitly through `dot` and
//!   `perp`, and the 3D variant fixes the third axis to a face normal.
//! - Two interchangeable searches over the same candidate type: the O(n)
//!   amortized calipers rotation ([`rotating::rotating_calipers`]) and the
//!   O(n²) exhaustive per-edge reference ([`brute::exhaustive_edges`]).
//!
//! Numerics
//! - No square roots, no trigonometry. Turning angles are compared through
//!   cross-multiplied squared sines; areas through one exact division per
//!   candidate. Under an exact [`ComputeScalar`] every comparison is exact.

mod brute;
mod rotating;

pub use brute::exhaustive_edges;
pub use rotating::rotating_calipers;

use nalgebra::{Vector2, Vector3};

use crate::scalar::{cross3, dot2, dot3, perp2, sub2, sub3, ComputeScalar};

/// A 2D reference frame over vectors of type `Self::Vector`.
///
/// `perp` rotates an in-plane vector by +90° about the frame normal; for
/// the planar frame `|perp(v)| = |v|`, for a face frame `|perp(v)| =
/// |n||v|`. The search never relies on the two being equal.
pub trait Frame<S: ComputeScalar>: Sync {
    type Vector: Clone + Send + Sync;

    fn dot(&self, a: &Self::Vector, b: &Self::Vector) -> S;
    fn perp(&self, v: &Self::Vector) -> Self::Vector;
    fn sub(&self, a: &Self::Vector, b: &Self::Vector) -> Self::Vector;

    /// In-plane cross product, `perp(a) · b`.
    #[inline]
    fn cross(&self, a: &Self::Vector, b: &Self::Vector) -> S {
        self.dot(&self.perp(a), b)
    }
}

/// The ordinary 2D plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct Planar;

impl<S: ComputeScalar> Frame<S> for Planar {
    type Vector = Vector2<S>;

    #[inline]
    fn dot(&self, a: &Vector2<S>, b: &Vector2<S>) -> S {
        dot2(a, b)
    }

    #[inline]
    fn perp(&self, v: &Vector2<S>) -> Vector2<S> {
        perp2(v)
    }

    #[inline]
    fn sub(&self, a: &Vector2<S>, b: &Vector2<S>) -> Vector2<S> {
        sub2(a, b)
    }
}

/// The plane through the origin orthogonal to `normal` (not necessarily
/// unit length). Vectors handed to the search must lie in that plane.
#[derive(Clone, Debug)]
pub struct FacePlane<S: ComputeScalar> {
    pub normal: Vector3<S>,
}

impl<S: ComputeScalar> Frame<S> for FacePlane<S> {
    type Vector = Vector3<S>;

    #[inline]
    fn dot(&self, a: &Vector3<S>, b: &Vector3<S>) -> S {
        dot3(a, b)
    }

    #[inline]
    fn perp(&self, v: &Vector3<S>) -> Vector3<S> {
        cross3(&self.normal, v)
    }

    #[inline]
    fn sub(&self, a: &Vector3<S>, b: &Vector3<S>) -> Vector3<S> {
        sub3(a, b)
    }
}

/// Caliper labels, also the layout of [`RectCandidate::support`].
pub const BOTTOM: usize = 0;
pub const RIGHT: usize = 1;
pub const TOP: usize = 2;
pub const LEFT: usize = 3;

/// One supporting rectangle of the polygon.
///
/// `u0`/`u1` are generally not unit length (they are polygon edge vectors
/// and their perps, kept unnormalized to preserve exactness). The scaled
/// area is `w·h / |u0|²` with `w`, `h` the raw support-dot spans; for a
/// fixed frame it orders candidates exactly like the true area.
#[derive(Clone, Debug)]
pub struct RectCandidate<S: ComputeScalar, V> {
    pub u0: V,
    pub u1: V,
    /// Polygon vertex indices in caliper order bottom, right, top, left.
    pub support: [usize; 4],
    pub scaled_area: S,
}

/// Defensive collinearity sweep: indices of the vertices whose incoming
/// and outgoing edges have an exactly nonzero in-frame cross product.
///
/// Hull oracles already guarantee no three consecutive collinear vertices;
/// this re-derives the edge vectors and enforces it regardless, which also
/// drops exactly repeated vertices.
pub fn collinear_sweep<S: ComputeScalar, F: Frame<S>>(frame: &F, verts: &[F::Vector]) -> Vec<usize> {
    let n = verts.len();
    if n < 3 {
        return (0..n).collect();
    }
    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let e_in = frame.sub(&verts[i], &verts[(i + n - 1) % n]);
        let e_out = frame.sub(&verts[(i + 1) % n], &verts[i]);
        if frame.cross(&e_in, &e_out) != S::zero() {
            kept.push(i);
        }
    }
    kept
}

/// Is candidate `(x, y)` a better support than the incumbent for caliper
/// `k`? Ties prefer the vertex closer to the adjacent caliper in rotation
/// order (bottom→right→top→left), which is required for correctness when
/// several vertices are collinear with a caliper direction.
pub(crate) fn better_support<S: ComputeScalar>(k: usize, cand: &(S, S), cur: &(S, S)) -> bool {
    match k {
        BOTTOM => cand.1 < cur.1 || (cand.1 == cur.1 && cand.0 > cur.0),
        RIGHT => cand.0 > cur.0 || (cand.0 == cur.0 && cand.1 > cur.1),
        TOP => cand.1 > cur.1 || (cand.1 == cur.1 && cand.0 < cur.0),
        LEFT => cand.0 < cur.0 || (cand.0 == cur.0 && cand.1 < cur.1),
        _ => unreachable!("caliper index"),
    }
}

/// Select the four supports among `candidates` (vertex indices) under the
/// axes `u0`, `u1`.
pub(crate) fn select_supports<S: ComputeScalar, F: Frame<S>>(
    frame: &F,
    verts: &[F::Vector],
    u0: &F::Vector,
    u1: &F::Vector,
    candidates: &[usize],
) -> [usize; 4] {
    let coord = |i: usize| (frame.dot(u0, &verts[i]), frame.dot(u1, &verts[i]));
    let mut support = [candidates[0]; 4];
    let c0 = coord(candidates[0]);
    let mut best = [c0.clone(), c0.clone(), c0.clone(), c0];
    for &i in &candidates[1..] {
        let c = coord(i);
        for k in 0..4 {
            if better_support(k, &c, &best[k]) {
                best[k] = c.clone();
                support[k] = i;
            }
        }
    }
    support
}

/// Raw support spans and the scaled area `w·h / |u0|²`.
pub(crate) fn scaled_area<S: ComputeScalar, F: Frame<S>>(
    frame: &F,
    verts: &[F::Vector],
    u0: &F::Vector,
    u1: &F::Vector,
    support: &[usize; 4],
) -> S {
    let w = frame.dot(u0, &verts[support[RIGHT]]) - frame.dot(u0, &verts[support[LEFT]]);
    let h = frame.dot(u1, &verts[support[TOP]]) - frame.dot(u1, &verts[support[BOTTOM]]);
    w * h / frame.dot(u0, u0)
}
