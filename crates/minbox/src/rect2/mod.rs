//! Minimum-area oriented bounding rectangle of a planar point set.
//!
//! Purpose
//! - Public 2D entry points: hull oracle → degenerate-case dispatch →
//!   rotating calipers (or the exhaustive reference) → conversion of the
//!   scaled compute-type candidate into an `f64` oriented rectangle.
//!
//! Numerics
//! - All search decisions happen in the compute scalar `S`; square roots
//!   appear only in the final conversion, and axis vectors are normalized
//!   by factoring out their largest component first so the division is
//!   well conditioned before the floating conversion.

use log::debug;
use nalgebra::Vector2;

use crate::calipers::{
    collinear_sweep, exhaustive_edges, rotating_calipers, Frame, Planar, RectCandidate, BOTTOM,
    LEFT, RIGHT, TOP,
};
use crate::cfg::BoxCfg;
use crate::error::MinBoxError;
use crate::hull::{Hull2, HullOracle2, MonotoneChain};
use crate::scalar::{add2, dot2, scale2, vec2, ComputeScalar};

/// Minimum-area oriented bounding rectangle.
///
/// `axis` is orthonormal and right-handed; `extent` holds the half-widths.
/// `support` lists the input point indices the search actually used as
/// supports (diagnostics/testing; may contain repeats for thin hulls).
#[derive(Clone, Debug)]
pub struct MinRect2 {
    pub center: Vector2<f64>,
    pub axis: [Vector2<f64>; 2],
    pub extent: [f64; 2],
    pub support: Vec<usize>,
}

impl MinRect2 {
    #[inline]
    pub fn area(&self) -> f64 {
        4.0 * self.extent[0] * self.extent[1]
    }

    /// Signed-distance containment check against the four support lines.
    #[inline]
    pub fn contains(&self, p: &Vector2<f64>, tol: f64) -> bool {
        let r = p - self.center;
        r.dot(&self.axis[0]).abs() <= self.extent[0] + tol
            && r.dot(&self.axis[1]).abs() <= self.extent[1] + tol
    }
}

/// Minimum-area oriented bounding rectangle of `points`.
///
/// Degenerate inputs (coincident or collinear points) are valid and yield
/// zero-extent rectangles. Fails only for an empty point array. The result
/// is the exact minimum when `S::EXACT`; under `f64` compute it is an
/// accuracy tradeoff the caller opts into.
pub fn min_area_rect<S: ComputeScalar>(
    points: &[Vector2<f64>],
    cfg: &BoxCfg,
) -> Result<MinRect2, MinBoxError> {
    if points.is_empty() {
        return Err(MinBoxError::InvalidInput("at least one point is required"));
    }
    match MonotoneChain::new(cfg.eps_rank).hull(points) {
        Hull2::Point { index } => Ok(point_rect(points, index)),
        Hull2::Segment {
            min_index,
            max_index,
        } => Ok(segment_rect(points, min_index, max_index)),
        Hull2::Polygon { indices } => polygon_rect::<S>(points, &indices, cfg, true),
    }
}

/// Same as [`min_area_rect`] for an already-known convex polygon given as
/// counterclockwise indices into `points` (clockwise input is re-wound).
/// Bypasses hull construction; whether the indices actually describe a
/// convex polygon is the caller's assertion and is not validated.
pub fn min_area_rect_for_hull<S: ComputeScalar>(
    points: &[Vector2<f64>],
    hull_indices: &[usize],
    cfg: &BoxCfg,
) -> Result<MinRect2, MinBoxError> {
    if hull_indices.len() < 3 {
        return Err(MinBoxError::InvalidInput(
            "a convex polygon needs at least 3 indices",
        ));
    }
    if hull_indices.iter().any(|&i| i >= points.len()) {
        return Err(MinBoxError::InvalidInput("hull index out of range"));
    }
    polygon_rect::<S>(points, hull_indices, cfg, true)
}

fn point_rect(points: &[Vector2<f64>], index: usize) -> MinRect2 {
    MinRect2 {
        center: points[index],
        axis: [Vector2::x(), Vector2::y()],
        extent: [0.0, 0.0],
        support: vec![index],
    }
}

fn segment_rect(points: &[Vector2<f64>], min_index: usize, max_index: usize) -> MinRect2 {
    let d = points[max_index] - points[min_index];
    let u = d / d.norm();
    MinRect2 {
        center: (points[min_index] + points[max_index]) / 2.0,
        axis: [u, Vector2::new(-u.y, u.x)],
        extent: [d.norm() / 2.0, 0.0],
        support: vec![min_index, max_index],
    }
}

/// The full-rank path over a convex polygon given by `order` (indices into
/// `points`).
fn polygon_rect<S: ComputeScalar>(
    points: &[Vector2<f64>],
    order: &[usize],
    cfg: &BoxCfg,
    retry: bool,
) -> Result<MinRect2, MinBoxError> {
    let mut order: Vec<usize> = order.to_vec();
    let mut verts: Vec<Vector2<S>> = order.iter().map(|&i| vec2::<S>(&points[i])).collect();

    // Winding normalization by the exact shoelace sign.
    let frame = Planar;
    let mut area2 = S::zero();
    for k in 0..verts.len() {
        area2 = area2 + frame.cross(&verts[k], &verts[(k + 1) % verts.len()]);
    }
    if area2 < S::zero() {
        order.reverse();
        verts.reverse();
    } else if area2 == S::zero() {
        return collapsed_polygon::<S>(points, &order, cfg, retry);
    }

    let kept = collinear_sweep(&frame, &verts);
    if kept.len() < 3 {
        return collapsed_polygon::<S>(points, &order, cfg, retry);
    }
    if kept.len() < verts.len() {
        debug!(
            "collinearity sweep dropped {} of {} polygon vertices",
            verts.len() - kept.len(),
            verts.len()
        );
    }
    let orig: Vec<usize> = kept.iter().map(|&k| order[k]).collect();
    let poly: Vec<Vector2<S>> = kept.iter().map(|&k| verts[k].clone()).collect();

    let cand = if cfg.use_rotating_calipers::<S>() {
        rotating_calipers(&frame, &poly)
    } else {
        exhaustive_edges(&frame, &poly)
    };
    match cand {
        Some(c) => Ok(convert(&poly, &c, &orig)),
        None => collapsed_polygon::<S>(points, &order, cfg, retry),
    }
}

/// The supplied polygon was exactly degenerate (zero shoelace area or the
/// collinearity sweep left fewer than 3 vertices): classify the subset and
/// fall back to a degenerate rectangle, re-entering the polygon path once
/// if the oracle still sees a full-rank subset.
fn collapsed_polygon<S: ComputeScalar>(
    points: &[Vector2<f64>],
    order: &[usize],
    cfg: &BoxCfg,
    retry: bool,
) -> Result<MinRect2, MinBoxError> {
    let sub: Vec<Vector2<f64>> = order.iter().map(|&i| points[i]).collect();
    let remap = |mut r: MinRect2| {
        for s in &mut r.support {
            *s = order[*s];
        }
        r
    };
    match MonotoneChain::new(cfg.eps_rank).hull(&sub) {
        Hull2::Point { index } => Ok(remap(point_rect(&sub, index))),
        Hull2::Segment {
            min_index,
            max_index,
        } => Ok(remap(segment_rect(&sub, min_index, max_index))),
        Hull2::Polygon { indices } if retry => {
            let sub_order: Vec<usize> = indices.iter().map(|&j| order[j]).collect();
            polygon_rect::<S>(points, &sub_order, cfg, false)
        }
        Hull2::Polygon { .. } => {
            // The fuzzy rank test and the exact sweep disagree; the subset
            // is exactly collinear up to rounding, so report its extremes.
            let mut lo = (f64::INFINITY, 0usize);
            let mut hi = (f64::NEG_INFINITY, 0usize);
            let d = widest_direction(&sub);
            for (j, p) in sub.iter().enumerate() {
                let t = d.dot(p);
                if t < lo.0 {
                    lo = (t, j);
                }
                if t > hi.0 {
                    hi = (t, j);
                }
            }
            Ok(remap(segment_rect(&sub, lo.1, hi.1)))
        }
    }
}

fn widest_direction(points: &[Vector2<f64>]) -> Vector2<f64> {
    let mut lo = points[0];
    let mut hi = points[0];
    for p in points {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    if hi.x - lo.x >= hi.y - lo.y {
        Vector2::x()
    } else {
        Vector2::y()
    }
}

/// Convert the winning scaled candidate into the caller's `f64` frame.
fn convert<S: ComputeScalar>(
    verts: &[Vector2<S>],
    cand: &RectCandidate<S, Vector2<S>>,
    orig: &[usize],
) -> MinRect2 {
    let s0 = dot2(&cand.u0, &cand.u0);
    let s1 = dot2(&cand.u1, &cand.u1);
    let xl = dot2(&cand.u0, &verts[cand.support[LEFT]]);
    let xr = dot2(&cand.u0, &verts[cand.support[RIGHT]]);
    let yb = dot2(&cand.u1, &verts[cand.support[BOTTOM]]);
    let yt = dot2(&cand.u1, &verts[cand.support[TOP]]);

    let two = S::two();
    let c = add2(
        &scale2(
            &cand.u0,
            &((xl.clone() + xr.clone()) / (two.clone() * s0.clone())),
        ),
        &scale2(&cand.u1, &((yb.clone() + yt.clone()) / (two * s1.clone()))),
    );
    let center = Vector2::new(c.x.to_f64(), c.y.to_f64());

    // Exact squared extents; the square root happens in f64 only.
    let four = S::two() * S::two();
    let w = xr - xl;
    let h = yt - yb;
    let e0 = ((w.clone() * w) / (four.clone() * s0)).to_f64().sqrt();
    let e1 = ((h.clone() * h) / (four * s1)).to_f64().sqrt();

    let a0 = normalize_axis(&cand.u0);
    MinRect2 {
        center,
        axis: [a0, Vector2::new(-a0.y, a0.x)],
        extent: [e0, e1],
        support: cand.support.iter().map(|&i| orig[i]).collect(),
    }
}

/// Unit `f64` direction of an exact axis vector: factor out the largest
/// component first so the division stays well conditioned, then normalize
/// in floating point.
fn normalize_axis<S: ComputeScalar>(u: &Vector2<S>) -> Vector2<f64> {
    let ax = u.x.abs();
    let ay = u.y.abs();
    let m = if ax < ay { ay } else { ax };
    let v = Vector2::new((u.x.clone() / m.clone()).to_f64(), (u.y.clone() / m).to_f64());
    v / v.norm()
}
