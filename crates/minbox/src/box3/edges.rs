//! Box candidates supported by mutually orthogonal hull-edge triples.
//!
//! The flush-face scan alone can miss the optimum; a minimal box may touch
//! the hull only along edges. Any such box has each of its three axis
//! directions parallel to a hull edge, and those three edges are mutually
//! orthogonal, so scanning orthogonal edge triples closes the gap.
//! Orthogonality is an exact dot-product-zero test; under floating compute
//! a triple that is not exactly orthogonal in the rounded coordinates is
//! not found, which is part of the accuracy tradeoff of that scalar.

use nalgebra::Vector3;

use super::{push_unique, span_along, Candidate3};
use crate::hull::HullMesh;
use crate::scalar::{cross3, dot3, sub3, ComputeScalar};

/// Best box over all mutually orthogonal edge triples, `None` when the
/// hull has no such triple.
pub(crate) fn best_edge_candidate<S: ComputeScalar>(
    pts: &[Vector3<S>],
    mesh: &HullMesh,
) -> Option<Candidate3<S>> {
    let dirs: Vec<Vector3<S>> = mesh
        .edges
        .iter()
        .map(|e| sub3(&pts[e.v[1]], &pts[e.v[0]]))
        .collect();
    let nonzero: Vec<bool> = dirs.iter().map(|d| S::zero() < dot3(d, d)).collect();

    let mut best: Option<Candidate3<S>> = None;
    for i in 0..dirs.len() {
        if !nonzero[i] {
            continue;
        }
        for j in (i + 1)..dirs.len() {
            if !nonzero[j] || dot3(&dirs[i], &dirs[j]) != S::zero() {
                continue;
            }
            // The third edge only certifies the support condition; the box
            // frame is already determined by the pair, so one certificate
            // per pair suffices.
            let certified = ((j + 1)..dirs.len()).any(|k| {
                nonzero[k]
                    && dot3(&dirs[i], &dirs[k]) == S::zero()
                    && dot3(&dirs[j], &dirs[k]) == S::zero()
            });
            if !certified {
                continue;
            }
            let cand = triple_candidate(pts, mesh, &dirs[i], &dirs[j]);
            let smaller = match &best {
                None => true,
                Some(b) => cand.volume < b.volume,
            };
            if smaller {
                best = Some(cand);
            }
        }
    }
    best
}

fn triple_candidate<S: ComputeScalar>(
    pts: &[Vector3<S>],
    mesh: &HullMesh,
    a0: &Vector3<S>,
    a1: &Vector3<S>,
) -> Candidate3<S> {
    let axis = [a0.clone(), a1.clone(), cross3(a0, a1)];
    let s0 = dot3(a0, a0);
    let s1 = dot3(a1, a1);
    // |a0 × a1|² = |a0|²|a1|² for an orthogonal pair.
    let sqr_len = [s0.clone(), s1.clone(), s0.clone() * s1.clone()];

    let spans = [
        span_along(pts, &mesh.vertices, &axis[0]),
        span_along(pts, &mesh.vertices, &axis[1]),
        span_along(pts, &mesh.vertices, &axis[2]),
    ];

    // Each raw span carries the axis length; dividing the product by
    // |a0|²|a1|² removes all three and leaves the true volume.
    let volume = spans
        .iter()
        .map(|(lo, hi)| hi.0.clone() - lo.0.clone())
        .fold(S::one(), |acc, d| acc * d)
        / (s0 * s1);

    let mut support = Vec::with_capacity(6);
    for (lo, hi) in &spans {
        push_unique(&mut support, lo.1);
        push_unique(&mut support, hi.1);
    }

    let range = spans.map(|(lo, hi)| (lo.0, hi.0));
    Candidate3 {
        axis,
        sqr_len,
        range,
        volume,
        support,
    }
}
