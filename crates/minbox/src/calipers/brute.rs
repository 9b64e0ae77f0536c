//! O(n²) exhaustive per-edge reference search.

use super::{scaled_area, select_supports, Frame, RectCandidate};
use crate::scalar::ComputeScalar;

/// For every polygon edge, build the rectangle with one side parallel to
/// it by scanning all vertices for the four extremes; keep the minimum
/// area. Always correct, O(n²); the fallback when the O(n) loop invariant
/// is not trusted (floating scalars) and the reference in tests.
pub fn exhaustive_edges<S, F>(frame: &F, verts: &[F::Vector]) -> Option<RectCandidate<S, F::Vector>>
where
    S: ComputeScalar,
    F: Frame<S>,
{
    let n = verts.len();
    if n < 3 {
        return None;
    }
    let all: Vec<usize> = (0..n).collect();
    let mut best: Option<RectCandidate<S, F::Vector>> = None;
    for i in 0..n {
        let u0 = frame.sub(&verts[(i + 1) % n], &verts[i]);
        if !(S::zero() < frame.dot(&u0, &u0)) {
            continue;
        }
        let u1 = frame.perp(&u0);
        let support = select_supports(frame, verts, &u0, &u1, &all);
        let area = scaled_area(frame, verts, &u0, &u1, &support);
        let smaller = match &best {
            None => true,
            Some(b) => area < b.scaled_area,
        };
        if smaller {
            best = Some(RectCandidate {
                u0,
                u1,
                support,
                scaled_area: area,
            });
        }
    }
    best
}
