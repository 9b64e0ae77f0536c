//! O(n) amortized calipers rotation.

use super::{scaled_area, select_supports, Frame, RectCandidate, BOTTOM};
use crate::scalar::ComputeScalar;

/// Minimum-area supporting rectangle of a convex polygon, O(n) amortized.
///
/// Preconditions: at least 3 vertices, counterclockwise in the frame, no
/// three consecutive vertices exactly collinear (run
/// [`super::collinear_sweep`] first). Returns `None` only for degenerate
/// input that violates the preconditions.
///
/// The minimality of the result is guaranteed only for exact scalars; the
/// loop invariant (every support's outgoing edge lies within its caliper's
/// quarter-turn) can break across degenerate ties under floating
/// arithmetic.
pub fn rotating_calipers<S, F>(frame: &F, verts: &[F::Vector]) -> Option<RectCandidate<S, F::Vector>>
where
    S: ComputeScalar,
    F: Frame<S>,
{
    let n = verts.len();
    if n < 3 {
        return None;
    }
    let all: Vec<usize> = (0..n).collect();

    // Calipers start aligned with the last->first edge.
    let mut u0 = frame.sub(&verts[0], &verts[n - 1]);
    if !(S::zero() < frame.dot(&u0, &u0)) {
        return None;
    }
    let mut u1 = frame.perp(&u0);
    let mut support = select_supports(frame, verts, &u0, &u1, &all);
    let mut best = RectCandidate {
        u0: u0.clone(),
        u1: u1.clone(),
        support,
        scaled_area: scaled_area(frame, verts, &u0, &u1, &support),
    };

    let mut visited = vec![false; n];
    visited[support[BOTTOM]] = true;

    for _ in 0..n {
        // Turning angle of caliper k to its support's outgoing edge, kept
        // as the fraction sin²θ = cross²/(|D|²|E|²) and compared by
        // cross-multiplication. |D|² is |u0|² for the bottom/top calipers
        // and |u1|² for right/left; the frame normal's length cancels.
        let sqr_u0 = frame.dot(&u0, &u0);
        let sqr_u1 = frame.dot(&u1, &u1);
        let mut angle: [Option<(S, S)>; 4] = [None, None, None, None];
        for (k, slot) in angle.iter_mut().enumerate() {
            let i = support[k];
            let e = frame.sub(&verts[(i + 1) % n], &verts[i]);
            let sqr_e = frame.dot(&e, &e);
            if !(S::zero() < sqr_e) {
                continue;
            }
            let c = if k % 2 == 0 {
                frame.cross(&u0, &e)
            } else {
                frame.cross(&u1, &e)
            };
            let d_sqr = if k % 2 == 0 { sqr_u0.clone() } else { sqr_u1.clone() };
            *slot = Some((c.clone() * c, d_sqr * sqr_e));
        }

        let mut min_k: Option<(usize, S, S)> = None;
        for (k, a) in angle.iter().enumerate() {
            if let Some((nk, dk)) = a {
                let smaller = match &min_k {
                    None => true,
                    Some((_, nm, dm)) => nk.clone() * dm.clone() < nm.clone() * dk.clone(),
                };
                if smaller {
                    min_k = Some((k, nk.clone(), dk.clone()));
                }
            }
        }
        let Some((m, nm, dm)) = min_k else { break };

        // Every caliper attaining the minimal angle advances; required so
        // that ties (several polygon edges collinear with a caliper after
        // the rotation) keep all four supports valid.
        for (k, a) in angle.iter().enumerate() {
            if let Some((nk, dk)) = a {
                if nk.clone() * dm.clone() == nm.clone() * dk.clone() {
                    support[k] = (support[k] + 1) % n;
                }
            }
        }

        // Rotate the frame onto the winning edge and relabel caliper m as
        // bottom; the advanced vertex becomes the new bottom support.
        let b = support[m];
        u0 = frame.sub(&verts[b], &verts[(b + n - 1) % n]);
        u1 = frame.perp(&u0);
        support = [
            support[m],
            support[(m + 1) % 4],
            support[(m + 2) % 4],
            support[(m + 3) % 4],
        ];
        if visited[b] {
            break; // full rotation completed
        }
        visited[b] = true;

        // Re-derive the supports over the small candidate set: current
        // supports, their successors, and the new bottom. The rotation was
        // minimal, so the true extremes are in this set.
        let mut cand: Vec<usize> = Vec::with_capacity(9);
        for &s in &support {
            push_unique(&mut cand, s);
            push_unique(&mut cand, (s + 1) % n);
        }
        push_unique(&mut cand, b);
        support = select_supports(frame, verts, &u0, &u1, &cand);

        let area = scaled_area(frame, verts, &u0, &u1, &support);
        if area < best.scaled_area {
            best = RectCandidate {
                u0: u0.clone(),
                u1: u1.clone(),
                support,
                scaled_area: area,
            };
        }
    }

    Some(best)
}

#[inline]
fn push_unique(v: &mut Vec<usize>, i: usize) {
    if !v.contains(&i) {
        v.push(i);
    }
}
