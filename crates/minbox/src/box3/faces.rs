//! Face-supported box candidates.
//!
//! For a hull face the candidate box has one side plane flush with the
//! face. Its footprint is the minimum rectangle of the hull's shadow on
//! the face plane; the shadow boundary is the silhouette of the hull as
//! seen along the face normal, read off the mesh adjacency without any
//! re-projection pass over interior vertices.

use std::collections::HashMap;

use log::debug;
use nalgebra::Vector3;

use super::{push_unique, span_along, Candidate3};
use crate::calipers::{
    collinear_sweep, exhaustive_edges, rotating_calipers, FacePlane, Frame, BOTTOM, LEFT, RIGHT,
    TOP,
};
use crate::cfg::BoxCfg;
use crate::hull::HullMesh;
use crate::scalar::{cross3, dot3, scale3, sub3, ComputeScalar};

/// Inward face normal from the stored winding, unnormalized.
#[inline]
pub(crate) fn inward_normal<S: ComputeScalar>(pts: &[Vector3<S>], t: &[usize; 3]) -> Vector3<S> {
    cross3(
        &sub3(&pts[t[1]], &pts[t[0]]),
        &sub3(&pts[t[2]], &pts[t[0]]),
    )
}

/// Best box with a side flush to `face`, or `None` when the face is too
/// degenerate to carry a frame (zero normal or a collapsed silhouette).
pub(crate) fn face_candidate<S: ComputeScalar>(
    pts: &[Vector3<S>],
    mesh: &HullMesh,
    face: usize,
    cfg: &BoxCfg,
) -> Option<Candidate3<S>> {
    let normal = inward_normal(pts, &mesh.triangles[face]);
    let sqr_n = dot3(&normal, &normal);
    if !(S::zero() < sqr_n) {
        debug!("face {face}: zero normal, skipped");
        return None;
    }

    // A face is lit when its inward normal has a positive component along
    // the base normal; the base face itself is lit. Grazing faces (exact
    // zero dot) count as unlit so the silhouette stays a simple cycle.
    let lit: Vec<bool> = mesh
        .triangles
        .iter()
        .map(|t| dot3(&inward_normal(pts, t), &normal) > S::zero())
        .collect();

    let cycle = silhouette_cycle(mesh, &lit)?;

    // Exact in-plane projection of the cycle vertices.
    let mut proj: Vec<Vector3<S>> = cycle
        .iter()
        .map(|&i| {
            let t = dot3(&pts[i], &normal) / sqr_n.clone();
            sub3(&pts[i], &scale3(&normal, &t))
        })
        .collect();
    let mut orig = cycle;

    let frame = FacePlane {
        normal: normal.clone(),
    };
    let mut area2 = S::zero();
    for k in 0..proj.len() {
        area2 = area2 + frame.cross(&proj[k], &proj[(k + 1) % proj.len()]);
    }
    if area2 < S::zero() {
        proj.reverse();
        orig.reverse();
    } else if !(S::zero() < area2) {
        debug!("face {face}: flat silhouette, skipped");
        return None;
    }

    let kept = collinear_sweep(&frame, &proj);
    if kept.len() < 3 {
        debug!("face {face}: silhouette collapsed, skipped");
        return None;
    }
    let poly: Vec<Vector3<S>> = kept.iter().map(|&k| proj[k].clone()).collect();
    let poly_orig: Vec<usize> = kept.iter().map(|&k| orig[k]).collect();

    let rect = if cfg.use_rotating_calipers::<S>() {
        rotating_calipers(&frame, &poly)
    } else {
        exhaustive_edges(&frame, &poly)
    }?;

    // Depth interval along the normal over every hull vertex.
    let (lo, hi) = span_along(pts, &mesh.vertices, &normal);

    let s0 = dot3(&rect.u0, &rect.u0);
    let xl = dot3(&rect.u0, &poly[rect.support[LEFT]]);
    let xr = dot3(&rect.u0, &poly[rect.support[RIGHT]]);
    let yb = dot3(&rect.u1, &poly[rect.support[BOTTOM]]);
    let yt = dot3(&rect.u1, &poly[rect.support[TOP]]);

    // scaled_area = |n|·(true footprint area) and the depth span carries
    // another |n|, so dividing by |n|² yields the true volume exactly.
    let volume = rect.scaled_area * (hi.0.clone() - lo.0.clone()) / sqr_n.clone();

    let mut support = Vec::with_capacity(6);
    for &k in &rect.support {
        push_unique(&mut support, poly_orig[k]);
    }
    push_unique(&mut support, lo.1);
    push_unique(&mut support, hi.1);

    Some(Candidate3 {
        axis: [rect.u0.clone(), rect.u1.clone(), normal],
        sqr_len: [s0.clone(), sqr_n.clone() * s0, sqr_n],
        range: [(xl, xr), (yb, yt), (lo.0, hi.0)],
        volume,
        support,
    })
}

/// The silhouette of the lit region as one closed vertex cycle, directed
/// by the lit faces' winding. `None` for anything other than a single
/// simple cycle.
fn silhouette_cycle(mesh: &HullMesh, lit: &[bool]) -> Option<Vec<usize>> {
    let mut next: HashMap<usize, usize> = HashMap::new();
    for e in &mesh.edges {
        if lit[e.faces[0]] == lit[e.faces[1]] {
            continue;
        }
        let f = if lit[e.faces[0]] {
            e.faces[0]
        } else {
            e.faces[1]
        };
        let tri = mesh.triangles[f];
        let mut dir = None;
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            if (a, b) == (e.v[0], e.v[1]) || (a, b) == (e.v[1], e.v[0]) {
                dir = Some((a, b));
            }
        }
        let (a, b) = dir?;
        if next.insert(a, b).is_some() {
            return None;
        }
    }
    if next.len() < 3 {
        return None;
    }

    // Deterministic start regardless of hash-map iteration order.
    let start = *next.keys().min()?;
    let mut cycle = vec![start];
    let mut cur = start;
    loop {
        cur = *next.get(&cur)?;
        if cur == start {
            break;
        }
        if cycle.len() == next.len() {
            return None;
        }
        cycle.push(cur);
    }
    if cycle.len() != next.len() {
        return None; // more than one loop
    }
    Some(cycle)
}
