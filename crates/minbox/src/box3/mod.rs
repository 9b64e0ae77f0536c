//! Minimum-volume oriented bounding box of a spatial point set.
//!
//! Purpose
//! - Public 3D entry points. The hull oracle classifies the input; full
//!   rank inputs go through two candidate scans over the hull boundary:
//!   one box per hull face (a side plane flush with the face, footprint
//!   from rotating calipers on the face-plane silhouette) and one box per
//!   mutually orthogonal hull-edge triple. The smallest candidate wins.
//! - Candidate volumes are true volumes computed exactly in the compute
//!   scalar, so candidates from different faces and from the edge scan are
//!   directly comparable.
//!
//! Concurrency
//! - The per-face scan is a map-reduce over face chunks on a dedicated
//!   rayon pool when `BoxCfg::num_threads > 1`. Reduction keeps the first
//!   minimal candidate in face order, so the result does not depend on
//!   the thread count. The edge-triple scan is always single-threaded.

mod edges;
mod faces;

use log::{debug, warn};
use nalgebra::{Vector2, Vector3};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::cfg::BoxCfg;
use crate::error::MinBoxError;
use crate::hull::{Hull3, HullMesh, HullOracle3, IncrementalHull};
use crate::rect2;
use crate::scalar::{add3, scale3, vec3, ComputeScalar};

/// Minimum-volume oriented bounding box.
///
/// `axis` is orthonormal and right-handed; `extent` holds the half-widths
/// (degenerate inputs yield zero entries). `support` lists the input point
/// indices the winning candidate rests on.
#[derive(Clone, Debug)]
pub struct MinBox3 {
    pub center: Vector3<f64>,
    pub axis: [Vector3<f64>; 3],
    pub extent: [f64; 3],
    pub support: Vec<usize>,
}

impl MinBox3 {
    #[inline]
    pub fn volume(&self) -> f64 {
        8.0 * self.extent[0] * self.extent[1] * self.extent[2]
    }

    /// Containment check against the six face planes.
    #[inline]
    pub fn contains(&self, p: &Vector3<f64>, tol: f64) -> bool {
        let r = p - self.center;
        (0..3).all(|k| r.dot(&self.axis[k]).abs() <= self.extent[k] + tol)
    }
}

/// Minimum-volume oriented bounding box of `points`.
///
/// Degenerate inputs (coincident, collinear or coplanar points) are valid
/// and collapse the corresponding extents to zero. Fails only for an empty
/// point array. The minimum is guaranteed for exact compute scalars.
pub fn min_volume_box<S: ComputeScalar>(
    points: &[Vector3<f64>],
    cfg: &BoxCfg,
) -> Result<MinBox3, MinBoxError> {
    if points.is_empty() {
        return Err(MinBoxError::InvalidInput("at least one point is required"));
    }
    match IncrementalHull::new(cfg.eps_rank).hull(points)? {
        Hull3::Point { index } => Ok(point_box(points, index)),
        Hull3::Segment {
            min_index,
            max_index,
        } => Ok(segment_box(points, min_index, max_index)),
        Hull3::Planar {
            origin,
            basis,
            normal,
        } => planar_box::<S>(points, &origin, &basis, &normal, cfg),
        Hull3::Mesh(mesh) => mesh_box::<S>(points, &mesh, cfg),
    }
}

/// Same as [`min_volume_box`] for an already-known convex hull boundary
/// given as triangles over `points`. The triangle set is validated as a
/// closed 2-manifold and re-wound; convexity itself is the caller's
/// assertion and is not validated.
pub fn min_volume_box_for_mesh<S: ComputeScalar>(
    points: &[Vector3<f64>],
    triangles: &[[usize; 3]],
    cfg: &BoxCfg,
) -> Result<MinBox3, MinBoxError> {
    let mesh = HullMesh::from_triangles(points, triangles.to_vec())?;
    mesh_box::<S>(points, &mesh, cfg)
}

/// One enclosing box candidate in the compute scalar, kept in the scaled
/// frame: axes are unnormalized but mutually orthogonal, `range[k]` is the
/// raw dot interval of the hull along `axis[k]`, and `volume` is the true
/// volume (exact under an exact scalar).
#[derive(Clone, Debug)]
pub(crate) struct Candidate3<S: ComputeScalar> {
    pub axis: [Vector3<S>; 3],
    pub sqr_len: [S; 3],
    pub range: [(S, S); 3],
    pub volume: S,
    pub support: Vec<usize>,
}

fn mesh_box<S: ComputeScalar>(
    points: &[Vector3<f64>],
    mesh: &HullMesh,
    cfg: &BoxCfg,
) -> Result<MinBox3, MinBoxError> {
    let pts: Vec<Vector3<S>> = points.iter().map(vec3::<S>).collect();

    let face = best_face_candidate(&pts, mesh, cfg);
    let edge = edges::best_edge_candidate(&pts, mesh);
    debug!(
        "mesh search over {} faces / {} edges: face candidate {}, edge candidate {}",
        mesh.triangles.len(),
        mesh.edges.len(),
        face.is_some(),
        edge.is_some(),
    );

    let best = match (face, edge) {
        (Some(a), Some(b)) => pick(a, b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        // Every face degenerated under this scalar; fall back to the
        // axis-aligned box so the result still encloses the input.
        (None, None) => {
            warn!("no supported candidate survived; falling back to the axis-aligned box");
            aabb_candidate(&pts, mesh)
        }
    };
    Ok(convert(&best))
}

/// First minimal candidate in face order. Left-biased `pick` makes the
/// reduction associative, so chunked parallel scans agree with the serial
/// one.
fn best_face_candidate<S: ComputeScalar>(
    pts: &[Vector3<S>],
    mesh: &HullMesh,
    cfg: &BoxCfg,
) -> Option<Candidate3<S>> {
    let n = mesh.triangles.len();
    let scan = |ids: &[usize]| {
        ids.iter()
            .filter_map(|&f| faces::face_candidate(pts, mesh, f, cfg))
            .reduce(pick)
    };
    let all: Vec<usize> = (0..n).collect();
    if cfg.num_threads <= 1 {
        return scan(&all);
    }
    match ThreadPoolBuilder::new().num_threads(cfg.num_threads).build() {
        Ok(pool) => pool.install(|| {
            let chunk = n.div_ceil(cfg.num_threads).max(1);
            all.par_chunks(chunk).filter_map(scan).reduce_with(pick)
        }),
        Err(err) => {
            warn!("worker pool unavailable ({err}); face scan runs single-threaded");
            scan(&all)
        }
    }
}

#[inline]
fn pick<S: ComputeScalar>(a: Candidate3<S>, b: Candidate3<S>) -> Candidate3<S> {
    if b.volume < a.volume {
        b
    } else {
        a
    }
}

/// Raw dot interval of the hull vertices along `axis`, with the attaining
/// vertex indices.
pub(crate) fn span_along<S: ComputeScalar>(
    pts: &[Vector3<S>],
    vertices: &[usize],
    axis: &Vector3<S>,
) -> ((S, usize), (S, usize)) {
    let first = vertices[0];
    let mut lo = (crate::scalar::dot3(axis, &pts[first]), first);
    let mut hi = lo.clone();
    for &v in &vertices[1..] {
        let t = crate::scalar::dot3(axis, &pts[v]);
        if t < lo.0 {
            lo = (t.clone(), v);
        }
        if t > hi.0 {
            hi = (t, v);
        }
    }
    (lo, hi)
}

pub(crate) fn push_unique(v: &mut Vec<usize>, i: usize) {
    if !v.contains(&i) {
        v.push(i);
    }
}

fn aabb_candidate<S: ComputeScalar>(pts: &[Vector3<S>], mesh: &HullMesh) -> Candidate3<S> {
    let axis = [
        Vector3::new(S::one(), S::zero(), S::zero()),
        Vector3::new(S::zero(), S::one(), S::zero()),
        Vector3::new(S::zero(), S::zero(), S::one()),
    ];
    let spans = [
        span_along(pts, &mesh.vertices, &axis[0]),
        span_along(pts, &mesh.vertices, &axis[1]),
        span_along(pts, &mesh.vertices, &axis[2]),
    ];
    let volume = spans
        .iter()
        .map(|(lo, hi)| hi.0.clone() - lo.0.clone())
        .fold(S::one(), |acc, d| acc * d);
    let mut support = Vec::with_capacity(6);
    for (lo, hi) in &spans {
        push_unique(&mut support, lo.1);
        push_unique(&mut support, hi.1);
    }
    Candidate3 {
        axis,
        sqr_len: [S::one(), S::one(), S::one()],
        range: spans.map(|(lo, hi)| (lo.0, hi.0)),
        volume,
        support,
    }
}

fn point_box(points: &[Vector3<f64>], index: usize) -> MinBox3 {
    MinBox3 {
        center: points[index],
        axis: [Vector3::x(), Vector3::y(), Vector3::z()],
        extent: [0.0, 0.0, 0.0],
        support: vec![index],
    }
}

fn segment_box(points: &[Vector3<f64>], min_index: usize, max_index: usize) -> MinBox3 {
    let d = points[max_index] - points[min_index];
    let u = d / d.norm();
    let [b1, b2] = complete_basis(&u);
    MinBox3 {
        center: (points[min_index] + points[max_index]) / 2.0,
        axis: [u, b1, b2],
        extent: [d.norm() / 2.0, 0.0, 0.0],
        support: vec![min_index, max_index],
    }
}

/// Two unit vectors completing `u` to a right-handed orthonormal basis.
fn complete_basis(u: &Vector3<f64>) -> [Vector3<f64>; 2] {
    let seed = if u.x.abs() <= u.y.abs() && u.x.abs() <= u.z.abs() {
        Vector3::x()
    } else if u.y.abs() <= u.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let b1 = u.cross(&seed).normalize();
    [b1, u.cross(&b1)]
}

/// Coplanar input: solve the 2D problem in the carrier plane and lift the
/// rectangle back, with a zero extent along the plane normal.
fn planar_box<S: ComputeScalar>(
    points: &[Vector3<f64>],
    origin: &Vector3<f64>,
    basis: &[Vector3<f64>; 2],
    normal: &Vector3<f64>,
    cfg: &BoxCfg,
) -> Result<MinBox3, MinBoxError> {
    let flat: Vec<Vector2<f64>> = points
        .iter()
        .map(|p| {
            let r = p - origin;
            Vector2::new(r.dot(&basis[0]), r.dot(&basis[1]))
        })
        .collect();
    let rect = rect2::min_area_rect::<S>(&flat, cfg)?;
    let lift = |v: &Vector2<f64>| basis[0] * v.x + basis[1] * v.y;
    let a0 = lift(&rect.axis[0]);
    let a1 = lift(&rect.axis[1]);
    debug_assert!(a0.cross(&a1).dot(normal) > 0.0);
    Ok(MinBox3 {
        center: origin + lift(&rect.center),
        axis: [a0, a1, a0.cross(&a1)],
        extent: [rect.extent[0], rect.extent[1], 0.0],
        support: rect.support,
    })
}

/// Convert the winning scaled candidate into the caller's `f64` frame.
fn convert<S: ComputeScalar>(c: &Candidate3<S>) -> MinBox3 {
    let two = S::two();
    let four = S::two() * S::two();
    let mut center_s = Vector3::new(S::zero(), S::zero(), S::zero());
    let mut extent = [0.0f64; 3];
    for k in 0..3 {
        let (lo, hi) = &c.range[k];
        let mid = (lo.clone() + hi.clone()) / (two.clone() * c.sqr_len[k].clone());
        center_s = add3(&center_s, &scale3(&c.axis[k], &mid));
        let d = hi.clone() - lo.clone();
        // Exact squared extent; the square root happens in f64 only.
        extent[k] = ((d.clone() * d) / (four.clone() * c.sqr_len[k].clone()))
            .to_f64()
            .sqrt();
    }
    let center = Vector3::new(center_s.x.to_f64(), center_s.y.to_f64(), center_s.z.to_f64());

    let a0 = normalize_axis(&c.axis[0]);
    // The axes are exactly orthogonal in S; re-orthogonalize only against
    // the floating conversion noise.
    let a1 = normalize_axis(&c.axis[1]);
    let a1 = (a1 - a0 * a0.dot(&a1)).normalize();
    let a2 = a0.cross(&a1);
    MinBox3 {
        center,
        axis: [a0, a1, a2],
        extent,
        support: c.support.clone(),
    }
}

/// Unit `f64` direction of an exact axis vector: factor out the largest
/// component first so the division stays well conditioned, then normalize
/// in floating point.
fn normalize_axis<S: ComputeScalar>(u: &Vector3<S>) -> Vector3<f64> {
    let ax = u.x.abs();
    let ay = u.y.abs();
    let az = u.z.abs();
    let mut m = ax;
    if m < ay {
        m = ay;
    }
    if m < az {
        m = az;
    }
    let v = Vector3::new(
        (u.x.clone() / m.clone()).to_f64(),
        (u.y.clone() / m.clone()).to_f64(),
        (u.z.clone() / m).to_f64(),
    );
    v / v.norm()
}

#[cfg(test)]
mod tests;
