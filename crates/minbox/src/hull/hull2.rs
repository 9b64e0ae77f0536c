//! 2D hull oracle: fuzzy rank classification + Andrew's monotone chain.

use nalgebra::Vector2;

/// Dimension classification of a planar point set, with the hull data for
/// the full-rank case. Indices refer to the caller's point array.
#[derive(Clone, Debug)]
pub enum Hull2 {
    /// All points coincide within tolerance.
    Point { index: usize },
    /// All points are collinear within tolerance; `min_index`/`max_index`
    /// are the extreme projections along the carrier line.
    Segment { min_index: usize, max_index: usize },
    /// Convex polygon, counterclockwise, no three consecutive collinear
    /// vertices up to floating rounding.
    Polygon { indices: Vec<usize> },
}

/// Strategy interface for 2D hull construction.
pub trait HullOracle2 {
    fn hull(&self, points: &[Vector2<f64>]) -> Hull2;
}

/// Default oracle: relative-epsilon rank test, then Andrew's monotone
/// chain over point indices.
#[derive(Clone, Copy, Debug)]
pub struct MonotoneChain {
    pub eps: f64,
}

impl MonotoneChain {
    #[inline]
    pub fn new(eps: f64) -> Self {
        Self { eps }
    }
}

impl HullOracle2 for MonotoneChain {
    fn hull(&self, points: &[Vector2<f64>]) -> Hull2 {
        debug_assert!(!points.is_empty());
        let (lo, hi) = bounds(points);
        let scale = (hi.x - lo.x).max(hi.y - lo.y);
        let max_abs = lo.x.abs().max(lo.y.abs()).max(hi.x.abs()).max(hi.y.abs());
        if scale <= self.eps * (1.0 + max_abs) {
            return Hull2::Point { index: 0 };
        }

        // Carrier line from the extreme pair along the dominant axis.
        let (i0, i1) = if hi.x - lo.x >= hi.y - lo.y {
            extreme_pair(points, |p| p.x)
        } else {
            extreme_pair(points, |p| p.y)
        };
        let d = points[i1] - points[i0];
        let d_norm = d.norm();
        let mut max_dev = 0.0f64;
        let mut t_min = (0.0f64, i0);
        let mut t_max = (0.0f64, i0);
        for (i, p) in points.iter().enumerate() {
            let r = p - points[i0];
            max_dev = max_dev.max((d.x * r.y - d.y * r.x).abs() / d_norm);
            let t = d.dot(&r);
            if t < t_min.0 {
                t_min = (t, i);
            }
            if t > t_max.0 {
                t_max = (t, i);
            }
        }
        if max_dev <= self.eps * scale {
            return Hull2::Segment {
                min_index: t_min.1,
                max_index: t_max.1,
            };
        }

        let indices = monotone_chain(points);
        if indices.len() < 3 {
            // Numerically on the fence; treat as a segment.
            return Hull2::Segment {
                min_index: t_min.1,
                max_index: t_max.1,
            };
        }
        Hull2::Polygon { indices }
    }
}

fn bounds(points: &[Vector2<f64>]) -> (Vector2<f64>, Vector2<f64>) {
    let mut lo = points[0];
    let mut hi = points[0];
    for p in &points[1..] {
        lo.x = lo.x.min(p.x);
        lo.y = lo.y.min(p.y);
        hi.x = hi.x.max(p.x);
        hi.y = hi.y.max(p.y);
    }
    (lo, hi)
}

fn extreme_pair(points: &[Vector2<f64>], key: impl Fn(&Vector2<f64>) -> f64) -> (usize, usize) {
    let mut imin = 0;
    let mut imax = 0;
    for (i, p) in points.iter().enumerate() {
        if key(p) < key(&points[imin]) {
            imin = i;
        }
        if key(p) > key(&points[imax]) {
            imax = i;
        }
    }
    (imin, imax)
}

/// Andrew's monotone chain over indices, counterclockwise output. Strictly
/// convex turns only, so exactly collinear triples are dropped here.
fn monotone_chain(points: &[Vector2<f64>]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..points.len()).collect();
    idx.sort_by(|&a, &b| {
        points[a]
            .x
            .partial_cmp(&points[b].x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                points[a]
                    .y
                    .partial_cmp(&points[b].y)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    idx.dedup_by(|a, b| points[*a] == points[*b]);

    let cross = |o: usize, a: usize, b: usize| -> f64 {
        let oa = points[a] - points[o];
        let ob = points[b] - points[o];
        oa.x * ob.y - oa.y * ob.x
    };
    let mut lower: Vec<usize> = Vec::with_capacity(idx.len());
    for &i in &idx {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], i) <= 0.0 {
            lower.pop();
        }
        lower.push(i);
    }
    let mut upper: Vec<usize> = Vec::with_capacity(idx.len());
    for &i in idx.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], i) <= 0.0 {
            upper.pop();
        }
        upper.push(i);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
