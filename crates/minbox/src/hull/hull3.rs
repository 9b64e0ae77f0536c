//! 3D hull oracle: fuzzy rank classification + incremental convex hull.
//!
//! The full-rank result is a triangle boundary mesh held as flat arrays
//! with integer-index adjacency (no pointers): triangles reference input
//! points, the edge arena references triangles. Faces are wound so the
//! cross product of their edge vectors points *inward*; the box searches
//! rely on that convention.

use std::collections::{BTreeSet, HashMap, HashSet};

use nalgebra::Vector3;

use crate::error::MinBoxError;

/// Dimension classification of a spatial point set. Indices refer to the
/// caller's point array.
#[derive(Clone, Debug)]
pub enum Hull3 {
    /// All points coincide within tolerance.
    Point { index: usize },
    /// All points collinear within tolerance; extreme projections along
    /// the carrier line.
    Segment { min_index: usize, max_index: usize },
    /// All points coplanar within tolerance. `basis` is an orthonormal
    /// in-plane pair, right-handed with `normal`.
    Planar {
        origin: Vector3<f64>,
        basis: [Vector3<f64>; 2],
        normal: Vector3<f64>,
    },
    /// Full-dimensional: convex polyhedron boundary.
    Mesh(HullMesh),
}

/// An undirected hull edge and its two incident triangles.
#[derive(Clone, Copy, Debug)]
pub struct HullEdge {
    /// Endpoint indices into the caller's point array, `v[0] < v[1]`.
    pub v: [usize; 2],
    /// Indices into [`HullMesh::triangles`].
    pub faces: [usize; 2],
}

/// Closed 2-manifold triangle boundary of a convex polyhedron.
#[derive(Clone, Debug)]
pub struct HullMesh {
    /// Inward-wound triangles over the caller's point indices.
    pub triangles: Vec<[usize; 3]>,
    /// Sorted unique hull vertex indices.
    pub vertices: Vec<usize>,
    /// Edge arena with triangle adjacency.
    pub edges: Vec<HullEdge>,
}

impl HullMesh {
    /// Validate a caller-supplied triangle set and build the adjacency
    /// arena. Rejects out-of-range or repeated indices within a triangle
    /// and any edge not shared by exactly two triangles (the mesh must be
    /// a closed 2-manifold). Triangles are re-wound inward.
    pub fn from_triangles(
        points: &[Vector3<f64>],
        mut triangles: Vec<[usize; 3]>,
    ) -> Result<Self, MinBoxError> {
        if triangles.is_empty() {
            return Err(MinBoxError::InvalidInput("at least one triangle is required"));
        }
        for t in &triangles {
            if t.iter().any(|&i| i >= points.len()) {
                return Err(MinBoxError::InvalidInput("triangle index out of range"));
            }
            if t[0] == t[1] || t[1] == t[2] || t[0] == t[2] {
                return Err(MinBoxError::InvalidInput("degenerate triangle"));
            }
        }

        let vertices: Vec<usize> = triangles
            .iter()
            .flatten()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        orient_inward(points, &vertices, &mut triangles);

        let mut map: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (t, tri) in triangles.iter().enumerate() {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let key = (a.min(b), a.max(b));
                map.entry(key).or_default().push(t);
            }
        }
        let mut edges = Vec::with_capacity(map.len());
        for ((a, b), faces) in map {
            if faces.len() != 2 {
                return Err(MinBoxError::InvalidInput(
                    "mesh is not a closed 2-manifold (edge without exactly two faces)",
                ));
            }
            edges.push(HullEdge {
                v: [a, b],
                faces: [faces[0], faces[1]],
            });
        }
        // Deterministic arena order regardless of hash-map iteration.
        edges.sort_by_key(|e| e.v);
        Ok(Self {
            triangles,
            vertices,
            edges,
        })
    }
}

/// Re-wind triangles so face normals point toward the hull centroid.
fn orient_inward(points: &[Vector3<f64>], vertices: &[usize], triangles: &mut [[usize; 3]]) {
    let mut centroid = Vector3::zeros();
    for &v in vertices {
        centroid += points[v];
    }
    centroid /= vertices.len() as f64;
    for tri in triangles.iter_mut() {
        let n = (points[tri[1]] - points[tri[0]]).cross(&(points[tri[2]] - points[tri[0]]));
        if n.dot(&(centroid - points[tri[0]])) < 0.0 {
            tri.swap(1, 2);
        }
    }
}

/// Strategy interface for 3D hull construction.
pub trait HullOracle3 {
    fn hull(&self, points: &[Vector3<f64>]) -> Result<Hull3, MinBoxError>;
}

/// Default oracle: relative-epsilon rank test, then an incremental
/// (beneath-beyond) hull seeded from an extreme tetrahedron.
#[derive(Clone, Copy, Debug)]
pub struct IncrementalHull {
    pub eps: f64,
}

impl IncrementalHull {
    #[inline]
    pub fn new(eps: f64) -> Self {
        Self { eps }
    }
}

impl HullOracle3 for IncrementalHull {
    fn hull(&self, points: &[Vector3<f64>]) -> Result<Hull3, MinBoxError> {
        debug_assert!(!points.is_empty());
        let (lo, hi) = bounds(points);
        let range = hi - lo;
        let scale = range.x.max(range.y).max(range.z);
        let max_abs = lo.amax().max(hi.amax());
        if scale <= self.eps * (1.0 + max_abs) {
            return Ok(Hull3::Point { index: 0 });
        }

        // Carrier line from the extreme pair along the dominant axis.
        let axis = if range.x >= range.y && range.x >= range.z {
            0
        } else if range.y >= range.z {
            1
        } else {
            2
        };
        let (i0, i1) = extreme_pair(points, axis);
        let d = points[i1] - points[i0];
        let d_norm = d.norm();
        let mut far_line = (0.0f64, i0);
        let mut t_min = (0.0f64, i0);
        let mut t_max = (0.0f64, i0);
        for (i, p) in points.iter().enumerate() {
            let r = p - points[i0];
            let dev = d.cross(&r).norm() / d_norm;
            if dev > far_line.0 {
                far_line = (dev, i);
            }
            let t = d.dot(&r);
            if t < t_min.0 {
                t_min = (t, i);
            }
            if t > t_max.0 {
                t_max = (t, i);
            }
        }
        if far_line.0 <= self.eps * scale {
            return Ok(Hull3::Segment {
                min_index: t_min.1,
                max_index: t_max.1,
            });
        }
        let i2 = far_line.1;

        let normal = d.cross(&(points[i2] - points[i0]));
        let n_norm = normal.norm();
        let mut far_plane = (0.0f64, i0);
        for (i, p) in points.iter().enumerate() {
            let dev = normal.dot(&(p - points[i0])).abs() / n_norm;
            if dev > far_plane.0 {
                far_plane = (dev, i);
            }
        }
        if far_plane.0 <= self.eps * scale {
            let b0 = d / d_norm;
            let nu = normal / n_norm;
            return Ok(Hull3::Planar {
                origin: points[i0],
                basis: [b0, nu.cross(&b0)],
                normal: nu,
            });
        }
        let i3 = far_plane.1;

        let triangles = beneath_beyond(points, [i0, i1, i2, i3], self.eps * scale);
        Ok(Hull3::Mesh(HullMesh::from_triangles(points, triangles)?))
    }
}

struct Face {
    v: [usize; 3],
    normal: Vector3<f64>,
    alive: bool,
}

impl Face {
    fn new(points: &[Vector3<f64>], v: [usize; 3]) -> Self {
        let normal = (points[v[1]] - points[v[0]]).cross(&(points[v[2]] - points[v[0]]));
        Self {
            v,
            normal,
            alive: true,
        }
    }
}

/// Incremental hull: insert each point, delete the faces it sees, and cone
/// new faces over the horizon edges. Outward winding throughout; the final
/// mesh is re-wound inward by `HullMesh::from_triangles`.
fn beneath_beyond(points: &[Vector3<f64>], seed: [usize; 4], eps_vis: f64) -> Vec<[usize; 3]> {
    // Seed tetrahedron, each face oriented away from the opposite vertex.
    let mut faces: Vec<Face> = Vec::new();
    for (tri, opposite) in [
        ([seed[0], seed[1], seed[2]], seed[3]),
        ([seed[0], seed[1], seed[3]], seed[2]),
        ([seed[0], seed[2], seed[3]], seed[1]),
        ([seed[1], seed[2], seed[3]], seed[0]),
    ] {
        let mut f = Face::new(points, tri);
        if f.normal.dot(&(points[opposite] - points[tri[0]])) > 0.0 {
            f.v.swap(1, 2);
            f.normal = -f.normal;
        }
        faces.push(f);
    }

    for (i, p) in points.iter().enumerate() {
        if seed.contains(&i) {
            continue;
        }
        let visible: Vec<usize> = faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.alive && f.normal.dot(&(p - points[f.v[0]])) > eps_vis)
            .map(|(t, _)| t)
            .collect();
        if visible.is_empty() {
            continue;
        }
        let mut directed: HashSet<(usize, usize)> = HashSet::new();
        for &t in &visible {
            let v = faces[t].v;
            for k in 0..3 {
                directed.insert((v[k], v[(k + 1) % 3]));
            }
        }
        let horizon: Vec<(usize, usize)> = directed
            .iter()
            .filter(|&&(a, b)| !directed.contains(&(b, a)))
            .copied()
            .collect();
        for &t in &visible {
            faces[t].alive = false;
        }
        for (a, b) in horizon {
            faces.push(Face::new(points, [a, b, i]));
        }
    }

    faces.into_iter().filter(|f| f.alive).map(|f| f.v).collect()
}

fn bounds(points: &[Vector3<f64>]) -> (Vector3<f64>, Vector3<f64>) {
    let mut lo = points[0];
    let mut hi = points[0];
    for p in &points[1..] {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    (lo, hi)
}

fn extreme_pair(points: &[Vector3<f64>], axis: usize) -> (usize, usize) {
    let mut imin = 0;
    let mut imax = 0;
    for (i, p) in points.iter().enumerate() {
        if p[axis] < points[imin][axis] {
            imin = i;
        }
        if p[axis] > points[imax][axis] {
            imax = i;
        }
    }
    (imin, imax)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_corners() -> Vec<Vector3<f64>> {
        let mut pts = Vec::new();
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    pts.push(Vector3::new(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn classifies_coincident_and_collinear() {
        let pts = vec![Vector3::new(1.0, 2.0, 3.0); 4];
        assert!(matches!(
            IncrementalHull::new(1e-10).hull(&pts),
            Ok(Hull3::Point { index: 0 })
        ));

        let pts: Vec<_> = (0..6).map(|i| Vector3::new(i as f64, i as f64, 0.0)).collect();
        match IncrementalHull::new(1e-10).hull(&pts) {
            Ok(Hull3::Segment {
                min_index,
                max_index,
            }) => {
                assert_eq!(min_index, 0);
                assert_eq!(max_index, 5);
            }
            other => panic!("expected segment, got {other:?}"),
        }
    }

    #[test]
    fn classifies_coplanar_with_orthonormal_basis() {
        let pts = vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(2.0, 0.0, 1.0),
            Vector3::new(2.0, 3.0, 1.0),
            Vector3::new(0.0, 3.0, 1.0),
        ];
        match IncrementalHull::new(1e-10).hull(&pts) {
            Ok(Hull3::Planar { basis, normal, .. }) => {
                assert!(basis[0].dot(&basis[1]).abs() < 1e-12);
                assert!(basis[0].dot(&normal).abs() < 1e-12);
                assert!((basis[0].norm() - 1.0).abs() < 1e-12);
                assert!((normal.z.abs() - 1.0).abs() < 1e-12);
            }
            other => panic!("expected planar, got {other:?}"),
        }
    }

    #[test]
    fn cube_hull_is_a_closed_manifold() {
        let pts = cube_corners();
        match IncrementalHull::new(1e-10).hull(&pts) {
            Ok(Hull3::Mesh(mesh)) => {
                assert_eq!(mesh.vertices.len(), 8);
                assert_eq!(mesh.triangles.len(), 12);
                assert_eq!(mesh.edges.len(), 18);
                // Euler: V - E + F = 2
                assert_eq!(
                    mesh.vertices.len() + mesh.triangles.len(),
                    mesh.edges.len() + 2
                );
            }
            other => panic!("expected mesh, got {other:?}"),
        }
    }

    #[test]
    fn hull_faces_point_inward() {
        let pts = cube_corners();
        let Ok(Hull3::Mesh(mesh)) = IncrementalHull::new(1e-10).hull(&pts) else {
            panic!("expected mesh");
        };
        let centroid = Vector3::new(0.5, 0.5, 0.5);
        for tri in &mesh.triangles {
            let n = (pts[tri[1]] - pts[tri[0]]).cross(&(pts[tri[2]] - pts[tri[0]]));
            assert!(n.dot(&(centroid - pts[tri[0]])) > 0.0);
        }
    }

    #[test]
    fn interior_points_are_not_hull_vertices() {
        let mut pts = cube_corners();
        pts.push(Vector3::new(0.5, 0.5, 0.5));
        let Ok(Hull3::Mesh(mesh)) = IncrementalHull::new(1e-10).hull(&pts) else {
            panic!("expected mesh");
        };
        assert!(!mesh.vertices.contains(&8));
    }

    #[test]
    fn rejects_non_manifold_triangles() {
        let pts = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        // A single triangle: every edge has one face.
        let err = HullMesh::from_triangles(&pts, vec![[0, 1, 2]]).unwrap_err();
        assert!(matches!(err, MinBoxError::InvalidInput(_)));
    }

    #[test]
    fn rejects_bad_indices() {
        let pts = vec![Vector3::new(0.0, 0.0, 0.0); 3];
        assert!(HullMesh::from_triangles(&pts, vec![[0, 1, 7]]).is_err());
        assert!(HullMesh::from_triangles(&pts, vec![[0, 1, 1]]).is_err());
        assert!(HullMesh::from_triangles(&pts, vec![]).is_err());
    }
}
