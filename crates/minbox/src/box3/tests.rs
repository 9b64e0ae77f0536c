use nalgebra::Vector3;
use num_rational::BigRational;
use proptest::prelude::*;

use super::*;
use crate::hull::IncrementalHull;
use crate::scalar::vec3;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

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

/// Corners of the box `center ± Σ axis[k]·extent[k]`.
fn box_corners(
    center: Vector3<f64>,
    axis: [Vector3<f64>; 3],
    extent: [f64; 3],
) -> Vec<Vector3<f64>> {
    let mut pts = Vec::new();
    for &sx in &[-1.0, 1.0] {
        for &sy in &[-1.0, 1.0] {
            for &sz in &[-1.0, 1.0] {
                pts.push(
                    center
                        + axis[0] * (sx * extent[0])
                        + axis[1] * (sy * extent[1])
                        + axis[2] * (sz * extent[2]),
                );
            }
        }
    }
    pts
}

fn sorted_extent(b: &MinBox3) -> [f64; 3] {
    let mut e = b.extent;
    e.sort_by(f64::total_cmp);
    e
}

fn assert_orthonormal_right_handed(b: &MinBox3) {
    for k in 0..3 {
        assert!((b.axis[k].norm() - 1.0).abs() < 1e-12);
        assert!(b.axis[k].dot(&b.axis[(k + 1) % 3]).abs() < 1e-12);
    }
    assert!((b.axis[0].cross(&b.axis[1]) - b.axis[2]).norm() < 1e-12);
}

#[test]
fn empty_input_is_rejected() {
    let cfg = BoxCfg::default();
    assert_eq!(
        min_volume_box::<f64>(&[], &cfg).unwrap_err(),
        MinBoxError::InvalidInput("at least one point is required")
    );
}

#[test]
fn unit_cube() {
    init_logs();
    let cfg = BoxCfg::default();
    let b = min_volume_box::<BigRational>(&cube_corners(), &cfg).unwrap();
    assert!((b.volume() - 1.0).abs() < 1e-12);
    assert_eq!(sorted_extent(&b), [0.5, 0.5, 0.5]);
    assert!((b.center - Vector3::new(0.5, 0.5, 0.5)).norm() < 1e-12);
    assert_orthonormal_right_handed(&b);
}

#[test]
fn rotated_box_is_recovered() {
    // Axes from a 3-4-5 rotation, so the corner coordinates are exact.
    let axis = [
        Vector3::new(0.8, 0.6, 0.0),
        Vector3::new(-0.6, 0.8, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ];
    let extent = [2.0, 1.0, 0.5];
    let center = Vector3::new(1.0, 2.0, 3.0);
    let pts = box_corners(center, axis, extent);

    let cfg = BoxCfg::default();
    let b = min_volume_box::<BigRational>(&pts, &cfg).unwrap();
    assert!((b.volume() - 8.0).abs() < 1e-9);
    assert_eq!(sorted_extent(&b), [0.5, 1.0, 2.0]);
    assert!((b.center - center).norm() < 1e-9);
    // Each recovered axis matches an expected one up to sign.
    for a in &b.axis {
        assert!(
            axis.iter().any(|e| a.dot(e).abs() > 1.0 - 1e-9),
            "unexpected axis {a:?}"
        );
    }
    assert_orthonormal_right_handed(&b);
}

#[test]
fn arbitrarily_rotated_box_is_recovered() {
    let rot = crate::sample::draw_rotation3(crate::sample::ReplayToken { seed: 5, index: 1 });
    let axis = [
        rot.column(0).into_owned(),
        rot.column(1).into_owned(),
        rot.column(2).into_owned(),
    ];
    let extent = [3.0, 0.25, 1.0];
    let pts = box_corners(Vector3::zeros(), axis, extent);

    let b = min_volume_box::<BigRational>(&pts, &BoxCfg::default()).unwrap();
    assert!((b.volume() - 6.0).abs() < 1e-6);
    let mut e = b.extent;
    e.sort_by(f64::total_cmp);
    for (got, want) in e.iter().zip(&[0.25, 1.0, 3.0]) {
        assert!((got - want).abs() < 1e-6);
    }
    for a in &b.axis {
        assert!(
            axis.iter().any(|x| a.dot(x).abs() > 1.0 - 1e-6),
            "unexpected axis {a:?}"
        );
    }
}

#[test]
fn coincident_points_collapse_to_a_point() {
    let cfg = BoxCfg::default();
    let b = min_volume_box::<BigRational>(&vec![Vector3::new(1.0, 2.0, 3.0); 4], &cfg).unwrap();
    assert_eq!(b.center, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(b.extent, [0.0, 0.0, 0.0]);
    assert_eq!(b.support, vec![0]);
}

#[test]
fn collinear_points_collapse_to_a_segment() {
    let cfg = BoxCfg::default();
    let pts: Vec<Vector3<f64>> = (0..5)
        .map(|i| Vector3::new(i as f64, 2.0 * i as f64, -(i as f64)))
        .collect();
    let b = min_volume_box::<BigRational>(&pts, &cfg).unwrap();
    assert!((b.extent[0] - pts[4].norm() / 2.0).abs() < 1e-12);
    assert_eq!(b.extent[1], 0.0);
    assert_eq!(b.extent[2], 0.0);
    assert_eq!(b.support, vec![0, 4]);
    assert_orthonormal_right_handed(&b);
}

#[test]
fn coplanar_points_collapse_to_a_rectangle() {
    let cfg = BoxCfg::default();
    let pts = vec![
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(2.0, 0.0, 1.0),
        Vector3::new(2.0, 1.0, 1.0),
        Vector3::new(0.0, 1.0, 1.0),
        Vector3::new(1.0, 0.5, 1.0),
    ];
    let b = min_volume_box::<BigRational>(&pts, &cfg).unwrap();
    assert_eq!(b.extent[2], 0.0);
    let mut e = [b.extent[0], b.extent[1]];
    e.sort_by(f64::total_cmp);
    assert!((e[0] - 0.5).abs() < 1e-12);
    assert!((e[1] - 1.0).abs() < 1e-12);
    assert!(b.axis[2].z.abs() > 1.0 - 1e-12);
    assert!((b.center - Vector3::new(1.0, 0.5, 1.0)).norm() < 1e-12);
}

#[test]
fn precomputed_mesh_matches_full_pipeline() {
    let pts = cube_corners();
    let cfg = BoxCfg::default();
    let full = min_volume_box::<BigRational>(&pts, &cfg).unwrap();

    let Ok(Hull3::Mesh(mesh)) = IncrementalHull::new(cfg.eps_rank).hull(&pts) else {
        panic!("expected mesh");
    };
    let meshed = min_volume_box_for_mesh::<BigRational>(&pts, &mesh.triangles, &cfg).unwrap();
    assert!((full.volume() - meshed.volume()).abs() < 1e-12);
    assert!((full.center - meshed.center).norm() < 1e-12);
}

#[test]
fn precomputed_mesh_is_validated() {
    let pts = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ];
    let cfg = BoxCfg::default();
    // A single triangle is not a closed boundary.
    assert!(min_volume_box_for_mesh::<f64>(&pts, &[[0, 1, 2]], &cfg).is_err());
}

#[test]
fn thread_count_does_not_change_the_result() {
    init_logs();
    let pts = box_corners(
        Vector3::new(-0.5, 1.5, 0.25),
        [
            Vector3::new(0.8, 0.6, 0.0),
            Vector3::new(-0.6, 0.8, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        [1.5, 0.75, 2.0],
    );
    let serial = min_volume_box::<BigRational>(&pts, &BoxCfg::default()).unwrap();
    let threaded_cfg = BoxCfg {
        num_threads: 4,
        ..BoxCfg::default()
    };
    let threaded = min_volume_box::<BigRational>(&pts, &threaded_cfg).unwrap();
    assert_eq!(serial.center, threaded.center);
    assert_eq!(serial.axis, threaded.axis);
    assert_eq!(serial.extent, threaded.extent);
    assert_eq!(serial.support, threaded.support);
}

#[test]
fn edge_triples_find_the_cube_frame() {
    let pts = cube_corners();
    let Ok(Hull3::Mesh(mesh)) = IncrementalHull::new(1e-10).hull(&pts) else {
        panic!("expected mesh");
    };
    let rational: Vec<Vector3<BigRational>> = pts.iter().map(vec3::<BigRational>).collect();
    let cand = edges::best_edge_candidate(&rational, &mesh).unwrap();
    assert_eq!(cand.volume, BigRational::from_f64(1.0));
}

#[test]
fn result_is_deterministic() {
    let pts = vec![
        Vector3::new(0.1, 0.2, 0.3),
        Vector3::new(1.7, -0.4, 0.9),
        Vector3::new(-0.8, 1.1, 2.0),
        Vector3::new(0.5, 2.2, -1.3),
        Vector3::new(2.4, 1.0, 0.4),
        Vector3::new(-1.1, -0.9, 1.6),
    ];
    let cfg = BoxCfg::default();
    let a = min_volume_box::<BigRational>(&pts, &cfg).unwrap();
    let b = min_volume_box::<BigRational>(&pts, &cfg).unwrap();
    assert_eq!(a.center, b.center);
    assert_eq!(a.axis, b.axis);
    assert_eq!(a.extent, b.extent);
    assert_eq!(a.support, b.support);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The reported box contains every input point (floating compute, so
    /// with a relative tolerance).
    #[test]
    fn box_contains_every_input_point(
        coords in prop::collection::vec(
            (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0), 1..14)
    ) {
        let cloud: Vec<Vector3<f64>> =
            coords.iter().map(|&(x, y, z)| Vector3::new(x, y, z)).collect();
        let b = min_volume_box::<f64>(&cloud, &BoxCfg::default()).unwrap();
        let tol = 1e-6 * (1.0 + b.extent.iter().fold(0.0f64, |a, &e| a.max(e)));
        for p in &cloud {
            prop_assert!(b.contains(p, tol));
        }
        for &s in &b.support {
            prop_assert!(s < cloud.len());
        }
    }

    /// Exact compute never reports a larger volume than the axis-aligned
    /// bounding box.
    #[test]
    fn never_worse_than_axis_aligned(
        coords in prop::collection::vec(
            (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0), 4..10)
    ) {
        let cloud: Vec<Vector3<f64>> =
            coords.iter().map(|&(x, y, z)| Vector3::new(x, y, z)).collect();
        let b = min_volume_box::<BigRational>(&cloud, &BoxCfg::default()).unwrap();
        let mut lo = cloud[0];
        let mut hi = cloud[0];
        for p in &cloud {
            lo = lo.inf(p);
            hi = hi.sup(p);
        }
        let aabb = (hi - lo).x * (hi - lo).y * (hi - lo).z;
        prop_assert!(b.volume() <= aabb * (1.0 + 1e-9));
    }
}
