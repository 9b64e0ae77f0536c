//! Random point clouds (replayable draws for tests and benches).
//!
//! Purpose
//! - Small deterministic samplers for the inputs the box searches consume:
//!   uniform points in a disk, ball or randomly rotated box, and random 3D
//!   rotations to exercise orientation invariance. Determinism uses a replay token `(seed, index)`
//!   mixed into a single RNG, so any draw in a sweep can be reproduced in
//!   isolation.

use nalgebra::{Matrix3, Vector2, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// `n` points uniform in the disk of radius `radius`.
pub fn draw_points_disk(n: usize, radius: f64, tok: ReplayToken) -> Vec<Vector2<f64>> {
    let mut rng = tok.to_std_rng();
    (0..n)
        .map(|_| {
            let th = rng.gen::<f64>() * std::f64::consts::TAU;
            let r = radius * rng.gen::<f64>().sqrt();
            Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect()
}

/// `n` points uniform in the ball of radius `radius`.
pub fn draw_points_ball(n: usize, radius: f64, tok: ReplayToken) -> Vec<Vector3<f64>> {
    let mut rng = tok.to_std_rng();
    let mut pts = Vec::with_capacity(n);
    while pts.len() < n {
        let p = Vector3::new(
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
        );
        if p.norm_squared() <= 1.0 {
            pts.push(p * radius);
        }
    }
    pts
}

/// `n` points uniform in a randomly rotated box with half-widths `extent`,
/// centered at the origin.
pub fn draw_points_box(n: usize, extent: [f64; 3], tok: ReplayToken) -> Vec<Vector3<f64>> {
    let mut rng = tok.to_std_rng();
    let rot = rotation_from(&mut rng);
    (0..n)
        .map(|_| {
            let local = Vector3::new(
                (rng.gen::<f64>() * 2.0 - 1.0) * extent[0],
                (rng.gen::<f64>() * 2.0 - 1.0) * extent[1],
                (rng.gen::<f64>() * 2.0 - 1.0) * extent[2],
            );
            rot * local
        })
        .collect()
}

/// A uniform random rotation matrix (quaternion method).
pub fn draw_rotation3(tok: ReplayToken) -> Matrix3<f64> {
    rotation_from(&mut tok.to_std_rng())
}

fn rotation_from(rng: &mut StdRng) -> Matrix3<f64> {
    let u1: f64 = rng.gen();
    let u2: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
    let u3: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    let (w, x, y, z) = (a * u2.sin(), a * u2.cos(), b * u3.sin(), b * u3.cos());
    Matrix3::new(
        1.0 - 2.0 * (y * y + z * z),
        2.0 * (x * y - w * z),
        2.0 * (x * z + w * y),
        2.0 * (x * y + w * z),
        1.0 - 2.0 * (x * x + z * z),
        2.0 * (y * z - w * x),
        2.0 * (x * z - w * y),
        2.0 * (y * z + w * x),
        1.0 - 2.0 * (x * x + y * y),
    )
}
