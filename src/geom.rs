//! 2D helpers shared across the simulation
//!
//! Positions live in screen-space pixels on a toroidal arena: leaving one
//! edge re-enters from the opposite one.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Wrap a position into `[0, arena.x) x [0, arena.y)`.
#[inline]
pub fn wrap_pos(pos: Vec2, arena: Vec2) -> Vec2 {
    Vec2::new(pos.x.rem_euclid(arena.x), pos.y.rem_euclid(arena.y))
}

/// Unit vector for an angle in degrees.
#[inline]
pub fn angle_to_vec(deg: f32) -> Vec2 {
    let rad = deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Random unit vector, uniform over directions.
pub fn rand_unit_vec(rng: &mut impl Rng) -> Vec2 {
    let a = rng.random_range(0.0..TAU);
    Vec2::new(a.cos(), a.sin())
}

/// Random position on one of the four arena edges. Spawn entry point for
/// anything that should drift in from the border.
pub fn rand_edge_pos(rng: &mut impl Rng, arena: Vec2) -> Vec2 {
    if rng.random_bool(0.5) {
        let x = rng.random_range(0.0..arena.x);
        let y = if rng.random_bool(0.5) { 0.0 } else { arena.y };
        Vec2::new(x, y)
    } else {
        let x = if rng.random_bool(0.5) { 0.0 } else { arena.x };
        let y = rng.random_range(0.0..arena.y);
        Vec2::new(x, y)
    }
}

/// Distance from point `p` to the segment `a..b`. Degenerate segments
/// collapse to point distance.
pub fn segment_point_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    p.distance(a + seg * t)
}

/// Normalize `v`, substituting a random unit vector for (near-)zero input
/// so direction math never produces NaN.
pub fn normalize_or_random(v: Vec2, rng: &mut impl Rng) -> Vec2 {
    let n = v.normalize_or_zero();
    if n == Vec2::ZERO { rand_unit_vec(rng) } else { n }
}
