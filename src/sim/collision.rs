//! Collision primitives
//!
//! The simulation resolves contacts with the cheapest test that is accurate
//! enough for the pair: pixel-mask overlap when both sides carry a mask,
//! a separating-axis test for polygon-versus-rect (ship silhouette against
//! barrels, reporting a push-out vector), a swept segment test for fast
//! projectiles, and plain circle distance for everything else.

use glam::{IVec2, Vec2};

use crate::geom::segment_point_distance;
use crate::sprite::Mask;

pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

/// Continuous test for a fast mover: did the segment it travelled this tick
/// pass within `r_sum` of `center`? Catches tunnelling that a point-in-time
/// circle test would miss.
pub fn swept_circle_hit(prev: Vec2, cur: Vec2, center: Vec2, r_sum: f32) -> bool {
    segment_point_distance(prev, cur, center) <= r_sum
}

/// Axis-aligned box, used for barrel bounds.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for p in points {
        let d = p.dot(axis);
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (lo, hi)
}

fn centroid(points: &[Vec2]) -> Vec2 {
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}

/// Separating-axis test of a convex polygon against an axis-aligned box.
/// Returns the minimum translation vector that moves the polygon out of the
/// box, or `None` when they do not overlap. The MTV always points from the
/// box toward the polygon's centroid.
pub fn polygon_aabb_mtv(poly: &[Vec2], rect: &Aabb) -> Option<Vec2> {
    debug_assert!(poly.len() >= 3);
    let corners = rect.corners();

    let mut best_axis = Vec2::ZERO;
    let mut best_overlap = f32::INFINITY;

    // Candidate axes: the box faces plus each polygon edge normal
    let mut test = |axis: Vec2| -> bool {
        let axis = axis.normalize_or_zero();
        if axis == Vec2::ZERO {
            return true;
        }
        let (a_lo, a_hi) = project(poly, axis);
        let (b_lo, b_hi) = project(&corners, axis);
        let overlap = a_hi.min(b_hi) - a_lo.max(b_lo);
        if overlap <= 0.0 {
            return false;
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis;
        }
        true
    };

    if !test(Vec2::X) || !test(Vec2::Y) {
        return None;
    }
    for i in 0..poly.len() {
        let edge = poly[(i + 1) % poly.len()] - poly[i];
        if !test(edge.perp()) {
            return None;
        }
    }

    // Orient the push away from the box
    let outward = centroid(poly) - rect.center();
    if outward.dot(best_axis) < 0.0 {
        best_axis = -best_axis;
    }
    Some(best_axis * best_overlap)
}

/// Entities that can resolve contacts at pixel accuracy.
pub trait Maskable {
    fn collision_mask(&self) -> Option<&Mask>;
    fn center(&self) -> Vec2;
}

/// Pixel-accurate overlap between two maskables; `None` when either side
/// lacks a mask and the caller must fall back to a coarser test.
pub fn masks_overlap(a: &dyn Maskable, b: &dyn Maskable) -> Option<bool> {
    let (ma, mb) = (a.collision_mask()?, b.collision_mask()?);
    let offset: IVec2 = mb.top_left(b.center()) - ma.top_left(a.center());
    Some(ma.overlaps(mb, offset))
}
