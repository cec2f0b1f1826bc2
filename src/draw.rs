//! Drawing surface abstraction
//!
//! The core iterates its entities once per frame and lets each one render
//! itself through this trait. Pixel format, batching and the actual sprite
//! art are the host's problem; the simulation only emits outline geometry
//! that matches its collision shapes.

use glam::Vec2;

pub type Color = [u8; 3];

pub const WHITE: Color = [240, 240, 240];
pub const GRAY: Color = [120, 120, 120];
pub const ORANGE: Color = [255, 140, 0];

/// Projectile color cycle palettes (cosmetic, driven by spawn age).
pub const BULLET_PALETTE: [Color; 3] = [WHITE, [0, 200, 255], [255, 80, 80]];

/// Opaque drawing surface supplied by the host each frame.
pub trait Canvas {
    /// Outline polygon through `points` (closed).
    fn polygon(&mut self, points: &[Vec2], color: Color);
    /// Outline circle.
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Line segment (HUD separator, debug overlays).
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Canvas that just counts primitives, for draw-iteration tests.
    #[derive(Default)]
    pub struct CountingCanvas {
        pub polygons: usize,
        pub circles: usize,
        pub lines: usize,
    }

    impl Canvas for CountingCanvas {
        fn polygon(&mut self, _points: &[Vec2], _color: Color) {
            self.polygons += 1;
        }

        fn circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {
            self.circles += 1;
        }

        fn line(&mut self, _from: Vec2, _to: Vec2, _color: Color) {
            self.lines += 1;
        }
    }
}
