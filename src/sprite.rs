//! Visual extents and collision masks
//!
//! The core never rasterizes sprites; collaborators hand it a [`Frame`]
//! describing the pixel art they will draw (dimensions plus an alpha grid)
//! and the simulation derives collision geometry from it: a scalar radius
//! for the cheap tests and a [`Mask`] for pixel-accurate overlap.

use glam::{IVec2, Vec2};

/// A visual frame as supplied by the rendering collaborator: `width x
/// height` pixels, row-major alpha values (0 = transparent).
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl Frame {
    /// Fully opaque frame of the given size.
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![255; (width * height) as usize],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.alpha.len() == (self.width * self.height) as usize
    }

    /// Collision radius for this frame at the given pixel scale: 45% of the
    /// smaller dimension, keeping the hitbox inside the visible sprite.
    /// Malformed frames fall back to `fallback` (spec'd non-fatal path).
    pub fn collision_radius(&self, scale: u32, fallback: f32, min_radius: f32) -> f32 {
        if !self.is_valid() {
            log::warn!(
                "invalid frame {}x{} (alpha len {}), using fallback radius {fallback}",
                self.width,
                self.height,
                self.alpha.len()
            );
            return fallback.max(min_radius);
        }
        let side = self.width.min(self.height) * scale.max(1);
        (side as f32 * 0.45).max(min_radius)
    }
}

/// Rasterized solidity bitmap used for pixel-accurate overlap tests.
/// Stored at the entity's drawn size (frame dimensions times pixel scale).
#[derive(Debug, Clone)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// Fully solid rectangular mask.
    pub fn solid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width * height],
        }
    }

    /// Build a mask from a frame's alpha grid, scaled up by the integer
    /// pixel scale. Returns `None` for malformed frames.
    pub fn from_frame(frame: &Frame, scale: u32) -> Option<Self> {
        if !frame.is_valid() {
            return None;
        }
        let scale = scale.max(1) as usize;
        let fw = frame.width as usize;
        let width = fw * scale;
        let height = frame.height as usize * scale;
        let mut bits = vec![false; width * height];
        for y in 0..height {
            let fy = y / scale;
            for x in 0..width {
                let fx = x / scale;
                bits[y * width + x] = frame.alpha[fy * fw + fx] != 0;
            }
        }
        Some(Self {
            width,
            height,
            bits,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    /// Top-left corner of this mask's bounding rect when drawn centered at
    /// `center`, in integer pixels.
    pub fn top_left(&self, center: Vec2) -> IVec2 {
        IVec2::new(
            (center.x - self.width as f32 / 2.0).round() as i32,
            (center.y - self.height as f32 / 2.0).round() as i32,
        )
    }

    /// Exact overlap test against `other`, whose bounding rect sits at
    /// integer `offset` from ours (other.top_left - self.top_left).
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        // Intersection of the two rects in our coordinates
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                let ox = (x - offset.x) as usize;
                let oy = (y - offset.y) as usize;
                if self.get(x as usize, y as usize) && other.get(ox, oy) {
                    return true;
                }
            }
        }
        false
    }

    /// Overlap test for two masks centered at world positions.
    pub fn overlaps_at(&self, center: Vec2, other: &Mask, other_center: Vec2) -> bool {
        let offset = other.top_left(other_center) - self.top_left(center);
        self.overlaps(other, offset)
    }
}

/// Optional visual frames the host can supply so entity hitboxes match the
/// sprites it draws. Any missing frame falls back to configured radii.
#[derive(Debug, Clone, Default)]
pub struct VisualFrames {
    pub ship: Option<Frame>,
    pub ufo: Option<Frame>,
    pub barrel: Option<Frame>,
}
