//! Canvas sizing and the smoothed display center.

use glam::Vec2;

/// Fraction of the remaining distance the display center covers per frame.
pub const CENTER_SMOOTHING: f32 = 0.08;

/// Canvas geometry and the point particles orbit around.
///
/// Logical coordinates are CSS-style pixels; the physical buffer is the
/// logical canvas times the device pixel ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
    size_multiplier: f32,
    horizontal_shift: f32,
    display_center: Vec2,
}

impl Viewport {
    /// A viewport with the display center already at its target.
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let mut viewport = Self {
            width: sanitize_len(width),
            height: sanitize_len(height),
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
            size_multiplier: 1.0,
            horizontal_shift: 0.0,
            display_center: Vec2::ZERO,
        };
        viewport.snap_center();
        viewport
    }

    /// Change the viewport size. Does not move the display center.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.width = sanitize_len(width);
        self.height = sanitize_len(height);
        self.device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
    }

    pub fn set_size_multiplier(&mut self, multiplier: f32) {
        self.size_multiplier = if multiplier.is_finite() {
            multiplier.max(1.0)
        } else {
            1.0
        };
    }

    pub fn set_horizontal_shift(&mut self, shift: f32) {
        self.horizontal_shift = if shift.is_finite() { shift } else { 0.0 };
    }

    /// Viewport size in logical pixels.
    #[inline]
    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Canvas size in logical pixels (viewport times size multiplier).
    #[inline]
    pub fn logical_size(&self) -> Vec2 {
        self.viewport_size() * self.size_multiplier
    }

    /// Backing buffer size in physical pixels.
    pub fn buffer_size(&self) -> (u32, u32) {
        let physical = self.logical_size() * self.device_pixel_ratio;
        (physical.x.ceil() as u32, physical.y.ceil() as u32)
    }

    /// Physical pixels per logical pixel.
    #[inline]
    pub fn pixel_scale(&self) -> f32 {
        self.device_pixel_ratio
    }

    #[inline]
    pub fn display_center(&self) -> Vec2 {
        self.display_center
    }

    /// Canvas center plus horizontal shift.
    #[inline]
    pub fn target_center(&self) -> Vec2 {
        self.logical_size() / 2.0 + Vec2::new(self.horizontal_shift, 0.0)
    }

    /// Move the display center a fixed fraction toward the target.
    ///
    /// First-order low-pass: the center approaches monotonically and never
    /// overshoots.
    pub fn smooth_center(&mut self) {
        let target = self.target_center();
        self.display_center += (target - self.display_center) * CENTER_SMOOTHING;
    }

    /// Jump straight to the target center.
    pub fn snap_center(&mut self) {
        self.display_center = self.target_center();
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

fn sanitize_len(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn sanitize_ratio(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        1.0
    }
}
