//! Software rasterizer.

use glam::Vec2;
use image::{ImageFormat, RgbaImage};
use std::path::Path;

use super::{Canvas, Glow};
use crate::color::Rgba;
use crate::error::RenderError;

/// Halo extent in standard deviations past the disc edge.
const GLOW_EXTENT_SIGMAS: f32 = 3.0;

/// A [`Canvas`] that draws into an in-memory RGBA image.
///
/// Discs are anti-aliased by pixel coverage; glows are a Gaussian falloff
/// from the disc edge. Blending is source-over in 8-bit sRGB space, the
/// same as a browser 2D context.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Match the buffer to a new size, discarding its contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
    }

    /// Pixel at (x, y), or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Write the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.image.save_with_format(path, ImageFormat::Png)?;
        log::info!(
            "Wrote {}x{} snapshot to {}",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(())
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x, y);
        let [r, g, b, a] = pixel.0;
        let mix = |dst: u8, src: f32| -> u8 {
            let out = src * 255.0 * alpha + dst as f32 * (1.0 - alpha);
            out.round().clamp(0.0, 255.0) as u8
        };
        let out_a = alpha + (a as f32 / 255.0) * (1.0 - alpha);
        pixel.0 = [
            mix(r, color.r),
            mix(g, color.g),
            mix(b, color.b),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ];
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Rgba) {
        let fill = image::Rgba([
            channel(color.r),
            channel(color.g),
            channel(color.b),
            channel(color.a),
        ]);
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Glow) {
        let (width, height) = self.size();
        if width == 0 || height == 0 || !center.is_finite() || !(radius > 0.0) {
            return;
        }

        let sigma = glow.radius / 2.0;
        let extent = if glow.is_visible() {
            radius + sigma * GLOW_EXTENT_SIGMAS
        } else {
            radius + 1.0
        };

        let x0 = (center.x - extent).floor().max(0.0) as u32;
        let y0 = (center.y - extent).floor().max(0.0) as u32;
        let x1 = ((center.x + extent).ceil().max(0.0) as u32).min(width);
        let y1 = ((center.y + extent).ceil().max(0.0) as u32).min(height);

        for y in y0..y1 {
            for x in x0..x1 {
                let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center).length();

                if glow.is_visible() {
                    let outside = (d - radius).max(0.0);
                    let falloff = (-(outside * outside) / (2.0 * sigma * sigma)).exp();
                    self.blend(x, y, glow.color, falloff);
                }

                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

#[inline]
fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
