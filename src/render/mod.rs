//! Drawing the formation.
//!
//! Rendering is split from simulation by the [`Canvas`] trait: a canvas
//! only knows how to clear itself and fill glowing circles in physical
//! pixels. [`render_frame`] turns a [`SimulationState`] into those calls,
//! picking colors from the [`Theme`] for the current light/dark mode.
//!
//! Two canvases ship with the crate:
//!
//! - [`PixelCanvas`] - software rasterizer over an `image::RgbaImage`, for
//!   headless snapshots and tests
//! - [`GpuCanvas`](crate::gpu::GpuCanvas) - wgpu-backed window renderer
//!
//! Glow follows the convention of a 2D canvas shadow: a Gaussian halo
//! whose blur radius is twice its standard deviation.

mod pixel;

pub use pixel::PixelCanvas;

use glam::Vec2;

use crate::color::{Rgb, Rgba};
use crate::error::RenderError;
use crate::particle::Particle;
use crate::simulation::SimulationState;

/// Glow radius added per unit of blur sigma.
pub const GLOW_PER_SIGMA: f32 = 2.0;

/// Halo drawn around a circle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glow {
    /// Blur radius in physical pixels. Zero means no halo.
    pub radius: f32,
    pub color: Rgba,
}

impl Glow {
    pub const NONE: Glow = Glow {
        radius: 0.0,
        color: Rgba::TRANSPARENT,
    };

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.radius > 0.0 && self.color.a > 0.0
    }
}

/// A drawing surface measured in physical pixels.
pub trait Canvas {
    /// Buffer size as (width, height).
    fn size(&self) -> (u32, u32);

    /// Fill the whole buffer with `color`.
    fn clear(&mut self, color: Rgba);

    /// Draw a filled circle with an optional glow behind it.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Glow);

    /// Flush the frame to wherever it is shown.
    fn present(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Colors and glow strength for one display mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Rgb,
    pub particle_alpha: f32,
    /// Glow radius in logical pixels before blur is added.
    pub base_glow: f32,
    pub glow_alpha: f32,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        background: Rgb::new(255, 255, 255),
        particle_alpha: 0.85,
        base_glow: 0.0,
        glow_alpha: 0.35,
    };

    pub const DARK: Theme = Theme {
        background: Rgb::new(2, 6, 23),
        particle_alpha: 0.95,
        base_glow: 6.0,
        glow_alpha: 0.8,
    };

    pub fn for_mode(dark: bool) -> Theme {
        if dark {
            Theme::DARK
        } else {
            Theme::LIGHT
        }
    }

    /// Glow radius in logical pixels for a blur sigma.
    #[inline]
    pub fn glow_radius(&self, blur: f32) -> f32 {
        self.base_glow + blur.max(0.0) * GLOW_PER_SIGMA
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::LIGHT
    }
}

/// Draw one particle. Positions and sizes are logical and get multiplied
/// by `pixel_scale` on the way to the canvas.
pub fn render_particle<C: Canvas + ?Sized>(
    particle: &Particle,
    theme: &Theme,
    blur: f32,
    pixel_scale: f32,
    canvas: &mut C,
) {
    let color = particle.color();
    let glow_radius = theme.glow_radius(blur) * pixel_scale;
    let glow = if glow_radius > 0.0 {
        Glow {
            radius: glow_radius,
            color: color.with_alpha(theme.glow_alpha),
        }
    } else {
        Glow::NONE
    };

    canvas.fill_circle(
        particle.position * pixel_scale,
        particle.radius() * pixel_scale,
        color.with_alpha(theme.particle_alpha),
        glow,
    );
}

/// Clear to the theme background and draw every particle in order.
pub fn render_frame<C: Canvas + ?Sized>(state: &SimulationState, canvas: &mut C) {
    let theme = Theme::for_mode(state.dark_mode());
    let blur = state.params().blur();
    let pixel_scale = state.viewport().pixel_scale();

    canvas.clear(theme.background.into());
    for particle in state.particles() {
        render_particle(particle, &theme, blur, pixel_scale, canvas);
    }
}
