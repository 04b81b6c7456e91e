//! # biasfield - dataset composition as a particle field
//!
//! Renders the make-up of a training dataset as a field of colored
//! particles orbiting a shared center. Each source category gets a share
//! of the points proportional to its ratio, the formation tightens or
//! loosens with the dataset's diversity, and a convergence control
//! collapses the field into a dot and expands it again.
//!
//! ## Quick Start
//!
//! ```ignore
//! use biasfield::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = SimulationParams::new(
//!         1500,
//!         65.0,
//!         vec![
//!             Category::from_hex("Classic web", "#1D4ED8", 60.0)?,
//!             Category::from_hex("Social media", "#DC2626", 40.0)?,
//!         ],
//!     )
//!     .with_dark_mode(true);
//!
//!     Viewer::new().with_params(params).run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Allocation
//!
//! [`allocate`] splits the point count across categories with the
//! largest-remainder method, so the per-category counts always sum to the
//! requested total and a category with a positive ratio never starves
//! when there are points to spare.
//!
//! ### Simulation
//!
//! [`SimulationState`] owns the particles, the [`Viewport`] and the
//! [`ConvergenceController`]. Call [`SimulationState::step`] once per
//! frame; parameter changes go through [`SimulationState::set_params`],
//! which only rebuilds the formation when something structural changed.
//!
//! ### Rendering
//!
//! Anything implementing [`Canvas`] can draw a frame via
//! [`render_frame`]: [`PixelCanvas`] rasterizes on the CPU (PNG snapshots,
//! tests), [`GpuCanvas`] draws into a window surface.
//!
//! ### Model catalog
//!
//! [`ModelCatalog`] holds published model datasets and maps each one to a
//! ready-made formation ([`ModelEntry::to_params`]). [`DemoCycle`] tours
//! them unattended.
//!
//! ## Keyboard
//!
//! | Key     | Action                  |
//! |---------|-------------------------|
//! | `D`     | toggle light/dark theme |
//! | `Space` | collapse/expand pulse   |
//! | `→`     | next demo entry         |
//! | `Esc`   | quit                    |

pub mod allocation;
pub mod catalog;
pub mod color;
pub mod config;
pub mod convergence;
pub mod demo;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mapping;
pub mod params;
pub mod particle;
pub mod render;
pub mod simulation;
pub mod spawn;
pub mod time;
mod viewer;
pub mod viewport;

pub use allocation::{allocate, Allocation};
pub use catalog::{ModelCatalog, ModelEntry, Provider};
pub use color::{Category, Rgb, Rgba};
pub use config::SceneConfig;
pub use convergence::{Choreography, ConvergenceController};
pub use demo::DemoCycle;
pub use error::{ColorError, ConfigError, GpuError, RenderError, ViewerError};
pub use glam::Vec2;
pub use gpu::GpuCanvas;
pub use params::{ParamChange, SimulationParams};
pub use particle::Particle;
pub use render::{render_frame, Canvas, PixelCanvas, Theme};
pub use simulation::SimulationState;
pub use viewer::Viewer;
pub use viewport::Viewport;

/// Everything needed for the common cases.
///
/// ```ignore
/// use biasfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::catalog::{ModelCatalog, ModelEntry};
    pub use crate::color::{Category, Rgb, Rgba};
    pub use crate::config::SceneConfig;
    pub use crate::convergence::{Choreography, ConvergenceController, Step};
    pub use crate::demo::DemoCycle;
    pub use crate::error::{ConfigError, RenderError, ViewerError};
    pub use crate::input::{Bindings, Command, KeyCode};
    pub use crate::params::SimulationParams;
    pub use crate::render::{render_frame, Canvas, PixelCanvas, Theme};
    pub use crate::simulation::SimulationState;
    pub use crate::time::{Clock, ManualClock, SystemClock};
    pub use crate::viewer::Viewer;
    pub use crate::viewport::Viewport;
    pub use crate::Vec2;
}
