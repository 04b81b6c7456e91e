//! # Snapshot
//!
//! Renders a formation without a window and writes it to a PNG.
//!
//! ## What This Demonstrates
//!
//! - Driving `SimulationState` with a `ManualClock`
//! - `PixelCanvas` as a headless `Canvas`
//!
//! ```text
//! cargo run --example snapshot -- out.png
//! ```

use std::time::Duration;

use biasfield::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "snapshot.png".into());

    let params = SimulationParams::new(
        1800,
        55.0,
        vec![
            Category::from_hex("Classic web", "#1D4ED8", 48.0)?,
            Category::from_hex("Social media", "#DC2626", 22.0)?,
            Category::from_hex("Academic", "#16A34A", 18.0)?,
            Category::from_hex("Proprietary", "#EAB308", 12.0)?,
        ],
    )
    .with_blur(3.0)
    .with_dark_mode(true);

    let viewport = Viewport::new(960.0, 640.0, 2.0);
    let mut state = SimulationState::with_seed(params, viewport, 7);

    // Let the orbits settle
    let clock = ManualClock::new();
    for _ in 0..240 {
        clock.advance(FRAME);
        state.step(clock.now());
    }

    let (width, height) = state.viewport().buffer_size();
    let mut canvas = PixelCanvas::new(width, height);
    render_frame(&state, &mut canvas);
    canvas.save_png(&path)?;

    println!("Wrote {}x{} snapshot of {} particles to {}", width, height, state.particles().len(), path);
    Ok(())
}
