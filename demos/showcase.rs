//! # Showcase
//!
//! Tours every model in the built-in catalog, 20 seconds each. Every
//! entry collapses into a dot, blooms into its formation and collapses
//! again before the next one takes over.
//!
//! ## What This Demonstrates
//!
//! - `DemoCycle` - timed cue scheduling against the convergence controller
//! - Formation rebuilds when the point count or colors change
//!
//! ## Keys
//!
//! - `→` skips to the next model
//! - `D` switches themes (kept across models)
//! - `Esc` quits
//!
//! Run with: `RUST_LOG=info cargo run --example showcase`

use biasfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let catalog = ModelCatalog::builtin()?;
    let demo = DemoCycle::from_catalog(&catalog);
    println!("Touring {} models", demo.entries().len());

    Viewer::new()
        .with_title("Training data showcase")
        .with_params(SimulationParams::default().with_dark_mode(true))
        .with_demo(demo)
        .run()?;
    Ok(())
}
