//! # Scene File
//!
//! Loads a formation from a JSON scene file.
//!
//! ```text
//! cargo run --example scene_file -- presets/scene.json
//! ```
//!
//! See `presets/scene.json` for the format. Colors may be `#rrggbb`,
//! `#rgb` or `"r,g,b"`.

use biasfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "presets/scene.json".into());

    Viewer::from_scene_file(&path)?
        .with_title(format!("Scene: {}", path))
        .run()?;
    Ok(())
}
