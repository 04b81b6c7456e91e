//! # Model Formation
//!
//! Shows the training-data formation of one model from the built-in
//! catalog.
//!
//! ## What This Demonstrates
//!
//! - `ModelCatalog::builtin()` - the shipped model list
//! - `ModelEntry::to_params()` - catalog metrics mapped to a formation
//! - `Viewer` builder options
//!
//! ## Usage
//!
//! ```text
//! cargo run --example model -- <provider> <model>
//! cargo run --example model -- google gemini-1-5-pro
//! ```
//!
//! With no arguments the list of available slugs is printed and GPT-4 is
//! shown.
//!
//! ## Try This
//!
//! - Press `D` to switch themes
//! - Press `Space` to collapse the field and let it expand again
//! - Compare a low-diversity model (GPT-2) with a mixed one (Gemini 1.5 Pro)

use biasfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let catalog = ModelCatalog::builtin()?;
    let mut args = std::env::args().skip(1);
    let provider = args.next().unwrap_or_else(|| "openai".into());
    let model = args.next().unwrap_or_else(|| "gpt-4".into());

    let Some(entry) = catalog.find(&provider, &model) else {
        eprintln!("Unknown model {}/{}. Available:", provider, model);
        for p in catalog.providers() {
            for m in &p.models {
                eprintln!("  {} {}", p.id, m.id);
            }
        }
        std::process::exit(1);
    };

    let defaults = entry.defaults();
    println!(
        "{} {} ({}): {} points{}, diameter {}, blur {:.1}",
        entry.provider,
        entry.name,
        entry.release_date,
        defaults.points,
        if defaults.points_estimated { " (estimated)" } else { "" },
        defaults.structure_diameter,
        defaults.blur,
    );
    for category in &defaults.colors {
        println!("  {:<20} {:>5.1}%  {}", category.name, category.ratio, category.color.to_hex());
    }

    Viewer::new()
        .with_title(format!("{} {}", entry.provider, entry.name))
        .with_params(entry.to_params().with_dark_mode(true))
        .run()?;
    Ok(())
}
