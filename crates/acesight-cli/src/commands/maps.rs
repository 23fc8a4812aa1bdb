//! Map calibration listing.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli_utils::load_maps;

pub fn run(maps: Option<&Path>) -> Result<()> {
    let store = load_maps(maps)?;
    match maps {
        Some(path) => println!("{} maps in {}", store.len(), path.display()),
        None => println!("{} built-in maps", store.len()),
    }

    for name in store.names() {
        let Some(config) = store.get(name) else {
            continue;
        };
        println!(
            "  {:<32} period {:>3} px  cell {:>6.1} m  offset ({}, {})  {} m/px",
            config.name.bold(),
            config.grid_cell_period_px,
            config.cell_size_m,
            config.grid_offset.0,
            config.grid_offset.1,
            format!("{:.3}", config.conversion_factor()).cyan()
        );
    }
    Ok(())
}
