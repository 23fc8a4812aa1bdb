//! Calibration grid printout.

use std::path::Path;

use acesight_core::range::GridLines;
use anyhow::{Result, anyhow};

use crate::cli_utils::load_maps;

pub fn run(maps: Option<&Path>, map: &str, width: u32, height: u32) -> Result<()> {
    let store = load_maps(maps)?;
    let config = store
        .get(map)
        .ok_or_else(|| anyhow!("map '{}' not found (known: {})", map, store.names().join(", ")))?;

    let lines = GridLines::for_map(width, height, &config);
    println!(
        "{}: period {} px, offset ({}, {}), region {}x{}",
        config.name, config.grid_cell_period_px, config.grid_offset.0, config.grid_offset.1, width, height
    );
    println!("x: {}", join(&lines.xs));
    println!("y: {}", join(&lines.ys));
    Ok(())
}

fn join(values: &[i32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
