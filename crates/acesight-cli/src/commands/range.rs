//! Offline range computation.

use std::path::Path;

use acesight_core::range::RangeCalculator;
use acesight_core::vision::Point;
use anyhow::{Result, anyhow};
use owo_colors::OwoColorize;

use crate::cli_utils::load_maps;

pub fn run(maps: Option<&Path>, map: &str, from: Point, to: Point) -> Result<()> {
    let store = load_maps(maps)?;
    let config = store
        .get(map)
        .ok_or_else(|| anyhow!("map '{}' not found (known: {})", map, store.names().join(", ")))?;

    let measurement = RangeCalculator::new(&config).measure(from, to);
    println!(
        "{}: {:.1} px x {:.3} m/px = {}",
        config.name,
        measurement.pixel_distance,
        measurement.conversion_factor,
        format!("{:.0} m", measurement.range_m).green().bold()
    );
    Ok(())
}
