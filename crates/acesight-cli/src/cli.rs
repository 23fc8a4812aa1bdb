//! CLI argument definitions for acesight.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "acesight")]
#[command(about = "Screen-reading combat assistant for tank battles", version)]
pub struct Args {
    /// Map calibration file (JSON); built-in maps are used when omitted
    #[arg(long, value_name = "FILE", env = "ACESIGHT_MAPS", global = true)]
    pub maps: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, value_name = "FILE", env = "ACESIGHT_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Activate this map at start instead of waiting for recognition
    #[arg(long, value_name = "NAME")]
    pub map: Option<String>,

    /// Directory receiving state.json and status.txt
    #[arg(long, short, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Read region frames from a directory instead of the screen
    #[arg(long, value_name = "DIR")]
    pub replay: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the event and module analysers on a text
    Analyze {
        /// Recognized text, e.g. "Critical hit, enemy fuel explosion"
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate and list map calibrations
    Maps,
    /// Print the grid line positions of a map
    Grid {
        /// Map name
        map: String,
        /// Region width in pixels
        #[arg(long, default_value = "432")]
        width: u32,
        /// Region height in pixels
        #[arg(long, default_value = "432")]
        height: u32,
    },
    /// Compute the range between two minimap points
    Range {
        /// Map name
        map: String,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    },
}
