mod cli;
mod cli_utils;
mod commands;
mod ocr;
mod replay;

use acesight_core::LogBuffer;
use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use commands::run::RunOptions;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    let args = Args::parse();

    let log = LogBuffer::default();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("acesight=info,acesight_core=info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(log.layer())
        .init();

    match args.command {
        Some(Command::Analyze { text, json }) => commands::analyze::run(&text, json),
        Some(Command::Maps) => commands::maps::run(args.maps.as_deref()),
        Some(Command::Grid { map, width, height }) => {
            commands::grid::run(args.maps.as_deref(), &map, width, height)
        }
        Some(Command::Range {
            map,
            x1,
            y1,
            x2,
            y2,
        }) => commands::range::run(
            args.maps.as_deref(),
            &map,
            acesight_core::Point::new(x1, y1),
            acesight_core::Point::new(x2, y2),
        ),
        None => commands::run::run(
            RunOptions {
                maps: args.maps,
                settings: args.settings,
                map: args.map,
                output: args.output,
                replay: args.replay,
            },
            log,
        ),
    }
}
