//! Offline text analysis.

use acesight_core::analysis::{StatCounters, analyze_event, analyze_modules};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run(text: &str, json: bool) -> Result<()> {
    let mut stats = StatCounters::new();
    let event = analyze_event(text, &mut stats);
    let modules = analyze_modules(text);

    if json {
        let output = json!({
            "event": event.description(),
            "significant": event.is_significant(),
            "modules": modules.modules,
            "module_description": modules.description(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let description = event.description();
    if event.is_significant() {
        println!("Event:   {}", description.green());
    } else {
        println!("Event:   {}", description.dimmed());
    }
    println!("Modules: {}", modules.description());

    let counters: Vec<String> = stats
        .iter()
        .filter(|(_, value)| *value > 0)
        .map(|(kind, value)| format!("{}={}", kind.name(), value))
        .collect();
    if !counters.is_empty() {
        println!("Counters: {}", counters.join(", ").cyan());
    }
    Ok(())
}
