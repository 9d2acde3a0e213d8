//! Handler for the `check` command.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Validate configuration without starting anything.
pub fn execute<P: AsRef<Path>>(config_path: P, json: bool) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;
    let summary = config.summary();

    if json {
        let map: Map<String, Value> = summary
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::String(value)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&Value::Object(map))?);
        return Ok(());
    }

    println!("Configuration check");
    println!("  {:<20} {}", "config", path.display());
    for (key, value) in summary {
        println!("  {key:<20} {value}");
    }
    println!("Configuration is valid");
    Ok(())
}
