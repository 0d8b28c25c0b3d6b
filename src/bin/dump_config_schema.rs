//! Prints the JSON schema for `config.toml`.
//!
//! Usage: `dump_config_schema [OUTPUT]`. Without an argument the schema goes
//! to stdout.

use anyhow::{Context, Result};
use std::fs;

fn main() -> Result<()> {
    let schema = overmark::Config::json_schema();
    let rendered = serde_json::to_string_pretty(&schema)?;

    match std::env::args_os().nth(1) {
        Some(path) => {
            fs::write(&path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write schema to {}", path.to_string_lossy()))?;
            eprintln!("Wrote config schema to {}", path.to_string_lossy());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
