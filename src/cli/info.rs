//! Info command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::map::MapStats;

use super::{load_settings, load_types, read_map, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the info command
pub fn run_info(input: &Path, overrides: &CliOverrides, no_config: bool, json: bool) -> ExitCode {
    let config = match load_settings(input, overrides, no_config) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let types = match load_types(&config) {
        Ok(types) => types,
        Err(code) => return code,
    };
    let doc = match read_map(input, types.as_ref()) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let stats = doc.stats();
    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print!("{}", format_stats(input, &stats));
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn format_stats(input: &Path, stats: &MapStats) -> String {
    let mut out = format!("{}\n", input.display());
    out.push_str(&format!("  tiles:      {}\n", stats.tiles));
    out.push_str(&format!("  duplicates: {}\n", stats.duplicates));
    out.push_str(&format!("  id width:   {} (source: {})\n", stats.id_width, stats.legacy_width));
    out.push_str(&format!("  levels:     {}\n", stats.levels.len()));
    for level in &stats.levels {
        out.push_str(&format!("    z{}: {}x{}\n", level.level, level.width, level.height));
    }
    out
}
