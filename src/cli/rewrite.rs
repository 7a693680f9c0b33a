//! Rewrite command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;

use super::{load_settings, load_types, read_map, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the rewrite command
pub fn run_rewrite(
    input: &Path,
    output: &Path,
    overrides: &CliOverrides,
    no_config: bool,
    clean_tags: bool,
) -> ExitCode {
    let config = match load_settings(input, overrides, no_config) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let types = match load_types(&config) {
        Ok(types) => types,
        Err(code) => return code,
    };
    let mut doc = match read_map(input, types.as_ref()) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    if clean_tags {
        for warning in doc.clean_tags() {
            eprintln!("Warning: {}", warning.message);
        }
    }

    if let Err(e) = doc.write_path(output, config.write_options()) {
        eprintln!("Error: Failed to write '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    let stats = doc.stats();
    tracing::info!(
        tiles = stats.tiles,
        duplicates = stats.duplicates,
        levels = stats.levels.len(),
        "Rewrote map"
    );
    println!("Saved: {}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}
