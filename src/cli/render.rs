//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::compositor::render_map;
use crate::config::CliOverrides;
use crate::icons::SheetDirectory;
use crate::output::{default_template, level_output_path, save_png, LEVEL_PLACEHOLDER};

use super::{load_settings, load_types, read_map, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(input: &Path, overrides: &CliOverrides, no_config: bool, strict: bool) -> ExitCode {
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

    let template = config.render.output.clone().unwrap_or_else(|| default_template(input));
    if !template.contains(LEVEL_PLACEHOLDER) && doc.levels().count() > 1 {
        eprintln!(
            "Error: Output '{}' has no {} placeholder but the map has {} levels",
            template,
            LEVEL_PLACEHOLDER,
            doc.levels().count()
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let icon_base = config
        .paths
        .icons
        .clone()
        .unwrap_or_else(|| input.parent().unwrap_or(Path::new(".")).to_path_buf());
    let mut icons = SheetDirectory::new(icon_base);

    let (levels, warnings) = render_map(&doc, &mut icons, &config.render_options());
    for warning in &warnings {
        eprintln!("Warning: {}", warning.message);
    }
    if strict && !warnings.is_empty() {
        eprintln!("Error: {} warning(s) in strict mode", warnings.len());
        return ExitCode::from(EXIT_ERROR);
    }

    for level in levels {
        let Some(image) = level.image else {
            eprintln!("Warning: Level {} has nothing to draw; no image written", level.level);
            continue;
        };
        let output_path = level_output_path(&template, level.level);
        if let Err(e) = save_png(&image, &output_path) {
            eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        tracing::info!(level = level.level, width = image.width(), height = image.height(), "Rendered level");
        println!("Saved: {}", output_path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}
