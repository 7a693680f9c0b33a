//! Configuration loading and discovery for `dmmtool.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::DmmConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE: &str = "dmmtool.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse dmmtool.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub types: Option<PathBuf>,
    pub icons: Option<PathBuf>,
    pub tile_size: Option<u32>,
    pub stars: Option<bool>,
    pub areas: Option<bool>,
    pub area: Option<String>,
    pub output: Option<String>,
    pub legacy_ids: Option<bool>,
}

/// Find dmmtool.toml for a map file.
///
/// Search order:
/// 1. Walk up from `start` looking for dmmtool.toml
/// 2. Check XDG_CONFIG_HOME/dmmtool/dmmtool.toml (or ~/.config/dmmtool/dmmtool.toml)
pub fn find_config(start: &Path) -> Option<PathBuf> {
    find_config_from(start.to_path_buf()).or_else(find_xdg_config)
}

/// Find dmmtool.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("dmmtool").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find dmmtool.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// With a path, loads that file. Otherwise discovers one starting from
/// `search_from`; if none is found the default configuration is returned.
pub fn load_config(path: Option<&Path>, search_from: &Path) -> Result<DmmConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(search_from),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(DmmConfig::default()),
    }
}

/// Load configuration from a specific file, resolving relative paths
/// against the file's directory.
pub fn load_config_file(path: &Path) -> Result<DmmConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: DmmConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = project_root(path) {
        config.paths.types = config.paths.types.map(|p| resolve_path(root, &p));
        config.paths.icons = config.paths.icons.map(|p| resolve_path(root, &p));
    }
    tracing::debug!(path = %path.display(), "Loaded configuration");

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut DmmConfig, overrides: &CliOverrides) {
    if let Some(ref types) = overrides.types {
        config.paths.types = Some(types.clone());
    }
    if let Some(ref icons) = overrides.icons {
        config.paths.icons = Some(icons.clone());
    }
    if let Some(tile_size) = overrides.tile_size {
        config.render.tile_size = tile_size;
    }
    if let Some(stars) = overrides.stars {
        config.render.stars = stars;
    }
    if let Some(areas) = overrides.areas {
        config.render.areas = areas;
    }
    if let Some(ref area) = overrides.area {
        config.render.area = Some(area.clone());
    }
    if let Some(ref output) = overrides.output {
        config.render.output = Some(output.clone());
    }
    if let Some(legacy_ids) = overrides.legacy_ids {
        config.write.legacy_ids = legacy_ids;
    }
}

/// Directory containing the config file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
