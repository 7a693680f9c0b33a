//! Configuration schema types for `dmmtool.toml`
//!
//! Defines the structure and validation rules for project configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::compositor::{RenderOptions, DEFAULT_TILE_SIZE};
use crate::map::WriteOptions;
use crate::models::AREA_ROOT;

/// Where type and icon data live
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Type template table (TOML)
    pub types: Option<PathBuf>,
    /// Base directory that icon sheet references are relative to
    pub icons: Option<PathBuf>,
}

/// Rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Cell edge length in pixels
    pub tile_size: u32,
    /// Draw space turfs
    pub stars: bool,
    /// Draw area atoms
    pub areas: bool,
    /// Only render tiles in exactly this area
    pub area: Option<String>,
    /// Output file template; `{z}` is replaced by the level number
    pub output: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { tile_size: DEFAULT_TILE_SIZE, stars: false, areas: false, area: None, output: None }
    }
}

/// Map writing settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriteConfig {
    /// Keep the source file's tile IDs
    pub legacy_ids: bool,
}

/// Root configuration from `dmmtool.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DmmConfig {
    pub paths: PathsConfig,
    pub render: RenderConfig,
    pub write: WriteConfig,
}

/// Validation error for config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.tile_size")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dmmtool.toml: '{}' {}", self.field, self.message)
    }
}

impl DmmConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.render.tile_size == 0 {
            errors.push(ConfigValidationError {
                field: "render.tile_size".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if let Some(area) = &self.render.area {
            if !crate::models::is_same_or_subtype(area, AREA_ROOT) {
                errors.push(ConfigValidationError {
                    field: "render.area".to_string(),
                    message: format!("must be {} or one of its subtypes", AREA_ROOT),
                });
            }
        }

        if matches!(&self.render.output, Some(output) if output.trim().is_empty()) {
            errors.push(ConfigValidationError {
                field: "render.output".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            render_stars: self.render.stars,
            render_areas: self.render.areas,
            area_filter: self.render.area.clone(),
            tile_size: self.render.tile_size,
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions { use_legacy_ids: self.write.legacy_ids }
    }
}
