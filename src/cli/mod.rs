//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod render;
mod rewrite;

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, DmmConfig};
use crate::logging::init_logging;
use crate::map::{MapDocument, MapError};
use crate::resolver::{BareResolver, TypeResolver, TypeTable};

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// dmmtool - Read, rewrite and render tile maps
#[derive(Parser)]
#[command(name = "dmmtool")]
#[command(about = "dmmtool - Read, deduplicate, rewrite and render .dmm tile maps")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Ignore dmmtool.toml files
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render each level of a map to a PNG image
    Render {
        /// Map file to render
        input: PathBuf,

        /// Output file template; {z} is replaced by the level number.
        /// Default: {input stem}-{z}.png beside the input
        #[arg(short, long)]
        output: Option<String>,

        /// Type template table (TOML)
        #[arg(long)]
        types: Option<PathBuf>,

        /// Base directory for icon sheets (default: the map's directory)
        #[arg(long)]
        icons: Option<PathBuf>,

        /// Draw space turfs
        #[arg(long)]
        stars: bool,

        /// Draw area atoms
        #[arg(long)]
        areas: bool,

        /// Only draw tiles in exactly this area
        #[arg(long)]
        area: Option<String>,

        /// Cell size in pixels (default: 32)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1024))]
        tile_size: Option<u32>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Read a map, merge duplicate tiles and write it back out
    Rewrite {
        /// Map file to read
        input: PathBuf,

        /// Where to write the rewritten map
        #[arg(short, long)]
        output: PathBuf,

        /// Keep the input's tile IDs instead of renumbering
        #[arg(long)]
        legacy_ids: bool,

        /// Remove `tag` properties from every atom
        #[arg(long)]
        clean_tags: bool,

        /// Type template table (TOML)
        #[arg(long)]
        types: Option<PathBuf>,
    },
    /// Print tile and level statistics for a map
    Info {
        /// Map file to inspect
        input: PathBuf,

        /// Type template table (TOML)
        #[arg(long)]
        types: Option<PathBuf>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI and return the process exit code
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render { input, output, types, icons, stars, areas, area, tile_size, strict } => {
            let overrides = CliOverrides {
                types,
                icons,
                tile_size,
                stars: stars.then_some(true),
                areas: areas.then_some(true),
                area,
                output,
                legacy_ids: None,
            };
            render::run_render(&input, &overrides, cli.no_config, strict)
        }
        Commands::Rewrite { input, output, legacy_ids, clean_tags, types } => {
            let overrides =
                CliOverrides { types, legacy_ids: legacy_ids.then_some(true), ..Default::default() };
            rewrite::run_rewrite(&input, &output, &overrides, cli.no_config, clean_tags)
        }
        Commands::Info { input, types, json } => {
            let overrides = CliOverrides { types, ..Default::default() };
            info::run_info(&input, &overrides, cli.no_config, json)
        }
    }
}

/// Load `dmmtool.toml` for `input` (unless disabled) and apply CLI overrides.
pub(crate) fn load_settings(
    input: &Path,
    overrides: &CliOverrides,
    no_config: bool,
) -> Result<DmmConfig, ExitCode> {
    let mut config = if no_config {
        DmmConfig::default()
    } else {
        // Canonicalize so parent-dir walking works from the file's real location
        let input_abs = std::fs::canonicalize(input).unwrap_or_else(|_| input.to_path_buf());
        let start_dir = input_abs.parent().unwrap_or(Path::new(".")).to_path_buf();
        load_config(None, &start_dir).map_err(|e| {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        })?
    };

    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        for error in errors {
            eprintln!("Error: {}", error);
        }
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    Ok(config)
}

/// Type templates from the configured table, or bare types when none is set.
pub(crate) fn load_types(config: &DmmConfig) -> Result<Box<dyn TypeResolver>, ExitCode> {
    match &config.paths.types {
        Some(path) => match TypeTable::load(path) {
            Ok(table) => {
                tracing::info!(path = %path.display(), types = table.len(), "Loaded type table");
                Ok(Box::new(table))
            }
            Err(e) => {
                eprintln!("Error: Cannot load type table '{}': {}", path.display(), e);
                Err(ExitCode::from(EXIT_INVALID_ARGS))
            }
        },
        None => Ok(Box::new(BareResolver)),
    }
}

/// Read the input map, reporting failures the way every command does.
pub(crate) fn read_map(input: &Path, resolver: &dyn TypeResolver) -> Result<MapDocument, ExitCode> {
    MapDocument::read_path(input, resolver).map_err(|e| match e {
        MapError::Io(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        e => {
            eprintln!("Error: {}: {}", input.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    })
}
