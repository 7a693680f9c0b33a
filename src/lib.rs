//! dmmtool - Library for reading, rewriting and rendering `.dmm` tile maps
//!
//! This library provides functionality to:
//! - Parse tile definitions and level grids from map text
//! - Deduplicate identical tiles and renumber their IDs compactly
//! - Write maps back out with canonical or preserved IDs
//! - Composite each level into an image from per-type icon sheets

pub mod builder;
pub mod cli;
pub mod compositor;
pub mod config;
pub mod icons;
pub mod id_codec;
pub mod layer;
pub mod lexer;
pub mod logging;
pub mod map;
pub mod models;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod splitter;
