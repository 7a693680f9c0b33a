//! Rendering maps to raster images.
//!
//! Rendering happens in two passes:
//!
//! 1. [`render_tiles`] composites every registered tile once, stacking its
//!    atoms' sprites into a [`TileAtlas`].
//! 2. [`render_layer`] pastes atlas images onto a grid-sized canvas and
//!    autocrops the result.
//!
//! Problems with individual atoms (missing icon, unloadable sheet, missing
//! frame) never abort a render. The atom is skipped and a [`Warning`] is
//! recorded.

mod blit;
mod trim;

pub use trim::autocrop;

use std::collections::HashSet;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::icons::{Direction, IconError, IconProvider};
use crate::layer::Layer;
use crate::map::MapDocument;
use crate::models::{Atom, Tile, Value, Warning};
use crate::registry::TileRegistry;

use blit::blit_over;

/// Default edge length of one map cell, in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// Layer canvases start out opaque black.
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Options controlling what is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw `/turf/space` instead of leaving it black
    pub render_stars: bool,
    /// Draw area atoms
    pub render_areas: bool,
    /// Only draw tiles whose area atoms are exactly this path
    pub area_filter: Option<String>,
    pub tile_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { render_stars: false, render_areas: false, area_filter: None, tile_size: DEFAULT_TILE_SIZE }
    }
}

/// Composited image for one tile.
///
/// The canvas is three cells on a side, with the tile's own cell in the
/// middle so sprites shifted by pixel offsets are not clipped.
#[derive(Debug, Clone)]
pub struct TileImage {
    pub image: RgbaImage,
    /// False when the tile's area failed the area filter
    pub selected: bool,
}

/// Tile images indexed by canonical tile ID.
#[derive(Debug, Clone, Default)]
pub struct TileAtlas {
    tiles: Vec<TileImage>,
    tile_size: u32,
}

impl TileAtlas {
    pub fn get(&self, id: usize) -> Option<&TileImage> {
        self.tiles.get(id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

/// Rendered image for one level. `image` is `None` when nothing visible
/// remained after autocrop.
#[derive(Debug, Clone)]
pub struct RenderedLevel {
    pub level: i32,
    pub image: Option<RgbaImage>,
}

/// Render every level of `doc`.
#[tracing::instrument(skip_all, fields(tiles = doc.registry().tiles().len()))]
pub fn render_map(
    doc: &MapDocument,
    icons: &mut dyn IconProvider,
    options: &RenderOptions,
) -> (Vec<RenderedLevel>, Vec<Warning>) {
    let (atlas, warnings) = render_tiles(doc.registry(), icons, options);
    (render_levels(doc, &atlas), warnings)
}

/// Composite every registered tile.
pub fn render_tiles(
    registry: &TileRegistry,
    icons: &mut dyn IconProvider,
    options: &RenderOptions,
) -> (TileAtlas, Vec<Warning>) {
    let mut ctx = TileContext { icons, options, warnings: Vec::new(), mode_checked: HashSet::new(), failed_sheets: HashSet::new() };
    let tiles = registry.iter().map(|tile| ctx.render(tile)).collect();
    info!(tiles = registry.tiles().len(), warnings = ctx.warnings.len(), "Generated tile atlas");
    (TileAtlas { tiles, tile_size: options.tile_size }, ctx.warnings)
}

/// Composite one layer and autocrop it.
///
/// The canvas has a one-cell margin around the grid; each selected tile's
/// image is pasted so its middle cell lands on the tile's grid position.
pub fn render_layer(layer: &Layer, atlas: &TileAtlas) -> Option<RgbaImage> {
    let size = atlas.tile_size;
    let (width, height) = layer.dimensions();
    let mut canvas = RgbaImage::from_pixel((width as u32 + 2) * size, (height as u32 + 2) * size, BACKGROUND);

    for (y, row) in layer.rows().enumerate() {
        for (x, &id) in row.iter().enumerate() {
            let Some(tile) = atlas.get(id) else {
                continue;
            };
            if !tile.selected {
                continue;
            }
            blit_over(&mut canvas, &tile.image, x as i64 * size as i64, y as i64 * size as i64);
        }
    }

    autocrop(&canvas)
}

/// Render every level, in parallel, in ascending level order.
pub fn render_levels(doc: &MapDocument, atlas: &TileAtlas) -> Vec<RenderedLevel> {
    let levels: Vec<(i32, &Layer)> = doc.levels().collect();
    levels
        .par_iter()
        .map(|&(level, layer)| RenderedLevel { level, image: render_layer(layer, atlas) })
        .collect()
}

struct TileContext<'a> {
    icons: &'a mut dyn IconProvider,
    options: &'a RenderOptions,
    warnings: Vec<Warning>,
    /// Sheets whose pixel format has already been checked
    mode_checked: HashSet<String>,
    /// Sheets that failed to load; warned about once
    failed_sheets: HashSet<String>,
}

impl TileContext<'_> {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(Warning::new(message));
    }

    fn sheet_failed(&mut self, sheet: &str, tile: &Tile, error: IconError) {
        if self.failed_sheets.insert(sheet.to_string()) {
            self.warn(format!("Cannot load {} for tile '{}': {}", sheet, tile.legacy_id, error));
        }
    }

    fn render(&mut self, tile: &Tile) -> TileImage {
        let size = self.options.tile_size;
        let mut image = RgbaImage::new(size * 3, size * 3);

        if let Some(filter) = &self.options.area_filter {
            let outside = tile.visible_atoms().any(|atom| atom.is_area() && atom.path != *filter);
            if outside {
                return TileImage { image, selected: false };
            }
        }

        // Bottom to top; stable, so equal layers keep definition order
        let mut order: Vec<(usize, &Atom)> = tile.atoms.iter().enumerate().filter(|(_, a)| !a.is_empty()).collect();
        order.sort_by(|a, b| a.1.layer().total_cmp(&b.1.layer()));

        for (index, atom) in order {
            if atom.is_area() && !self.options.render_areas {
                continue;
            }
            if atom.is_space() && !self.options.render_stars {
                continue;
            }
            if let Some((frame, x, y)) = self.sprite(tile, index, atom) {
                blit_over(&mut image, &frame, x, y);
            }
        }

        TileImage { image, selected: true }
    }

    /// Frame for `atom` and where it goes on the tile canvas.
    fn sprite(&mut self, tile: &Tile, index: usize, atom: &Atom) -> Option<(RgbaImage, i64, i64)> {
        let Some(icon) = atom.get("icon") else {
            self.warn(format!("No icon on atom #{} ({}) in tile '{}'", index, atom, tile.legacy_id));
            return None;
        };
        let sheet = icon.text();
        let state = atom.get("icon_state").map(Value::text).unwrap_or("");
        let dir = self.direction(tile, atom);
        if self.failed_sheets.contains(sheet) {
            return None;
        }

        if !self.mode_checked.contains(sheet) {
            self.mode_checked.insert(sheet.to_string());
            match self.icons.sheet_mode(sheet) {
                Ok(mode) if !mode.is_rgba() => self.warn(format!("{} is mode {}", sheet, mode)),
                Ok(_) => {}
                Err(e) => {
                    self.sheet_failed(sheet, tile, e);
                    return None;
                }
            }
        }

        let frame = match self.frame_with_fallback(sheet, state, dir) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.warn(format!(
                    "No frame for state '{}' facing {} in {} (tile '{}')",
                    state, dir, sheet, tile.legacy_id
                ));
                return None;
            }
            Err(e) => {
                self.sheet_failed(sheet, tile, e);
                return None;
            }
        };

        let size = self.options.tile_size as i64;
        let pixel_x = atom.int_property("pixel_x").unwrap_or(0);
        let pixel_y = atom.int_property("pixel_y").unwrap_or(0);
        // Sprites sit on the bottom edge of their cell; positive pixel_y is up
        let x = size + pixel_x;
        let y = size + (size - frame.height() as i64) - pixel_y;
        Some((frame, x, y))
    }

    fn frame_with_fallback(
        &mut self,
        sheet: &str,
        state: &str,
        dir: Direction,
    ) -> Result<Option<RgbaImage>, IconError> {
        if let Some(frame) = self.icons.frame(sheet, state, dir, 0)? {
            return Ok(Some(frame));
        }
        self.icons.frame(sheet, "", dir, 0)
    }

    fn direction(&mut self, tile: &Tile, atom: &Atom) -> Direction {
        let Some(value) = atom.get("dir") else {
            return Direction::default();
        };
        match value.as_int().and_then(Direction::from_code) {
            Some(dir) => dir,
            None => {
                self.warn(format!(
                    "Unrecognized direction {} on atom {} in tile '{}'",
                    value, atom, tile.legacy_id
                ));
                Direction::default()
            }
        }
    }
}
