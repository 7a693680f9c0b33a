//! Icon sheets stored as PNG files with a TOML manifest alongside.
//!
//! A sheet `icons/obj/lamp.dmi` is read from `<base>/icons/obj/lamp.dmi` (PNG
//! data) and described by `<base>/icons/obj/lamp.dmi.toml`:
//!
//! ```toml
//! width = 32
//! height = 32
//!
//! [[states]]
//! name = "on"
//! dirs = 4
//! frames = 2
//! ```
//!
//! Frames are packed left to right, top to bottom: states in manifest order,
//! each state's frames in order, each frame's directions in
//! [`Direction::SHEET_ORDER`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Deserialize;
use tracing::debug;

use super::{Direction, IconError, IconProvider, SheetMode};

/// Sheet description read from `<sheet>.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetManifest {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    #[serde(default)]
    pub states: Vec<StateManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateManifest {
    pub name: String,
    #[serde(default = "default_count")]
    pub dirs: usize,
    #[serde(default = "default_count")]
    pub frames: usize,
}

fn default_count() -> usize {
    1
}

#[derive(Debug)]
struct State {
    dirs: usize,
    frames: usize,
    /// Index of the state's first frame in the packed sheet
    first: usize,
}

#[derive(Debug)]
struct Sheet {
    image: RgbaImage,
    mode: SheetMode,
    width: u32,
    height: u32,
    columns: u32,
    states: HashMap<String, State>,
}

impl Sheet {
    fn load(base: &Path, sheet: &str) -> Result<Self, IconError> {
        let image_path = base.join(sheet);
        let manifest_path = manifest_path(&image_path);

        let text = fs::read_to_string(&manifest_path)
            .map_err(|source| IconError::Io { path: manifest_path.clone(), source })?;
        let manifest: SheetManifest = toml::from_str(&text)
            .map_err(|source| IconError::Manifest { path: manifest_path.clone(), source })?;

        // Sheets keep their .dmi names, so sniff the format from content
        let decoded = image::io::Reader::open(&image_path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| IconError::Io { path: image_path.clone(), source })?
            .decode()
            .map_err(|source| IconError::Image { path: image_path.clone(), source })?;
        let mode = SheetMode::from(decoded.color());
        Self::from_parts(sheet, decoded.to_rgba8(), mode, &manifest)
    }

    fn from_parts(
        sheet: &str,
        image: RgbaImage,
        mode: SheetMode,
        manifest: &SheetManifest,
    ) -> Result<Self, IconError> {
        let layout = |message: String| IconError::Layout { sheet: sheet.to_string(), message };

        if manifest.width == 0 || manifest.height == 0 {
            return Err(layout("frame size must be non-zero".to_string()));
        }
        let columns = image.width() / manifest.width;
        let rows = image.height() / manifest.height;

        let mut states = HashMap::new();
        let mut next = 0usize;
        for state in &manifest.states {
            if !matches!(state.dirs, 1 | 4 | 8) {
                return Err(layout(format!("state '{}' has {} dirs; expected 1, 4 or 8", state.name, state.dirs)));
            }
            if state.frames == 0 {
                return Err(layout(format!("state '{}' has no frames", state.name)));
            }
            // First definition of a state name wins
            states
                .entry(state.name.clone())
                .or_insert(State { dirs: state.dirs, frames: state.frames, first: next });
            next += state.dirs * state.frames;
        }

        let capacity = columns as usize * rows as usize;
        if next > capacity {
            return Err(layout(format!(
                "manifest describes {} frames but the {}x{} image holds {}",
                next,
                image.width(),
                image.height(),
                capacity
            )));
        }

        Ok(Self { image, mode, width: manifest.width, height: manifest.height, columns, states })
    }

    fn frame(&self, state: &str, dir: Direction, frame: usize) -> Option<RgbaImage> {
        let state = self.states.get(state)?;
        if frame >= state.frames {
            return None;
        }
        let dir_index = if state.dirs == 1 { 0 } else { dir.sheet_index() };
        if dir_index >= state.dirs {
            return None;
        }

        let index = (state.first + frame * state.dirs + dir_index) as u32;
        let x = (index % self.columns) * self.width;
        let y = (index / self.columns) * self.height;
        Some(image::imageops::crop_imm(&self.image, x, y, self.width, self.height).to_image())
    }
}

fn manifest_path(image_path: &Path) -> PathBuf {
    let mut name = image_path.as_os_str().to_os_string();
    name.push(".toml");
    PathBuf::from(name)
}

/// Icon sheets under a base directory, loaded on first use and cached.
#[derive(Debug)]
pub struct SheetDirectory {
    base: PathBuf,
    sheets: HashMap<String, Sheet>,
}

impl SheetDirectory {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into(), sheets: HashMap::new() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Number of sheets loaded so far.
    pub fn loaded(&self) -> usize {
        self.sheets.len()
    }

    fn sheet(&mut self, sheet: &str) -> Result<&Sheet, IconError> {
        if !self.sheets.contains_key(sheet) {
            let loaded = Sheet::load(&self.base, sheet)?;
            debug!(sheet, states = loaded.states.len(), "Loaded icon sheet");
            self.sheets.insert(sheet.to_string(), loaded);
        }
        self.sheets.get(sheet).ok_or_else(|| IconError::UnknownSheet(sheet.to_string()))
    }
}

impl IconProvider for SheetDirectory {
    fn frame(
        &mut self,
        sheet: &str,
        state: &str,
        dir: Direction,
        frame: usize,
    ) -> Result<Option<RgbaImage>, IconError> {
        Ok(self.sheet(sheet)?.frame(state, dir, frame))
    }

    fn sheet_mode(&mut self, sheet: &str) -> Result<SheetMode, IconError> {
        Ok(self.sheet(sheet)?.mode)
    }
}
