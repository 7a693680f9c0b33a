//! Icon sheets: where the compositor gets sprite frames from.
//!
//! Atoms name an icon sheet (`icon = 'icons/turf/floors.dmi'`), a state
//! within it (`icon_state`) and a facing (`dir`). An [`IconProvider`] turns
//! that triple into an RGBA frame.

mod sheet;

pub use sheet::{SheetDirectory, SheetManifest, StateManifest};

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use image::{ColorType, RgbaImage};
use thiserror::Error;

/// Facing of an atom, using the numeric codes stored in `dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    North = 1,
    #[default]
    South = 2,
    East = 4,
    West = 8,
    NorthEast = 5,
    SouthEast = 6,
    NorthWest = 9,
    SouthWest = 10,
}

impl Direction {
    /// Order in which directions are stored within a sheet state.
    pub const SHEET_ORDER: [Direction; 8] = [
        Direction::South,
        Direction::North,
        Direction::East,
        Direction::West,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthEast,
        Direction::NorthWest,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Direction::North),
            2 => Some(Direction::South),
            4 => Some(Direction::East),
            8 => Some(Direction::West),
            5 => Some(Direction::NorthEast),
            6 => Some(Direction::SouthEast),
            9 => Some(Direction::NorthWest),
            10 => Some(Direction::SouthWest),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Position of this direction within a state's frame group.
    pub fn sheet_index(self) -> usize {
        match self {
            Direction::South => 0,
            Direction::North => 1,
            Direction::East => 2,
            Direction::West => 3,
            Direction::SouthEast => 4,
            Direction::SouthWest => 5,
            Direction::NorthEast => 6,
            Direction::NorthWest => 7,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::NorthEast => "northeast",
            Direction::SouthEast => "southeast",
            Direction::NorthWest => "northwest",
            Direction::SouthWest => "southwest",
        };
        f.write_str(name)
    }
}

/// Pixel format a sheet was stored in before conversion to RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetMode {
    Rgba,
    Rgb,
    Gray,
    GrayAlpha,
    Other,
}

impl SheetMode {
    pub fn is_rgba(self) -> bool {
        self == SheetMode::Rgba
    }
}

impl From<ColorType> for SheetMode {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => SheetMode::Rgba,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => SheetMode::Rgb,
            ColorType::L8 | ColorType::L16 => SheetMode::Gray,
            ColorType::La8 | ColorType::La16 => SheetMode::GrayAlpha,
            _ => SheetMode::Other,
        }
    }
}

impl fmt::Display for SheetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SheetMode::Rgba => "RGBA",
            SheetMode::Rgb => "RGB",
            SheetMode::Gray => "L",
            SheetMode::GrayAlpha => "LA",
            SheetMode::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error loading an icon sheet.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IconError {
    #[error("unknown icon sheet '{0}'")]
    UnknownSheet(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to parse manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Manifest and image disagree, or the manifest is inconsistent
    #[error("icon sheet '{sheet}': {message}")]
    Layout { sheet: String, message: String },
}

/// Supplies sprite frames for sheet/state/direction lookups.
///
/// Providers may load sheets lazily and cache them, hence `&mut self`.
pub trait IconProvider {
    /// Frame `frame` of `state` facing `dir`.
    ///
    /// `Ok(None)` means the sheet exists but has no such frame; `Err` means
    /// the sheet itself could not be loaded.
    fn frame(
        &mut self,
        sheet: &str,
        state: &str,
        dir: Direction,
        frame: usize,
    ) -> Result<Option<RgbaImage>, IconError>;

    /// Pixel format the sheet was stored in.
    fn sheet_mode(&mut self, sheet: &str) -> Result<SheetMode, IconError>;
}

/// In-memory provider, for tests and for callers that build sprites in code.
///
/// A lookup that misses the requested direction falls back to the south
/// frame of the same state, the way single-direction states behave.
#[derive(Debug, Clone, Default)]
pub struct StaticIcons {
    frames: HashMap<(String, String, Direction), RgbaImage>,
}

impl StaticIcons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame.
    pub fn insert(&mut self, sheet: &str, state: &str, dir: Direction, image: RgbaImage) {
        self.frames.insert((sheet.to_string(), state.to_string(), dir), image);
    }

    /// Builder-style [`StaticIcons::insert`] for the south frame.
    pub fn with(mut self, sheet: &str, state: &str, image: RgbaImage) -> Self {
        self.insert(sheet, state, Direction::South, image);
        self
    }

    fn has_sheet(&self, sheet: &str) -> bool {
        self.frames.keys().any(|(s, _, _)| s == sheet)
    }
}

impl IconProvider for StaticIcons {
    fn frame(
        &mut self,
        sheet: &str,
        state: &str,
        dir: Direction,
        frame: usize,
    ) -> Result<Option<RgbaImage>, IconError> {
        if !self.has_sheet(sheet) {
            return Err(IconError::UnknownSheet(sheet.to_string()));
        }
        if frame != 0 {
            return Ok(None);
        }
        let key = |d: Direction| (sheet.to_string(), state.to_string(), d);
        Ok(self
            .frames
            .get(&key(dir))
            .or_else(|| self.frames.get(&key(Direction::South)))
            .cloned())
    }

    fn sheet_mode(&mut self, sheet: &str) -> Result<SheetMode, IconError> {
        if self.has_sheet(sheet) {
            Ok(SheetMode::Rgba)
        } else {
            Err(IconError::UnknownSheet(sheet.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_direction_codes_round_trip() {
        for dir in Direction::SHEET_ORDER {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
        assert_eq!(Direction::from_code(3), None);
        assert_eq!(Direction::from_code(0), None);
    }

    #[test]
    fn test_sheet_index_matches_order() {
        for (i, dir) in Direction::SHEET_ORDER.iter().enumerate() {
            assert_eq!(dir.sheet_index(), i);
        }
    }

    #[test]
    fn test_default_direction_is_south() {
        assert_eq!(Direction::default(), Direction::South);
        assert_eq!(Direction::default().code(), 2);
    }

    #[test]
    fn test_sheet_mode_from_color_type() {
        assert_eq!(SheetMode::from(ColorType::Rgba8), SheetMode::Rgba);
        assert_eq!(SheetMode::from(ColorType::Rgb8), SheetMode::Rgb);
        assert!(!SheetMode::from(ColorType::L8).is_rgba());
    }

    #[test]
    fn test_static_icons_direction_fallback() {
        let red = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
        let mut icons = StaticIcons::new().with("a.dmi", "s", red.clone());
        icons.insert("a.dmi", "s", Direction::East, blue.clone());

        assert_eq!(icons.frame("a.dmi", "s", Direction::East, 0).unwrap(), Some(blue));
        assert_eq!(icons.frame("a.dmi", "s", Direction::West, 0).unwrap(), Some(red));
        assert_eq!(icons.frame("a.dmi", "other", Direction::South, 0).unwrap(), None);
        assert_eq!(icons.frame("a.dmi", "s", Direction::South, 1).unwrap(), None);
    }

    #[test]
    fn test_static_icons_unknown_sheet() {
        let mut icons = StaticIcons::new();
        assert!(matches!(
            icons.frame("missing.dmi", "", Direction::South, 0),
            Err(IconError::UnknownSheet(_))
        ));
        assert!(icons.sheet_mode("missing.dmi").is_err());
    }
}
