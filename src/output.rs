//! PNG output and per-level file naming

use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the level number in output templates.
pub const LEVEL_PLACEHOLDER: &str = "{z}";

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Save an RGBA image as PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Output path for `level`: every `{z}` in `template` becomes the level number.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dmmtool::output::level_output_path;
///
/// assert_eq!(level_output_path("out/station-{z}.png", 2), PathBuf::from("out/station-2.png"));
/// ```
pub fn level_output_path(template: &str, level: i32) -> PathBuf {
    PathBuf::from(template.replace(LEVEL_PLACEHOLDER, &level.to_string()))
}

/// Template used when none is given: `<input stem>-{z}.png` beside the input.
pub fn default_template(input: &Path) -> String {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("map");
    let name = format!("{}-{}.png", stem, LEVEL_PLACEHOLDER);
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name).to_string_lossy().into_owned(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_level_output_path_substitutes_every_placeholder() {
        assert_eq!(level_output_path("z{z}/map-{z}.png", 3), PathBuf::from("z3/map-3.png"));
    }

    #[test]
    fn test_level_output_path_negative_level() {
        assert_eq!(level_output_path("map-{z}.png", -1), PathBuf::from("map--1.png"));
    }

    #[test]
    fn test_level_output_path_without_placeholder() {
        assert_eq!(level_output_path("map.png", 7), PathBuf::from("map.png"));
    }

    #[test]
    fn test_default_template() {
        assert_eq!(default_template(Path::new("maps/station.dmm")), "maps/station-{z}.png");
        assert_eq!(default_template(Path::new("station.dmm")), "station-{z}.png");
    }

    #[test]
    fn test_save_png_basic() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");

        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        image.put_pixel(1, 1, Rgba([0, 0, 0, 0]));

        let result = save_png(&image, &path);
        assert!(result.is_ok());
        assert!(path.exists());

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*loaded.get_pixel(1, 1), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dirs/test.png");

        let image = RgbaImage::new(1, 1);
        assert!(save_png(&image, &path).is_ok());
        assert!(path.exists());
    }
}
