//! Image export
//!
//! Encodes a rendered canvas to PNG, BMP or JPEG, either in memory, to a
//! chosen path, or to a kept temporary file.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, info};

use crate::rasterizer::Canvas;

/// Error type for image export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    EncodeError(#[from] image::ImageError),

    #[error("Could not keep temporary file: {0}")]
    PersistError(#[from] tempfile::PersistError),

    #[error("Canvas buffer does not match its {width}x{height} size")]
    BufferMismatch { width: u32, height: u32 },
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Bmp,
    /// No alpha channel; transparent squares come out black
    Jpeg,
}

impl ExportFormat {
    /// Pick a format from a file extension, if it is one we write
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "bmp" => Some(ExportFormat::Bmp),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }

    /// Format for a path, falling back to PNG for unknown or missing extensions
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Bmp => ImageFormat::Bmp,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
        }
    }

    pub fn supports_alpha(self) -> bool {
        !matches!(self, ExportFormat::Jpeg)
    }
}

/// Copy a canvas into an `image` buffer
pub fn to_rgba_image(canvas: &Canvas) -> Result<RgbaImage, ExportError> {
    into_rgba_image(canvas.clone())
}

/// Move a canvas into an `image` buffer without copying pixels
pub fn into_rgba_image(canvas: Canvas) -> Result<RgbaImage, ExportError> {
    let (width, height) = (canvas.width(), canvas.height());
    RgbaImage::from_raw(width, height, canvas.into_pixels())
        .ok_or(ExportError::BufferMismatch { width, height })
}

fn prepare(canvas: &Canvas, format: ExportFormat) -> Result<DynamicImage, ExportError> {
    let image = DynamicImage::ImageRgba8(to_rgba_image(canvas)?);
    if format.supports_alpha() {
        Ok(image)
    } else {
        Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
    }
}

/// Encode a canvas into an in-memory file
pub fn encode(canvas: &Canvas, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let image = prepare(canvas, format)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format.image_format())?;
    Ok(bytes)
}

/// Write a canvas to `path`, format chosen by extension. Parent directories are created.
pub fn write_image<P: AsRef<Path>>(canvas: &Canvas, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let format = ExportFormat::from_path(path);
    let image = prepare(canvas, format)?;
    image.save_with_format(path, format.image_format())?;

    info!(
        "Wrote {}x{} {:?} to {}",
        canvas.width(),
        canvas.height(),
        format,
        path.display()
    );
    Ok(())
}

/// Write a canvas as PNG into a new temporary file that outlives this process
pub fn write_temp_png(canvas: &Canvas) -> Result<PathBuf, ExportError> {
    let path = write_temp_file_in(&std::env::temp_dir(), || encode(canvas, ExportFormat::Png))?;
    info!("Wrote {}x{} PNG to {}", canvas.width(), canvas.height(), path.display());
    Ok(path)
}

/// Create a temporary file in `dir`, fill it with `contents`, and only then keep it.
/// On any failure the file is removed when the handle drops.
fn write_temp_file_in<F>(dir: &Path, contents: F) -> Result<PathBuf, ExportError>
where
    F: FnOnce() -> Result<Vec<u8>, ExportError>,
{
    let mut temp = tempfile::Builder::new()
        .prefix("checkerboard-")
        .suffix(".png")
        .tempfile_in(dir)?;
    debug!("Reserved temporary file {}", temp.path().display());

    let bytes = contents()?;
    temp.write_all(&bytes)?;
    temp.flush()?;

    let (_file, path) = temp.keep()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{render, Color, Paint};

    fn sample() -> Canvas {
        render(6, 4, 2, Paint::Transparent, Paint::Solid(Color::RED)).unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path("a/b/board.PNG"), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path("board.jpeg"), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path("board.bmp"), ExportFormat::Bmp);
        assert_eq!(ExportFormat::from_path("board"), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path("board.tiff"), ExportFormat::Png);
    }

    #[test]
    fn test_png_keeps_alpha() {
        let canvas = sample();
        let bytes = encode(&canvas, ExportFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(decoded.dimensions(), (6, 4));
        assert_eq!(decoded.as_raw().as_slice(), canvas.pixels());
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(decoded.get_pixel(2, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let bytes = encode(&sample(), ExportFormat::Jpeg).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_write_image_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/board.png");
        write_image(&sample(), &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (6, 4));
    }

    #[test]
    fn test_write_temp_png() {
        let path = write_temp_png(&sample()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("checkerboard-"));
        assert!(name.ends_with(".png"));

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(3, 3).0, [0, 0, 0, 0]);
        assert_eq!(decoded.get_pixel(5, 3).0, [255, 0, 0, 255]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failed_temp_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_temp_file_in(dir.path(), || {
            Err(ExportError::BufferMismatch { width: 1, height: 1 })
        });

        assert!(matches!(result, Err(ExportError::BufferMismatch { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_temp_file_kept_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = sample();
        let path = write_temp_file_in(dir.path(), || encode(&canvas, ExportFormat::Png)).unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(fs::read(&path).unwrap(), encode(&canvas, ExportFormat::Png).unwrap());
    }
}
