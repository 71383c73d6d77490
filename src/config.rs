//! Render configuration loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable config files.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::presets::{find_preset, preset_slugs, DEFAULT_PRESET};
use crate::rasterizer::{render, Canvas, Paint, RenderError};

/// Square sizes accepted from user input (the rasterizer itself has no upper bound)
pub const SQUARE_SIZE_RANGE: RangeInclusive<u32> = 10..=200;
pub const DEFAULT_SQUARE_SIZE: u32 = 50;

/// Error type for config loading and resolution
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    SerializeError(#[from] ron::Error),

    #[error("Unknown preset '{name}' (expected one of: {valid})")]
    UnknownPreset { name: String, valid: String },

    #[error("Square size {size} is outside the allowed range {min}..={max}")]
    SquareSizeOutOfRange { size: u32, min: u32, max: u32 },
}

/// Canvas dimensions, either from the preset table or given directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasSize {
    Preset(String),
    Custom { width: u32, height: u32 },
}

impl Default for CanvasSize {
    fn default() -> Self {
        CanvasSize::Preset(DEFAULT_PRESET.to_string())
    }
}

impl CanvasSize {
    /// Width and height in pixels
    pub fn dimensions(&self) -> Result<(u32, u32), ConfigError> {
        match self {
            CanvasSize::Preset(name) => find_preset(name)
                .map(|p| (p.width, p.height))
                .ok_or_else(|| ConfigError::UnknownPreset {
                    name: name.clone(),
                    valid: preset_slugs(),
                }),
            CanvasSize::Custom { width, height } => Ok((*width, *height)),
        }
    }
}

/// Everything needed to produce one checkerboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub canvas: CanvasSize,
    /// Edge length of each square in pixels
    pub square_size: u32,
    /// Color of the top-left square
    pub color_a: Paint,
    pub color_b: Paint,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            square_size: DEFAULT_SQUARE_SIZE,
            color_a: Paint::Transparent,
            color_b: Paint::Solid(crate::rasterizer::Color::BLACK),
        }
    }
}

/// Concrete rasterizer inputs after presets have been looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub color_a: Paint,
    pub color_b: Paint,
}

impl RenderRequest {
    pub fn render(&self) -> Result<Canvas, RenderError> {
        render(self.width, self.height, self.tile_size, self.color_a, self.color_b)
    }
}

impl RenderConfig {
    /// Check the preset name and the square size range
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.canvas.dimensions()?;
        if !SQUARE_SIZE_RANGE.contains(&self.square_size) {
            return Err(ConfigError::SquareSizeOutOfRange {
                size: self.square_size,
                min: *SQUARE_SIZE_RANGE.start(),
                max: *SQUARE_SIZE_RANGE.end(),
            });
        }
        Ok(())
    }

    /// Validate, then produce the rasterizer inputs
    pub fn resolve(&self) -> Result<RenderRequest, ConfigError> {
        self.validate()?;
        self.resolve_unbounded()
    }

    /// Produce rasterizer inputs without the square size range check.
    /// Zero sizes still fail later, in the rasterizer.
    pub fn resolve_unbounded(&self) -> Result<RenderRequest, ConfigError> {
        let (width, height) = self.canvas.dimensions()?;
        Ok(RenderRequest {
            width,
            height,
            tile_size: self.square_size,
            color_a: self.color_a,
            color_b: self.color_b,
        })
    }
}

/// Load a render config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a render config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Save a render config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    let contents = ron::ser::to_string_pretty(config, pretty_config())?;
    fs::write(path, contents)?;
    Ok(())
}

pub(crate) fn pretty_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    #[test]
    fn test_default_matches_picker_defaults() {
        let request = RenderConfig::default().resolve().unwrap();
        assert_eq!((request.width, request.height), (1080, 1080));
        assert_eq!(request.tile_size, 50);
        assert_eq!(request.color_a, Paint::Transparent);
        assert_eq!(request.color_b, Paint::Solid(Color::BLACK));
    }

    #[test]
    fn test_parse_partial_config() {
        let config = load_config_from_str(
            r##"(canvas: Custom(width: 64, height: 32), color_a: "#ff0000")"##,
        )
        .unwrap();
        assert_eq!(config.canvas, CanvasSize::Custom { width: 64, height: 32 });
        assert_eq!(config.color_a, Paint::Solid(Color::RED));
        // missing fields fall back to defaults
        assert_eq!(config.square_size, DEFAULT_SQUARE_SIZE);
        assert_eq!(config.color_b, Paint::Solid(Color::BLACK));
    }

    #[test]
    fn test_unknown_preset() {
        let config = RenderConfig {
            canvas: CanvasSize::Preset("billboard".to_string()),
            ..Default::default()
        };
        match config.resolve() {
            Err(ConfigError::UnknownPreset { name, valid }) => {
                assert_eq!(name, "billboard");
                assert!(valid.contains("widescreen"));
            }
            other => panic!("expected UnknownPreset, got {:?}", other),
        }
    }

    #[test]
    fn test_square_size_range() {
        let small = RenderConfig { square_size: 9, ..Default::default() };
        assert!(matches!(
            small.resolve(),
            Err(ConfigError::SquareSizeOutOfRange { size: 9, min: 10, max: 200 })
        ));

        let large = RenderConfig { square_size: 500, ..Default::default() };
        assert!(large.resolve().is_err());
        assert_eq!(large.resolve_unbounded().unwrap().tile_size, 500);
    }

    #[test]
    fn test_zero_size_reaches_rasterizer_error() {
        let config = RenderConfig {
            canvas: CanvasSize::Custom { width: 0, height: 10 },
            square_size: 20,
            ..Default::default()
        };
        let request = config.resolve().unwrap();
        assert_eq!(
            request.render(),
            Err(RenderError::InvalidDimension { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.ron");
        let config = RenderConfig {
            canvas: CanvasSize::Preset("widescreen".to_string()),
            square_size: 120,
            color_a: Paint::Solid(Color::new(1, 2, 3)),
            color_b: Paint::Transparent,
        };

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("missing.ron"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
