//! Checkerforge: checkerboard pattern generator
//!
//! The [`rasterizer`] module holds the pure rendering core. Everything else
//! feeds it parameters (presets, RON configs, the CLI, the preview window)
//! or takes the finished canvas away (image export, batch runs).

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod rasterizer;
pub mod presets;
pub mod config;
pub mod export;
pub mod batch;
pub mod viewer;

pub use rasterizer::{render, Canvas, Color, Paint, RenderError, TileGrid};
