//! Checkerboard software rasterizer
//!
//! Features:
//! - Square tiles alternating between two paints by (row + col) parity
//! - Edge tiles clipped to the canvas, never skipped
//! - Explicit transparent paint (zero alpha, zero RGB)
//! - Pure and deterministic: same inputs, byte-identical RGBA buffer

mod types;
mod render;

pub use types::*;
pub use render::*;
