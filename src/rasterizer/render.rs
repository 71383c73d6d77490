//! Checkerboard rasterization
//! Tile grid layout and the canvas it is filled into

use super::types::{Color, Paint};

/// Bytes per pixel in a canvas (RGBA)
pub const CHANNELS: usize = 4;

/// Error returned by [`render`] when the inputs cannot describe a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error(
        "Invalid canvas dimensions {width}x{height}: width and height must be at least 1 \
         and the RGBA buffer must fit in memory"
    )]
    InvalidDimension { width: u32, height: u32 },

    #[error("Invalid tile size: must be at least 1 pixel")]
    InvalidTileSize,
}

/// Rendered pixel buffer, row-major RGBA, 4 bytes per pixel.
///
/// Only [`render`] builds one; afterwards it is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn blank(grid: &TileGrid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            pixels: vec![0; grid.buffer_len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// Number of pixels (width * height)
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let mut bytes = [0u8; CHANNELS];
        bytes.copy_from_slice(&self.pixels[idx..idx + CHANNELS]);
        Some(Color::from_bytes(bytes))
    }

    /// True when no pixel has alpha below 255
    pub fn is_opaque(&self) -> bool {
        self.pixels.chunks_exact(CHANNELS).all(|px| px[3] == 255)
    }

    /// Fill a rectangle that already lies within the canvas
    fn fill_rect(&mut self, rect: TileRect, bytes: [u8; CHANNELS]) {
        let stride = self.width as usize * CHANNELS;
        let start_x = rect.x1 as usize * CHANNELS;
        let end_x = rect.x2 as usize * CHANNELS;

        for y in rect.y1 as usize..rect.y2 as usize {
            let row = &mut self.pixels[y * stride + start_x..y * stride + end_x];
            for px in row.chunks_exact_mut(CHANNELS) {
                px.copy_from_slice(&bytes);
            }
        }
    }
}

/// Pixel rectangle of one tile, half-open: `[x1, x2) x [y1, y2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl TileRect {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// Checkerboard partition of a canvas into square tiles.
///
/// Uses ceiling division, so the last row and column of tiles may be
/// clipped by the canvas edge but are never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    buffer_len: usize,
}

impl TileGrid {
    /// Validate inputs and build the grid. Dimensions are checked before tile size.
    /// A canvas whose byte length overflows `usize` counts as an invalid dimension.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimension { width, height });
        }
        let buffer_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(RenderError::InvalidDimension { width, height })?;
        if tile_size == 0 {
            return Err(RenderError::InvalidTileSize);
        }
        Ok(Self { width, height, tile_size, buffer_len })
    }

    /// Size in bytes of the RGBA buffer for this grid
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tile columns
    pub fn tiles_x(&self) -> u32 {
        self.width.div_ceil(self.tile_size)
    }

    /// Number of tile rows
    pub fn tiles_y(&self) -> u32 {
        self.height.div_ceil(self.tile_size)
    }

    /// Whether the tile at (row, col) takes the first color
    pub fn is_even(row: u32, col: u32) -> bool {
        (row as u64 + col as u64) % 2 == 0
    }

    /// Pixel bounds of the tile at (row, col), clipped to the canvas
    pub fn tile_rect(&self, row: u32, col: u32) -> TileRect {
        let x1 = col * self.tile_size;
        let y1 = row * self.tile_size;
        TileRect {
            x1,
            y1,
            x2: x1.saturating_add(self.tile_size).min(self.width),
            y2: y1.saturating_add(self.tile_size).min(self.height),
        }
    }
}

/// Render a two-color checkerboard.
///
/// Tile (row, col) gets `color_a` when `row + col` is even and `color_b`
/// otherwise. Invalid input fails before anything is allocated.
pub fn render(
    width: u32,
    height: u32,
    tile_size: u32,
    color_a: Paint,
    color_b: Paint,
) -> Result<Canvas, RenderError> {
    let grid = TileGrid::new(width, height, tile_size)?;

    // Resolve paints once, not per pixel
    let even = color_a.resolve().to_bytes();
    let odd = color_b.resolve().to_bytes();

    let mut canvas = Canvas::blank(&grid);
    for row in 0..grid.tiles_y() {
        for col in 0..grid.tiles_x() {
            let bytes = if TileGrid::is_even(row, col) { even } else { odd };
            canvas.fill_rect(grid.tile_rect(row, col), bytes);
        }
    }

    Ok(canvas)
}
