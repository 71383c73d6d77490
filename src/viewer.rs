//! Preview window
//!
//! Shows the rendered checkerboard scaled to fit the window. Keyboard:
//! - Up/Down: square size (Shift for steps of 10)
//! - Left/Right: canvas preset
//! - A / B: cycle first / second color, X: swap them
//! - S: save as, Escape: quit

use macroquad::prelude::*;
use tracing::{info, warn};

use crate::config::{CanvasSize, ConfigError, RenderConfig, SQUARE_SIZE_RANGE};
use crate::export::write_image;
use crate::presets::{preset_index, PRESETS};
use crate::rasterizer::{Canvas, Paint, RenderError};
use crate::VERSION;

/// Colors matching the editor theme
const BG_COLOR: Color = Color::new(0.10, 0.10, 0.12, 1.0);
const BACKDROP_COLOR: Color = Color::new(0.35, 0.35, 0.38, 1.0);
const TEXT_COLOR: Color = Color::new(0.9, 0.9, 0.9, 1.0);
const MUTED_COLOR: Color = Color::new(0.6, 0.6, 0.65, 1.0);

const STATUS_BAR_HEIGHT: f32 = 48.0;
const PADDING: f32 = 16.0;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("Canvas {width}x{height} is too large to preview (limit {max} pixels per side)")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Keyboard driven edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    SquareSize(i32),
    Preset(i32),
    CycleColorA,
    CycleColorB,
    SwapColors,
}

/// Apply an edit to a config. Square sizes stay inside the accepted range
/// unless `unbounded`, in which case they only stay positive.
pub fn apply_action(config: &RenderConfig, action: ViewerAction, unbounded: bool) -> RenderConfig {
    let mut next = config.clone();
    match action {
        ViewerAction::SquareSize(delta) => {
            let (min, max) = if unbounded {
                (1, u32::MAX)
            } else {
                (*SQUARE_SIZE_RANGE.start(), *SQUARE_SIZE_RANGE.end())
            };
            let size = config.square_size as i64 + delta as i64;
            next.square_size = size.clamp(min as i64, max as i64) as u32;
        }
        ViewerAction::Preset(delta) => {
            let current = match &config.canvas {
                CanvasSize::Preset(name) => preset_index(name),
                CanvasSize::Custom { .. } => None,
            };
            let index = match current {
                Some(i) => (i as i64 + delta as i64).rem_euclid(PRESETS.len() as i64) as usize,
                None => 0,
            };
            next.canvas = CanvasSize::Preset(PRESETS[index].slug.to_string());
        }
        ViewerAction::CycleColorA => next.color_a = next_named(config.color_a),
        ViewerAction::CycleColorB => next.color_b = next_named(config.color_b),
        ViewerAction::SwapColors => std::mem::swap(&mut next.color_a, &mut next.color_b),
    }
    next
}

/// Next color in the named vocabulary; custom colors restart at the top
fn next_named(paint: Paint) -> Paint {
    let index = paint
        .named_index()
        .map(|i| (i + 1) % Paint::NAMED.len())
        .unwrap_or(0);
    Paint::NAMED[index].1
}

/// Largest rectangle with the image's aspect ratio that fits the area, centered
pub fn fit_rect(image_w: f32, image_h: f32, area: Rect) -> Rect {
    let scale = (area.w / image_w).min(area.h / image_h);
    let w = image_w * scale;
    let h = image_h * scale;
    Rect::new(
        (area.x + (area.w - w) / 2.0).round(),
        (area.y + (area.h - h) / 2.0).round(),
        w.round(),
        h.round(),
    )
}

/// Current config and the canvas rendered from it
pub struct ViewerState {
    pub config: RenderConfig,
    pub unbounded: bool,
    pub canvas: Canvas,
    pub status: String,
}

impl ViewerState {
    pub fn new(config: RenderConfig, unbounded: bool) -> Result<Self, ViewerError> {
        let canvas = render_for_preview(&config, unbounded)?;
        Ok(Self {
            config,
            unbounded,
            canvas,
            status: String::from("Ready"),
        })
    }

    /// Apply an edit and re-render. On failure the previous config and canvas are kept.
    /// Returns true if the canvas changed.
    pub fn apply(&mut self, action: ViewerAction) -> bool {
        let next = apply_action(&self.config, action, self.unbounded);
        if next == self.config {
            return false;
        }
        match render_for_preview(&next, self.unbounded) {
            Ok(canvas) => {
                self.config = next;
                self.canvas = canvas;
                self.status = describe(&self.config);
                true
            }
            Err(e) => {
                warn!("Preview render failed: {}", e);
                self.status = format!("Error: {}", e);
                false
            }
        }
    }
}

fn render_for_preview(config: &RenderConfig, unbounded: bool) -> Result<Canvas, ViewerError> {
    let request = if unbounded {
        config.resolve_unbounded()?
    } else {
        config.resolve()?
    };

    let max = u16::MAX as u32;
    if request.width > max || request.height > max {
        return Err(ViewerError::TooLarge {
            width: request.width,
            height: request.height,
            max,
        });
    }
    Ok(request.render()?)
}

fn describe(config: &RenderConfig) -> String {
    let canvas = match &config.canvas {
        CanvasSize::Preset(name) => name.clone(),
        CanvasSize::Custom { width, height } => format!("{}x{}", width, height),
    };
    format!(
        "{} | {}px squares | {} / {}",
        canvas, config.square_size, config.color_a, config.color_b
    )
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Checkerforge v{}", VERSION),
        window_width: 960,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Open the preview window and block until it is closed
pub fn run(config: RenderConfig, unbounded: bool) -> Result<(), ViewerError> {
    let state = ViewerState::new(config, unbounded)?;
    info!("Opening preview: {}", describe(&state.config));
    macroquad::Window::from_config(window_conf(), viewer_loop(state));
    Ok(())
}

fn canvas_texture(canvas: &Canvas) -> Texture2D {
    let texture = Texture2D::from_rgba8(canvas.width() as u16, canvas.height() as u16, canvas.pixels());
    texture.set_filter(FilterMode::Nearest);
    texture
}

fn read_action() -> Option<ViewerAction> {
    let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
    let step = if shift { 10 } else { 1 };

    if is_key_pressed(KeyCode::Up) {
        Some(ViewerAction::SquareSize(step))
    } else if is_key_pressed(KeyCode::Down) {
        Some(ViewerAction::SquareSize(-step))
    } else if is_key_pressed(KeyCode::Right) {
        Some(ViewerAction::Preset(1))
    } else if is_key_pressed(KeyCode::Left) {
        Some(ViewerAction::Preset(-1))
    } else if is_key_pressed(KeyCode::A) {
        Some(ViewerAction::CycleColorA)
    } else if is_key_pressed(KeyCode::B) {
        Some(ViewerAction::CycleColorB)
    } else if is_key_pressed(KeyCode::X) {
        Some(ViewerAction::SwapColors)
    } else {
        None
    }
}

fn save_dialog(state: &mut ViewerState) {
    let dialog = rfd::FileDialog::new()
        .add_filter("PNG Image", &["png"])
        .add_filter("BMP Image", &["bmp"])
        .add_filter("JPEG Image", &["jpg", "jpeg"])
        .set_file_name("checkerboard.png");

    if let Some(path) = dialog.save_file() {
        match write_image(&state.canvas, &path) {
            Ok(()) => state.status = format!("Saved to {}", path.display()),
            Err(e) => {
                warn!("Save failed: {}", e);
                state.status = format!("Save failed: {}", e);
            }
        }
    }
}

async fn viewer_loop(mut state: ViewerState) {
    let mut texture = canvas_texture(&state.canvas);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if let Some(action) = read_action() {
            if state.apply(action) {
                texture = canvas_texture(&state.canvas);
            }
        }
        if is_key_pressed(KeyCode::S) {
            save_dialog(&mut state);
        }

        clear_background(BG_COLOR);

        let area = Rect::new(
            PADDING,
            PADDING,
            screen_width() - PADDING * 2.0,
            screen_height() - STATUS_BAR_HEIGHT - PADDING * 2.0,
        );
        if area.w > 0.0 && area.h > 0.0 {
            let dest = fit_rect(state.canvas.width() as f32, state.canvas.height() as f32, area);
            // Backdrop so transparent squares stay visible
            draw_rectangle(dest.x, dest.y, dest.w, dest.h, BACKDROP_COLOR);
            draw_texture_ex(
                &texture,
                dest.x,
                dest.y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(dest.w, dest.h)),
                    ..Default::default()
                },
            );
        }

        let text_y = screen_height() - STATUS_BAR_HEIGHT + 18.0;
        draw_text(&state.status, PADDING, text_y, 18.0, TEXT_COLOR);
        draw_text(
            "Up/Down size  Left/Right preset  A/B colors  X swap  S save  Esc quit",
            PADDING,
            text_y + 20.0,
            16.0,
            MUTED_COLOR,
        );

        next_frame().await;
    }
}
