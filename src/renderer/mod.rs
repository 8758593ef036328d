//! Rendering module
//!
//! The engine draws through `Surface2d`, a minimal immediate-mode 2D
//! interface, so the same scene code can target any host backend.

use glam::Vec2;

use crate::sim::{Color, Rect};

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use scene::render_scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing target owned by the game orchestrator
pub trait Surface2d {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    /// Draw text with its baseline centered vertically on `pos.y`
    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color);
}
