//! Canvas 2D backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Surface2d, TextAlign};
use crate::error::EngineError;
use crate::sim::{Color, Rect, Stage};

/// Draws into an `HtmlCanvasElement` in CSS pixels, scaled by the device pixel ratio
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(EngineError::NoDrawingContext)?;
        Ok(Self {
            canvas,
            ctx,
            dpr: if dpr > 0.0 { dpr } else { 1.0 },
        })
    }

    /// Match the backing store to the canvas' CSS size and return that size
    pub fn fit_to_display(&mut self, dpr: f64) -> Stage {
        if dpr > 0.0 {
            self.dpr = dpr;
        }
        let width = self.canvas.client_width().max(0) as f64;
        let height = self.canvas.client_height().max(0) as f64;
        self.canvas.set_width((width * self.dpr) as u32);
        self.canvas.set_height((height * self.dpr) as u32);
        log::debug!("Canvas resized to {}x{} (dpr {})", width, height, self.dpr);
        Stage::new(width as f32, height as f32)
    }
}

impl Surface2d for CanvasSurface {
    fn clear(&mut self, color: Color) {
        let ctx = &self.ctx;
        if let Err(e) = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0) {
            log::warn!("setTransform failed: {:?}", e);
        }
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64 / self.dpr,
            self.canvas.height() as f64 / self.dpr,
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let size = rect.size();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.min.x as f64, rect.min.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&color.to_css());
        ctx.begin_path();
        if ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
        {
            ctx.fill();
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(width as f64);
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.stroke();
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&color.to_css());
        ctx.set_font(&format!("bold {}px sans-serif", size.round()));
        ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
