//! Canvas 2D surface for the browser

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::sim::Color;

pub struct Canvas2dSurface {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Grab the canvas's 2D context
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self::new(ctx))
    }
}

impl Surface for Canvas2dSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(line_width as f64);
        if let Err(e) = ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU) {
            // Negative radius is the only failure; skip the outline
            log::warn!("arc failed: {:?}", e);
            return;
        }
        ctx.stroke();
        ctx.close_path();
    }

    fn fill_label(&mut self, text: &str, center: Vec2, font: &str, color: Color) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&color.to_css());
        ctx.set_font(font);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        if let Err(e) = ctx.fill_text(text, center.x as f64, center.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}
