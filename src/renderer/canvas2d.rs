//! Canvas 2D backend (wasm32 only)
//!
//! Backs [`Surface`] with a real `CanvasRenderingContext2d`. The context is
//! acquired opaque (`alpha: false`) since the scene always floods the
//! background first. Draw errors from the path calls are swallowed; a failed
//! call costs one shape for one frame, never the loop.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::Surface;
use crate::sim::color::Rgb;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire a 2d context from the canvas element
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::FALSE)?;

        let context = canvas
            .get_context_with_context_options("2d", &options)?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        log::info!("canvas context: 2d");
        Ok(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        // Setting the backing store size also clears the canvas
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.context.set_global_alpha(alpha as f64);
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.context.set_fill_style_str(&color.to_hex());
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.context.set_stroke_style_str(&color.to_hex());
    }

    fn fill_background(&mut self, color: Rgb) {
        self.context.set_global_alpha(1.0);
        self.context.set_fill_style_str(&color.to_hex());
        self.context.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32) {
        self.context.begin_path();
        let _ = self.context.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            rotation as f64,
            0.0,
            TAU,
        );
        self.context.fill();
    }

    fn fill_rect(&mut self, center: Vec2, size: Vec2) {
        self.context.fill_rect(
            (center.x - size.x / 2.0) as f64,
            (center.y - size.y / 2.0) as f64,
            size.x as f64,
            size.y as f64,
        );
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) {
        self.context.begin_path();
        self.context.move_to(from.x as f64, from.y as f64);
        self.context.line_to(to.x as f64, to.y as f64);
        self.context.stroke();
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        let Ok(gradient) = self.context.create_radial_gradient(
            center.x as f64,
            center.y as f64,
            0.0,
            center.x as f64,
            center.y as f64,
            radius as f64,
        ) else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &color.to_css_alpha(alpha));
        let _ = gradient.add_color_stop(1.0, &color.to_css_alpha(0.0));

        self.context.set_fill_style_canvas_gradient(&gradient);
        self.context.begin_path();
        let _ = self
            .context
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.context.fill();
    }
}
