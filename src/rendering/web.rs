//! Browser backend: `requestAnimationFrame` scheduling and
//! `CanvasRenderingContext2d` drawing

use crate::animation::animator::TransformAnimator;
use crate::core::bounds::BoundingBox;
use crate::core::matrix::AffineMatrix;
use crate::input::events::Surface;
use crate::rendering::context::DrawingContext;
use crate::rendering::helpers::{setup_high_dpi, HighDpiSetup};
use crate::runtime::{FrameCallback, FrameHandle, FrameScheduler};
use crate::{Result, ViewError};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Current `window.devicePixelRatio`, or 1 outside a window
pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// Frame scheduler backed by `window.requestAnimationFrame`
#[derive(Debug, Default)]
pub struct WebFrameScheduler;

impl WebFrameScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl FrameScheduler for WebFrameScheduler {
    fn request(&self, callback: FrameCallback) -> FrameHandle {
        let Some(window) = web_sys::window() else {
            log::warn!("no window to schedule an animation frame on");
            return FrameHandle(0);
        };
        // Frees itself after the call; a cancelled frame leaks its closure.
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => FrameHandle(id as u64),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {:?}", err);
                FrameHandle(0)
            }
        }
    }

    fn cancel(&self, handle: FrameHandle) {
        if handle.0 == 0 {
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0 as i32);
        }
    }

    /// `performance.now()`, falling back to `Date.now()` where the
    /// performance API is missing
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

/// Animator driven by the browser's animation frames
pub fn web_animator() -> TransformAnimator {
    TransformAnimator::new(Rc::new(WebFrameScheduler::new()))
}

/// The 2D context of `canvas`
pub fn get_context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|err| ViewError::DrawingContextUnavailable(format!("{:?}", err)))?
        .ok_or_else(|| ViewError::DrawingContextUnavailable("canvas has no 2d context".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ViewError::DrawingContextUnavailable("not a CanvasRenderingContext2d".to_string()))
}

/// A DOM canvas as an input and sizing surface
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn context_2d(&self) -> Result<CanvasRenderingContext2d> {
        get_context_2d(&self.canvas)
    }

    /// Sizes the backing store for the device pixel ratio, pins the CSS size
    /// and returns the scaled 2D context
    pub fn setup_high_dpi(&self) -> Result<(CanvasRenderingContext2d, HighDpiSetup)> {
        let mut ctx = self.context_2d()?;
        let setup = setup_high_dpi(self, &mut ctx, self.device_pixel_ratio());
        self.canvas.set_width(setup.pixel_width);
        self.canvas.set_height(setup.pixel_height);

        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", setup.css_width));
        let _ = style.set_property("height", &format!("{}px", setup.css_height));

        // Resizing the backing store resets the context state.
        DrawingContext::scale(&mut ctx, setup.ratio, setup.ratio);
        Ok((ctx, setup))
    }
}

impl Surface for CanvasSurface {
    fn bounding_rect(&self) -> BoundingBox {
        let rect = self.canvas.get_bounding_client_rect();
        BoundingBox::from_rect(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn device_pixel_ratio(&self) -> f64 {
        device_pixel_ratio()
    }
}

fn warn_on_error(what: &str, result: std::result::Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("{} failed: {:?}", what, err);
    }
}

impl DrawingContext for CanvasRenderingContext2d {
    fn set_transform(&mut self, matrix: &AffineMatrix) {
        let [a, b, c, d, e, f] = matrix.to_array();
        warn_on_error(
            "setTransform",
            CanvasRenderingContext2d::set_transform(self, a, b, c, d, e, f),
        );
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        warn_on_error("scale", CanvasRenderingContext2d::scale(self, sx, sy));
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        warn_on_error("fillText", CanvasRenderingContext2d::fill_text(self, text, x, y));
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        match CanvasRenderingContext2d::measure_text(self, text) {
            Ok(metrics) => metrics.width(),
            Err(err) => {
                log::warn!("measureText failed: {:?}", err);
                0.0
            }
        }
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }
}
