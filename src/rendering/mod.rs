pub mod context;
pub mod helpers;
#[cfg(feature = "wasm")]
pub mod web;

// Re-export main types
pub use context::{DrawCommand, DrawingContext, RenderContext};
pub use helpers::{
    apply_canvas_transform, apply_transform, draw_axes, draw_crosshair, draw_grid, draw_ruler,
    measure_text, setup_high_dpi, HighDpiSetup, LineStyle,
};
