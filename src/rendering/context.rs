use crate::core::matrix::AffineMatrix;

/// The subset of a 2D canvas API the drawing helpers need.
///
/// Implemented for `CanvasRenderingContext2d` behind the `wasm` feature and by
/// [`RenderContext`], which records the calls instead of drawing.
pub trait DrawingContext {
    /// Replaces the current transform
    fn set_transform(&mut self, matrix: &AffineMatrix);

    /// Multiplies the current transform by a scale
    fn scale(&mut self, sx: f64, sy: f64);

    fn save(&mut self);

    fn restore(&mut self);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Width of `text` in the current font
    fn measure_text(&mut self, text: &str) -> f64;

    fn set_stroke_style(&mut self, color: &str);

    fn set_fill_style(&mut self, color: &str);

    fn set_line_width(&mut self, width: f64);

    fn set_font(&mut self, font: &str);
}

/// Commands recorded by a [`RenderContext`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetTransform(AffineMatrix),
    Scale { sx: f64, sy: f64 },
    Save,
    Restore,
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Stroke,
    FillText { text: String, x: f64, y: f64 },
    StrokeStyle(String),
    FillStyle(String),
    LineWidth(f64),
    Font(String),
}

/// Headless drawing context that queues every call.
///
/// Text is measured with a fixed advance per character derived from the
/// pixel size in the current font string.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    /// Drawing commands issued since the last `begin_frame`
    pub drawing_queue: Vec<DrawCommand>,
    font_size: f64,
    /// Font sizes pushed by `save`, popped by `restore`
    saved_font_sizes: Vec<f64>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
            font_size: 10.0,
            saved_font_sizes: Vec::new(),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Number of stroked segments (`line_to` calls) in the queue
    pub fn segment_count(&self) -> usize {
        self.drawing_queue
            .iter()
            .filter(|c| matches!(c, DrawCommand::LineTo { .. }))
            .count()
    }

    /// Transform set by the most recent `set_transform`
    pub fn current_transform(&self) -> Option<AffineMatrix> {
        self.drawing_queue.iter().rev().find_map(|c| match c {
            DrawCommand::SetTransform(m) => Some(*m),
            _ => None,
        })
    }
}

/// Pixel size from a CSS font shorthand such as `"bold 12px sans-serif"`
fn font_pixel_size(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse::<f64>().ok()))
}

impl DrawingContext for RenderContext {
    fn set_transform(&mut self, matrix: &AffineMatrix) {
        self.drawing_queue.push(DrawCommand::SetTransform(*matrix));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.drawing_queue.push(DrawCommand::Scale { sx, sy });
    }

    fn save(&mut self) {
        self.saved_font_sizes.push(self.font_size);
        self.drawing_queue.push(DrawCommand::Save);
    }

    /// An unbalanced restore is recorded but leaves the font as is, like the
    /// canvas API.
    fn restore(&mut self) {
        if let Some(size) = self.saved_font_sizes.pop() {
            self.font_size = size;
        }
        self.drawing_queue.push(DrawCommand::Restore);
    }

    fn begin_path(&mut self) {
        self.drawing_queue.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.drawing_queue.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.drawing_queue.push(DrawCommand::LineTo { x, y });
    }

    fn stroke(&mut self) {
        self.drawing_queue.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.drawing_queue.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * 0.6
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.drawing_queue.push(DrawCommand::StrokeStyle(color.to_string()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.drawing_queue.push(DrawCommand::FillStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.drawing_queue.push(DrawCommand::LineWidth(width));
    }

    fn set_font(&mut self, font: &str) {
        if let Some(size) = font_pixel_size(font) {
            self.font_size = size;
        }
        self.drawing_queue.push(DrawCommand::Font(font.to_string()));
    }
}
