//! Thin drawing helpers that consume an already computed transform.
//!
//! Everything here draws in whatever space the context's current transform
//! defines; pass world-space geometry after [`apply_transform`] with the
//! viewport matrix, or screen-space geometry under the identity.

use crate::core::bounds::BoundingBox;
use crate::core::constants::MAX_GRID_POINTS;
use crate::core::geo::Point;
use crate::core::matrix::AffineMatrix;
use crate::core::viewport::CanvasTransform;
use crate::input::events::Surface;
use crate::rendering::context::DrawingContext;

/// Length of a ruler tick, in the ruler's own units
const TICK_LENGTH: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

impl LineStyle {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new("#cccccc", 1.0)
    }
}

/// Canvas sizing produced by [`setup_high_dpi`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighDpiSetup {
    pub css_width: f64,
    pub css_height: f64,
    /// Backing store size in device pixels
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub ratio: f64,
}

pub fn apply_transform(ctx: &mut dyn DrawingContext, matrix: &AffineMatrix) {
    ctx.set_transform(matrix);
}

pub fn apply_canvas_transform(ctx: &mut dyn DrawingContext, transform: &CanvasTransform) {
    ctx.set_transform(&transform.matrix);
}

fn stroke_lines<I>(ctx: &mut dyn DrawingContext, style: &LineStyle, segments: I)
where
    I: IntoIterator<Item = (Point, Point)>,
{
    ctx.save();
    ctx.set_stroke_style(&style.color);
    ctx.set_line_width(style.width);
    ctx.begin_path();
    for (from, to) in segments {
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
    }
    ctx.stroke();
    ctx.restore();
}

/// Grid lines every `grid_size` across `visible`; returns how many were drawn.
///
/// Draws nothing for a non-positive grid size or when the line count would
/// exceed [`MAX_GRID_POINTS`].
pub fn draw_grid(ctx: &mut dyn DrawingContext, visible: &BoundingBox, grid_size: f64, style: &LineStyle) -> usize {
    if !(grid_size > 0.0) || !grid_size.is_finite() {
        return 0;
    }
    let first_col = (visible.min_x / grid_size).ceil();
    let last_col = (visible.max_x / grid_size).floor();
    let first_row = (visible.min_y / grid_size).ceil();
    let last_row = (visible.max_y / grid_size).floor();
    let cols = (last_col - first_col + 1.0).max(0.0);
    let rows = (last_row - first_row + 1.0).max(0.0);
    if cols + rows > MAX_GRID_POINTS as f64 {
        log::warn!("refusing to draw {} grid lines at size {}", cols + rows, grid_size);
        return 0;
    }

    let (cols, rows) = (cols as usize, rows as usize);
    let verticals = (0..cols).map(|i| {
        let x = (first_col + i as f64) * grid_size;
        (Point::new(x, visible.min_y), Point::new(x, visible.max_y))
    });
    let horizontals = (0..rows).map(|i| {
        let y = (first_row + i as f64) * grid_size;
        (Point::new(visible.min_x, y), Point::new(visible.max_x, y))
    });
    stroke_lines(ctx, style, verticals.chain(horizontals));
    cols + rows
}

/// The x and y axes where they cross `visible`; returns how many were drawn
pub fn draw_axes(ctx: &mut dyn DrawingContext, visible: &BoundingBox, style: &LineStyle) -> usize {
    let mut axes = Vec::with_capacity(2);
    if visible.min_y <= 0.0 && visible.max_y >= 0.0 {
        axes.push((Point::new(visible.min_x, 0.0), Point::new(visible.max_x, 0.0)));
    }
    if visible.min_x <= 0.0 && visible.max_x >= 0.0 {
        axes.push((Point::new(0.0, visible.min_y), Point::new(0.0, visible.max_y)));
    }
    let count = axes.len();
    if count > 0 {
        stroke_lines(ctx, style, axes);
    }
    count
}

/// Cross of total span `size` centred on `center`
pub fn draw_crosshair(ctx: &mut dyn DrawingContext, center: Point, size: f64, style: &LineStyle) {
    let half = size / 2.0;
    stroke_lines(
        ctx,
        style,
        [
            (Point::new(center.x - half, center.y), Point::new(center.x + half, center.y)),
            (Point::new(center.x, center.y - half), Point::new(center.x, center.y + half)),
        ],
    );
}

/// Measuring line from `start` to `end` with perpendicular ticks every
/// `tick_spacing` and its length printed at the midpoint. Returns the length.
pub fn draw_ruler(
    ctx: &mut dyn DrawingContext,
    start: Point,
    end: Point,
    tick_spacing: f64,
    style: &LineStyle,
) -> f64 {
    let length = start.distance_to(&end);
    let mut segments = vec![(start, end)];

    if length > 0.0 && tick_spacing > 0.0 && length / tick_spacing <= MAX_GRID_POINTS as f64 {
        let direction = (end - start) * (1.0 / length);
        let normal = Point::new(-direction.y, direction.x) * TICK_LENGTH;
        let ticks = (length / tick_spacing).floor() as usize;
        for i in 0..=ticks {
            let at = start + direction * (i as f64 * tick_spacing);
            segments.push((at, at + normal));
        }
    }
    stroke_lines(ctx, style, segments);

    let label = start.midpoint(&end) + Point::new(0.0, -TICK_LENGTH);
    ctx.save();
    ctx.set_fill_style(&style.color);
    ctx.fill_text(&format!("{:.1}", length), label.x, label.y);
    ctx.restore();
    length
}

/// Width of `text` rendered in `font`, leaving the context's font untouched
pub fn measure_text(ctx: &mut dyn DrawingContext, text: &str, font: &str) -> f64 {
    ctx.save();
    ctx.set_font(font);
    let width = ctx.measure_text(text);
    ctx.restore();
    width
}

/// Scales the context so one CSS pixel covers `device_pixel_ratio` device
/// pixels, and reports the backing store size the host should allocate.
/// Ratios that are not positive and finite fall back to 1.
pub fn setup_high_dpi(surface: &dyn Surface, ctx: &mut dyn DrawingContext, device_pixel_ratio: f64) -> HighDpiSetup {
    let ratio = if device_pixel_ratio > 0.0 && device_pixel_ratio.is_finite() {
        device_pixel_ratio
    } else {
        1.0
    };
    let (css_width, css_height) = surface.size();
    ctx.scale(ratio, ratio);
    HighDpiSetup {
        css_width,
        css_height,
        pixel_width: (css_width * ratio).round().max(0.0) as u32,
        pixel_height: (css_height * ratio).round().max(0.0) as u32,
        ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::StaticSurface;
    use crate::rendering::context::{DrawCommand, RenderContext};

    #[test]
    fn test_draw_grid_counts_lines() {
        let mut ctx = RenderContext::new(100, 100);
        let drawn = draw_grid(&mut ctx, &BoundingBox::new(-5.0, 0.0, 25.0, 10.0), 10.0, &LineStyle::default());
        // x = 0, 10, 20 and y = 0, 10
        assert_eq!(drawn, 5);
        assert_eq!(ctx.segment_count(), 5);
        assert_eq!(ctx.get_drawing_queue().first(), Some(&DrawCommand::Save));
        assert_eq!(ctx.get_drawing_queue().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_draw_grid_refuses_degenerate_sizes() {
        let mut ctx = RenderContext::new(100, 100);
        let bounds = BoundingBox::new(0.0, 0.0, 1000.0, 1000.0);
        assert_eq!(draw_grid(&mut ctx, &bounds, 0.0, &LineStyle::default()), 0);
        assert_eq!(draw_grid(&mut ctx, &bounds, 1e-4, &LineStyle::default()), 0);
        assert!(ctx.get_drawing_queue().is_empty());
    }

    #[test]
    fn test_draw_axes_only_when_visible() {
        let mut ctx = RenderContext::new(100, 100);
        assert_eq!(draw_axes(&mut ctx, &BoundingBox::new(-10.0, -10.0, 10.0, 10.0), &LineStyle::default()), 2);
        ctx.begin_frame();
        assert_eq!(draw_axes(&mut ctx, &BoundingBox::new(5.0, -10.0, 10.0, 10.0), &LineStyle::default()), 1);
        ctx.begin_frame();
        assert_eq!(draw_axes(&mut ctx, &BoundingBox::new(5.0, 5.0, 10.0, 10.0), &LineStyle::default()), 0);
        assert!(ctx.get_drawing_queue().is_empty());
    }

    #[test]
    fn test_draw_crosshair() {
        let mut ctx = RenderContext::new(100, 100);
        draw_crosshair(&mut ctx, Point::new(50.0, 50.0), 10.0, &LineStyle::new("red", 2.0));
        assert!(ctx.get_drawing_queue().contains(&DrawCommand::MoveTo { x: 45.0, y: 50.0 }));
        assert!(ctx.get_drawing_queue().contains(&DrawCommand::LineTo { x: 50.0, y: 55.0 }));
        assert!(ctx.get_drawing_queue().contains(&DrawCommand::StrokeStyle("red".to_string())));
    }

    #[test]
    fn test_draw_ruler() {
        let mut ctx = RenderContext::new(100, 100);
        let length = draw_ruler(&mut ctx, Point::new(0.0, 0.0), Point::new(30.0, 40.0), 10.0, &LineStyle::default());
        assert_eq!(length, 50.0);
        // Main line plus ticks at 0, 10, 20, 30, 40, 50
        assert_eq!(ctx.segment_count(), 7);
        assert!(ctx.get_drawing_queue().iter().any(|c| matches!(
            c,
            DrawCommand::FillText { text, .. } if text == "50.0"
        )));
    }

    #[test]
    fn test_measure_text_restores_state() {
        let mut ctx = RenderContext::new(100, 100);
        assert_eq!(measure_text(&mut ctx, "ab", "20px serif"), 24.0);
        assert_eq!(ctx.get_drawing_queue().last(), Some(&DrawCommand::Restore));
        assert_eq!(ctx.measure_text("ab"), 12.0);
    }

    #[test]
    fn test_setup_high_dpi() {
        let surface = StaticSurface::new(300.0, 150.0);
        let mut ctx = RenderContext::new(300, 150);
        let setup = setup_high_dpi(&surface, &mut ctx, 2.0);
        assert_eq!((setup.pixel_width, setup.pixel_height), (600, 300));
        assert_eq!(ctx.get_drawing_queue(), &[DrawCommand::Scale { sx: 2.0, sy: 2.0 }]);

        let fallback = setup_high_dpi(&surface, &mut ctx, f64::NAN);
        assert_eq!(fallback.ratio, 1.0);
    }

    #[test]
    fn test_apply_transform() {
        let mut ctx = RenderContext::new(100, 100);
        let transform = CanvasTransform::default();
        apply_canvas_transform(&mut ctx, &transform);
        apply_transform(&mut ctx, &AffineMatrix::translation(3.0, 4.0));
        assert_eq!(ctx.current_transform(), Some(AffineMatrix::translation(3.0, 4.0)));
    }
}
