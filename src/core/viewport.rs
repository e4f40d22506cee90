use crate::core::bounds::BoundingBox;
use crate::core::geo::Point;
use crate::core::matrix::{self, AffineMatrix};
use crate::traits::Lerp;
use crate::Result;
use serde::{Deserialize, Serialize};

/// The live pan/zoom/rotate state of a rendering surface.
///
/// `x`/`y` is the screen position (in surface pixels) of the world origin,
/// `scale` is pixels per world unit and `rotation` is in radians. A world
/// point `w` lands on screen at `R(rotation)·(w·scale) + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub rotation: f64,
}

impl Viewport {
    /// Creates an untransformed viewport of the given pixel size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// World-to-screen matrix: scale, then rotate, then offset
    pub fn matrix(&self) -> AffineMatrix {
        AffineMatrix::uniform_scale(self.scale)
            .then(&AffineMatrix::rotation(self.rotation))
            .then(&AffineMatrix::translation(self.x, self.y))
    }

    /// Screen-to-world matrix
    pub fn inverse_matrix(&self) -> Result<AffineMatrix> {
        self.matrix().invert()
    }

    /// Pixel centre of the surface
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Screen rectangle of the surface
    pub fn screen_bounds(&self) -> BoundingBox {
        BoundingBox::from_rect(0.0, 0.0, self.width, self.height)
    }

    /// Axis-aligned world rectangle currently on screen
    pub fn visible_bounds(&self) -> Result<BoundingBox> {
        let inverse = self.inverse_matrix()?;
        Ok(matrix::transform_bounding_box(&self.screen_bounds(), &inverse))
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Copy at `new_scale` with the screen point `center` held in place
    pub fn zoomed_to(&self, new_scale: f64, center: Point) -> Viewport {
        if self.scale == 0.0 {
            return Viewport {
                scale: new_scale,
                ..*self
            };
        }
        let factor = new_scale / self.scale;
        let offset = self.offset() + (center - self.offset()) * (1.0 - factor);
        Viewport {
            x: offset.x,
            y: offset.y,
            scale: new_scale,
            ..*self
        }
    }

    /// Copy rotated by `delta` radians about the screen point `center`
    pub fn rotated_by(&self, delta: f64, center: Point) -> Viewport {
        let spin = AffineMatrix::rotation(delta);
        let offset = center + spin.transform_vector(self.offset() - center);
        Viewport {
            x: offset.x,
            y: offset.y,
            rotation: self.rotation + delta,
            ..*self
        }
    }

    /// Copy whose offset puts the world point `world` at the surface centre
    pub fn centered_on(&self, world: Point) -> Viewport {
        let linear = AffineMatrix::uniform_scale(self.scale).then(&AffineMatrix::rotation(self.rotation));
        let offset = self.center() - linear.transform_vector(world);
        Viewport {
            x: offset.x,
            y: offset.y,
            ..*self
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Lerp for Viewport {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x.lerp(&other.x, t),
            y: self.y.lerp(&other.y, t),
            width: self.width.lerp(&other.width, t),
            height: self.height.lerp(&other.height, t),
            scale: self.scale.lerp(&other.scale, t),
            rotation: self.rotation.lerp(&other.rotation, t),
        }
    }
}

/// Policy applied after every viewport mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConstraints {
    pub min_scale: f64,
    pub max_scale: f64,
    /// World rectangle the view is softly kept inside
    pub bounding_box: Option<BoundingBox>,
    pub lock_aspect_ratio: bool,
    pub snap_to_grid: bool,
    pub grid_size: f64,
}

impl CanvasConstraints {
    pub fn with_scale_range(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            ..Self::default()
        }
    }

    /// Never panics, even on constraints that would fail [`validate`](Self::validate).
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_scale > 0.0 && self.min_scale.is_finite()) {
            return Err(crate::ViewError::Config(format!(
                "min_scale must be positive and finite, got {}",
                self.min_scale
            )));
        }
        // Written so a NaN max_scale fails too.
        if !(self.max_scale >= self.min_scale) {
            return Err(crate::ViewError::Config(format!(
                "max_scale {} must be a number no smaller than min_scale {}",
                self.min_scale, self.max_scale
            )));
        }
        if self.snap_to_grid && !(self.grid_size > 0.0) {
            return Err(crate::ViewError::Config(format!(
                "grid_size must be positive when snapping, got {}",
                self.grid_size
            )));
        }
        Ok(())
    }
}

impl Default for CanvasConstraints {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 10.0,
            bounding_box: None,
            lock_aspect_ratio: false,
            snap_to_grid: false,
            grid_size: 20.0,
        }
    }
}

/// Transient per-gesture state.
///
/// Zoom operations are instantaneous and never pass through a staged state,
/// so the only active variant is a pan drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position of the previous `update_pan`
        last_pointer: Point,
        /// Pointer position at `start_pan`
        start_position: Point,
        /// Viewport at `start_pan`
        start_viewport: Viewport,
    },
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::Dragging { .. })
    }

    pub fn last_pointer_position(&self) -> Option<Point> {
        match self {
            InteractionState::Dragging { last_pointer, .. } => Some(*last_pointer),
            InteractionState::Idle => None,
        }
    }
}

/// Composite transform snapshot.
///
/// A superset of [`Viewport`] plus its derived matrix, laid out so two
/// snapshots can be blended field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    pub matrix: AffineMatrix,
    pub viewport: Viewport,
    pub scale: f64,
    pub translation: Point,
    pub rotation: f64,
    /// Pivot for scale/rotation, in screen pixels
    pub origin: Point,
}

impl CanvasTransform {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            matrix: viewport.matrix(),
            viewport: *viewport,
            scale: viewport.scale,
            translation: viewport.offset(),
            rotation: viewport.rotation,
            origin: viewport.center(),
        }
    }

    /// Returns a copy with `scale`, `translation` and `rotation` written back
    /// into the viewport and the matrix recomputed from it.
    pub fn normalized(&self) -> Self {
        let viewport = Viewport {
            x: self.translation.x,
            y: self.translation.y,
            scale: self.scale,
            rotation: self.rotation,
            ..self.viewport
        };
        Self {
            matrix: viewport.matrix(),
            viewport,
            ..*self
        }
    }

    /// Field-by-field blend.
    ///
    /// The matrix goes through [`matrix::interpolate`], which clamps `t`; the
    /// scalar fields are plain lerps and follow an overshooting `t`.
    pub fn interpolate(from: &CanvasTransform, to: &CanvasTransform, t: f64) -> CanvasTransform {
        CanvasTransform {
            matrix: matrix::interpolate(&from.matrix, &to.matrix, t),
            viewport: from.viewport.lerp(&to.viewport, t),
            scale: from.scale.lerp(&to.scale, t),
            translation: from.translation.lerp(&to.translation, t),
            rotation: from.rotation.lerp(&to.rotation, t),
            origin: from.origin.lerp(&to.origin, t),
        }
    }
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::from_viewport(&Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.scale, 1.0);
        assert_eq!(viewport.center(), Point::new(400.0, 300.0));
        assert!(viewport.matrix().is_identity());
    }

    #[test]
    fn test_viewport_matrix_order() {
        let viewport = Viewport {
            x: 100.0,
            y: 50.0,
            scale: 2.0,
            ..Viewport::new(800.0, 600.0)
        };
        let screen = viewport.matrix().transform_point(Point::new(10.0, 10.0));
        assert_eq!(screen, Point::new(120.0, 70.0));
    }

    #[test]
    fn test_viewport_rotation() {
        let viewport = Viewport {
            rotation: FRAC_PI_2,
            ..Viewport::new(100.0, 100.0)
        };
        let screen = viewport.matrix().transform_point(Point::new(1.0, 0.0));
        assert!(screen.approx_eq(&Point::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_visible_bounds() {
        let viewport = Viewport {
            x: -200.0,
            y: -100.0,
            scale: 2.0,
            ..Viewport::new(800.0, 600.0)
        };
        let visible = viewport.visible_bounds().unwrap();
        assert_eq!(visible, BoundingBox::new(100.0, 50.0, 500.0, 350.0));
    }

    #[test]
    fn test_zoomed_keeps_center_fixed() {
        let viewport = Viewport {
            x: 30.0,
            y: -40.0,
            scale: 1.5,
            rotation: 0.3,
            ..Viewport::new(800.0, 600.0)
        };
        let center = Point::new(250.0, 120.0);
        let before = viewport.inverse_matrix().unwrap().transform_point(center);
        let zoomed = viewport.zoomed_to(3.0, center);
        let after = zoomed.inverse_matrix().unwrap().transform_point(center);
        assert_eq!(zoomed.scale, 3.0);
        assert!(before.approx_eq(&after, 1e-9));
    }

    #[test]
    fn test_rotated_keeps_center_fixed() {
        let viewport = Viewport {
            x: 12.0,
            y: 7.0,
            scale: 2.0,
            ..Viewport::new(400.0, 400.0)
        };
        let center = Point::new(200.0, 200.0);
        let before = viewport.inverse_matrix().unwrap().transform_point(center);
        let rotated = viewport.rotated_by(FRAC_PI_2, center);
        let after = rotated.inverse_matrix().unwrap().transform_point(center);
        assert_eq!(rotated.rotation, FRAC_PI_2);
        assert!(before.approx_eq(&after, 1e-9));
    }

    #[test]
    fn test_centered_on() {
        let viewport = Viewport {
            scale: 2.0,
            rotation: 0.7,
            ..Viewport::new(800.0, 600.0)
        };
        let world = Point::new(-15.0, 42.0);
        let centered = viewport.centered_on(world);
        let screen = centered.matrix().transform_point(world);
        assert!(screen.approx_eq(&Point::new(400.0, 300.0), 1e-9));
    }

    #[test]
    fn test_visible_bounds_singular() {
        let viewport = Viewport {
            scale: 0.0,
            ..Viewport::default()
        };
        assert!(viewport.visible_bounds().is_err());
    }

    #[test]
    fn test_constraints_validate() {
        assert!(CanvasConstraints::default().validate().is_ok());
        assert!(CanvasConstraints::with_scale_range(0.0, 2.0).validate().is_err());
        assert!(CanvasConstraints::with_scale_range(3.0, 2.0).validate().is_err());
        assert!(CanvasConstraints::with_scale_range(0.5, f64::NAN).validate().is_err());
        assert!(CanvasConstraints::with_scale_range(0.5, f64::INFINITY).validate().is_ok());
        let snapping = CanvasConstraints {
            snap_to_grid: true,
            grid_size: 0.0,
            ..CanvasConstraints::default()
        };
        assert!(snapping.validate().is_err());
        assert_eq!(CanvasConstraints::with_scale_range(0.5, 4.0).clamp_scale(10.0), 4.0);
    }

    #[test]
    fn test_constraints_deserialize_partial() {
        let c: CanvasConstraints = serde_json::from_str(r#"{"minScale":0.5,"maxScale":4}"#).unwrap();
        assert_eq!(c.min_scale, 0.5);
        assert_eq!(c.max_scale, 4.0);
        assert_eq!(c.grid_size, CanvasConstraints::default().grid_size);
    }

    #[test]
    fn test_interaction_state() {
        let idle = InteractionState::default();
        assert!(!idle.is_dragging());
        assert_eq!(idle.last_pointer_position(), None);
        let dragging = InteractionState::Dragging {
            last_pointer: Point::new(1.0, 2.0),
            start_position: Point::new(0.0, 0.0),
            start_viewport: Viewport::default(),
        };
        assert!(dragging.is_dragging());
        assert_eq!(dragging.last_pointer_position(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_canvas_transform_interpolate() {
        let from = CanvasTransform::from_viewport(&Viewport::new(800.0, 600.0));
        let to = CanvasTransform::from_viewport(&Viewport {
            x: 100.0,
            scale: 3.0,
            ..Viewport::new(800.0, 600.0)
        });

        assert_eq!(CanvasTransform::interpolate(&from, &to, 0.0), from);
        assert_eq!(CanvasTransform::interpolate(&from, &to, 1.0), to);
        let mid = CanvasTransform::interpolate(&from, &to, 0.5);
        assert_eq!(mid.scale, 2.0);
        assert_eq!(mid.translation, Point::new(50.0, 0.0));
        assert_eq!(mid.viewport.x, 50.0);
    }

    #[test]
    fn test_canvas_transform_normalized() {
        let mut t = CanvasTransform::from_viewport(&Viewport::new(200.0, 100.0));
        t.scale = 2.0;
        t.translation = Point::new(10.0, 20.0);
        let n = t.normalized();
        assert_eq!(n.viewport.scale, 2.0);
        assert_eq!(n.viewport.x, 10.0);
        assert_eq!(n.matrix, n.viewport.matrix());
    }
}
