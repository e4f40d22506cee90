use crate::coords::grid::snap_to_grid;
use crate::core::bounds::BoundingBox;
use crate::core::config::{EngineOptions, EngineProfile, InteractionConfig};
use crate::core::geo::Point;
use crate::core::matrix::AffineMatrix;
use crate::core::viewport::{CanvasConstraints, CanvasTransform, InteractionState, Viewport};
use crate::input::events::{Surface, WheelEvent};
use crate::traits::CoordinateTransform;
use crate::Result;

pub type ViewportCallback = Box<dyn FnMut(&Viewport)>;
pub type TransformCallback = Box<dyn FnMut(&CanvasTransform)>;

/// Owns the viewport of one surface and every way of changing it.
///
/// All mutators funnel through the same update path: the new viewport is
/// stored, the constraints are re-applied (scale clamp, bounding-box soft
/// clamp, grid snap) and then the change callbacks fire. Constraint
/// violations are corrected silently, never reported.
pub struct ViewportManager {
    viewport: Viewport,
    initial_viewport: Viewport,
    constraints: CanvasConstraints,
    interaction_config: InteractionConfig,
    interaction: InteractionState,
    is_zooming: bool,
    on_viewport_change: Option<ViewportCallback>,
    on_transform_change: Option<TransformCallback>,
}

impl ViewportManager {
    /// Manager with default constraints for a `width` x `height` surface
    pub fn new(width: f64, height: f64) -> Self {
        Self::build(Viewport::new(width, height), EngineOptions::default())
    }

    pub fn with_constraints(width: f64, height: f64, constraints: CanvasConstraints) -> Result<Self> {
        constraints.validate()?;
        Ok(Self::build(
            Viewport::new(width, height),
            EngineOptions {
                constraints,
                ..EngineOptions::default()
            },
        ))
    }

    pub fn with_options(viewport: Viewport, options: EngineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(viewport, options))
    }

    pub fn from_profile(width: f64, height: f64, profile: EngineProfile) -> Result<Self> {
        Self::with_options(Viewport::new(width, height), profile.resolve())
    }

    fn build(viewport: Viewport, options: EngineOptions) -> Self {
        let mut manager = Self {
            viewport,
            initial_viewport: viewport,
            constraints: options.constraints,
            interaction_config: options.interaction,
            interaction: InteractionState::Idle,
            is_zooming: false,
            on_viewport_change: None,
            on_transform_change: None,
        };
        manager.apply_constraints();
        manager.initial_viewport = manager.viewport;
        manager
    }

    pub fn get_viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn get_transform(&self) -> CanvasTransform {
        CanvasTransform::from_viewport(&self.viewport)
    }

    /// World-to-screen matrix of the current viewport
    pub fn matrix(&self) -> AffineMatrix {
        self.viewport.matrix()
    }

    pub fn constraints(&self) -> &CanvasConstraints {
        &self.constraints
    }

    pub fn interaction_config(&self) -> &InteractionConfig {
        &self.interaction_config
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    /// Only true while a zoom is being applied, i.e. inside change callbacks
    pub fn is_zooming(&self) -> bool {
        self.is_zooming
    }

    /// Edits the constraints in place; rejected edits leave them untouched
    pub fn update_constraints<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut CanvasConstraints),
    {
        let mut next = self.constraints;
        edit(&mut next);
        next.validate()?;
        self.constraints = next;
        self.update_viewport(self.viewport);
        Ok(())
    }

    pub fn on_viewport_change<F>(&mut self, callback: F)
    where
        F: FnMut(&Viewport) + 'static,
    {
        self.on_viewport_change = Some(Box::new(callback));
    }

    pub fn on_transform_change<F>(&mut self, callback: F)
    where
        F: FnMut(&CanvasTransform) + 'static,
    {
        self.on_transform_change = Some(Box::new(callback));
    }

    /// Replaces both callbacks at once; `None` unregisters
    pub fn set_callbacks(
        &mut self,
        on_viewport_change: Option<ViewportCallback>,
        on_transform_change: Option<TransformCallback>,
    ) {
        self.on_viewport_change = on_viewport_change;
        self.on_transform_change = on_transform_change;
    }

    /// Multiplies the scale by `factor`, keeping the screen point `center`
    /// (default: the surface centre) visually fixed.
    ///
    /// Zero and negative factors clamp to `min_scale` like any other. Returns
    /// `false` without touching anything for a non-finite factor or when the
    /// clamped scale would not change.
    pub fn zoom(&mut self, factor: f64, center: Option<Point>) -> bool {
        if !factor.is_finite() || self.viewport.scale == 0.0 {
            log::trace!("ignoring zoom by {}", factor);
            return false;
        }
        let center = center.unwrap_or_else(|| self.viewport.center());
        let new_scale = self.constraints.clamp_scale(self.viewport.scale * factor);
        let actual_factor = new_scale / self.viewport.scale;
        if actual_factor == 1.0 {
            log::trace!("zoom by {} is a no-op at scale {}", factor, self.viewport.scale);
            return false;
        }

        self.is_zooming = true;
        let next = self.viewport.zoomed_to(new_scale, center);
        self.update_viewport(next);
        self.is_zooming = false;
        true
    }

    /// Zooms to an absolute scale about `center`
    pub fn zoom_to(&mut self, scale: f64, center: Option<Point>) -> bool {
        if self.viewport.scale == 0.0 {
            return false;
        }
        self.zoom(scale / self.viewport.scale, center)
    }

    /// Shifts the view by a screen-space delta in pixels
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let next = Viewport {
            x: self.viewport.x + dx,
            y: self.viewport.y + dy,
            ..self.viewport
        };
        self.update_viewport(next);
    }

    /// Shifts the view by a world-space delta
    pub fn pan_world(&mut self, dx: f64, dy: f64) {
        let screen = self.linear_part().transform_vector(Point::new(dx, dy));
        self.pan(screen.x, screen.y);
    }

    pub fn start_pan(&mut self, point: Point) {
        self.interaction = InteractionState::Dragging {
            last_pointer: point,
            start_position: point,
            start_viewport: self.viewport,
        };
    }

    /// Moves the view with the pointer; ignored unless a pan is in progress
    pub fn update_pan(&mut self, point: Point) {
        let last = match &mut self.interaction {
            InteractionState::Dragging { last_pointer, .. } => std::mem::replace(last_pointer, point),
            InteractionState::Idle => return,
        };
        let delta = point - last;

        match self.linear_part().invert() {
            Ok(inverse) => {
                let world = inverse.transform_vector(delta);
                self.pan_world(world.x, world.y);
            }
            Err(_) => self.pan(delta.x, delta.y),
        }
    }

    /// Ends a pan and re-applies the constraints, grid snapping included
    pub fn end_pan(&mut self) {
        if !self.interaction.is_dragging() {
            return;
        }
        self.interaction = InteractionState::Idle;
        self.update_viewport(self.viewport);
    }

    /// Scales and centres the view so `bounds` plus `padding` (a fraction of
    /// the content size on each side) fills the surface
    pub fn fit_to_content(&mut self, bounds: &BoundingBox, padding: Option<f64>) {
        let padding = padding.unwrap_or(self.interaction_config.fit_padding).max(0.0);
        let padded_width = bounds.width * (1.0 + 2.0 * padding);
        let padded_height = bounds.height * (1.0 + 2.0 * padding);

        let fit_x = (padded_width > 0.0).then(|| self.viewport.width / padded_width);
        let fit_y = (padded_height > 0.0).then(|| self.viewport.height / padded_height);
        let scale = match (fit_x, fit_y) {
            (Some(x), Some(y)) => x.min(y),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => self.viewport.scale,
        };
        let scale = self.constraints.clamp_scale(scale);
        log::debug!("fitting {:?} at scale {}", bounds, scale);

        let next = Viewport {
            scale,
            ..self.viewport
        }
        .centered_on(bounds.center());
        self.update_viewport(next);
    }

    /// Places the world point at the surface centre at the current scale
    pub fn center_on(&mut self, world: Point) {
        let next = self.viewport.centered_on(world);
        self.update_viewport(next);
    }

    /// Rotates by `angle` radians about `center` (default: surface centre)
    pub fn rotate(&mut self, angle: f64, center: Option<Point>) {
        let center = center.unwrap_or_else(|| self.viewport.center());
        let next = self.viewport.rotated_by(angle, center);
        self.update_viewport(next);
    }

    pub fn set_rotation(&mut self, rotation: f64, center: Option<Point>) {
        self.rotate(rotation - self.viewport.rotation, center);
    }

    /// Resizes the surface, deriving the height from the initial aspect ratio
    /// when the aspect is locked
    pub fn resize(&mut self, width: f64, height: f64) {
        let initial = self.initial_viewport;
        let height = if self.constraints.lock_aspect_ratio && initial.width > 0.0 {
            width * initial.height / initial.width
        } else {
            height
        };
        let next = Viewport {
            width,
            height,
            ..self.viewport
        };
        self.update_viewport(next);
    }

    /// One wheel notch of zoom about the pointer.
    ///
    /// Returns whether the viewport changed; a zero delta does nothing.
    pub fn handle_wheel(&mut self, event: &WheelEvent, surface: &dyn Surface) -> bool {
        let factor = if event.delta_y < 0.0 {
            self.interaction_config.wheel_zoom_in_factor
        } else if event.delta_y > 0.0 {
            self.interaction_config.wheel_zoom_out_factor
        } else {
            log::trace!("ignoring wheel event without vertical delta");
            return false;
        };
        let point = surface.to_local(event.client_x, event.client_y);
        self.zoom(factor, Some(point))
    }

    /// Zooms by the change in distance between two touches, about their
    /// midpoint. Needs both previous positions and a non-zero previous
    /// distance; otherwise nothing happens.
    pub fn handle_pinch_zoom(
        &mut self,
        touch1: Point,
        touch2: Point,
        previous1: Option<Point>,
        previous2: Option<Point>,
    ) -> bool {
        let (Some(previous1), Some(previous2)) = (previous1, previous2) else {
            log::trace!("pinch without previous touches");
            return false;
        };
        let previous_distance = previous1.distance_to(&previous2);
        if previous_distance == 0.0 {
            log::trace!("pinch with coincident previous touches");
            return false;
        }
        let factor = touch1.distance_to(&touch2) / previous_distance;
        self.zoom(factor, Some(touch1.midpoint(&touch2)))
    }

    /// Back to the viewport the manager was created with
    pub fn reset(&mut self) {
        log::debug!("resetting viewport");
        self.interaction = InteractionState::Idle;
        self.update_viewport(self.initial_viewport);
    }

    /// World rectangle currently on screen
    pub fn get_visible_bounds(&self) -> Result<BoundingBox> {
        self.viewport.visible_bounds()
    }

    /// Adopts an externally produced transform, e.g. an animation frame
    pub fn apply_transform(&mut self, transform: &CanvasTransform) {
        self.update_viewport(transform.viewport);
    }

    fn linear_part(&self) -> AffineMatrix {
        AffineMatrix::uniform_scale(self.viewport.scale).then(&AffineMatrix::rotation(self.viewport.rotation))
    }

    fn update_viewport(&mut self, next: Viewport) {
        self.viewport = next;
        self.apply_constraints();
        self.notify();
    }

    fn apply_constraints(&mut self) {
        let clamped = self.constraints.clamp_scale(self.viewport.scale);
        if clamped != self.viewport.scale {
            log::trace!("clamping scale {} to {}", self.viewport.scale, clamped);
            self.viewport = self.viewport.zoomed_to(clamped, self.viewport.center());
        }

        if let Some(bounds) = self.constraints.bounding_box {
            self.keep_within(&bounds);
        }

        if self.constraints.snap_to_grid && !self.interaction.is_dragging() {
            let snapped = snap_to_grid(self.viewport.offset(), self.constraints.grid_size);
            self.viewport.x = snapped.x;
            self.viewport.y = snapped.y;
        }
    }

    /// Shifts the view until at least the soft-margin fraction of the visible
    /// rectangle overlaps `bounds` on each axis
    fn keep_within(&mut self, bounds: &BoundingBox) {
        let Ok(visible) = self.viewport.visible_bounds() else {
            return;
        };
        let margin = self.interaction_config.bounds_soft_margin;
        let shift_x = soft_shift(visible.min_x, visible.max_x, bounds.min_x, bounds.max_x, visible.width * margin);
        let shift_y = soft_shift(visible.min_y, visible.max_y, bounds.min_y, bounds.max_y, visible.height * margin);
        if shift_x == 0.0 && shift_y == 0.0 {
            return;
        }

        log::trace!("keeping view inside {:?}: shifting by ({}, {})", bounds, shift_x, shift_y);
        let screen = self.linear_part().transform_vector(Point::new(shift_x, shift_y));
        self.viewport.x -= screen.x;
        self.viewport.y -= screen.y;
    }

    fn notify(&mut self) {
        let transform = self.get_transform();
        if let Some(callback) = self.on_viewport_change.as_mut() {
            callback(&self.viewport);
        }
        if let Some(callback) = self.on_transform_change.as_mut() {
            callback(&transform);
        }
    }
}

/// World shift along one axis that restores the required overlap
fn soft_shift(visible_min: f64, visible_max: f64, bounds_min: f64, bounds_max: f64, margin: f64) -> f64 {
    if visible_max < bounds_min + margin {
        bounds_min + margin - visible_max
    } else if visible_min > bounds_max - margin {
        bounds_max - margin - visible_min
    } else {
        0.0
    }
}

impl CoordinateTransform for ViewportManager {
    fn screen_to_world(&mut self, point: Point) -> Result<Point> {
        Ok(self.viewport.inverse_matrix()?.transform_point(point))
    }

    fn world_to_screen(&mut self, point: Point) -> Result<Point> {
        Ok(self.viewport.matrix().transform_point(point))
    }
}

impl Default for ViewportManager {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self::new(viewport.width, viewport.height)
    }
}
