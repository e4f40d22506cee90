use crate::core::bounds::BoundingBox;
use crate::core::geo::Point;
use crate::{Result, ViewError};
use serde::{Deserialize, Serialize};

/// Raw input events as delivered by the host, in client (page) coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Touch(TouchEvent),
}

/// Mouse or pen pointer position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Scroll wheel step; negative `delta_y` scrolls towards the user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub client_x: f64,
    pub client_y: f64,
}

impl WheelEvent {
    pub fn new(delta_y: f64, client_x: f64, client_y: f64) -> Self {
        Self {
            delta_y,
            client_x,
            client_y,
        }
    }
}

/// Individual touch point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    pub fn new(id: u64, client_x: f64, client_y: f64) -> Self {
        Self {
            id,
            client_x,
            client_y,
        }
    }
}

/// Touch event; `touches` are the points still down, `changed_touches` the
/// ones that changed in this event (the only ones present on touch end)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TouchEvent {
    pub touches: Vec<TouchPoint>,
    pub changed_touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// First resolvable touch, preferring active touches over changed ones
    pub fn primary(&self) -> Option<&TouchPoint> {
        self.touches.first().or_else(|| self.changed_touches.first())
    }
}

/// The drawing surface events are delivered to
pub trait Surface {
    /// Surface rectangle in client coordinates
    fn bounding_rect(&self) -> BoundingBox;

    /// Surface size in CSS pixels
    fn size(&self) -> (f64, f64) {
        let rect = self.bounding_rect();
        (rect.width, rect.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Client coordinates to surface-local coordinates
    fn to_local(&self, client_x: f64, client_y: f64) -> Point {
        let rect = self.bounding_rect();
        Point::new(client_x - rect.min_x, client_y - rect.min_y)
    }
}

/// Fixed-geometry surface for headless hosts and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSurface {
    pub rect: BoundingBox,
    pub device_pixel_ratio: f64,
}

impl StaticSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            rect: BoundingBox::from_rect(0.0, 0.0, width, height),
            device_pixel_ratio: 1.0,
        }
    }

    /// Surface placed at `(left, top)` in client coordinates
    pub fn at(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            rect: BoundingBox::from_rect(left, top, width, height),
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }
}

impl Surface for StaticSurface {
    fn bounding_rect(&self) -> BoundingBox {
        self.rect
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }
}

/// Surface-local position of an event.
///
/// Touch events resolve to their primary touch and fail with
/// [`ViewError::MissingTouchPoint`] when neither list has one.
pub fn get_event_point(event: &InputEvent, surface: &dyn Surface) -> Result<Point> {
    match event {
        InputEvent::Pointer(pointer) => Ok(surface.to_local(pointer.client_x, pointer.client_y)),
        InputEvent::Wheel(wheel) => Ok(surface.to_local(wheel.client_x, wheel.client_y)),
        InputEvent::Touch(touch) => {
            let point = touch.primary().ok_or(ViewError::MissingTouchPoint)?;
            Ok(surface.to_local(point.client_x, point.client_y))
        }
    }
}

/// Surface-local positions of every active touch
pub fn touch_points(event: &TouchEvent, surface: &dyn Surface) -> Vec<Point> {
    event
        .touches
        .iter()
        .map(|t| surface.to_local(t.client_x, t.client_y))
        .collect()
}
