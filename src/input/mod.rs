pub mod events;

// Re-export the essential types
pub use events::{
    get_event_point, touch_points, InputEvent, PointerEvent, StaticSurface, Surface, TouchEvent,
    TouchPoint, WheelEvent,
};
