//! Prelude module for common canvasview types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use canvasview::prelude::*;`

pub use crate::core::{
    bounds::BoundingBox,
    config::{AnimationConfig, EngineOptions, EngineProfile, InteractionConfig},
    geo::{lat_lng_to_web_mercator, web_mercator_to_lat_lng, GeoBounds, LatLng, Point},
    manager::ViewportManager,
    matrix::{AffineMatrix, Decomposed},
    viewport::{CanvasConstraints, CanvasTransform, InteractionState, Viewport},
};

pub use crate::coords::{
    canvas_to_geo, convert_coordinates, create_canvas_coordinate_mapping, create_coordinate_mapping,
    create_geo_coordinate_system, geo_to_canvas, get_grid_points, snap_to_grid, CoordinateMapping,
    CoordinateSystem,
};

pub use crate::input::{
    get_event_point, InputEvent, PointerEvent, StaticSurface, Surface, TouchEvent, TouchPoint,
    WheelEvent,
};

pub use crate::animation::{
    create_spring_animation, pan_to, rotate_to, transition_to, zoom_to, AnimationHandle, Easing,
    SpringEasing, TransformAnimation, TransformAnimator, TransitionOptions,
};

pub use crate::runtime::{ClockScheduler, FrameHandle, FrameScheduler, ManualScheduler};

pub use crate::rendering::{DrawingContext, LineStyle, RenderContext};

pub use crate::traits::{CoordinateTransform, Lerp};

pub use crate::{Result, ViewError};

// Commonly used std types
pub use std::rc::Rc;
pub use std::time::Duration;
