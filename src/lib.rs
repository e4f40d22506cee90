//! # canvasview
//!
//! A 2D affine transform and viewport engine for canvas-like surfaces.
//!
//! The crate converts between screen, world and geographic coordinates,
//! keeps an interactive pan/zoom/rotate viewport inside its constraints, and
//! animates transform snapshots on a host-provided frame scheduler. Drawing
//! is left to the host; the engine only computes the transform to draw with.

pub mod animation;
pub mod coords;
pub mod core;
pub mod input;
pub mod prelude;
pub mod rendering;
pub mod runtime;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::BoundingBox,
    config::{AnimationConfig, EngineOptions, EngineProfile, InteractionConfig},
    geo::{GeoBounds, LatLng, Point},
    manager::ViewportManager,
    matrix::AffineMatrix,
    viewport::{CanvasConstraints, CanvasTransform, InteractionState, Viewport},
};

pub use coords::{CoordinateMapping, CoordinateSystem};

pub use animation::{AnimationHandle, Easing, SpringEasing, TransformAnimation, TransformAnimator};

pub use runtime::{ClockScheduler, FrameHandle, FrameScheduler, ManualScheduler};

pub use traits::{CoordinateTransform, Lerp};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ViewError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("Singular matrix: determinant {determinant} is too close to zero to invert")]
    SingularMatrix { determinant: f64 },

    #[error("Touch event has no touch point")]
    MissingTouchPoint,

    #[error("Drawing context unavailable: {0}")]
    DrawingContextUnavailable(String),

    #[error("Animation '{id}' was cancelled")]
    Cancelled { id: String },

    #[error("Unknown easing function: {0}")]
    UnknownEasing(String),

    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = ViewError;
