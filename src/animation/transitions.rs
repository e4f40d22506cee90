use crate::animation::animator::{duration_from_ms, AnimationHandle, TransformAnimation, TransformAnimator};
use crate::animation::easing::Easing;
use crate::core::config::AnimationConfig;
use crate::core::geo::Point;
use crate::core::viewport::{CanvasTransform, Viewport};
use std::time::Duration;

/// Types of viewport transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionKind {
    /// Zoom to an absolute scale about a screen point (default: surface centre)
    Zoom { scale: f64, center: Option<Point> },
    /// Move the world origin to an absolute screen offset
    Pan { translation: Point },
    /// Rotate to an absolute angle about a screen point (default: surface centre)
    Rotate { angle: f64, center: Option<Point> },
    /// Blend to an arbitrary viewport
    To { target: Viewport },
}

impl TransitionKind {
    /// Animation key used when the caller does not pick one
    pub fn key(&self) -> &'static str {
        match self {
            Self::Zoom { .. } => "zoom",
            Self::Pan { .. } => "pan",
            Self::Rotate { .. } => "rotate",
            Self::To { .. } => "transition",
        }
    }

    pub fn target_viewport(&self, current: &Viewport) -> Viewport {
        match *self {
            Self::Zoom { scale, center } => current.zoomed_to(scale, center.unwrap_or_else(|| current.center())),
            Self::Pan { translation } => Viewport {
                x: translation.x,
                y: translation.y,
                ..*current
            },
            Self::Rotate { angle, center } => {
                current.rotated_by(angle - current.rotation, center.unwrap_or_else(|| current.center()))
            }
            Self::To { target } => target,
        }
    }

    fn easing(&self, config: &AnimationConfig) -> Easing {
        match self {
            Self::Zoom { .. } => config.zoom_easing,
            Self::Pan { .. } => config.pan_easing,
            Self::Rotate { .. } => config.rotate_easing,
            Self::To { .. } => config.default_easing,
        }
    }
}

/// Per-call overrides on top of an [`AnimationConfig`]
#[derive(Debug, Clone, Default)]
pub struct TransitionOptions {
    pub config: AnimationConfig,
    pub duration: Option<Duration>,
    pub easing: Option<Easing>,
    pub key: Option<String>,
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: AnimationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Animates from `from` towards the target `kind` derives from it.
///
/// Constraints are not applied here; they take effect when the frames are
/// fed back into a viewport manager.
pub fn start_transition<F>(
    animator: &TransformAnimator,
    from: &CanvasTransform,
    kind: TransitionKind,
    options: TransitionOptions,
    on_update: F,
) -> AnimationHandle
where
    F: FnMut(&CanvasTransform) + 'static,
{
    let to = CanvasTransform::from_viewport(&kind.target_viewport(&from.viewport));
    let duration = options
        .duration
        .unwrap_or_else(|| duration_from_ms(options.config.default_duration_ms));
    let easing = options.easing.unwrap_or_else(|| kind.easing(&options.config));
    let key = options.key.unwrap_or_else(|| kind.key().to_string());

    let animation = TransformAnimation::new(*from, to)
        .with_duration(duration)
        .with_easing(easing)
        .on_update(on_update);
    animator.animate(key, animation)
}

pub fn zoom_to<F>(
    animator: &TransformAnimator,
    from: &CanvasTransform,
    scale: f64,
    center: Option<Point>,
    options: TransitionOptions,
    on_update: F,
) -> AnimationHandle
where
    F: FnMut(&CanvasTransform) + 'static,
{
    start_transition(animator, from, TransitionKind::Zoom { scale, center }, options, on_update)
}

pub fn pan_to<F>(
    animator: &TransformAnimator,
    from: &CanvasTransform,
    translation: Point,
    options: TransitionOptions,
    on_update: F,
) -> AnimationHandle
where
    F: FnMut(&CanvasTransform) + 'static,
{
    start_transition(animator, from, TransitionKind::Pan { translation }, options, on_update)
}

pub fn rotate_to<F>(
    animator: &TransformAnimator,
    from: &CanvasTransform,
    angle: f64,
    center: Option<Point>,
    options: TransitionOptions,
    on_update: F,
) -> AnimationHandle
where
    F: FnMut(&CanvasTransform) + 'static,
{
    start_transition(animator, from, TransitionKind::Rotate { angle, center }, options, on_update)
}

pub fn transition_to<F>(
    animator: &TransformAnimator,
    from: &CanvasTransform,
    to: &CanvasTransform,
    options: TransitionOptions,
    on_update: F,
) -> AnimationHandle
where
    F: FnMut(&CanvasTransform) + 'static,
{
    start_transition(
        animator,
        from,
        TransitionKind::To { target: to.viewport },
        options,
        on_update,
    )
}
