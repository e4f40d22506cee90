pub mod animator;
pub mod easing;
pub mod interpolation;
pub mod transitions;

// Re-export commonly used types and functions for convenience
pub use animator::{AnimationHandle, TransformAnimation, TransformAnimator};
pub use easing::{create_spring_animation, Easing, SpringEasing, SpringRegime};
pub use interpolation::{interpolate_transform, sample_transforms};
pub use transitions::{
    pan_to, rotate_to, start_transition, transition_to, zoom_to, TransitionKind, TransitionOptions,
};
