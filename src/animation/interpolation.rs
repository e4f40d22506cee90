//! Eased blending of transform snapshots

use crate::animation::easing::Easing;
use crate::core::viewport::CanvasTransform;

pub use crate::traits::Lerp;

/// Blends `from` towards `to` at linear `progress`, reshaped by `easing`.
///
/// Progress is clamped to `[0, 1]` before easing, so the endpoints come back
/// exactly; curves that overshoot (elastic, springs) still extrapolate the
/// scalar fields in between.
pub fn interpolate_transform(
    from: &CanvasTransform,
    to: &CanvasTransform,
    progress: f64,
    easing: Easing,
) -> CanvasTransform {
    let eased = easing.apply(progress.clamp(0.0, 1.0));
    CanvasTransform::interpolate(from, to, eased)
}

/// `steps + 1` evenly spaced snapshots from `from` to `to`, both included
pub fn sample_transforms(
    from: &CanvasTransform,
    to: &CanvasTransform,
    easing: Easing,
    steps: usize,
) -> Vec<CanvasTransform> {
    if steps == 0 {
        return vec![*to];
    }
    (0..=steps)
        .map(|i| interpolate_transform(from, to, i as f64 / steps as f64, easing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Viewport;

    fn endpoints() -> (CanvasTransform, CanvasTransform) {
        let from = CanvasTransform::from_viewport(&Viewport::new(800.0, 600.0));
        let to = CanvasTransform::from_viewport(&Viewport {
            x: -120.0,
            y: 40.0,
            scale: 2.0,
            rotation: 0.5,
            ..Viewport::new(800.0, 600.0)
        });
        (from, to)
    }

    #[test]
    fn test_endpoints_exact_for_every_easing() {
        let (from, to) = endpoints();
        for easing in Easing::all() {
            assert_eq!(interpolate_transform(&from, &to, 0.0, *easing), from, "{easing}");
            assert_eq!(interpolate_transform(&from, &to, 1.0, *easing), to, "{easing}");
        }
    }

    #[test]
    fn test_eased_midpoint() {
        let (from, to) = endpoints();
        let mid = interpolate_transform(&from, &to, 0.5, Easing::EaseInQuad);
        assert!((mid.scale - 1.25).abs() < 1e-12);
        let mid = interpolate_transform(&from, &to, 0.5, Easing::Linear);
        assert!((mid.scale - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_progress_is_clamped() {
        let (from, to) = endpoints();
        assert_eq!(interpolate_transform(&from, &to, 7.0, Easing::Linear), to);
        assert_eq!(interpolate_transform(&from, &to, -1.0, Easing::Linear), from);
    }

    #[test]
    fn test_sample_transforms() {
        let (from, to) = endpoints();
        let samples = sample_transforms(&from, &to, Easing::EaseInOutCubic, 4);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], from);
        assert_eq!(samples[4], to);
        assert!(samples.windows(2).all(|w| w[0].scale <= w[1].scale));
        assert_eq!(sample_transforms(&from, &to, Easing::Linear, 0), vec![to]);
    }
}
