//! Shared trait abstractions
//!
//! Interpolation and coordinate conversion show up in the matrix algebra, the
//! coordinate mappings, the viewport manager and the animator; these traits are
//! the common seam between them.

use crate::{core::geo::Point, Result};

/// Linear interpolation between two values of the same type.
///
/// `t` is not clamped, so eased progress that overshoots (elastic, back)
/// extrapolates past `other`. `t == 0` returns `self` and `t == 1` returns
/// `other` exactly.
pub trait Lerp {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        if t == 1.0 {
            *other
        } else {
            self + (other - self) * t
        }
    }
}

impl Lerp for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }
}

/// Bidirectional screen/world conversion.
///
/// Implementors may cache matrices lazily, hence `&mut self`. Conversions fail
/// only when the underlying transform is singular.
pub trait CoordinateTransform {
    fn screen_to_world(&mut self, point: Point) -> Result<Point>;

    fn world_to_screen(&mut self, point: Point) -> Result<Point>;

    fn screen_to_world_points(&mut self, points: &[Point]) -> Result<Vec<Point>> {
        points.iter().map(|p| self.screen_to_world(*p)).collect()
    }

    fn world_to_screen_points(&mut self, points: &[Point]) -> Result<Vec<Point>> {
        points.iter().map(|p| self.world_to_screen(*p)).collect()
    }
}
