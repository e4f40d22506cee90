//! 2D affine matrix algebra.
//!
//! A matrix `{a, b, c, d, e, f}` stands for
//!
//! ```text
//! | a  c  e |
//! | b  d  f |
//! | 0  0  1 |
//! ```
//!
//! so a point maps as `x' = a·x + c·y + e`, `y' = b·x + d·y + f`. This is the
//! layout CSS `matrix()` and canvas `setTransform` use.
//!
//! Composition follows the row-vector reading order: [`multiply`]`(m1, m2)`
//! yields the transform that applies `m1` first and `m2` second. Every call
//! site that composes matrices depends on this, so keep it in mind when
//! reordering operands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use std::str::FromStr;

use crate::core::bounds::BoundingBox;
use crate::core::constants::{IDENTITY_TOLERANCE, SINGULAR_EPSILON};
use crate::core::geo::Point;
use crate::traits::Lerp;
use crate::{Result, ViewError};

/// Immutable 2D affine transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

/// Result of [`decompose`]. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decomposed {
    pub translation: Point,
    pub scale: Point,
    pub rotation: f64,
    pub skew: f64,
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// Counter-clockwise rotation in a y-up frame (clockwise on screen).
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn rotation_around_point(theta: f64, cx: f64, cy: f64) -> Self {
        multiply(
            &multiply(&Self::translation(-cx, -cy), &Self::rotation(theta)),
            &Self::translation(cx, cy),
        )
    }

    /// Shear by the given angles (radians) along x and y.
    pub fn skew(ax: f64, ay: f64) -> Self {
        Self::new(1.0, ay.tan(), ax.tan(), 1.0, 0.0, 0.0)
    }

    /// `self` followed by `next`
    pub fn then(&self, next: &AffineMatrix) -> AffineMatrix {
        multiply(self, next)
    }

    pub fn determinant(&self) -> f64 {
        determinant(self)
    }

    pub fn invert(&self) -> Result<AffineMatrix> {
        invert(self)
    }

    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() >= SINGULAR_EPSILON
    }

    pub fn transform_point(&self, point: Point) -> Point {
        transform_point(point, self)
    }

    /// Applies only the linear part, for deltas and directions
    pub fn transform_vector(&self, vector: Point) -> Point {
        Point::new(
            self.a * vector.x + self.c * vector.y,
            self.b * vector.x + self.d * vector.y,
        )
    }

    pub fn is_identity(&self) -> bool {
        is_identity(self, IDENTITY_TOLERANCE)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// CSS / canvas form: `matrix(a, b, c, d, e, f)` (column-major)
    pub fn to_css_string(&self) -> String {
        format!(
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }

    /// Row-major 3x3 form: `[[a, c, e], [b, d, f], [0, 0, 1]]`
    pub fn to_row_major_string(&self) -> String {
        format!(
            "[[{}, {}, {}], [{}, {}, {}], [0, 0, 1]]",
            self.a, self.c, self.e, self.b, self.d, self.f
        )
    }

    /// Parses the CSS `matrix(a, b, c, d, e, f)` form. Commas are optional,
    /// so the SVG `matrix(a b c d e f)` attribute form is accepted as well.
    pub fn parse_css(input: &str) -> Result<AffineMatrix> {
        let trimmed = input.trim();
        let body = trimmed
            .strip_prefix("matrix(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ViewError::InvalidMatrix(format!("expected matrix(...), got '{trimmed}'")))?;

        let values = body
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| ViewError::InvalidMatrix(format!("'{part}' is not a number")))
            })
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            &[a, b, c, d, e, f] => Ok(AffineMatrix::new(a, b, c, d, e, f)),
            other => Err(ViewError::InvalidMatrix(format!(
                "expected 6 components, got {}",
                other.len()
            ))),
        }
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `m1 * m2` applies `m1` first, matching [`multiply`].
impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    fn mul(self, rhs: AffineMatrix) -> AffineMatrix {
        multiply(&self, &rhs)
    }
}

impl fmt::Display for AffineMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string())
    }
}

impl FromStr for AffineMatrix {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        AffineMatrix::parse_css(s)
    }
}

/// Composes two transforms: the result applies `m1`, then `m2`.
pub fn multiply(m1: &AffineMatrix, m2: &AffineMatrix) -> AffineMatrix {
    AffineMatrix {
        a: m2.a * m1.a + m2.c * m1.b,
        b: m2.b * m1.a + m2.d * m1.b,
        c: m2.a * m1.c + m2.c * m1.d,
        d: m2.b * m1.c + m2.d * m1.d,
        e: m2.a * m1.e + m2.c * m1.f + m2.e,
        f: m2.b * m1.e + m2.d * m1.f + m2.f,
    }
}

pub fn determinant(m: &AffineMatrix) -> f64 {
    m.a * m.d - m.b * m.c
}

/// Exact algebraic inverse.
///
/// Fails with [`ViewError::SingularMatrix`] when `|det| < 1e-10`; callers must
/// handle that instead of falling back to identity.
pub fn invert(m: &AffineMatrix) -> Result<AffineMatrix> {
    let det = determinant(m);
    if det.abs() < SINGULAR_EPSILON {
        return Err(ViewError::SingularMatrix { determinant: det });
    }

    Ok(AffineMatrix {
        a: m.d / det,
        b: -m.b / det,
        c: -m.c / det,
        d: m.a / det,
        e: (m.c * m.f - m.d * m.e) / det,
        f: (m.b * m.e - m.a * m.f) / det,
    })
}

pub fn transform_point(point: Point, m: &AffineMatrix) -> Point {
    Point::new(
        m.a * point.x + m.c * point.y + m.e,
        m.b * point.x + m.d * point.y + m.f,
    )
}

pub fn transform_points(points: &[Point], m: &AffineMatrix) -> Vec<Point> {
    points.iter().map(|p| transform_point(*p, m)).collect()
}

/// Axis-aligned bounds of the transformed box.
///
/// All four corners are transformed, so rotated boxes come out right.
pub fn transform_bounding_box(bounds: &BoundingBox, m: &AffineMatrix) -> BoundingBox {
    let corners = bounds.corners().map(|corner| transform_point(corner, m));
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in corners {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingBox::new(min_x, min_y, max_x, max_y)
}

pub fn decompose(m: &AffineMatrix) -> Decomposed {
    let scale_x = (m.a * m.a + m.b * m.b).sqrt();
    let scale_y = (m.c * m.c + m.d * m.d).sqrt();
    Decomposed {
        translation: Point::new(m.e, m.f),
        scale: Point::new(scale_x, scale_y),
        rotation: m.b.atan2(m.a),
        skew: (m.a * m.c + m.b * m.d).atan2(m.a * m.d - m.b * m.c),
    }
}

/// Approximate inverse of [`decompose`] (skew is not reconstructed).
///
/// Order: translate to `origin`, scale, rotate, translate back, translate.
pub fn compose(translation: Point, scale: Point, rotation: f64, origin: Point) -> AffineMatrix {
    [
        AffineMatrix::translation(-origin.x, -origin.y),
        AffineMatrix::scale(scale.x, scale.y),
        AffineMatrix::rotation(rotation),
        AffineMatrix::translation(origin.x, origin.y),
        AffineMatrix::translation(translation.x, translation.y),
    ]
    .iter()
    .fold(AffineMatrix::IDENTITY, |acc, step| multiply(&acc, step))
}

pub fn is_identity(m: &AffineMatrix, tolerance: f64) -> bool {
    (m.a - 1.0).abs() <= tolerance
        && m.b.abs() <= tolerance
        && m.c.abs() <= tolerance
        && (m.d - 1.0).abs() <= tolerance
        && m.e.abs() <= tolerance
        && m.f.abs() <= tolerance
}

/// Component-wise linear blend, `t` clamped to `[0, 1]`.
///
/// This is not a polar decomposition blend: it is fine for small rotation
/// deltas and visibly shrinks the shape mid-way for large ones.
pub fn interpolate(from: &AffineMatrix, to: &AffineMatrix, t: f64) -> AffineMatrix {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: f64, y: f64| x.lerp(&y, t);
    AffineMatrix {
        a: lerp(from.a, to.a),
        b: lerp(from.b, to.b),
        c: lerp(from.c, to.c),
        d: lerp(from.d, to.d),
        e: lerp(from.e, to.e),
        f: lerp(from.f, to.f),
    }
}
