//! Engine-wide constants.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-10;

/// Default tolerance for [`crate::core::matrix::AffineMatrix::is_identity`].
pub const IDENTITY_TOLERANCE: f64 = 1e-10;

/// Half the circumference of the Web Mercator square, in metres.
pub const WEB_MERCATOR_EXTENT: f64 = 20_037_508.34;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Fraction of the viewport that must stay inside the world bounding box.
pub const DEFAULT_BOUNDS_SOFT_MARGIN: f64 = 0.1;

/// Default padding fraction used by `fit_to_content`.
pub const DEFAULT_FIT_PADDING: f64 = 0.1;

/// Wheel zoom step factors.
pub const DEFAULT_WHEEL_ZOOM_IN: f64 = 1.1;
pub const DEFAULT_WHEEL_ZOOM_OUT: f64 = 0.9;

/// Upper bound on the number of intersections `get_grid_points` will enumerate.
pub const MAX_GRID_POINTS: usize = 100_000;

/// Default animation duration in milliseconds.
pub const DEFAULT_ANIMATION_DURATION_MS: f64 = 300.0;
