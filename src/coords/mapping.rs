use crate::core::constants::SINGULAR_EPSILON;
use crate::core::geo::Point;
use crate::core::matrix::AffineMatrix;
use crate::core::viewport::Viewport;
use crate::traits::CoordinateTransform;
use crate::{Result, ViewError};
use serde::{Deserialize, Serialize};

/// A world coordinate frame described relative to the viewport frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateSystem {
    /// Viewport-space position of the world origin
    pub origin: Point,
    /// World units per viewport unit along x
    pub scale_x: f64,
    /// World units per viewport unit along y
    pub scale_y: f64,
    /// Rotation of the world frame in radians
    pub rotation: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl CoordinateSystem {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Axis scale with the flips folded in
    pub fn axis_scale(&self) -> Point {
        Point::new(
            if self.flip_x { -self.scale_x } else { self.scale_x },
            if self.flip_y { -self.scale_y } else { self.scale_y },
        )
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

/// Cached screen/world mapping for one viewport and coordinate system.
///
/// The forward (screen to world) matrix and its inverse are computed lazily
/// and dropped whenever the viewport or system changes.
#[derive(Debug, Clone)]
pub struct CoordinateMapping {
    viewport: Viewport,
    system: CoordinateSystem,
    forward: Option<AffineMatrix>,
    inverse: Option<AffineMatrix>,
}

impl CoordinateMapping {
    pub fn new(viewport: Viewport, system: CoordinateSystem) -> Self {
        Self {
            viewport,
            system,
            forward: None,
            inverse: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn system(&self) -> &CoordinateSystem {
        &self.system
    }

    pub fn is_computed(&self) -> bool {
        self.forward.is_some() && self.inverse.is_some()
    }

    pub fn invalidate(&mut self) {
        self.forward = None;
        self.inverse = None;
    }

    /// Builds both matrices if either is missing
    pub fn ensure_computed(&mut self) -> Result<(AffineMatrix, AffineMatrix)> {
        if let (Some(forward), Some(inverse)) = (self.forward, self.inverse) {
            return Ok((forward, inverse));
        }

        let forward = self.build_forward()?;
        let inverse = forward.invert().map_err(|err| {
            log::warn!("coordinate system {:?} is not invertible: {}", self.system, err);
            err
        })?;
        self.forward = Some(forward);
        self.inverse = Some(inverse);
        Ok((forward, inverse))
    }

    fn build_forward(&self) -> Result<AffineMatrix> {
        let scale = self.viewport.scale;
        if scale.abs() < SINGULAR_EPSILON {
            log::warn!("viewport scale {} cannot be inverted", scale);
            return Err(ViewError::SingularMatrix {
                determinant: scale * scale,
            });
        }
        let axis = self.system.axis_scale();

        Ok(AffineMatrix::translation(-self.viewport.x, -self.viewport.y)
            .then(&AffineMatrix::uniform_scale(1.0 / scale))
            .then(&AffineMatrix::rotation(-self.viewport.rotation))
            .then(&AffineMatrix::translation(-self.system.origin.x, -self.system.origin.y))
            .then(&AffineMatrix::rotation(-self.system.rotation))
            .then(&AffineMatrix::scale(axis.x, axis.y)))
    }

    /// Screen-to-world matrix
    pub fn get_matrix(&mut self) -> Result<AffineMatrix> {
        Ok(self.ensure_computed()?.0)
    }

    /// World-to-screen matrix
    pub fn get_inverse_matrix(&mut self) -> Result<AffineMatrix> {
        Ok(self.ensure_computed()?.1)
    }

    /// Replaces the coordinate system and drops the cached matrices
    pub fn update_system(&mut self, system: CoordinateSystem) {
        self.system = system;
        self.invalidate();
    }

    /// Replaces the viewport and drops the cached matrices
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.invalidate();
    }
}

impl CoordinateTransform for CoordinateMapping {
    fn screen_to_world(&mut self, point: Point) -> Result<Point> {
        let (forward, _) = self.ensure_computed()?;
        Ok(forward.transform_point(point))
    }

    fn world_to_screen(&mut self, point: Point) -> Result<Point> {
        let (_, inverse) = self.ensure_computed()?;
        Ok(inverse.transform_point(point))
    }
}

pub fn create_coordinate_mapping(viewport: Viewport, system: CoordinateSystem) -> CoordinateMapping {
    CoordinateMapping::new(viewport, system)
}

/// Mapping for a bare canvas with the world origin at its centre.
///
/// With `cartesian` set the y axis is flipped so world y grows upwards.
pub fn create_canvas_coordinate_mapping(width: f64, height: f64, cartesian: bool) -> CoordinateMapping {
    let system = CoordinateSystem {
        origin: Point::new(width / 2.0, height / 2.0),
        flip_y: cartesian,
        ..CoordinateSystem::default()
    };
    CoordinateMapping::new(Viewport::new(width, height), system)
}

/// Carries a world point of one mapping into the world of another through
/// screen space. Exact only when both share the same screen definition.
pub fn convert_coordinates(
    point: Point,
    from: &mut CoordinateMapping,
    to: &mut CoordinateMapping,
) -> Result<Point> {
    let screen = from.world_to_screen(point)?;
    to.screen_to_world(screen)
}
