use crate::coords::mapping::{CoordinateMapping, CoordinateSystem};
use crate::core::geo::{GeoBounds, LatLng, Point};
use crate::core::viewport::Viewport;
use crate::traits::CoordinateTransform;
use crate::Result;

/// Coordinate system whose world is `(lng, lat)` in degrees, sized so that
/// `bounds` exactly fills a `width` x `height` pixel canvas.
///
/// Latitude grows northward while screen y grows downward, so `flip_y` is
/// set. Degenerate bounds or sizes produce a zero axis scale, which the
/// mapping reports as a singular matrix on first use.
pub fn create_geo_coordinate_system(bounds: &GeoBounds, width: f64, height: f64) -> CoordinateSystem {
    let scale_x = if width > 0.0 { bounds.lng_span() / width } else { 0.0 };
    let scale_y = if height > 0.0 { bounds.lat_span() / height } else { 0.0 };

    let origin = Point::new(
        if scale_x != 0.0 { -bounds.west / scale_x } else { 0.0 },
        if scale_y != 0.0 { bounds.north / scale_y } else { 0.0 },
    );

    CoordinateSystem {
        origin,
        scale_x,
        scale_y,
        rotation: 0.0,
        flip_x: false,
        flip_y: true,
    }
}

/// Mapping between an untransformed canvas and the geographic bounds it shows
pub fn create_geo_mapping(bounds: &GeoBounds, width: f64, height: f64) -> CoordinateMapping {
    CoordinateMapping::new(
        Viewport::new(width, height),
        create_geo_coordinate_system(bounds, width, height),
    )
}

/// Canvas pixel of a geographic coordinate
pub fn geo_to_canvas(coord: &LatLng, bounds: &GeoBounds, width: f64, height: f64) -> Result<Point> {
    create_geo_mapping(bounds, width, height).world_to_screen(Point::new(coord.lng, coord.lat))
}

/// Geographic coordinate under a canvas pixel
pub fn canvas_to_geo(point: Point, bounds: &GeoBounds, width: f64, height: f64) -> Result<LatLng> {
    let world = create_geo_mapping(bounds, width, height).screen_to_world(point)?;
    Ok(LatLng::new(world.y, world.x))
}
