//! Screen, world and geographic coordinate conversion

pub mod geo;
pub mod grid;
pub mod mapping;

pub use crate::core::geo::{lat_lng_to_web_mercator, web_mercator_to_lat_lng};
pub use geo::{canvas_to_geo, create_geo_coordinate_system, create_geo_mapping, geo_to_canvas};
pub use grid::{get_grid_points, snap_to_grid};
pub use mapping::{
    convert_coordinates, create_canvas_coordinate_mapping, create_coordinate_mapping,
    CoordinateMapping, CoordinateSystem,
};
