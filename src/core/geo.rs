use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

use crate::core::constants::{MAX_LATITUDE, WEB_MERCATOR_EXTENT};

/// Represents a point in screen, world or projected coordinates.
///
/// A point carries no tag saying which space it lives in; callers track that
/// by convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to spherical Web Mercator (EPSG:3857) metres
    pub fn to_mercator(&self) -> Point {
        lat_lng_to_web_mercator(self.lat, self.lng)
    }

    /// Creates a LatLng from Web Mercator metres
    pub fn from_mercator(point: Point) -> Self {
        web_mercator_to_lat_lng(point.x, point.y)
    }
}

/// Forward spherical Web Mercator projection.
///
/// Returns metres, with `x` in `[-20037508.34, 20037508.34]`. Latitudes
/// beyond the Mercator limit are clamped first so the result stays finite.
pub fn lat_lng_to_web_mercator(lat: f64, lng: f64) -> Point {
    let lat = LatLng::clamp_lat(lat);
    let x = lng * WEB_MERCATOR_EXTENT / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    Point::new(x, y * WEB_MERCATOR_EXTENT / 180.0)
}

/// Inverse spherical Web Mercator projection.
pub fn web_mercator_to_lat_lng(x: f64, y: f64) -> LatLng {
    let lng = x / WEB_MERCATOR_EXTENT * 180.0;
    let lat = (y / WEB_MERCATOR_EXTENT * PI).exp().atan() * 360.0 / PI - 90.0;
    LatLng::new(lat, lng)
}

/// A north/south/east/west geographic bounding box, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.north + self.south) / 2.0, (self.east + self.west) / 2.0)
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Longitude span in degrees
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }
}
