//! # Geometry Primitives
//!
//! `Location` is a validated latitude/longitude pair; `Geofence` is a closed
//! set of region shapes with a point-containment predicate.
//!
//! Circle containment uses great-circle (haversine) distance on a spherical
//! earth, so radii are in meters. Rectangles and polygons are evaluated in
//! plain latitude/longitude coordinates.

use super::errors::GeometryError;

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A point on the earth's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    lat: f64,
    lon: f64,
}

impl Location {
    /// Create a location, rejecting coordinates outside
    /// latitude [-90, 90] and longitude [-180, 180] (NaN included).
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeometryError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeometryError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_meters(&self, other: &Location) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_METERS * c
    }
}

/// An immutable spatial region.
#[derive(Debug, Clone, PartialEq)]
pub enum Geofence {
    /// All points within `radius_meters` of `center`. Radius 0 admits only
    /// the center point itself.
    Circle { center: Location, radius_meters: f64 },

    /// Latitude/longitude bounding box. When `south_west.lon()` is greater
    /// than `north_east.lon()` the box wraps across the antimeridian.
    Rectangle {
        south_west: Location,
        north_east: Location,
    },

    /// Simple polygon in lat/lon space, implicitly closed.
    Polygon { vertices: Vec<Location> },
}

impl Geofence {
    pub fn circle(center: Location, radius_meters: f64) -> Result<Self, GeometryError> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(GeometryError::InvalidRadius(radius_meters));
        }
        Ok(Self::Circle {
            center,
            radius_meters,
        })
    }

    pub fn rectangle(south_west: Location, north_east: Location) -> Result<Self, GeometryError> {
        if south_west.lat() > north_east.lat() {
            return Err(GeometryError::InvertedRectangle {
                south: south_west.lat(),
                north: north_east.lat(),
            });
        }
        Ok(Self::Rectangle {
            south_west,
            north_east,
        })
    }

    pub fn polygon(vertices: Vec<Location>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::DegeneratePolygon(vertices.len()));
        }
        Ok(Self::Polygon { vertices })
    }

    /// Whether `location` lies inside this region (boundary included for
    /// circles and rectangles).
    pub fn contains(&self, location: &Location) -> bool {
        match self {
            Self::Circle {
                center,
                radius_meters,
            } => center.distance_meters(location) <= *radius_meters,
            Self::Rectangle {
                south_west,
                north_east,
            } => {
                let lat_ok = (south_west.lat()..=north_east.lat()).contains(&location.lat());
                let (west, east) = (south_west.lon(), north_east.lon());
                let lon_ok = if west <= east {
                    (west..=east).contains(&location.lon())
                } else {
                    location.lon() >= west || location.lon() <= east
                };
                lat_ok && lon_ok
            }
            Self::Polygon { vertices } => polygon_contains(vertices, location),
        }
    }
}

/// Even-odd ray casting with longitude as x and latitude as y.
///
/// Fewer than three vertices enclose nothing.
fn polygon_contains(vertices: &[Location], point: &Location) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let (x, y) = (point.lon(), point.lat());
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].lon(), vertices[i].lat());
        let (xj, yj) = (vertices[j].lon(), vertices[j].lat());
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
