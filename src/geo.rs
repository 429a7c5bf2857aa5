//! Geodesic bounding-box math for radius queries.
//!
//! The OpenSky states endpoint filters by an axis-aligned lat/lon box, but
//! callers think in terms of "everything within N km of here". This module
//! bridges the two: [`bounding_box_around`] turns a center point and a radius
//! into the box to query, using WGS84 geodesic destination points rather than
//! a crude degrees-per-km guess.

use geo::{Destination, Distance, Geodesic, Point};

use crate::errors::{Result, SkyringError};

const BEARING_NORTH: f64 = 0.0;
const BEARING_EAST: f64 = 90.0;
const BEARING_SOUTH: f64 = 180.0;
const BEARING_WEST: f64 = 270.0;

/// A position on the WGS84 ellipsoid in decimal degrees.
///
/// Construction validates the coordinate ranges, so a `GeoPoint` you hold is
/// always a real place: latitude in [-90, 90], longitude in [-180, 180],
/// both finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude/longitude degrees.
    ///
    /// # Errors
    ///
    /// Returns [`SkyringError::InvalidArgument`] if either coordinate is
    /// non-finite or outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SkyringError::InvalidArgument(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SkyringError::InvalidArgument(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    // geo::Point is (x, y) = (lon, lat)
    fn to_point(self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// An axis-aligned lat/lon rectangle, the spatial filter the API understands.
///
/// `min_lat <= max_lat` and `min_lon <= max_lon` hold for any query point
/// that is not within the radius of a pole or the antimeridian; those cases
/// can invert a bound and are not handled here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Computes the query box whose edges sit `radius_km` from `center`.
///
/// Four WGS84 geodesic destination points are taken from `center` along the
/// cardinal bearings; the north/south latitudes and east/west longitudes
/// become the box bounds. The point on each edge hit by its cardinal bearing
/// is exactly `radius_km` away, but the corners are farther, up to roughly
/// a factor of √2 for small boxes. The box is a conservative cover of the
/// radius disk, never a tight one; callers that need an exact disk must
/// filter the results themselves.
///
/// `radius_km = 0` collapses the box to `center` (modulo floating error).
///
/// # Errors
///
/// Returns [`SkyringError::InvalidArgument`] if `radius_km` is negative or
/// non-finite. Centers close enough to a pole for the box to cross it
/// produce an inverted (`min_lat > max_lat`) box rather than an error.
pub fn bounding_box_around(center: GeoPoint, radius_km: f64) -> Result<BoundingBox> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(SkyringError::InvalidArgument(format!(
            "radius {radius_km} km is not a non-negative distance"
        )));
    }

    let origin = center.to_point();
    let radius_m = radius_km * 1000.0;

    let north = Geodesic.destination(origin, BEARING_NORTH, radius_m);
    let east = Geodesic.destination(origin, BEARING_EAST, radius_m);
    let south = Geodesic.destination(origin, BEARING_SOUTH, radius_m);
    let west = Geodesic.destination(origin, BEARING_WEST, radius_m);

    Ok(BoundingBox {
        min_lat: south.y(),
        min_lon: west.x(),
        max_lat: north.y(),
        max_lon: east.x(),
    })
}

/// Geodesic (WGS84) distance between two points, in meters.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    Geodesic.distance(a.to_point(), b.to_point())
}
