//! Great-circle distance on a spherical Earth.

use geo::Point;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two coordinate pairs using
/// the haversine formula.
///
/// Pure and total: out-of-range or non-finite degrees still produce a
/// mathematically defined (possibly NaN) result without panicking. The
/// formula is symmetric in its arguments, so
/// `distance_km(a, b) == distance_km(b, a)` holds exactly.
///
/// # Returns
///
/// Distance in kilometers.
///
/// # Examples
///
/// ```rust
/// use casegrid::distance_km;
///
/// // NYC to LA, roughly 3936 km.
/// let dist = distance_km(40.7128, -74.0060, 34.0522, -118.2437);
/// assert!(dist > 3_900.0 && dist < 4_000.0);
/// ```
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate the haversine distance in kilometers between two `geo` points
/// (x = longitude, y = latitude).
pub fn distance_between(a: Point, b: Point) -> f64 {
    distance_km(a.y(), a.x(), b.y(), b.x())
}
