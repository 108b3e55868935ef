//! Exact-radius proximity search ("nearby cases").

use crate::distance::distance_km;
use crate::grid::SpatialGrid;
use crate::types::GeoPoint;
use serde::Serialize;
use std::cmp::Ordering;

/// Default search radius in kilometers used by the hosting system.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 100.0;

/// A point matched by a proximity query, with its exact distance from the
/// query center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyMatch {
    pub point: GeoPoint,
    pub distance_km: f64,
}

/// Find all points within `radius_km` great-circle distance of the center,
/// sorted ascending by distance (ties broken by id).
///
/// Builds a one-shot [`SpatialGrid`] sized for `radius_km`. Callers issuing
/// many queries against the same point set should build the grid once and
/// use [`nearby_in_grid`] instead.
///
/// Empty input or a non-positive radius yields an empty result, never an
/// error. Points with malformed coordinates produce NaN distances and are
/// excluded by the radius filter.
///
/// # Examples
///
/// ```rust
/// use casegrid::{GeoPoint, nearby};
///
/// let points = vec![
///     GeoPoint::new("close", 0.1, 0.1),
///     GeoPoint::new("far", 1.0, 1.0),
/// ];
///
/// let matches = nearby(&points, 0.0, 0.0, 100.0);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].point.id, "close");
/// ```
pub fn nearby(
    points: &[GeoPoint],
    center_lat: f64,
    center_lon: f64,
    radius_km: f64,
) -> Vec<NearbyMatch> {
    if points.is_empty() || !(radius_km > 0.0) {
        return Vec::new();
    }

    let grid = SpatialGrid::build(points, radius_km);
    nearby_in_grid(&grid, center_lat, center_lon, radius_km)
}

/// [`nearby`] against a prebuilt grid.
///
/// The grid must index the point set being queried; it may have been built
/// for a different radius (the scan window is derived from the query
/// radius), though querying far above the build radius degrades the scan
/// toward a full sweep.
pub fn nearby_in_grid(
    grid: &SpatialGrid<'_>,
    center_lat: f64,
    center_lon: f64,
    radius_km: f64,
) -> Vec<NearbyMatch> {
    if !(radius_km > 0.0) {
        return Vec::new();
    }

    let points = grid.points();
    let mut matches: Vec<NearbyMatch> = grid
        .neighbors_within(center_lat, center_lon, radius_km)
        .into_iter()
        .filter_map(|idx| {
            let point = &points[idx as usize];
            let dist = distance_km(center_lat, center_lon, point.latitude, point.longitude);
            // NaN distances fail the comparison and drop out here.
            (dist <= radius_km).then(|| NearbyMatch {
                point: point.clone(),
                distance_km: dist,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.point.id.cmp(&b.point.id))
    });

    matches
}
