//! Fixed-size lat/lon cell index powering proximity queries.
//!
//! Points are bucketed into square degree cells sized from the query radius
//! so a radius query only scans the query point's cell neighborhood instead
//! of the whole set. Longitude wraparound is not resolved at assignment
//! time; it is handled during the neighbor scan, which also widens the
//! longitude window toward the poles where degrees of longitude shrink.

use crate::distance::EARTH_RADIUS_KM;
use crate::types::GeoPoint;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::f64::consts::FRAC_PI_2;

/// Approximate kilometers per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Lower bound on the cell size so tiny radii do not produce a degenerate
/// number of cells.
pub const MIN_CELL_SIZE_DEG: f64 = 0.01;

/// Latitude beyond which the longitude scan degenerates to a full
/// latitude-band scan.
const POLE_BAND_LAT_DEG: f64 = 89.0;

type CellKey = (i64, i64);

/// An immutable spatial index over a borrowed point slice.
///
/// The grid holds indices into the caller's slice, not copies of the
/// points. It is read-only after construction and freely shareable by
/// reference; rebuild it whenever the underlying point set changes or the
/// radius scale changes materially (a grid built for a 50 km radius still
/// answers a 500 km query correctly, but the scan degenerates toward a
/// full sweep).
pub struct SpatialGrid<'a> {
    points: &'a [GeoPoint],
    cells: FxHashMap<CellKey, Vec<u32>>,
    cell_size_deg: f64,
    radius_km: f64,
}

impl<'a> SpatialGrid<'a> {
    /// Bucket `points` into cells sized for `radius_km`.
    ///
    /// Building over zero points yields an empty grid; queries against it
    /// return empty candidate sets. Malformed coordinates are not rejected
    /// here; they land in a degenerate cell and are eliminated by the
    /// exact distance check in the query layers.
    pub fn build(points: &'a [GeoPoint], radius_km: f64) -> Self {
        let cell_size_deg = (radius_km / KM_PER_DEGREE).max(MIN_CELL_SIZE_DEG);

        let mut cells: FxHashMap<CellKey, Vec<u32>> = FxHashMap::default();
        for (idx, point) in points.iter().enumerate() {
            let key = (
                Self::cell_index(point.latitude, cell_size_deg),
                Self::cell_index(point.longitude, cell_size_deg),
            );
            cells.entry(key).or_default().push(idx as u32);
        }

        log::debug!(
            "built spatial grid: {} points in {} cells (cell size {:.4} deg)",
            points.len(),
            cells.len(),
            cell_size_deg
        );

        Self {
            points,
            cells,
            cell_size_deg,
            radius_km,
        }
    }

    /// The point slice this grid indexes.
    pub fn points(&self) -> &'a [GeoPoint] {
        self.points
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell edge length in degrees.
    pub fn cell_size_deg(&self) -> f64 {
        self.cell_size_deg
    }

    /// The radius the grid was sized for.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Gather candidate point indices for a radius query around
    /// `(lat, lon)`.
    ///
    /// The result is a superset of the exact answer: every point within
    /// `radius_km` is included, but so may points slightly beyond it.
    /// Callers must re-filter with an exact great-circle distance check.
    /// Indices are returned sorted ascending so downstream iteration is
    /// deterministic.
    pub fn neighbors_within(&self, lat: f64, lon: f64, radius_km: f64) -> Vec<u32> {
        if self.cells.is_empty() || !(radius_km > 0.0) {
            return Vec::new();
        }

        if !lat.is_finite() || !lon.is_finite() {
            log::warn!("Rejecting neighbor query with non-finite coordinates");
            return Vec::new();
        }

        // Latitude rows are linear in distance. Clamp the step count to the
        // full latitude span so an oversized query radius against a
        // fine-celled grid cannot overflow the cast or walk a garbage range.
        let lat_steps = (radius_km / (self.cell_size_deg * KM_PER_DEGREE)).ceil();
        let steps = lat_steps.min((180.0 / self.cell_size_deg).ceil()) as i64 + 1;
        let row = Self::cell_index(lat, self.cell_size_deg);
        let row_lo = row - steps;
        let row_hi = row + steps;

        // The longitude span of a great-circle cap is
        // asin(sin(d/R) / cos(lat)), reached at the cap's tangent latitude
        // rather than the center's; a linear 1/cos(lat) widening undershoots
        // it at continental radii. When the cap reaches a pole
        // (cos(lat) <= sin(d/R), or d/R >= 90 degrees, or the query sits in
        // the polar band where cos(lat) vanishes) every longitude is in
        // range, so scan every occupied cell in the latitude rows instead.
        let cos_lat = lat.to_radians().cos().abs();
        let cap_rad = radius_km / EARTH_RADIUS_KM;
        let full_band = lat.abs() >= POLE_BAND_LAT_DEG
            || cap_rad >= FRAC_PI_2
            || cos_lat <= cap_rad.sin();

        let mut candidates: Vec<u32> = Vec::new();

        if full_band {
            for (&(cell_lat, _), indices) in &self.cells {
                if (row_lo..=row_hi).contains(&cell_lat) {
                    candidates.extend_from_slice(indices);
                }
            }
        } else {
            let lon_window_deg = (cap_rad.sin() / cos_lat).asin().to_degrees();
            let col_steps = (lon_window_deg / self.cell_size_deg).ceil() as i64 + 1;

            // Base longitudes for the column scan: the query longitude,
            // plus its +/-360 images when the window crosses the
            // antimeridian. Points on the far side live in far-apart cell
            // columns and are only reachable through the wrapped image.
            let mut base_lons: SmallVec<[f64; 3]> = SmallVec::new();
            base_lons.push(lon);
            if lon + lon_window_deg > 180.0 {
                base_lons.push(lon - 360.0);
            }
            if lon - lon_window_deg < -180.0 {
                base_lons.push(lon + 360.0);
            }

            let mut cols: SmallVec<[i64; 16]> = SmallVec::new();
            for &base in &base_lons {
                let col = Self::cell_index(base, self.cell_size_deg);
                for candidate_col in (col - col_steps)..=(col + col_steps) {
                    if !cols.contains(&candidate_col) {
                        cols.push(candidate_col);
                    }
                }
            }

            for cell_lat in row_lo..=row_hi {
                for &cell_lon in &cols {
                    if let Some(indices) = self.cells.get(&(cell_lat, cell_lon)) {
                        candidates.extend_from_slice(indices);
                    }
                }
            }
        }

        candidates.sort_unstable();
        candidates
    }

    #[inline]
    fn cell_index(value: f64, cell_size_deg: f64) -> i64 {
        (value / cell_size_deg).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::distance_km;

    fn grid_points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new("a", 0.10, 0.10),
            GeoPoint::new("b", 0.12, 0.12),
            GeoPoint::new("c", 0.08, 0.08),
            GeoPoint::new("d", 10.0, 10.0),
            GeoPoint::new("e", -45.0, 170.0),
        ]
    }

    #[test]
    fn test_empty_grid() {
        let points: Vec<GeoPoint> = Vec::new();
        let grid = SpatialGrid::build(&points, 50.0);
        assert!(grid.is_empty());
        assert_eq!(grid.cell_count(), 0);
        assert!(grid.neighbors_within(0.0, 0.0, 50.0).is_empty());
    }

    #[test]
    fn test_cell_size_derivation_and_clamp() {
        let points = grid_points();

        let grid = SpatialGrid::build(&points, 50.0);
        assert!((grid.cell_size_deg() - 50.0 / 111.0).abs() < 1e-12);

        // Tiny radii clamp to the minimum cell size.
        let grid = SpatialGrid::build(&points, 0.001);
        assert_eq!(grid.cell_size_deg(), MIN_CELL_SIZE_DEG);
    }

    #[test]
    fn test_candidates_cover_radius() {
        let points = grid_points();
        let grid = SpatialGrid::build(&points, 50.0);

        let candidates = grid.neighbors_within(0.1, 0.1, 50.0);
        for (idx, point) in points.iter().enumerate() {
            let dist = distance_km(0.1, 0.1, point.latitude, point.longitude);
            if dist <= 50.0 {
                assert!(
                    candidates.contains(&(idx as u32)),
                    "point {} at {:.1} km missing from candidates",
                    point.id,
                    dist
                );
            }
        }
        // Far-away points are outside the scanned neighborhood entirely.
        assert!(!candidates.contains(&3));
        assert!(!candidates.contains(&4));
    }

    #[test]
    fn test_candidates_sorted_ascending() {
        let points = grid_points();
        let grid = SpatialGrid::build(&points, 50.0);
        let candidates = grid.neighbors_within(0.1, 0.1, 50.0);
        assert!(candidates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_antimeridian_columns_wrapped() {
        let points = vec![
            GeoPoint::new("west", 0.0, 179.9),
            GeoPoint::new("east", 0.0, -179.9),
        ];
        let grid = SpatialGrid::build(&points, 50.0);

        let candidates = grid.neighbors_within(0.0, 179.9, 50.0);
        assert!(candidates.contains(&0));
        assert!(candidates.contains(&1));

        let candidates = grid.neighbors_within(0.0, -179.95, 50.0);
        assert!(candidates.contains(&0));
        assert!(candidates.contains(&1));
    }

    #[test]
    fn test_polar_band_covers_all_longitudes() {
        let points: Vec<GeoPoint> = (0..12)
            .map(|i| GeoPoint::new(format!("p{}", i), 89.5, -180.0 + 30.0 * i as f64))
            .collect();
        let grid = SpatialGrid::build(&points, 100.0);

        let candidates = grid.neighbors_within(90.0, 0.0, 100.0);
        assert_eq!(candidates.len(), points.len());
    }

    #[test]
    fn test_high_latitude_widens_longitude_window() {
        // At 80 degrees north a degree of longitude is ~19 km, so a 100 km
        // neighbor sits ~5 degrees away. An unwidened window would miss it.
        let points = vec![
            GeoPoint::new("x", 80.0, 0.0),
            GeoPoint::new("y", 80.0, 5.0),
        ];
        let grid = SpatialGrid::build(&points, 100.0);

        let dist = distance_km(80.0, 0.0, 80.0, 5.0);
        assert!(dist < 100.0);

        let candidates = grid.neighbors_within(80.0, 0.0, 100.0);
        assert!(candidates.contains(&1));
    }

    #[test]
    fn test_continental_radius_cap_reaches_pole() {
        // A 3900 km cap centered at 60N contains the pole, so points at any
        // longitude in the covered latitude rows are candidates. The point
        // sits ~3828 km away but 150 degrees of longitude east.
        let points = vec![GeoPoint::new("polar", 85.0, 150.0)];
        let grid = SpatialGrid::build(&points, 3900.0);

        let dist = distance_km(60.0, 0.0, 85.0, 150.0);
        assert!(dist < 3900.0);

        let candidates = grid.neighbors_within(60.0, 0.0, 3900.0);
        assert!(candidates.contains(&0));
    }

    #[test]
    fn test_wide_cap_longitude_window() {
        // Cap centered at 45N with a 5000 km radius stops just short of the
        // pole; its true longitude span is ~87 degrees, well beyond the
        // ~64 degrees a linear 1/cos(lat) widening would scan. Query a
        // fine-celled prebuilt grid so the window math, not the cell
        // granularity, decides.
        let points = vec![GeoPoint::new("high-east", 87.0, 85.0)];
        let grid = SpatialGrid::build(&points, 50.0);

        let dist = distance_km(45.0, 0.0, 87.0, 85.0);
        assert!(dist < 5000.0);

        let candidates = grid.neighbors_within(45.0, 0.0, 5000.0);
        assert!(candidates.contains(&0));
    }

    #[test]
    fn test_extreme_radius_query_does_not_overflow() {
        let points = grid_points();
        let grid = SpatialGrid::build(&points, 50.0);

        for radius in [f64::INFINITY, f64::MAX, 1e12] {
            let candidates = grid.neighbors_within(0.0, 0.0, radius);
            assert_eq!(candidates.len(), points.len(), "radius {}", radius);
        }
    }

    #[test]
    fn test_non_finite_query_returns_empty() {
        let points = grid_points();
        let grid = SpatialGrid::build(&points, 50.0);
        assert!(grid.neighbors_within(f64::NAN, 0.0, 50.0).is_empty());
        assert!(grid.neighbors_within(0.0, f64::INFINITY, 50.0).is_empty());
    }

    #[test]
    fn test_invalid_radius_returns_empty() {
        let points = grid_points();
        let grid = SpatialGrid::build(&points, 50.0);
        assert!(grid.neighbors_within(0.1, 0.1, 0.0).is_empty());
        assert!(grid.neighbors_within(0.1, 0.1, -5.0).is_empty());
        assert!(grid.neighbors_within(0.1, 0.1, f64::NAN).is_empty());
    }

    #[test]
    fn test_larger_query_radius_than_build_radius() {
        // The scan window is derived from the query radius, so a grid built
        // for a smaller radius still returns every point in range.
        let points = vec![
            GeoPoint::new("near", 0.0, 0.0),
            GeoPoint::new("mid", 2.0, 0.0),
            GeoPoint::new("far", 4.0, 0.0),
        ];
        let grid = SpatialGrid::build(&points, 50.0);

        let candidates = grid.neighbors_within(0.0, 0.0, 500.0);
        assert!(candidates.contains(&0));
        assert!(candidates.contains(&1));
        assert!(candidates.contains(&2));
    }
}
