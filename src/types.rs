//! Core data types: case points, hotspots, and clustering configuration.
//!
//! All types are plain serializable values. Coordinates are WGS84 degrees
//! with latitude in [-90, 90] and longitude in [-180, 180].

use crate::error::{CasegridError, Result};
use geo::Point;
use serde::{Deserialize, Serialize};

/// A geolocated case record, as handed to the engine by the hosting system.
///
/// Immutable once constructed. Identifiers are expected to be unique within
/// one invocation's input set, but the engine does not enforce this:
/// duplicate ids are simply both returned when both match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Opaque case identifier.
    pub id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point without validating its coordinates.
    ///
    /// The engine tolerates malformed coordinates (they produce degenerate
    /// distances and are filtered by the exact-radius check); callers that
    /// ingest untrusted data should prefer [`GeoPoint::try_new`].
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
        }
    }

    /// Create a point, validating that both coordinates are finite and in
    /// the standard WGS84 ranges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use casegrid::GeoPoint;
    ///
    /// assert!(GeoPoint::try_new("case-1", 40.7128, -74.0060).is_ok());
    /// assert!(GeoPoint::try_new("case-2", 95.0, 0.0).is_err());
    /// assert!(GeoPoint::try_new("case-3", 0.0, f64::NAN).is_err());
    /// ```
    pub fn try_new(id: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() {
            return Err(CasegridError::InvalidInput(format!(
                "Latitude must be finite, got: {}",
                latitude
            )));
        }

        if !longitude.is_finite() {
            return Err(CasegridError::InvalidInput(format!(
                "Longitude must be finite, got: {}",
                longitude
            )));
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CasegridError::InvalidInput(format!(
                "Latitude out of range [-90.0, 90.0]: {}",
                latitude
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CasegridError::InvalidInput(format!(
                "Longitude out of range [-180.0, 180.0]: {}",
                longitude
            )));
        }

        Ok(Self::new(id, latitude, longitude))
    }

    /// The point's position as a `geo::Point` (x = longitude, y = latitude).
    pub fn position(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// A geographic cluster of cases anchored at a seed point.
///
/// Every member lies within `radius_km` great-circle distance of the seed
/// point (not necessarily of the centroid). The centroid is the arithmetic
/// mean of member coordinates; it is informational only and inaccurate very
/// close to the poles or across the antimeridian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    /// Mean latitude of the members.
    pub center_latitude: f64,
    /// Mean longitude of the members.
    pub center_longitude: f64,
    /// Member case ids, ordered by input position.
    pub member_ids: Vec<String>,
    /// The clustering radius this hotspot was formed with.
    pub radius_km: f64,
    /// Id of the seed case that anchored the cluster.
    pub seed_id: String,
}

impl Hotspot {
    /// Number of member cases.
    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }
}

/// Hotspot clustering parameters.
///
/// Deserializable with defaults so the hosting system can load it from
/// JSON alongside the rest of its configuration.
///
/// # Example
///
/// ```rust
/// use casegrid::ClusterConfig;
///
/// let config = ClusterConfig::default();
/// assert_eq!(config.min_cases, 3);
/// assert_eq!(config.radius_km, 50.0);
///
/// let json = r#"{ "radius_km": 25.0 }"#;
/// let config: ClusterConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.min_cases, 3);
/// assert_eq!(config.radius_km, 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Minimum number of cases for a cluster to be emitted.
    #[serde(default = "ClusterConfig::default_min_cases")]
    pub min_cases: usize,

    /// Clustering radius in kilometers, measured from each cluster's seed.
    #[serde(default = "ClusterConfig::default_radius_km")]
    pub radius_km: f64,
}

impl ClusterConfig {
    const fn default_min_cases() -> usize {
        3
    }

    const fn default_radius_km() -> f64 {
        50.0
    }

    pub fn with_min_cases(mut self, min_cases: usize) -> Self {
        self.min_cases = min_cases;
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_cases: Self::default_min_cases(),
            radius_km: Self::default_radius_km(),
        }
    }
}
