//! Geospatial proximity search and hotspot clustering for geolocated case records.
//!
//! The engine answers two questions over an in-memory set of case points:
//! which cases lie within a radius of a query point, and where do cases
//! cluster geographically. Both are backed by a fixed-size lat/lon cell grid
//! so queries scan a bounded neighborhood instead of the whole set, with
//! exact great-circle distances applied on top. Antimeridian wraparound and
//! polar latitudes are handled at query time.
//!
//! ```rust
//! use casegrid::{ClusterConfig, GeoPoint, find_hotspots, nearby};
//!
//! let points = vec![
//!     GeoPoint::new("case-1", 0.10, 0.10),
//!     GeoPoint::new("case-2", 0.12, 0.12),
//!     GeoPoint::new("case-3", 0.08, 0.08),
//!     GeoPoint::new("case-4", 10.0, 10.0),
//! ];
//!
//! let hotspots = find_hotspots(&points, &ClusterConfig::default());
//! assert_eq!(hotspots.len(), 1);
//! assert_eq!(hotspots[0].member_ids.len(), 3);
//!
//! let matches = nearby(&points, 0.0, 0.0, 100.0);
//! assert_eq!(matches.len(), 3);
//! ```

pub mod cluster;
pub mod distance;
pub mod error;
pub mod grid;
pub mod search;
pub mod types;

pub use cluster::find_hotspots;
pub use distance::{EARTH_RADIUS_KM, distance_between, distance_km};
pub use error::{CasegridError, Result};
pub use grid::SpatialGrid;
pub use search::{DEFAULT_NEARBY_RADIUS_KM, NearbyMatch, nearby, nearby_in_grid};
pub use types::{ClusterConfig, GeoPoint, Hotspot};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{CasegridError, Result};

    pub use crate::{ClusterConfig, GeoPoint, Hotspot};

    pub use crate::{NearbyMatch, find_hotspots, nearby, nearby_in_grid};

    pub use crate::SpatialGrid;

    pub use crate::distance::{distance_between, distance_km};

    pub use geo::Point;
}
