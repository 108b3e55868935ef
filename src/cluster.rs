//! Greedy seed-centered hotspot clustering ("find hotspots").
//!
//! The pass is deliberately order-dependent: points are visited in input
//! order, each unassigned point seeds a candidate cluster, and membership
//! is measured against that seed only, never against other members or the
//! evolving centroid. Downstream consumers depend on this exact
//! partitioning, so it must not be replaced with a density-based scheme.

use crate::distance::distance_km;
use crate::grid::SpatialGrid;
use crate::types::{ClusterConfig, GeoPoint, Hotspot};

/// Partition `points` into disjoint hotspots of at least
/// `config.min_cases` members, each member within `config.radius_km` of
/// its cluster's seed.
///
/// Semantics of the single greedy pass:
///
/// 1. Points are visited in input order; already-assigned points are
///    skipped as seeds.
/// 2. A seed collects every still-unassigned point (itself included)
///    within the radius of the seed.
/// 3. Groups reaching `min_cases` are emitted and their members marked
///    assigned. Smaller groups are abandoned and their members stay
///    eligible for later seeds.
///
/// The result is sorted descending by member count; ties keep seed
/// emission order. Fewer than `min_cases` total points, or a non-positive
/// radius, yields an empty list.
///
/// # Examples
///
/// ```rust
/// use casegrid::{ClusterConfig, GeoPoint, find_hotspots};
///
/// let points = vec![
///     GeoPoint::new("a", 0.10, 0.10),
///     GeoPoint::new("b", 0.12, 0.12),
///     GeoPoint::new("c", 0.08, 0.08),
///     GeoPoint::new("lone", -10.0, -10.0),
/// ];
///
/// let hotspots = find_hotspots(&points, &ClusterConfig::default());
/// assert_eq!(hotspots.len(), 1);
/// assert_eq!(hotspots[0].seed_id, "a");
/// assert_eq!(hotspots[0].member_ids, vec!["a", "b", "c"]);
/// ```
pub fn find_hotspots(points: &[GeoPoint], config: &ClusterConfig) -> Vec<Hotspot> {
    if points.len() < config.min_cases || !(config.radius_km > 0.0) {
        return Vec::new();
    }

    let grid = SpatialGrid::build(points, config.radius_km);
    let mut assigned = vec![false; points.len()];
    let mut hotspots: Vec<Hotspot> = Vec::new();

    for (seed_idx, seed) in points.iter().enumerate() {
        if assigned[seed_idx] {
            continue;
        }

        // Candidate indices come back sorted, so members end up in input
        // order and the centroid summation is reproducible.
        let members: Vec<u32> = grid
            .neighbors_within(seed.latitude, seed.longitude, config.radius_km)
            .into_iter()
            .filter(|&idx| !assigned[idx as usize])
            .filter(|&idx| {
                let point = &points[idx as usize];
                distance_km(seed.latitude, seed.longitude, point.latitude, point.longitude)
                    <= config.radius_km
            })
            .collect();

        if members.len() < config.min_cases {
            // Too small: leave everyone unassigned so a later seed can
            // still absorb them.
            continue;
        }

        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut member_ids = Vec::with_capacity(members.len());
        for &idx in &members {
            assigned[idx as usize] = true;
            let point = &points[idx as usize];
            lat_sum += point.latitude;
            lon_sum += point.longitude;
            member_ids.push(point.id.clone());
        }

        let count = members.len() as f64;
        log::debug!(
            "hotspot seeded by {}: {} members within {} km",
            seed.id,
            members.len(),
            config.radius_km
        );

        hotspots.push(Hotspot {
            center_latitude: lat_sum / count,
            center_longitude: lon_sum / count,
            member_ids,
            radius_km: config.radius_km,
            seed_id: seed.id.clone(),
        });
    }

    // Stable sort: equal-sized hotspots keep their seed emission order.
    hotspots.sort_by(|a, b| b.member_ids.len().cmp(&a.member_ids.len()));
    hotspots
}
