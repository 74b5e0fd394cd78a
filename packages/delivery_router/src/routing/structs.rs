//! Defines the structs which are handed back to callers once a route has been
//! found

use geo::{Distance, Haversine};
use serde::Serialize;

use crate::common::graph_data::{Waypoint, WaypointCatalog};

/// Outcome of a single shortest path query. When the destination can't be
/// reached, `distance` is infinite and `path` only contains the destination.
/// Infinite distances are written out as `null` when serialized to JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub distance: f64,
    /// Waypoint ids from source to destination, inclusive
    pub path: Vec<String>,
    /// The ids in `path` which could be found in the waypoint catalog
    pub route: Vec<Waypoint>,
}

impl PathResult {
    /// Build a result from a finished search, resolving each id against the
    /// catalog
    pub fn new(distance: f64, path: Vec<String>, waypoints: &WaypointCatalog) -> PathResult {
        let route = waypoints.resolve(&path);
        PathResult {
            distance,
            path,
            route,
        }
    }

    /// Result for a destination which can't be reached from the source
    pub fn unreachable(destination_id: &str, waypoints: &WaypointCatalog) -> PathResult {
        PathResult::new(f64::INFINITY, vec![destination_id.to_string()], waypoints)
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }

    /// Sum of the great-circle distances between consecutive waypoints on the
    /// resolved route, in km. Always less than or equal to the graph distance
    /// for networks whose weights reflect real travel.
    pub fn straight_line_km(&self) -> f64 {
        let metres: f64 = self
            .route
            .windows(2)
            .map(|leg| Haversine::distance(leg[0].point(), leg[1].point()))
            .sum();
        metres / 1000.0
    }
}

/// A path result together with the travel time derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryQuote {
    #[serde(flatten)]
    pub result: PathResult,
    pub average_speed: f64,
    /// Not set when the destination is unreachable
    pub estimated_minutes: Option<u64>,
}
