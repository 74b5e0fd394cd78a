//! Snaps an arbitrary coordinate, such as a customer's location, onto the
//! closest waypoint in a catalog

use geo::{Distance, Haversine, Point};

use crate::common::graph_data::{Waypoint, WaypointCatalog};

/// Find the waypoint closest to the provided point, along with the distance
/// to it in metres. Returns None for an empty catalog, or if no finite
/// distance can be calculated (e.g. a NaN coordinate). If two waypoints are
/// equally close, the one listed first in the catalog wins
pub fn nearest_waypoint(catalog: &WaypointCatalog, point: Point) -> Option<(&Waypoint, f64)> {
    // Set variables to keep track of the current closest waypoint
    let mut closest: Option<(&Waypoint, f64)> = None;

    for waypoint in catalog.iter() {
        let dist = Haversine::distance(point, waypoint.point());
        if !dist.is_finite() {
            continue;
        }

        // Store details of new closest waypoint if applicable
        let is_closer = match closest {
            Some((_, smallest_dist)) => dist < smallest_dist,
            None => true,
        };
        if is_closer {
            closest = Some((waypoint, dist));
        }
    }

    closest
}
