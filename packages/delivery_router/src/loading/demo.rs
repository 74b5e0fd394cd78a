//! The storefront demo network: three restaurants, three intersections and
//! three delivery zones in midtown Manhattan. Distances are in km and are
//! simplified rather than measured.

use crate::common::error::NetworkError;
use crate::common::graph_data::{DeliveryNetwork, Waypoint};
use crate::loading::json::{Connection, NetworkFile, build_network};

/// (id, name, lat, lon)
const WAYPOINTS: [(&str, &str, f64, f64); 9] = [
    ("restaurant-1", "Pizza Palace", 40.7589, -73.9851),
    ("restaurant-2", "Burger Junction", 40.7614, -73.9776),
    ("restaurant-3", "Sushi Express", 40.7505, -73.9934),
    ("intersection-1", "Main St & 1st Ave", 40.7580, -73.9800),
    ("intersection-2", "Broadway & 42nd", 40.7570, -73.9850),
    ("intersection-3", "Park Ave & 59th", 40.7550, -73.9750),
    ("delivery-1", "Downtown Area", 40.7530, -73.9900),
    ("delivery-2", "Midtown West", 40.7600, -73.9850),
    ("delivery-3", "Upper East Side", 40.7700, -73.9650),
];

/// (src, dst, km), each listed in one direction only
const CONNECTIONS: [(&str, &str, f64); 14] = [
    // Restaurants
    ("restaurant-1", "intersection-1", 2.5),
    ("restaurant-1", "intersection-2", 1.8),
    ("restaurant-2", "intersection-1", 1.2),
    ("restaurant-2", "intersection-3", 2.0),
    ("restaurant-3", "intersection-2", 2.8),
    ("restaurant-3", "delivery-1", 1.5),
    // Intersections
    ("intersection-1", "intersection-2", 1.5),
    ("intersection-1", "intersection-3", 2.2),
    ("intersection-1", "delivery-2", 1.8),
    ("intersection-2", "intersection-3", 2.0),
    ("intersection-2", "delivery-1", 1.3),
    ("intersection-2", "delivery-2", 1.0),
    ("intersection-3", "delivery-2", 1.7),
    ("intersection-3", "delivery-3", 1.9),
];

/// Get the raw demo data in the same shape as a network file
pub fn demo_file() -> NetworkFile {
    NetworkFile {
        waypoints: WAYPOINTS
            .iter()
            .map(|(id, name, lat, lon)| Waypoint::new(id, name, *lat, *lon))
            .collect(),
        connections: CONNECTIONS
            .iter()
            .map(|(src, dst, km)| Connection::new(src, dst, *km))
            .collect(),
    }
}

/// Build the demo network, using the same validation as networks loaded
/// from a file
pub fn demo_network() -> Result<DeliveryNetwork, NetworkError> {
    build_network(demo_file())
}
