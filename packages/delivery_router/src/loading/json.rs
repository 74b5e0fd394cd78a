//! The functions defined here read a delivery network from JSON. Files list
//! each waypoint once, and each connection in a single direction only; the
//! reverse direction is added automatically when the graph is built.
//!
//! ```json
//! {
//!     "waypoints": [
//!         {"id": "restaurant-1", "name": "Pizza Palace", "coordinates": [40.7589, -73.9851]}
//!     ],
//!     "connections": [
//!         {"src": "restaurant-1", "dst": "intersection-1", "distance": 2.5}
//!     ]
//! }
//! ```
use std::fs;
use std::path::Path;

use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::common::error::NetworkError;
use crate::common::graph_data::{DeliveryGraph, DeliveryNetwork, Waypoint, WaypointCatalog};
use crate::loading::petgraph::report_connectivity;

/// A single connection between two waypoints, distance is in km
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub src: String,
    pub dst: String,
    pub distance: f64,
}

impl Connection {
    pub fn new(src: &str, dst: &str, distance: f64) -> Connection {
        Connection {
            src: src.to_string(),
            dst: dst.to_string(),
            distance,
        }
    }
}

/// Container for the raw contents of a network file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkFile {
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Check that a connection only refers to waypoints in the catalog
fn check_known(catalog: &WaypointCatalog, conn: &Connection) -> Result<(), NetworkError> {
    for id in [&conn.src, &conn.dst] {
        if !catalog.contains(id) {
            return Err(NetworkError::UnknownWaypoint {
                src: conn.src.clone(),
                dst: conn.dst.clone(),
                missing: id.clone(),
            });
        }
    }
    Ok(())
}

/// Validate the contents of a network file and build the graph and catalog
/// from them. Every waypoint is added to the graph, even those without any
/// connections, so that they are treated as unreachable rather than unknown
pub fn build_network(file: NetworkFile) -> Result<DeliveryNetwork, NetworkError> {
    let catalog = WaypointCatalog::new(file.waypoints)?;

    let mut graph = DeliveryGraph::new();
    for waypoint in catalog.iter() {
        graph.add_node(&waypoint.id);
    }

    let mut seen = FxHashSet::<(String, String)>::default();
    for conn in file.connections.iter() {
        check_known(&catalog, conn)?;

        // Connections are undirected, so a -> b and b -> a are the same
        let key = if conn.src <= conn.dst {
            (conn.src.clone(), conn.dst.clone())
        } else {
            (conn.dst.clone(), conn.src.clone())
        };
        if !seen.insert(key) {
            return Err(NetworkError::DuplicateConnection {
                src: conn.src.clone(),
                dst: conn.dst.clone(),
            });
        }

        graph.add_edge(&conn.src, &conn.dst, conn.distance)?;
    }

    report_connectivity(&graph);

    Ok(DeliveryNetwork::new(graph, catalog))
}

/// Parse a network from a JSON string
pub fn parse_network(raw: &str) -> Result<DeliveryNetwork, NetworkError> {
    let file: NetworkFile = serde_json::from_str(raw)?;
    build_network(file)
}

/// Read a network from a JSON file on disk
pub fn load_network(path: &Path) -> Result<DeliveryNetwork, NetworkError> {
    info!("Loading delivery network from {}", path.display());
    let raw = fs::read_to_string(path)?;
    parse_network(&raw)
}
