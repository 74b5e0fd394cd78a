//! Defines the containers which make up a delivery network: the waypoints
//! which can be visited, and the weighted, undirected graph connecting them.
//! All of these are built once from static configuration and then only ever
//! borrowed by route queries.

use geo::Point;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::common::error::NetworkError;

/// Raw adjacency mapping, waypoint id -> neighbour id -> distance in km
pub type Adjacency = FxHashMap<String, FxHashMap<String, f64>>;

/// A named, geolocated point which can be used as a node in the graph
/// (a restaurant, an intersection or a delivery zone)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    /// Stored as (latitude, longitude)
    pub coordinates: (f64, f64),
}

impl Waypoint {
    pub fn new(id: &str, name: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint {
            id: id.to_string(),
            name: name.to_string(),
            coordinates: (lat, lon),
        }
    }

    /// Get the location of this waypoint as a geo point. Note that geo
    /// expects (x, y), so the coordinates are swapped to (lon, lat)
    pub fn point(&self) -> Point {
        let (lat, lon) = self.coordinates;
        Point::new(lon, lat)
    }
}

/// Check that a single edge weight can be used by the router
fn validate_weight(src: &str, dst: &str, weight: f64) -> Result<(), NetworkError> {
    if !weight.is_finite() {
        return Err(NetworkError::NonFiniteWeight {
            src: src.to_string(),
            dst: dst.to_string(),
            weight,
        });
    }
    if weight < 0.0 {
        return Err(NetworkError::NegativeWeight {
            src: src.to_string(),
            dst: dst.to_string(),
            weight,
        });
    }
    if src == dst {
        return Err(NetworkError::SelfLoop(src.to_string()));
    }
    Ok(())
}

/// Weighted, undirected graph of waypoint ids. Every edge is stored in both
/// directions with the same weight, and every id which appears as a
/// neighbour also has its own top-level entry. Both properties are enforced
/// when the graph is built, so the router never needs to check them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Adjacency", into = "Adjacency")]
pub struct DeliveryGraph {
    adjacency: Adjacency,
}

impl DeliveryGraph {
    pub fn new() -> DeliveryGraph {
        DeliveryGraph::default()
    }

    /// Build a graph from a raw adjacency mapping. Edges which are only
    /// listed in one direction are mirrored, and ids which only appear as a
    /// neighbour are added to the node set. Edges listed in both directions
    /// must carry the same weight.
    pub fn from_adjacency(adjacency: Adjacency) -> Result<DeliveryGraph, NetworkError> {
        let mut graph = DeliveryGraph::new();

        for (src, neighbours) in adjacency.iter() {
            graph.add_node(src);

            for (dst, weight) in neighbours.iter() {
                validate_weight(src, dst, *weight)?;

                if let Some(reverse) = adjacency.get(dst).and_then(|n| n.get(src)) {
                    if reverse != weight {
                        return Err(NetworkError::AsymmetricEdge {
                            src: src.clone(),
                            dst: dst.clone(),
                            forward: *weight,
                            reverse: *reverse,
                        });
                    }
                }

                graph.insert_both(src, dst, *weight);
            }
        }

        Ok(graph)
    }

    /// Add a waypoint with no connections. This has no effect if the
    /// waypoint is already present
    pub fn add_node(&mut self, id: &str) {
        if !self.adjacency.contains_key(id) {
            self.adjacency.insert(id.to_string(), FxHashMap::default());
        }
    }

    /// Connect two waypoints in both directions. Any existing connection
    /// between them is overwritten
    pub fn add_edge(&mut self, src: &str, dst: &str, weight: f64) -> Result<(), NetworkError> {
        validate_weight(src, dst, weight)?;
        self.insert_both(src, dst, weight);
        Ok(())
    }

    fn insert_both(&mut self, src: &str, dst: &str, weight: f64) {
        self.adjacency
            .entry(src.to_string())
            .or_default()
            .insert(dst.to_string(), weight);
        self.adjacency
            .entry(dst.to_string())
            .or_default()
            .insert(src.to_string(), weight);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Fetch the id as it is stored in the graph, so that working state can
    /// borrow from the graph rather than from the caller
    pub fn node_key(&self, id: &str) -> Option<&str> {
        self.adjacency.get_key_value(id).map(|(key, _)| key.as_str())
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(|id| id.as_str())
    }

    pub fn neighbours(&self, id: &str) -> Option<&FxHashMap<String, f64>> {
        self.adjacency.get(id)
    }

    pub fn weight(&self, src: &str, dst: &str) -> Option<f64> {
        self.adjacency.get(src).and_then(|n| n.get(dst)).copied()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges, each connection is only counted once
    pub fn edge_count(&self) -> usize {
        let directed: usize = self.adjacency.values().map(|n| n.len()).sum();
        directed / 2
    }
}

impl TryFrom<Adjacency> for DeliveryGraph {
    type Error = NetworkError;

    fn try_from(adjacency: Adjacency) -> Result<Self, Self::Error> {
        DeliveryGraph::from_adjacency(adjacency)
    }
}

impl From<DeliveryGraph> for Adjacency {
    fn from(graph: DeliveryGraph) -> Self {
        graph.adjacency
    }
}

/// Lookup table for the waypoints which make up a network. Insertion order
/// is retained, and ids are guaranteed to be unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Waypoint>", into = "Vec<Waypoint>")]
pub struct WaypointCatalog {
    waypoints: Vec<Waypoint>,
    index: FxHashMap<String, usize>,
}

impl WaypointCatalog {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<WaypointCatalog, NetworkError> {
        let mut index = FxHashMap::<String, usize>::default();
        for (inx, waypoint) in waypoints.iter().enumerate() {
            if index.insert(waypoint.id.clone(), inx).is_some() {
                return Err(NetworkError::DuplicateWaypoint(waypoint.id.clone()));
            }
        }

        Ok(WaypointCatalog { waypoints, index })
    }

    pub fn get(&self, id: &str) -> Option<&Waypoint> {
        self.index.get(id).and_then(|inx| self.waypoints.get(*inx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up each id in turn, dropping any which are not in the catalog
    pub fn resolve(&self, ids: &[String]) -> Vec<Waypoint> {
        ids.iter().filter_map(|id| self.get(id)).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

impl TryFrom<Vec<Waypoint>> for WaypointCatalog {
    type Error = NetworkError;

    fn try_from(waypoints: Vec<Waypoint>) -> Result<Self, Self::Error> {
        WaypointCatalog::new(waypoints)
    }
}

impl From<WaypointCatalog> for Vec<Waypoint> {
    fn from(catalog: WaypointCatalog) -> Self {
        catalog.waypoints
    }
}

/// A graph together with the catalog used to resolve its ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryNetwork {
    pub graph: DeliveryGraph,
    pub waypoints: WaypointCatalog,
}

impl DeliveryNetwork {
    pub fn new(graph: DeliveryGraph, waypoints: WaypointCatalog) -> DeliveryNetwork {
        DeliveryNetwork { graph, waypoints }
    }
}
