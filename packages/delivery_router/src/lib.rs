//! Shortest-path routing for a small network of delivery waypoints. Given a
//! weighted, undirected graph of restaurants, intersections and delivery
//! zones, this crate finds the shortest route between two waypoints and turns
//! the resulting distance into a delivery time estimate.

pub mod common;
pub mod loading;
pub mod routing;
