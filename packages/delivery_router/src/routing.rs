//! This module contains the shortest path search itself, along with the
//! helpers which turn a path into a delivery quote.

pub mod dijkstra;
pub mod estimate;
pub mod nearest;
pub mod quote;
pub mod structs;
