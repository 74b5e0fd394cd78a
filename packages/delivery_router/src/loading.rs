//! This module focuses on building a delivery network, either from a JSON
//! file or from the built-in demo data, and on checking its connectivity
//! using petgraph.

pub mod demo;
pub mod json;
pub mod petgraph;
