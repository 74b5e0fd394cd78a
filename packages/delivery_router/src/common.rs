//! Data structures and configuration shared by the loading and routing
//! modules.

pub mod config;
pub mod error;
pub mod graph_data;
