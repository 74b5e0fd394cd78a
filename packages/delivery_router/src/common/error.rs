//! Errors raised while building a delivery network or reading configuration.
//! Route queries themselves never fail; an unreachable destination is
//! reported as an infinite distance instead.

use thiserror::Error;

/// Problems detected while constructing a graph or waypoint catalog
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("edge {src} -> {dst} has a negative weight ({weight})")]
    NegativeWeight { src: String, dst: String, weight: f64 },

    #[error("edge {src} -> {dst} has a non-finite weight ({weight})")]
    NonFiniteWeight { src: String, dst: String, weight: f64 },

    #[error(
        "edge {src} -> {dst} has weight {forward}, but {dst} -> {src} has weight {reverse}"
    )]
    AsymmetricEdge {
        src: String,
        dst: String,
        forward: f64,
        reverse: f64,
    },

    #[error("waypoint '{0}' is connected to itself")]
    SelfLoop(String),

    #[error("waypoint id '{0}' appears more than once")]
    DuplicateWaypoint(String),

    #[error("connection {src} -> {dst} is listed more than once")]
    DuplicateConnection { src: String, dst: String },

    #[error("connection {src} -> {dst} refers to unknown waypoint '{missing}'")]
    UnknownWaypoint {
        src: String,
        dst: String,
        missing: String,
    },

    #[error("unable to read network file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to parse network file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Problems with user or process configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("average speed must be a positive number of km/h, got {0}")]
    InvalidSpeed(f64),

    #[error("coordinates ({lat}, {lon}) are outside of lat [-90, 90], lon [-180, 180]")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("environment variable {var} has an invalid value '{value}'")]
    InvalidValue { var: String, value: String },
}
