//! This module contains structs which represent the route options selected by
//! the end user, and the settings used to run the routing service. The
//! RouteConfig struct is what the rest of this package works with.

use std::path::PathBuf;

use geo::Point;
use serde::Deserialize;

use crate::common::error::ConfigError;

/// Assumed average speed of a delivery rider, in km/h
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 25.0;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

pub const ADDR_VAR: &str = "DELIVERY_ROUTER_ADDR";
pub const NETWORK_VAR: &str = "DELIVERY_ROUTER_NETWORK";
pub const SPEED_VAR: &str = "DELIVERY_ROUTER_SPEED_KMH";

/// Check that a speed can be used to derive a travel time
pub fn validate_speed(speed: f64) -> Result<f64, ConfigError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(ConfigError::InvalidSpeed(speed))
    }
}

/// Check that a user supplied location is a real position on the globe,
/// returning it as a point
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<Point, ConfigError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(Point::new(lon, lat))
    } else {
        Err(ConfigError::InvalidCoordinates { lat, lon })
    }
}

/// Stores the user's requested route exactly as it is received from the API
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserRouteConfig {
    pub source: String,
    pub destination: String,
    pub average_speed: Option<f64>,
}

/// Stores the user's requested route in a format which can be used in the
/// rest of this package. Users should first create a UserRouteConfig and
/// convert it, so that the average speed is always set and validated
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    pub source: String,
    pub destination: String,
    pub average_speed: f64,
}

impl RouteConfig {
    /// Convert a user config, falling back to the provided speed if the user
    /// did not request one
    pub fn from_user(
        user: UserRouteConfig,
        default_speed: f64,
    ) -> Result<RouteConfig, ConfigError> {
        let average_speed = validate_speed(user.average_speed.unwrap_or(default_speed))?;

        Ok(RouteConfig {
            source: user.source,
            destination: user.destination,
            average_speed,
        })
    }
}

impl TryFrom<UserRouteConfig> for RouteConfig {
    type Error = ConfigError;

    fn try_from(user: UserRouteConfig) -> Result<Self, Self::Error> {
        RouteConfig::from_user(user, DEFAULT_AVERAGE_SPEED_KMH)
    }
}

/// Settings for the routing service, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub addr: String,
    /// If not set, the built-in demo network is served
    pub network_path: Option<PathBuf>,
    pub default_speed: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            addr: DEFAULT_ADDR.to_string(),
            network_path: None,
            default_speed: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        AppConfig::from_vars(|var| std::env::var(var).ok())
    }

    /// Build the config using the provided lookup for each variable. Unset
    /// or empty variables keep their default value
    pub fn from_vars<F>(lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(addr) = get(ADDR_VAR) {
            config.addr = addr;
        }

        if let Some(path) = get(NETWORK_VAR) {
            config.network_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = get(SPEED_VAR) {
            let speed = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: SPEED_VAR.to_string(),
                    value: raw.clone(),
                })?;
            config.default_speed = validate_speed(speed)?;
        }

        Ok(config)
    }
}
