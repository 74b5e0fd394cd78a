use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::serve;
use axum::{Json, Router};
use delivery_router::common::config::{
    AppConfig, RouteConfig, UserRouteConfig, validate_coordinates, validate_speed,
};
use delivery_router::common::graph_data::DeliveryNetwork;
use delivery_router::loading::demo::demo_network;
use delivery_router::loading::json::load_network;
use delivery_router::routing::nearest::nearest_waypoint;
use delivery_router::routing::quote::{QuoteRequest, quote_deliveries, quote_delivery};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

#[derive(Clone)]
struct AppState {
    network: Arc<DeliveryNetwork>,
    default_speed: f64,
}

#[derive(Deserialize, Debug)]
struct NearestQuery {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize, Debug)]
struct BatchQuoteBody {
    requests: Vec<QuoteRequest>,
    average_speed: Option<f64>,
}

fn error_response(status: StatusCode, msg: String) -> Response {
    let json_response = json!({
        "status": "error",
        "message": msg
    });

    (status, Json(json_response)).into_response()
}

async fn get_route(
    State(state): State<AppState>,
    Query(query): Query<UserRouteConfig>,
) -> Response {
    let now = Instant::now();

    let route_config = match RouteConfig::from_user(query, state.default_speed) {
        Ok(config) => config,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    for id in [&route_config.source, &route_config.destination] {
        if !state.network.graph.contains(id) {
            return error_response(StatusCode::NOT_FOUND, format!("Unknown waypoint '{id}'"));
        }
    }

    let quote = quote_delivery(
        &state.network,
        &route_config.source,
        &route_config.destination,
        route_config.average_speed,
    );

    if !quote.result.is_reachable() {
        warn!(
            "{} can't be reached from {}",
            route_config.destination, route_config.source
        );
    }

    info!(
        "{} -> {}: {:?} minutes, elapsed {:.2?}",
        route_config.source,
        route_config.destination,
        quote.estimated_minutes,
        now.elapsed()
    );

    (StatusCode::OK, Json(quote)).into_response()
}

async fn post_quotes(State(state): State<AppState>, Json(body): Json<BatchQuoteBody>) -> Response {
    let speed = match validate_speed(body.average_speed.unwrap_or(state.default_speed)) {
        Ok(speed) => speed,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let quotes = quote_deliveries(&state.network, &body.requests, speed);
    info!("{:?} quotes generated", quotes.len());

    (StatusCode::OK, Json(quotes)).into_response()
}

async fn get_nearest(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> Response {
    let point = match validate_coordinates(query.lat, query.lon) {
        Ok(point) => point,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match nearest_waypoint(&state.network.waypoints, point) {
        Some((waypoint, dist)) => {
            let json_response = json!({
                "waypoint": waypoint,
                "distance_m": dist
            });
            (StatusCode::OK, Json(json_response)).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "No waypoints loaded".to_string()),
    }
}

async fn get_waypoints(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.network.waypoints.clone())
}

async fn health_check() -> impl IntoResponse {
    let msg = "Hello World!";

    let json_response = json!({
        "status": "success",
        "message": msg
    });

    Json(json_response)
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/route", get(get_route))
        .route("/quotes", post(post_quotes))
        .route("/nearest", get(get_nearest))
        .route("/waypoints", get(get_waypoints))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;

    let network = match &config.network_path {
        Some(path) => load_network(path)?,
        None => {
            info!("No network file configured, serving the demo network");
            demo_network()?
        }
    };

    let state = AppState {
        network: Arc::new(network),
        default_speed: config.default_speed,
    };

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!("Listening on {}", config.addr);
    serve(listener, router).await?;

    Ok(())
}
