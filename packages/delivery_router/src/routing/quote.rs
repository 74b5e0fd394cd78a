//! Combines the shortest path search with the travel time estimate to produce
//! delivery quotes, either one at a time or for a batch of requests

use log::debug;
use rayon::prelude::*;
use serde::Deserialize;

use crate::common::graph_data::DeliveryNetwork;
use crate::routing::dijkstra::find_shortest_path;
use crate::routing::estimate::estimate_travel_time;
use crate::routing::structs::DeliveryQuote;

/// A single (source, destination) pair to be quoted
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuoteRequest {
    pub source: String,
    pub destination: String,
}

impl QuoteRequest {
    pub fn new(source: &str, destination: &str) -> QuoteRequest {
        QuoteRequest {
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }
}

/// Find the shortest route between two waypoints and estimate how long it
/// will take to travel at the given average speed
pub fn quote_delivery(
    network: &DeliveryNetwork,
    source_id: &str,
    destination_id: &str,
    average_speed: f64,
) -> DeliveryQuote {
    let result = find_shortest_path(
        &network.graph,
        &network.waypoints,
        source_id,
        destination_id,
    );
    let estimated_minutes = estimate_travel_time(result.distance, average_speed);

    debug!(
        "{} -> {}: {} km, {:?} minutes",
        source_id, destination_id, result.distance, estimated_minutes
    );

    DeliveryQuote {
        result,
        average_speed,
        estimated_minutes,
    }
}

/// Quote a batch of requests, using Rayon to distribute processing. Quotes
/// are returned in the same order as the requests
pub fn quote_deliveries(
    network: &DeliveryNetwork,
    requests: &[QuoteRequest],
    average_speed: f64,
) -> Vec<DeliveryQuote> {
    let mut quotes: Vec<DeliveryQuote> = Vec::with_capacity(requests.len());

    requests
        .par_iter()
        .map(|request| {
            quote_delivery(
                network,
                &request.source,
                &request.destination,
                average_speed,
            )
        })
        .collect_into_vec(&mut quotes);

    quotes
}
