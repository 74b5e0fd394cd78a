use log::{info, warn};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashMap;

use crate::common::graph_data::DeliveryGraph;

/// Copy a delivery graph into a petgraph graph, so that petgraph's algorithms
/// can be used against it. Nodes are added in id order, and each undirected
/// connection becomes a single edge. The returned map gives the index of each
/// waypoint id in the new graph.
pub fn to_petgraph(
    graph: &DeliveryGraph,
) -> (UnGraph<String, f64>, FxHashMap<String, NodeIndex>) {
    let mut pgraph = UnGraph::<String, f64>::with_capacity(
        graph.node_count(),
        graph.edge_count(),
    );

    let mut ids: Vec<&str> = graph.node_ids().collect();
    ids.sort();

    let mut id_inx_map = FxHashMap::<String, NodeIndex>::default();
    for id in ids.iter() {
        let inx = pgraph.add_node(id.to_string());
        id_inx_map.insert(id.to_string(), inx);
    }

    for src in ids.iter() {
        for (dst, weight) in graph.neighbours(src).into_iter().flatten() {
            // Both directions are stored, only add each connection once
            if *src >= dst.as_str() {
                continue;
            }

            let maybe_inxs = (id_inx_map.get(*src), id_inx_map.get(dst));
            if let (Some(src_inx), Some(dst_inx)) = maybe_inxs {
                pgraph.add_edge(*src_inx, *dst_inx, *weight);
            }
        }
    }

    (pgraph, id_inx_map)
}

/// Count the number of disconnected pieces which make up the graph. An empty
/// graph has no components
pub fn count_components(graph: &DeliveryGraph) -> usize {
    let (pgraph, _) = to_petgraph(graph);
    connected_components(&pgraph)
}

/// Log a summary of the graph, warning if some waypoints can't be reached
/// from others. Returns the number of components
pub fn report_connectivity(graph: &DeliveryGraph) -> usize {
    let components = count_components(graph);

    info!(
        "Delivery graph has {} waypoints and {} connections",
        graph.node_count(),
        graph.edge_count()
    );

    if components > 1 {
        warn!(
            "Delivery graph is split into {} components, some routes will be unreachable",
            components
        );
    }

    components
}

#[cfg(test)]
mod tests {

    use petgraph::visit::EdgeRef;

    use super::*;

    fn get_test_graph() -> DeliveryGraph {
        let mut graph = DeliveryGraph::new();
        graph.add_edge("a", "b", 1.0).unwrap();
        graph.add_edge("b", "c", 2.0).unwrap();
        graph.add_edge("x", "y", 3.0).unwrap();
        graph.add_node("w");
        graph
    }

    /// Every waypoint becomes a node, every connection a single edge
    #[test]
    fn test_to_petgraph() {
        let graph = get_test_graph();

        let (pgraph, inx_map) = to_petgraph(&graph);

        assert_eq!(pgraph.node_count(), 6);
        assert_eq!(pgraph.edge_count(), 3);
        assert_eq!(pgraph[inx_map["w"]], "w");

        let edge = pgraph
            .edges(inx_map["b"])
            .find(|e| e.target() == inx_map["c"] || e.source() == inx_map["c"])
            .unwrap();
        assert_eq!(*edge.weight(), 2.0);
    }

    /// Node indexes follow id order
    #[test]
    fn test_to_petgraph_order() {
        let (_, inx_map) = to_petgraph(&get_test_graph());

        assert_eq!(inx_map["a"].index(), 0);
        assert_eq!(inx_map["y"].index(), 5);
    }

    /// a-b-c, x-y and w are separate
    #[test]
    fn test_count_components() {
        assert_eq!(count_components(&get_test_graph()), 3);
        assert_eq!(count_components(&DeliveryGraph::new()), 0);
    }

    #[test]
    fn test_report_connectivity() {
        let mut graph = DeliveryGraph::new();
        graph.add_edge("a", "b", 1.0).unwrap();

        assert_eq!(report_connectivity(&graph), 1);
    }
}
