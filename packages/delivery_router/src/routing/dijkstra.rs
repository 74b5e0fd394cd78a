//! Single-source shortest path search between two waypoints, based on
//! Dijkstra's algorithm. Two strategies are available. The linear scan looks
//! through every unvisited node for the closest one, which is cheapest for the
//! tens of nodes in a typical delivery network. The binary heap variant is
//! used for larger graphs. Both break ties on distance by waypoint id, so
//! they always return the same path.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::common::graph_data::{DeliveryGraph, WaypointCatalog};
use crate::routing::structs::PathResult;

/// Graphs with more nodes than this are searched using a binary heap
pub const LINEAR_SCAN_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    LinearScan,
    BinaryHeap,
}

impl SearchStrategy {
    /// Pick the cheaper strategy for a graph of this size
    pub fn for_graph(graph: &DeliveryGraph) -> SearchStrategy {
        if graph.node_count() <= LINEAR_SCAN_LIMIT {
            SearchStrategy::LinearScan
        } else {
            SearchStrategy::BinaryHeap
        }
    }
}

/// Orders (distance, id) pairs, closest first
fn closer(a_dist: f64, a_id: &str, b_dist: f64, b_id: &str) -> Ordering {
    a_dist.total_cmp(&b_dist).then_with(|| a_id.cmp(b_id))
}

/// Working state for a single query. Everything borrows from the graph, and
/// is dropped once the result has been built
struct SearchState<'a> {
    dists: FxHashMap<&'a str, f64>,
    previous: FxHashMap<&'a str, &'a str>,
    visited: FxHashSet<&'a str>,
}

impl<'a> SearchState<'a> {
    fn new(source: &'a str) -> SearchState<'a> {
        let mut dists = FxHashMap::default();
        dists.insert(source, 0.0);

        SearchState {
            dists,
            previous: FxHashMap::default(),
            visited: FxHashSet::default(),
        }
    }

    /// Nodes which have not been reached yet are infinitely far away
    fn dist(&self, id: &str) -> f64 {
        self.dists.get(id).copied().unwrap_or(f64::INFINITY)
    }

    /// Update the distance to each unvisited neighbour of `current` if going
    /// through `current` is shorter. Returns the neighbours which improved
    fn relax(&mut self, graph: &'a DeliveryGraph, current: &'a str) -> Vec<(&'a str, f64)> {
        let base = self.dist(current);
        let mut improved = Vec::new();

        for (neighbour, weight) in graph.neighbours(current).into_iter().flatten() {
            let neighbour = neighbour.as_str();
            if self.visited.contains(neighbour) {
                continue;
            }

            let candidate = base + weight;
            if candidate < self.dist(neighbour) {
                self.dists.insert(neighbour, candidate);
                self.previous.insert(neighbour, current);
                improved.push((neighbour, candidate));
            }
        }

        improved
    }

    /// Walk back from the destination through the recorded predecessors. An
    /// unreached destination has no predecessor, so this gives just the
    /// destination in that case
    fn path_to(&self, destination: &'a str) -> Vec<String> {
        let mut path = vec![destination.to_string()];
        let mut current = destination;
        while let Some(&prev) = self.previous.get(current) {
            path.push(prev.to_string());
            current = prev;
        }
        path.reverse();
        path
    }
}

fn search_linear<'a>(
    graph: &'a DeliveryGraph,
    source: &'a str,
    destination: &'a str,
) -> SearchState<'a> {
    let mut state = SearchState::new(source);
    let mut unvisited: FxHashSet<&'a str> = graph.node_ids().collect();

    while !unvisited.is_empty() {
        let closest = unvisited
            .iter()
            .copied()
            .min_by(|a, b| closer(state.dist(a), a, state.dist(b), b));

        let current = match closest {
            Some(current) => current,
            None => break,
        };

        if state.dist(current).is_infinite() {
            trace!("{} unvisited nodes can't be reached", unvisited.len());
            break;
        }

        unvisited.remove(current);
        state.visited.insert(current);

        if current == destination {
            break;
        }

        state.relax(graph, current);
    }

    state
}

/// Entry in the heap frontier. Ordering is reversed so that the std max-heap
/// pops the closest node first
struct Frontier<'a> {
    dist: f64,
    id: &'a str,
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        closer(other.dist, other.id, self.dist, self.id)
    }
}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

fn search_heap<'a>(
    graph: &'a DeliveryGraph,
    source: &'a str,
    destination: &'a str,
) -> SearchState<'a> {
    let mut state = SearchState::new(source);
    let mut frontier = BinaryHeap::new();
    frontier.push(Frontier {
        dist: 0.0,
        id: source,
    });

    while let Some(Frontier { dist, id }) = frontier.pop() {
        // Entries are never removed when a shorter distance is found, so
        // skip any which have been superseded
        if state.visited.contains(id) || dist > state.dist(id) {
            continue;
        }

        state.visited.insert(id);

        if id == destination {
            break;
        }

        for (neighbour, candidate) in state.relax(graph, id) {
            frontier.push(Frontier {
                dist: candidate,
                id: neighbour,
            });
        }
    }

    state
}

/// Find the shortest path between two waypoints, choosing the search
/// strategy based on the size of the graph
pub fn find_shortest_path(
    graph: &DeliveryGraph,
    waypoints: &WaypointCatalog,
    source_id: &str,
    destination_id: &str,
) -> PathResult {
    find_shortest_path_with(
        graph,
        waypoints,
        source_id,
        destination_id,
        SearchStrategy::for_graph(graph),
    )
}

/// Find the shortest path between two waypoints using the given strategy.
///
/// If either waypoint is not part of the graph, or no path connects them, the
/// returned distance is infinite and the path contains only the destination.
/// Ids on the path which are missing from the catalog are left out of the
/// resolved route, but kept in the path itself.
pub fn find_shortest_path_with(
    graph: &DeliveryGraph,
    waypoints: &WaypointCatalog,
    source_id: &str,
    destination_id: &str,
    strategy: SearchStrategy,
) -> PathResult {
    let (source, destination) = match (graph.node_key(source_id), graph.node_key(destination_id)) {
        (Some(source), Some(destination)) => (source, destination),
        _ => {
            debug!(
                "Either {} or {} is not part of the graph",
                source_id, destination_id
            );
            return PathResult::unreachable(destination_id, waypoints);
        }
    };

    trace!(
        "Searching {} -> {} using {:?}",
        source, destination, strategy
    );

    let state = match strategy {
        SearchStrategy::LinearScan => search_linear(graph, source, destination),
        SearchStrategy::BinaryHeap => search_heap(graph, source, destination),
    };

    let distance = state.dist(destination);
    if distance.is_infinite() {
        debug!("No path from {} to {}", source, destination);
    }

    PathResult::new(distance, state.path_to(destination), waypoints)
}

#[cfg(test)]
mod tests {

    use approx::assert_relative_eq;
    use petgraph::algo::dijkstra;

    use super::*;
    use crate::common::graph_data::Waypoint;
    use crate::loading::demo::demo_network;
    use crate::loading::petgraph::to_petgraph;

    const STRATEGIES: [SearchStrategy; 2] = [SearchStrategy::LinearScan, SearchStrategy::BinaryHeap];

    fn get_test_graph(edges: &[(&str, &str, f64)], isolated: &[&str]) -> DeliveryGraph {
        let mut graph = DeliveryGraph::new();
        for (src, dst, weight) in edges {
            graph.add_edge(src, dst, *weight).unwrap();
        }
        for id in isolated {
            graph.add_node(id);
        }
        graph
    }

    /// X - Y - Z chain, with W isolated
    fn get_xyz_graph() -> DeliveryGraph {
        get_test_graph(&[("X", "Y", 2.0), ("Y", "Z", 3.0)], &["W"])
    }

    fn get_xyz_catalog() -> WaypointCatalog {
        WaypointCatalog::new(vec![
            Waypoint::new("X", "Origin", 0.0, 0.0),
            Waypoint::new("Y", "Junction", 0.0, 0.01),
            Waypoint::new("Z", "Destination", 0.0, 0.02),
        ])
        .unwrap()
    }

    /// Deterministic pseudo-random graphs, so that properties can be checked
    /// over more than a handful of hand written cases
    fn get_synthetic_graph(seed: u64, nodes: usize, edges: usize) -> DeliveryGraph {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let mut next = move |bound: u64| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) % bound
        };

        let mut graph = DeliveryGraph::new();
        for inx in 0..nodes {
            graph.add_node(&format!("n{inx}"));
        }
        for _ in 0..edges {
            let src = next(nodes as u64);
            let dst = next(nodes as u64);
            if src == dst {
                continue;
            }
            // Small integer weights make ties likely
            let weight = (next(5) + 1) as f64;
            graph
                .add_edge(&format!("n{src}"), &format!("n{dst}"), weight)
                .unwrap();
        }
        graph
    }

    /// Shortest distance by trying every simple path from src to dst
    fn brute_force_distance(graph: &DeliveryGraph, src: &str, dst: &str) -> f64 {
        fn walk(
            graph: &DeliveryGraph,
            current: &str,
            dst: &str,
            so_far: f64,
            seen: &mut Vec<String>,
        ) -> f64 {
            if current == dst {
                return so_far;
            }
            let mut best = f64::INFINITY;
            for (neighbour, weight) in graph.neighbours(current).into_iter().flatten() {
                if seen.contains(neighbour) {
                    continue;
                }
                seen.push(neighbour.clone());
                best = best.min(walk(graph, neighbour, dst, so_far + weight, seen));
                seen.pop();
            }
            best
        }

        if !graph.contains(src) || !graph.contains(dst) {
            return f64::INFINITY;
        }
        walk(graph, src, dst, 0.0, &mut vec![src.to_string()])
    }

    fn path_weight(graph: &DeliveryGraph, path: &[String]) -> f64 {
        path.windows(2)
            .map(|leg| graph.weight(&leg[0], &leg[1]).unwrap())
            .sum()
    }

    fn get_ids(graph: &DeliveryGraph) -> Vec<String> {
        let mut ids: Vec<String> = graph.node_ids().map(String::from).collect();
        ids.sort();
        ids
    }

    mod test_find_shortest_path {

        use super::*;

        /// X -> Z must go through Y
        #[test]
        fn test_chain() {
            for strategy in STRATEGIES {
                let result = find_shortest_path_with(
                    &get_xyz_graph(),
                    &get_xyz_catalog(),
                    "X",
                    "Z",
                    strategy,
                );

                assert_eq!(result.distance, 5.0);
                assert_eq!(result.path, vec!["X", "Y", "Z"]);
                let names: Vec<&str> = result.route.iter().map(|w| w.name.as_str()).collect();
                assert_eq!(names, vec!["Origin", "Junction", "Destination"]);
            }
        }

        /// A node with no edges can't be reached
        #[test]
        fn test_isolated_destination() {
            for strategy in STRATEGIES {
                let result = find_shortest_path_with(
                    &get_xyz_graph(),
                    &get_xyz_catalog(),
                    "X",
                    "W",
                    strategy,
                );

                assert!(result.distance.is_infinite());
                assert_eq!(result.path, vec!["W"]);
                assert!(result.route.is_empty());
            }
        }

        /// Travelling from a node to itself costs nothing
        #[test]
        fn test_same_node() {
            let graph = get_xyz_graph();
            for id in get_ids(&graph) {
                for strategy in STRATEGIES {
                    let result =
                        find_shortest_path_with(&graph, &get_xyz_catalog(), &id, &id, strategy);

                    assert_eq!(result.distance, 0.0);
                    assert_eq!(result.path, vec![id.clone()]);
                }
            }
        }

        /// Ids which aren't in the graph at all are treated as unreachable,
        /// whichever end of the query they are on
        #[test]
        fn test_missing_ids() {
            let graph = get_xyz_graph();
            let catalog = get_xyz_catalog();

            let result = find_shortest_path(&graph, &catalog, "X", "nowhere");
            assert!(result.distance.is_infinite());
            assert_eq!(result.path, vec!["nowhere"]);

            let result = find_shortest_path(&graph, &catalog, "nowhere", "Z");
            assert!(result.distance.is_infinite());
            assert_eq!(result.path, vec!["Z"]);
            assert_eq!(result.route.len(), 1);

            let result = find_shortest_path(&graph, &catalog, "nowhere", "nowhere");
            assert!(result.distance.is_infinite());
            assert_eq!(result.path, vec!["nowhere"]);
        }

        /// Waypoints missing from the catalog stay in the path, but are
        /// dropped from the resolved route
        #[test]
        fn test_partial_catalog() {
            let catalog = WaypointCatalog::new(vec![
                Waypoint::new("X", "Origin", 0.0, 0.0),
                Waypoint::new("Z", "Destination", 0.0, 0.02),
            ])
            .unwrap();

            let result = find_shortest_path(&get_xyz_graph(), &catalog, "X", "Z");

            assert_eq!(result.path, vec!["X", "Y", "Z"]);
            let ids: Vec<&str> = result.route.iter().map(|w| w.id.as_str()).collect();
            assert_eq!(ids, vec!["X", "Z"]);
        }

        /// The direct edge is skipped when a detour is shorter
        #[test]
        fn test_prefers_detour() {
            let graph = get_test_graph(
                &[("a", "d", 10.0), ("a", "b", 1.0), ("b", "c", 1.0), ("c", "d", 1.0)],
                &[],
            );

            for strategy in STRATEGIES {
                let result = find_shortest_path_with(
                    &graph,
                    &WaypointCatalog::default(),
                    "a",
                    "d",
                    strategy,
                );

                assert_eq!(result.distance, 3.0);
                assert_eq!(result.path, vec!["a", "b", "c", "d"]);
            }
        }

        /// Zero weight edges are allowed
        #[test]
        fn test_zero_weight() {
            let graph = get_test_graph(&[("a", "b", 0.0), ("b", "c", 0.0)], &[]);

            let result = find_shortest_path(&graph, &WaypointCatalog::default(), "a", "c");

            assert_eq!(result.distance, 0.0);
            assert_eq!(result.path, vec!["a", "b", "c"]);
        }

        /// Graphs read from an adjacency mapping route the same as those
        /// built edge by edge
        #[test]
        fn test_graph_from_json() {
            let raw = r#"{"X": {"Y": 2}, "Y": {"X": 2, "Z": 3}, "Z": {"Y": 3}}"#;
            let graph: DeliveryGraph = serde_json::from_str(raw).unwrap();

            for strategy in STRATEGIES {
                let result =
                    find_shortest_path_with(&graph, &get_xyz_catalog(), "X", "Z", strategy);

                assert_eq!(result.distance, 5.0);
                assert_eq!(result.path, vec!["X", "Y", "Z"]);
            }
        }

        /// An id which only appears as a neighbour is still a node, and can
        /// be routed to and from
        #[test]
        fn test_neighbour_only_id() {
            let graph: DeliveryGraph = serde_json::from_str(r#"{"A": {"B": 1}}"#).unwrap();

            for strategy in STRATEGIES {
                let result = find_shortest_path_with(
                    &graph,
                    &WaypointCatalog::default(),
                    "A",
                    "B",
                    strategy,
                );
                assert_eq!(result.distance, 1.0);
                assert_eq!(result.path, vec!["A", "B"]);

                let result = find_shortest_path_with(
                    &graph,
                    &WaypointCatalog::default(),
                    "B",
                    "A",
                    strategy,
                );
                assert_eq!(result.distance, 1.0);
                assert_eq!(result.path, vec!["B", "A"]);
            }
        }

        /// When two routes are equally short, the one through the
        /// alphabetically first waypoint is chosen
        #[test]
        fn test_tie_break_by_id() {
            let graph = get_test_graph(
                &[("s", "m", 1.0), ("s", "k", 1.0), ("m", "t", 1.0), ("k", "t", 1.0)],
                &[],
            );

            for strategy in STRATEGIES {
                let result = find_shortest_path_with(
                    &graph,
                    &WaypointCatalog::default(),
                    "s",
                    "t",
                    strategy,
                );

                assert_eq!(result.distance, 2.0);
                assert_eq!(result.path, vec!["s", "k", "t"]);
            }
        }

        /// Fractional weights from the demo network add up as expected
        #[test]
        fn test_demo_network() {
            let network = demo_network().unwrap();

            let result = find_shortest_path(
                &network.graph,
                &network.waypoints,
                "restaurant-1",
                "delivery-1",
            );

            assert_relative_eq!(result.distance, 3.1, epsilon = 1e-9);
            assert_eq!(
                result.path,
                vec!["restaurant-1", "intersection-2", "delivery-1"]
            );
            assert_eq!(result.route[1].name, "Broadway & 42nd");
        }

        /// Large graphs switch over to the heap
        #[test]
        fn test_strategy_for_graph() {
            let small = get_synthetic_graph(1, LINEAR_SCAN_LIMIT, 10);
            let large = get_synthetic_graph(1, LINEAR_SCAN_LIMIT + 1, 10);

            assert_eq!(SearchStrategy::for_graph(&small), SearchStrategy::LinearScan);
            assert_eq!(SearchStrategy::for_graph(&large), SearchStrategy::BinaryHeap);
        }
    }

    mod test_properties {

        use super::*;

        /// Distances match the minimum over every simple path
        #[test]
        fn test_matches_brute_force() {
            for seed in 0..20 {
                let graph = get_synthetic_graph(seed, 7, 10);
                let catalog = WaypointCatalog::default();
                let ids = get_ids(&graph);

                for src in ids.iter() {
                    for dst in ids.iter() {
                        let target = brute_force_distance(&graph, src, dst);
                        for strategy in STRATEGIES {
                            let result =
                                find_shortest_path_with(&graph, &catalog, src, dst, strategy);

                            assert_eq!(result.distance, target, "{src} -> {dst}, seed {seed}");

                            // The returned path must actually have that length
                            if result.is_reachable() {
                                assert_eq!(result.path.first(), Some(src));
                                assert_eq!(result.path.last(), Some(dst));
                                assert_eq!(path_weight(&graph, &result.path), target);
                            } else {
                                assert_eq!(result.path, vec![dst.clone()]);
                            }
                        }
                    }
                }
            }
        }

        /// Both strategies return identical results, paths included
        #[test]
        fn test_strategies_agree() {
            for seed in 0..10 {
                let graph = get_synthetic_graph(seed, 80, 160);
                let catalog = WaypointCatalog::default();
                let ids = get_ids(&graph);

                for dst in ids.iter().step_by(7) {
                    let linear = find_shortest_path_with(
                        &graph,
                        &catalog,
                        "n0",
                        dst,
                        SearchStrategy::LinearScan,
                    );
                    let heap = find_shortest_path_with(
                        &graph,
                        &catalog,
                        "n0",
                        dst,
                        SearchStrategy::BinaryHeap,
                    );

                    assert_eq!(linear, heap);
                }
            }
        }

        /// Distances agree with petgraph's implementation
        #[test]
        fn test_matches_petgraph() {
            for seed in 0..10 {
                let graph = get_synthetic_graph(seed, 30, 50);
                let (pgraph, inx_map) = to_petgraph(&graph);
                let catalog = WaypointCatalog::default();

                let start = inx_map["n0"];
                let target = dijkstra(&pgraph, start, None, |e| *e.weight());

                for id in get_ids(&graph) {
                    let result = find_shortest_path(&graph, &catalog, "n0", &id);
                    match target.get(&inx_map[id.as_str()]) {
                        Some(dist) => assert_relative_eq!(result.distance, *dist),
                        None => assert!(result.distance.is_infinite()),
                    }
                }
            }
        }

        /// distance(a, b) == distance(b, a) on an undirected graph
        #[test]
        fn test_symmetry() {
            for seed in 0..10 {
                let graph = get_synthetic_graph(seed, 12, 20);
                let catalog = WaypointCatalog::default();
                let ids = get_ids(&graph);

                for a in ids.iter() {
                    for b in ids.iter() {
                        let forward = find_shortest_path(&graph, &catalog, a, b);
                        let backward = find_shortest_path(&graph, &catalog, b, a);

                        assert_eq!(forward.distance, backward.distance);
                    }
                }
            }
        }

        /// distance(a, c) <= distance(a, b) + distance(b, c)
        #[test]
        fn test_triangle_inequality() {
            for seed in 0..5 {
                let graph = get_synthetic_graph(seed, 10, 18);
                let catalog = WaypointCatalog::default();
                let ids = get_ids(&graph);

                let mut dists = FxHashMap::<(String, String), f64>::default();
                for a in ids.iter() {
                    for b in ids.iter() {
                        let result = find_shortest_path(&graph, &catalog, a, b);
                        dists.insert((a.clone(), b.clone()), result.distance);
                    }
                }

                for a in ids.iter() {
                    for b in ids.iter() {
                        for c in ids.iter() {
                            let ac = dists[&(a.clone(), c.clone())];
                            let ab = dists[&(a.clone(), b.clone())];
                            let bc = dists[&(b.clone(), c.clone())];
                            if ab.is_finite() && bc.is_finite() {
                                assert!(ac <= ab + bc, "{a} -> {b} -> {c}");
                            }
                        }
                    }
                }
            }
        }

        /// No path crosses between two disjoint components
        #[test]
        fn test_disjoint_components() {
            let graph = get_test_graph(
                &[("a1", "a2", 1.0), ("a2", "a3", 1.0), ("b1", "b2", 1.0)],
                &[],
            );
            let catalog = WaypointCatalog::default();

            for src in ["a1", "a2", "a3"] {
                for dst in ["b1", "b2"] {
                    for strategy in STRATEGIES {
                        let result = find_shortest_path_with(&graph, &catalog, src, dst, strategy);
                        assert!(result.distance.is_infinite());
                        assert_eq!(result.path, vec![dst]);
                    }
                }
            }
        }
    }
}
