//! Cheapest route search over a [`Graph`].
//!
//! Dijkstra with a binary heap and lazy deletion: relaxed vertices are pushed
//! again instead of decreasing their key, and entries for already settled
//! vertices are dropped when popped. Heap entries compare by distance, then by
//! vertex id, so equal-cost routes always resolve the same way.

use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// One traversed road of a [`Route`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    /// Display name of the road's start.
    pub from: String,
    /// Display name of the road's end.
    pub to: String,
    pub weight: u32,
    pub reason: String,
}

/// Result of a successful route query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Vertex ids from source to target, both included.
    pub path: Vec<String>,
    /// Sum of the traversed weights.
    pub cost: u64,
    /// `path.len() - 1` entries, one per consecutive pair.
    pub hops: Vec<Hop>,
}

struct Search {
    // a vertex missing from `distance` is at infinity
    distance: HashMap<String, u64>,
    predecessor: HashMap<String, String>,
}

impl Search {
    fn run(graph: &Graph, source: &str, target: Option<&str>) -> Self {
        let mut distance: HashMap<String, u64> = HashMap::new();
        let mut predecessor: HashMap<String, String> = HashMap::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier = BinaryHeap::new();

        distance.insert(source.to_string(), 0);
        frontier.push(Reverse((0u64, source.to_string())));

        while let Some(Reverse((dist, current))) = frontier.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if target == Some(current.as_str()) {
                break;
            }
            for edge in graph.neighbors(&current) {
                if visited.contains(&edge.target) {
                    continue;
                }
                let candidate = dist + u64::from(edge.weight);
                let known = distance.get(&edge.target).copied().unwrap_or(u64::MAX);
                if candidate < known {
                    distance.insert(edge.target.clone(), candidate);
                    predecessor.insert(edge.target.clone(), current.clone());
                    frontier.push(Reverse((candidate, edge.target)));
                }
            }
        }

        Self {
            distance,
            predecessor,
        }
    }

    fn path_to(&self, target: &str) -> Vec<String> {
        let mut path = vec![target.to_string()];
        let mut current = target;
        while let Some(prev) = self.predecessor.get(current) {
            path.push(prev.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Cheapest route from `source` to `target`.
///
/// Returns `None` when either id is unknown or `target` cannot be reached;
/// callers that need to tell those apart should check the ids against the
/// graph first.
pub fn shortest_path(graph: &Graph, source: &str, target: &str) -> Option<Route> {
    if !graph.contains(source) || !graph.contains(target) {
        tracing::debug!(source, target, "route endpoint not in graph");
        return None;
    }

    let search = Search::run(graph, source, Some(target));
    let Some(&cost) = search.distance.get(target) else {
        tracing::debug!(source, target, "target unreachable");
        return None;
    };
    let path = search.path_to(target);
    let hops = hops_along(graph, &path);
    tracing::debug!(source, target, cost, hops = hops.len(), "route found");

    Some(Route { path, cost, hops })
}

/// Settled distance of every vertex reachable from `source`.
pub fn distances_from(graph: &Graph, source: &str) -> HashMap<String, u64> {
    if !graph.contains(source) {
        return HashMap::new();
    }
    Search::run(graph, source, None).distance
}

// Weights are read back from the graph rather than carried through the search.
fn hops_along(graph: &Graph, path: &[String]) -> Vec<Hop> {
    path.windows(2)
        .filter_map(|pair| {
            let [from, to] = pair else { return None };
            Some(Hop {
                from: graph.vertex(from)?.name.clone(),
                to: graph.vertex(to)?.name.clone(),
                weight: graph.edge_weight(from, to)?,
                reason: graph.edge_reason(from, to)?.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Vertex, DEFAULT_REASON};
    use crate::weights::{WeightGenerator, CLOSED_ROAD_WEIGHT};

    fn graph_with(ids: &[&str]) -> Graph {
        let mut g = Graph::new();
        for (i, id) in ids.iter().enumerate() {
            g.add_vertex(Vertex::new(*id, format!("P{id}"), i as f64, 0.0));
        }
        g
    }

    fn triangle() -> Graph {
        let mut g = graph_with(&["A", "B", "C"]);
        g.add_edge("A", "B", 5, "Trânsito moderado", true);
        g.add_edge("B", "C", 3, "Trânsito livre", true);
        g.add_edge("A", "C", 10, "Trânsito intenso", true);
        g
    }

    // 3x3 grid, ids G0..G8 row by row
    fn grid() -> Graph {
        let ids: Vec<String> = (0..9).map(|i| format!("G{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut g = graph_with(&refs);
        for i in 0..9 {
            if i % 3 != 2 {
                g.add_edge(&ids[i], &ids[i + 1], 1, DEFAULT_REASON, true);
            }
            if i < 6 {
                g.add_edge(&ids[i], &ids[i + 3], 1, DEFAULT_REASON, true);
            }
        }
        g
    }

    fn cheapest_simple_path(
        g: &Graph,
        current: &str,
        target: &str,
        seen: &mut Vec<String>,
    ) -> Option<u64> {
        if current == target {
            return Some(0);
        }
        seen.push(current.to_string());
        let mut best: Option<u64> = None;
        for e in g.neighbors(current) {
            if seen.contains(&e.target) {
                continue;
            }
            if let Some(rest) = cheapest_simple_path(g, &e.target, target, seen) {
                let total = rest + u64::from(e.weight);
                best = Some(best.map_or(total, |b| b.min(total)));
            }
        }
        seen.pop();
        best
    }

    #[test]
    fn picks_cheaper_two_hop_route() {
        let g = triangle();
        let route = shortest_path(&g, "A", "C").expect("route");
        assert_eq!(route.path, ["A", "B", "C"]);
        assert_eq!(route.cost, 8);
        assert_eq!(
            route.hops,
            vec![
                Hop {
                    from: "PA".into(),
                    to: "PB".into(),
                    weight: 5,
                    reason: "Trânsito moderado".into(),
                },
                Hop {
                    from: "PB".into(),
                    to: "PC".into(),
                    weight: 3,
                    reason: "Trânsito livre".into(),
                },
            ]
        );
    }

    #[test]
    fn same_endpoint_is_a_zero_cost_route() {
        let g = triangle();
        let route = shortest_path(&g, "B", "B").expect("route");
        assert_eq!(route.path, ["B"]);
        assert_eq!(route.cost, 0);
        assert!(route.hops.is_empty());
    }

    #[test]
    fn unknown_endpoints_have_no_route() {
        let g = triangle();
        assert!(shortest_path(&g, "A", "Z").is_none());
        assert!(shortest_path(&g, "Z", "A").is_none());
        assert!(distances_from(&g, "Z").is_empty());
    }

    #[test]
    fn isolated_vertex_is_unreachable() {
        let mut g = grid();
        g.add_vertex(Vertex::new("X", "Island", 9.0, 9.0));
        assert!(shortest_path(&g, "G0", "X").is_none());
        assert!(shortest_path(&g, "X", "G8").is_none());
        assert!(!distances_from(&g, "G0").contains_key("X"));
    }

    #[test]
    fn one_way_road_is_not_walked_backwards() {
        let mut g = graph_with(&["A", "B"]);
        g.add_edge("A", "B", 2, DEFAULT_REASON, false);
        assert_eq!(shortest_path(&g, "A", "B").map(|r| r.cost), Some(2));
        assert!(shortest_path(&g, "B", "A").is_none());
    }

    #[test]
    fn equal_costs_break_ties_by_vertex_id() {
        // C is linked first, but B sorts first
        let mut g = graph_with(&["A", "B", "C", "D"]);
        g.add_edge("A", "C", 1, DEFAULT_REASON, true);
        g.add_edge("C", "D", 1, DEFAULT_REASON, true);
        g.add_edge("A", "B", 1, DEFAULT_REASON, true);
        g.add_edge("B", "D", 1, DEFAULT_REASON, true);
        let route = shortest_path(&g, "A", "D").expect("route");
        assert_eq!(route.path, ["A", "B", "D"]);
        assert_eq!(route.cost, 2);
    }

    #[test]
    fn closed_road_forces_a_detour() {
        let mut g = triangle();
        g.update_weight("A", "B", CLOSED_ROAD_WEIGHT, "Rua fechada", true);
        let route = shortest_path(&g, "A", "C").expect("route");
        assert_eq!(route.path, ["A", "C"]);
        assert_eq!(route.cost, 10);
    }

    #[test]
    fn matches_exhaustive_search_on_random_grids() {
        let mut g = grid();
        let mut gen = WeightGenerator::seeded(5);
        for _ in 0..5 {
            gen.regenerate_all(&mut g);
            for target in ["G2", "G4", "G6", "G8"] {
                let route = shortest_path(&g, "G0", target).expect("grid is connected");
                let brute = cheapest_simple_path(&g, "G0", target, &mut Vec::new());
                assert_eq!(Some(route.cost), brute);
                let walked: u64 = route.hops.iter().map(|h| u64::from(h.weight)).sum();
                assert_eq!(walked, route.cost);
                assert_eq!(route.hops.len(), route.path.len() - 1);
            }
        }
    }

    #[test]
    fn source_distance_is_zero() {
        let mut g = grid();
        WeightGenerator::seeded(9).regenerate_all(&mut g);
        for v in g.vertices() {
            let dist = distances_from(&g, &v.id);
            assert_eq!(dist.get(&v.id), Some(&0));
            assert_eq!(dist.len(), 9);
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        let mut g = grid();
        WeightGenerator::seeded(21).regenerate_all(&mut g);
        let first = shortest_path(&g, "G0", "G8");
        for _ in 0..10 {
            assert_eq!(shortest_path(&g, "G0", "G8"), first);
        }
    }
}
