use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reason attached to roads that have not been through a weight reset yet.
pub const DEFAULT_REASON: &str = "Condição normal";

/// A named point on the city map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x,
            y,
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

/// Directed view of an adjacency record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: u32,
    pub reason: String,
}

#[derive(Debug, Clone)]
struct Road {
    weight: u32,
    reason: String,
}

#[derive(Debug, Clone)]
struct Link {
    target: String,
    road: usize,
}

/// Undirected city graph.
///
/// Every connection owns a single road record; each endpoint's adjacency list
/// links to it by index, so both directions always report the same weight and
/// reason.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    vertices: HashMap<String, Vertex>,
    // insertion order of vertex ids
    order: Vec<String>,
    adj: HashMap<String, Vec<Link>>,
    roads: Vec<Road>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `vertex` unless its id is already taken. Returns `true` on insert.
    pub fn add_vertex(&mut self, vertex: Vertex) -> bool {
        if self.vertices.contains_key(&vertex.id) {
            return false;
        }
        self.order.push(vertex.id.clone());
        self.adj.insert(vertex.id.clone(), Vec::new());
        self.vertices.insert(vertex.id.clone(), vertex);
        true
    }

    /// Connect `source` to `target`, and `target` back to `source` when
    /// `bidirectional` is set.
    ///
    /// Both endpoints must already exist; otherwise nothing changes and
    /// `false` is returned. Re-adding a pair that is already linked
    /// overwrites the existing road instead of stacking a parallel one.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        weight: u32,
        reason: impl Into<String>,
        bidirectional: bool,
    ) -> bool {
        if !self.contains(source) || !self.contains(target) {
            tracing::warn!(source, target, "add_edge references unknown vertex, ignored");
            return false;
        }
        let reason = reason.into();
        let forward = self.find_road(source, target);
        let backward = if bidirectional && source != target {
            self.find_road(target, source)
        } else {
            None
        };

        let road = match forward.or(backward) {
            Some(idx) => {
                self.set_road(idx, weight, &reason);
                idx
            }
            None => {
                self.roads.push(Road {
                    weight,
                    reason: reason.clone(),
                });
                self.roads.len() - 1
            }
        };

        if forward.is_none() {
            self.link(source, target, road);
        }
        if bidirectional && source != target {
            match backward {
                None => self.link(target, source, road),
                // one-way roads added separately in each direction
                Some(idx) if idx != road => self.set_road(idx, weight, &reason),
                Some(_) => {}
            }
        }
        true
    }

    /// Adjacency of `id` as directed edges; empty for unknown ids.
    pub fn neighbors(&self, id: &str) -> Vec<Edge> {
        self.adj
            .get(id)
            .map(|links| {
                links
                    .iter()
                    .map(|l| self.edge_view(id, l))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn edge_weight(&self, source: &str, target: &str) -> Option<u32> {
        self.find_road(source, target).map(|idx| self.roads[idx].weight)
    }

    pub fn edge_reason(&self, source: &str, target: &str) -> Option<&str> {
        self.find_road(source, target)
            .map(|idx| self.roads[idx].reason.as_str())
    }

    /// Overwrite weight and reason of the `source -> target` record, and of
    /// `target -> source` when `bidirectional`. Returns `true` if any record
    /// was found.
    pub fn update_weight(
        &mut self,
        source: &str,
        target: &str,
        weight: u32,
        reason: impl Into<String>,
        bidirectional: bool,
    ) -> bool {
        let reason = reason.into();
        let mut updated = false;
        if let Some(idx) = self.find_road(source, target) {
            self.set_road(idx, weight, &reason);
            updated = true;
        }
        if bidirectional {
            if let Some(idx) = self.find_road(target, source) {
                self.set_road(idx, weight, &reason);
                updated = true;
            }
        }
        if !updated {
            tracing::warn!(source, target, "update_weight found no matching road, ignored");
        }
        updated
    }

    /// Every connection once, keyed by its unordered endpoint pair, in order
    /// of first discovery.
    pub fn all_edges(&self) -> Vec<Edge> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut out = Vec::new();
        for id in &self.order {
            for link in &self.adj[id] {
                let key = if id.as_str() <= link.target.as_str() {
                    (id.as_str(), link.target.as_str())
                } else {
                    (link.target.as_str(), id.as_str())
                };
                if seen.insert(key) {
                    out.push(self.edge_view(id, link));
                }
            }
        }
        out
    }

    /// Every road record once, with `true` when it is linked from both ends.
    ///
    /// Unlike [`Graph::all_edges`], two one-way roads running opposite ways
    /// between the same pair are reported separately.
    pub fn roads(&self) -> Vec<(Edge, bool)> {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut out = Vec::new();
        for id in &self.order {
            for link in &self.adj[id] {
                if seen.insert(link.road) {
                    let two_way = link.target != *id
                        && self.find_road(&link.target, id) == Some(link.road);
                    out.push((self.edge_view(id, link), two_way));
                }
            }
        }
        out
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.order.iter().map(move |id| &self.vertices[id])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.all_edges().len()
    }

    fn find_road(&self, source: &str, target: &str) -> Option<usize> {
        self.adj
            .get(source)?
            .iter()
            .find(|l| l.target == target)
            .map(|l| l.road)
    }

    fn set_road(&mut self, idx: usize, weight: u32, reason: &str) {
        let road = &mut self.roads[idx];
        road.weight = weight;
        road.reason.clear();
        road.reason.push_str(reason);
    }

    fn link(&mut self, source: &str, target: &str, road: usize) {
        if let Some(links) = self.adj.get_mut(source) {
            links.push(Link {
                target: target.to_string(),
                road,
            });
        }
    }

    fn edge_view(&self, source: &str, link: &Link) -> Edge {
        let road = &self.roads[link.road];
        Edge {
            source: source.to_string(),
            target: link.target.clone(),
            weight: road.weight,
            reason: road.reason.clone(),
        }
    }
}
