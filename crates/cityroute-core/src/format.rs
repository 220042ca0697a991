//! Plain-text rendering of routes and map listings.

use crate::graph::Graph;
use crate::route::Route;
use crate::weights::Condition;
use std::fmt::Write;

pub const NO_ROUTE_MESSAGE: &str = "No route available between the selected points!";

const WIDTH: usize = 60;

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(WIDTH).collect()
}

/// Display name of `id`, falling back to the id itself.
fn name_of<'a>(graph: &'a Graph, id: &'a str) -> &'a str {
    graph.vertex(id).map(|v| v.name.as_str()).unwrap_or(id)
}

pub fn route_report(graph: &Graph, route: Option<&Route>) -> String {
    let Some(route) = route else {
        return NO_ROUTE_MESSAGE.to_string();
    };
    let mut out = String::new();
    let names: Vec<&str> = route.path.iter().map(|id| name_of(graph, id)).collect();

    let _ = writeln!(out, "{}", rule('='));
    let _ = writeln!(out, "{:^width$}", "BEST ROUTE FOUND", width = WIDTH);
    let _ = writeln!(out, "{}", rule('='));
    let _ = writeln!(out);
    let _ = writeln!(out, "Route: {}", names.join(" → "));
    let _ = writeln!(out);
    let _ = writeln!(out, "Leg details:");
    let _ = writeln!(out, "{}", rule('-'));
    for (i, hop) in route.hops.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {} → {}", i + 1, hop.from, hop.to);
        let _ = writeln!(out, "   Weight: {}", hop.weight);
        let _ = writeln!(out, "   Condition: {}", hop.reason);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule('-'));
    let _ = writeln!(out, "TOTAL COST: {}", route.cost);
    let _ = writeln!(out, "{}", rule('='));
    out
}

pub fn vertex_table(graph: &Graph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<5} {:<20}", "ID", "Name");
    let _ = writeln!(out, "{}", rule('-'));
    for v in graph.vertices() {
        let _ = writeln!(out, "{:<5} {:<20}", v.id, v.name);
    }
    out
}

pub fn edge_table(graph: &Graph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<34} {:>6}  Condition", "Road", "Weight");
    let _ = writeln!(out, "{}", rule('-'));
    for e in graph.all_edges() {
        let road = format!("{} ↔ {}", name_of(graph, &e.source), name_of(graph, &e.target));
        let _ = writeln!(out, "{:<34} {:>6}  {}", road, e.weight, e.reason);
    }
    out
}

pub fn condition_table(conditions: &[Condition]) -> String {
    let mut out = String::new();
    for c in conditions {
        let range = if c.min_weight == c.max_weight {
            c.min_weight.to_string()
        } else {
            format!("{}-{}", c.min_weight, c.max_weight)
        };
        let _ = writeln!(out, "• {}", c.label);
        let _ = writeln!(out, "  Weight: {range}");
        let _ = writeln!(out, "  Probability: {:.0}%", c.share * 100.0);
        let _ = writeln!(out);
    }
    out
}
