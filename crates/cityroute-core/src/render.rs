//! SVG drawing of the city map, optionally with one route highlighted.
//!
//! Roads are colored by their current condition and labeled with their
//! weight. Route roads are drawn thicker and on top; route points are
//! colored by role (origin, destination, on the way).

use crate::graph::{Edge, Graph, Vertex};
use crate::route::Route;
use crate::weights::CONDITIONS;
use std::fmt::Write;

// pixels per map unit
const SCALE: f64 = 60.0;
const MARGIN: f64 = 60.0;
const LEGEND_WIDTH: f64 = 220.0;
const RADIUS: f64 = 16.0;

const UNKNOWN_CONDITION_COLOR: &str = "#808080";
const ORIGIN_COLOR: &str = "#008000";
const DESTINATION_COLOR: &str = "#CC0000";
const ON_ROUTE_COLOR: &str = "#FFD700";
const POINT_COLOR: &str = "#1E90FF";

/// Stroke color for a road in the given condition.
pub fn condition_color(reason: &str) -> &'static str {
    match reason {
        "Via expressa" => "#00FF00",
        "Trânsito livre" => "#90EE90",
        "Trânsito moderado" => "#FFD700",
        "Trânsito intenso" => "#FFA500",
        "Rua em obras" => "#FF6347",
        "Acidente na via" => "#FF0000",
        "Rua fechada" => "#8B0000",
        _ => UNKNOWN_CONDITION_COLOR,
    }
}

struct Frame {
    min_x: f64,
    max_y: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn fit(graph: &Graph) -> Self {
        let mut vertices = graph.vertices().peekable();
        if vertices.peek().is_none() {
            return Self {
                min_x: 0.0,
                max_y: 0.0,
                width: 2.0 * MARGIN + LEGEND_WIDTH,
                height: 2.0 * MARGIN,
            };
        }
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in vertices {
            min_x = min_x.min(v.x);
            max_x = max_x.max(v.x);
            min_y = min_y.min(v.y);
            max_y = max_y.max(v.y);
        }
        Self {
            min_x,
            max_y,
            width: 2.0 * MARGIN + (max_x - min_x) * SCALE + LEGEND_WIDTH,
            height: 2.0 * MARGIN + (max_y - min_y) * SCALE,
        }
    }

    /// Map coordinates to pixels; y grows upward on the map, downward in SVG.
    fn place(&self, v: &Vertex) -> (f64, f64) {
        (
            MARGIN + (v.x - self.min_x) * SCALE,
            MARGIN + (self.max_y - v.y) * SCALE,
        )
    }
}

fn on_route(route: Option<&Route>, edge: &Edge) -> bool {
    route.is_some_and(|r| {
        r.path.windows(2).any(|pair| {
            (pair[0] == edge.source && pair[1] == edge.target)
                || (pair[0] == edge.target && pair[1] == edge.source)
        })
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render `graph` as a standalone SVG document. Roads of `route`, when
/// given, are highlighted along with its points.
pub fn map_svg(graph: &Graph, route: Option<&Route>) -> String {
    let frame = Frame::fit(graph);
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif">"#,
        w = frame.width,
        h = frame.height
    );
    let _ = writeln!(out, r##"<rect width="100%" height="100%" fill="#FFFFFF"/>"##);

    let (highlighted, plain): (Vec<Edge>, Vec<Edge>) = graph
        .roads()
        .into_iter()
        .map(|(edge, _)| edge)
        .partition(|edge| on_route(route, edge));

    for (edge, class, width, opacity) in plain
        .iter()
        .map(|e| (e, "road", 3, 0.6))
        .chain(highlighted.iter().map(|e| (e, "route", 6, 1.0)))
    {
        let (Some(a), Some(b)) = (graph.vertex(&edge.source), graph.vertex(&edge.target)) else {
            continue;
        };
        let ((x1, y1), (x2, y2)) = (frame.place(a), frame.place(b));
        let _ = writeln!(
            out,
            r#"<line class="{class}" x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{color}" stroke-width="{width}" stroke-opacity="{opacity}" stroke-linecap="round"/>"#,
            color = condition_color(&edge.reason),
        );
    }

    for edge in plain.iter().chain(&highlighted) {
        let (Some(a), Some(b)) = (graph.vertex(&edge.source), graph.vertex(&edge.target)) else {
            continue;
        };
        let ((x1, y1), (x2, y2)) = (frame.place(a), frame.place(b));
        let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
        let _ = writeln!(
            out,
            r##"<rect x="{:.1}" y="{:.1}" width="28" height="16" rx="3" fill="#FFFFFF" stroke="#000000" stroke-width="0.5" fill-opacity="0.9"/>"##,
            mx - 14.0,
            my - 8.0
        );
        let _ = writeln!(
            out,
            r#"<text x="{mx:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
            my + 4.0,
            edge.weight
        );
    }

    let (origin, destination) = match route {
        Some(r) => (r.path.first(), r.path.last()),
        None => (None, None),
    };
    for v in graph.vertices() {
        let (x, y) = frame.place(v);
        let (fill, radius) = if origin == Some(&v.id) {
            (ORIGIN_COLOR, RADIUS * 1.25)
        } else if destination == Some(&v.id) {
            (DESTINATION_COLOR, RADIUS * 1.25)
        } else if route.is_some_and(|r| r.path.contains(&v.id)) {
            (ON_ROUTE_COLOR, RADIUS * 1.1)
        } else {
            (POINT_COLOR, RADIUS)
        };
        let _ = writeln!(
            out,
            r##"<circle cx="{x:.1}" cy="{y:.1}" r="{radius:.1}" fill="{fill}" stroke="#000000" stroke-width="1.5" fill-opacity="0.9"/>"##
        );
        let _ = writeln!(
            out,
            r##"<text x="{x:.1}" y="{:.1}" font-size="13" font-weight="bold" fill="#FFFFFF" text-anchor="middle">{}</text>"##,
            y + 4.5,
            escape(&v.id)
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.1}" y="{:.1}" font-size="10" text-anchor="middle">{}</text>"#,
            y + radius + 12.0,
            escape(&v.name)
        );
    }

    let legend_x = frame.width - LEGEND_WIDTH + 20.0;
    let _ = writeln!(
        out,
        r#"<text x="{legend_x:.1}" y="{:.1}" font-size="13" font-weight="bold">Road conditions</text>"#,
        MARGIN
    );
    for (i, condition) in CONDITIONS.iter().enumerate() {
        let y = MARGIN + 22.0 * (i as f64 + 1.0);
        let _ = writeln!(
            out,
            r#"<line x1="{legend_x:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="4"/>"#,
            y - 4.0,
            legend_x + 30.0,
            y - 4.0,
            condition_color(condition.label)
        );
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{y:.1}" font-size="11">{}</text>"#,
            legend_x + 38.0,
            escape(condition.label)
        );
    }
    let _ = writeln!(out, "</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::default_city;
    use crate::route::shortest_path;
    use crate::weights::WeightGenerator;

    #[test]
    fn every_point_and_road_is_drawn() {
        let mut g = default_city();
        WeightGenerator::seeded(5).regenerate_all(&mut g);
        let svg = map_svg(&g, None);
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle ").count(), g.vertex_count());
        assert_eq!(svg.matches(r#"<line class="road""#).count(), g.edge_count());
        assert_eq!(svg.matches(r#"class="route""#).count(), 0);
        assert!(svg.contains(POINT_COLOR));
        assert!(!svg.contains(ORIGIN_COLOR));
    }

    #[test]
    fn route_roads_and_points_are_highlighted() {
        let mut g = default_city();
        WeightGenerator::seeded(12).regenerate_all(&mut g);
        let route = shortest_path(&g, "A", "Z").expect("connected city");
        let svg = map_svg(&g, Some(&route));

        assert_eq!(svg.matches(r#"class="route""#).count(), route.hops.len());
        assert_eq!(
            svg.matches(r#"<line class="road""#).count(),
            g.edge_count() - route.hops.len()
        );
        assert_eq!(svg.matches(ORIGIN_COLOR).count(), 1);
        assert_eq!(svg.matches(DESTINATION_COLOR).count(), 1);
        // highlighted roads come after the plain ones
        let last_plain = svg.rfind(r#"class="road""#).expect("plain roads drawn");
        let first_route = svg.find(r#"class="route""#).expect("route roads drawn");
        assert!(first_route > last_plain);
    }

    #[test]
    fn map_y_axis_points_up() {
        let mut g = Graph::new();
        g.add_vertex(Vertex::new("A", "Low", 0.0, 0.0));
        g.add_vertex(Vertex::new("B", "High", 0.0, 2.0));
        let frame = Frame::fit(&g);
        let low = frame.place(g.vertex("A").unwrap());
        let high = frame.place(g.vertex("B").unwrap());
        assert_eq!(low, (MARGIN, MARGIN + 2.0 * SCALE));
        assert_eq!(high, (MARGIN, MARGIN));
    }

    #[test]
    fn names_are_escaped() {
        let mut g = Graph::new();
        g.add_vertex(Vertex::new("A", "Bar & <Grill>", 0.0, 0.0));
        let svg = map_svg(&g, None);
        assert!(svg.contains("Bar &amp; &lt;Grill&gt;"));
        assert!(!svg.contains("<Grill>"));
    }

    #[test]
    fn unknown_condition_is_grey() {
        assert_eq!(condition_color("Condição normal"), UNKNOWN_CONDITION_COLOR);
        for c in &CONDITIONS {
            assert_ne!(condition_color(c.label), UNKNOWN_CONDITION_COLOR);
        }
    }

    #[test]
    fn empty_map_is_still_a_document() {
        let svg = map_svg(&Graph::new(), None);
        assert_eq!(svg.matches("<circle ").count(), 0);
        assert!(svg.contains("Road conditions"));
    }
}
