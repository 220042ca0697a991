use crate::graph::{Graph, Vertex, DEFAULT_REASON};

const COLUMNS: usize = 6;
const ROWS: usize = 5;
const SPACING: f64 = 3.0;

const PLACE_NAMES: [&str; 26] = [
    "Centro",
    "Shopping",
    "Hospital",
    "Escola",
    "Praça",
    "Estação",
    "Parque",
    "Mercado",
    "Biblioteca",
    "Aeroporto",
    "Rodoviária",
    "Prefeitura",
    "Museu",
    "Teatro",
    "Estádio",
    "Jardim Botânico",
    "Universidade",
    "Fórum",
    "Delegacia",
    "Correios",
    "Padaria",
    "Farmácia",
    "Banco",
    "Posto de Saúde",
    "Pizzaria",
    "Cinema",
];

fn letter(i: usize) -> String {
    char::from(b'A' + i as u8).to_string()
}

/// The stock 26-point city: points `A`..`Z` on a six-column grid, linked
/// horizontally, vertically and along both diagonals.
pub fn default_city() -> Graph {
    let mut graph = Graph::new();
    let n = PLACE_NAMES.len();

    for (i, name) in PLACE_NAMES.iter().enumerate() {
        let x = ((i % COLUMNS) + 1) as f64 * SPACING;
        // first row on top
        let y = (ROWS - i / COLUMNS) as f64 * SPACING;
        graph.add_vertex(Vertex::new(letter(i), *name, x, y));
    }

    let mut roads: Vec<(usize, usize)> = Vec::new();
    for i in 0..n - 1 {
        if (i + 1) % COLUMNS != 0 {
            roads.push((i, i + 1));
        }
    }
    for i in 0..n - COLUMNS {
        roads.push((i, i + COLUMNS));
    }
    for i in 0..n - COLUMNS {
        if (i + 1) % COLUMNS == 0 {
            continue;
        }
        if i + COLUMNS + 1 < n {
            roads.push((i, i + COLUMNS + 1));
        }
        if i + COLUMNS - 1 < n && i % COLUMNS != 0 {
            roads.push((i, i + COLUMNS - 1));
        }
    }

    for (a, b) in roads {
        graph.add_edge(&letter(a), &letter(b), 1, DEFAULT_REASON, true);
    }
    tracing::debug!(
        vertices = graph.vertex_count(),
        roads = graph.edge_count(),
        "built default city"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::shortest_path;

    #[test]
    fn has_every_letter_with_its_place() {
        let g = default_city();
        assert_eq!(g.vertex_count(), 26);
        let a = g.vertex("A").unwrap();
        assert_eq!(a.name, "Centro");
        assert_eq!((a.x, a.y), (3.0, 15.0));
        let z = g.vertex("Z").unwrap();
        assert_eq!(z.name, "Cinema");
        assert_eq!((z.x, z.y), (6.0, 3.0));
    }

    #[test]
    fn links_grid_and_diagonals() {
        let g = default_city();
        // horizontal, vertical, diagonal, anti-diagonal
        assert_eq!(g.edge_weight("A", "B"), Some(1));
        assert_eq!(g.edge_weight("A", "G"), Some(1));
        assert_eq!(g.edge_weight("A", "H"), Some(1));
        assert_eq!(g.edge_weight("B", "G"), Some(1));
        // no wrap between rows, no anti-diagonal from the first column
        assert_eq!(g.edge_weight("F", "G"), None);
        assert_eq!(g.edge_weight("G", "L"), None);
        assert_eq!(g.edge_reason("B", "A"), Some(DEFAULT_REASON));
        // 21 horizontal + 20 vertical + 16 diagonal + 13 anti-diagonal
        assert_eq!(g.edge_count(), 70);
    }

    #[test]
    fn every_point_is_reachable() {
        let g = default_city();
        for v in g.vertices() {
            assert!(shortest_path(&g, "A", &v.id).is_some(), "{} unreachable", v.id);
        }
    }
}
