use crate::error::{CityRouteError, Result};
use crate::graph::{Graph, Vertex, DEFAULT_REASON};
use crate::route::Route;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const STRUCTURE_FILE: &str = "city_graph.json";
const WEIGHTS_FILE: &str = "current_weights.json";

fn two_way() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
struct RoadEnds {
    source: String,
    target: String,
    #[serde(default = "two_way")]
    bidirectional: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoadWeight {
    source: String,
    target: String,
    weight: u32,
    reason: String,
    #[serde(default = "two_way")]
    bidirectional: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct StructureFile {
    vertices: Vec<Vertex>,
    edges: Vec<RoadEnds>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WeightsFile {
    edges: Vec<RoadWeight>,
}

/// JSON files holding a city map: topology in one file, the current road
/// conditions in another, so a reset only rewrites the latter.
pub struct MapStore {
    dir: PathBuf,
    structure: PathBuf,
    weights: PathBuf,
}

impl MapStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        let dir = dir.as_ref().to_path_buf();
        Ok(Self {
            structure: dir.join(STRUCTURE_FILE),
            weights: dir.join(WEIGHTS_FILE),
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_structure(&self, graph: &Graph) -> Result<()> {
        let file = StructureFile {
            vertices: graph.vertices().cloned().collect(),
            edges: graph
                .roads()
                .into_iter()
                .map(|(e, bidirectional)| RoadEnds {
                    source: e.source,
                    target: e.target,
                    bidirectional,
                })
                .collect(),
        };
        write_json(&self.structure, &file)?;
        tracing::info!(path = %self.structure.display(), "saved city structure");
        Ok(())
    }

    /// Rebuild the map topology, one-way roads included. Every road carries
    /// weight 1 until [`MapStore::load_weights`] runs. `Ok(None)` if nothing
    /// was saved.
    pub fn load_structure(&self) -> Result<Option<Graph>> {
        let Some(file) = read_json::<StructureFile>(&self.structure)? else {
            return Ok(None);
        };
        let mut graph = Graph::new();
        for vertex in file.vertices {
            graph.add_vertex(vertex);
        }
        for road in &file.edges {
            let linked = graph.add_edge(
                &road.source,
                &road.target,
                1,
                DEFAULT_REASON,
                road.bidirectional,
            );
            if !linked {
                return Err(CityRouteError::Validation(format!(
                    "road {} -> {} references an unknown point",
                    road.source, road.target
                )));
            }
        }
        tracing::info!(
            vertices = graph.vertex_count(),
            roads = graph.edge_count(),
            "loaded city structure"
        );
        Ok(Some(graph))
    }

    pub fn save_weights(&self, graph: &Graph) -> Result<()> {
        let file = WeightsFile {
            edges: graph
                .roads()
                .into_iter()
                .map(|(e, bidirectional)| RoadWeight {
                    source: e.source,
                    target: e.target,
                    weight: e.weight,
                    reason: e.reason,
                    bidirectional,
                })
                .collect(),
        };
        write_json(&self.weights, &file)?;
        tracing::info!(path = %self.weights.display(), "saved road weights");
        Ok(())
    }

    /// Apply saved road conditions to `graph`. `Ok(false)` if nothing was saved.
    pub fn load_weights(&self, graph: &mut Graph) -> Result<bool> {
        let Some(file) = read_json::<WeightsFile>(&self.weights)? else {
            return Ok(false);
        };
        let mut missing = 0usize;
        for e in file.edges {
            if !graph.update_weight(&e.source, &e.target, e.weight, e.reason, e.bidirectional) {
                missing += 1;
            }
        }
        if missing > 0 {
            tracing::warn!(missing, "saved weights name roads absent from the map");
        }
        Ok(true)
    }
}

/// Write `route` as pretty JSON to `path`.
pub fn write_route(path: impl AsRef<Path>, route: &Route) -> Result<()> {
    write_json(path.as_ref(), route)?;
    tracing::info!(path = %path.as_ref().display(), cost = route.cost, "exported route");
    Ok(())
}

pub fn read_route(path: impl AsRef<Path>) -> Result<Route> {
    read_json(path.as_ref())?.ok_or_else(|| {
        CityRouteError::Validation(format!("no route file at {}", path.as_ref().display()))
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_reader(BufReader::new(file))?))
}
