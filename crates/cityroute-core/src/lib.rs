pub mod city;
pub mod error;
pub mod format;
pub mod graph;
pub mod render;
pub mod route;
pub mod store;
pub mod weights;

pub use city::default_city;
pub use error::CityRouteError;
pub use graph::{Edge, Graph, Vertex};
pub use render::map_svg;
pub use route::{distances_from, shortest_path, Hop, Route};
pub use store::{read_route, write_route, MapStore};
pub use weights::{Condition, WeightGenerator, CLOSED_ROAD_WEIGHT, CONDITIONS};
