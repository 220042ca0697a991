use crate::graph::{Graph, DEFAULT_REASON};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Weight of a closed road; high enough that any detour wins.
pub const CLOSED_ROAD_WEIGHT: u32 = 999;

/// Returned only if the cumulative shares never reach the draw.
const FALLBACK_WEIGHT: u32 = 5;

/// One row of the traffic condition table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Condition {
    pub label: &'static str,
    pub min_weight: u32,
    pub max_weight: u32,
    pub share: f64,
}

pub const CONDITIONS: [Condition; 7] = [
    Condition {
        label: "Via expressa",
        min_weight: 1,
        max_weight: 2,
        share: 0.10,
    },
    Condition {
        label: "Trânsito livre",
        min_weight: 2,
        max_weight: 4,
        share: 0.30,
    },
    Condition {
        label: "Trânsito moderado",
        min_weight: 4,
        max_weight: 7,
        share: 0.25,
    },
    Condition {
        label: "Trânsito intenso",
        min_weight: 7,
        max_weight: 10,
        share: 0.20,
    },
    Condition {
        label: "Rua em obras",
        min_weight: 10,
        max_weight: 15,
        share: 0.08,
    },
    Condition {
        label: "Acidente na via",
        min_weight: 12,
        max_weight: 18,
        share: 0.05,
    },
    Condition {
        label: "Rua fechada",
        min_weight: CLOSED_ROAD_WEIGHT,
        max_weight: CLOSED_ROAD_WEIGHT,
        share: 0.02,
    },
];

/// Walk the cumulative shares of `table` until they cover one uniform draw,
/// then pick a weight inside that tier. A table whose shares fall short of
/// the draw yields the fallback condition.
fn sample_from<R: Rng>(rng: &mut R, table: &[Condition]) -> (u32, &'static str) {
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for condition in table {
        cumulative += condition.share;
        if draw <= cumulative {
            let weight = rng.gen_range(condition.min_weight..=condition.max_weight);
            return (weight, condition.label);
        }
    }
    (FALLBACK_WEIGHT, DEFAULT_REASON)
}

/// Draws traffic conditions for roads from [`CONDITIONS`].
///
/// The random source is owned by the generator so sessions and tests can be
/// replayed from a seed.
pub struct WeightGenerator<R = StdRng> {
    rng: R,
}

impl WeightGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> WeightGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn conditions(&self) -> &'static [Condition] {
        &CONDITIONS
    }

    pub fn sample_weight_and_reason(&mut self) -> (u32, &'static str) {
        sample_from(&mut self.rng, &CONDITIONS)
    }

    /// Give every road in `graph` a freshly drawn condition.
    pub fn regenerate_all(&mut self, graph: &mut Graph) {
        let edges = graph.all_edges();
        for edge in &edges {
            let (weight, reason) = self.sample_weight_and_reason();
            graph.update_weight(&edge.source, &edge.target, weight, reason, true);
        }
        tracing::debug!(roads = edges.len(), "regenerated road weights");
    }
}
