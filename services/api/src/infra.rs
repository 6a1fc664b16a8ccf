use metrics_exporter_prometheus::PrometheusHandle;
use parlay_ai::store::{InMemoryStore, Row};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) const CANDIDATES_TABLE: &str = "active_parlays";
pub(crate) const HISTORY_TABLE: &str = "history_parlays";

/// Seeded generator when a seed is given, entropy-backed otherwise.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn object(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// Small basketball/football market with one prior outcome, used by the demo command.
pub(crate) fn sample_store() -> InMemoryStore {
    let active = [
        json!({"player_id": "bbp1", "player_name": "Jayson Tatum", "sport": "basketball", "stat": "points", "line": 27.5, "base_prob": 0.55}),
        json!({"player_id": "bbp2", "player_name": "Giannis Antetokounmpo", "sport": "basketball", "stat": "rebounds", "line": 11.5, "base_prob": 0.57}),
        json!({"player_id": "bbp3", "player_name": "Nikola Jokic", "sport": "basketball", "stat": "assists", "line": 9.5, "base_prob": 0.53}),
        json!({"player_id": "bbp3", "player_name": "Nikola Jokic", "sport": "basketball", "stat": "points", "line": 26.5, "base_prob": null}),
        json!({"player_id": "fbp1", "player_name": "Josh Allen", "sport": "football", "stat": "passing_yards", "line": 255.5, "base_prob": 0.51}),
        json!({"player_id": "fbp2", "player_name": "Christian McCaffrey", "sport": "football", "stat": "rushing_yards", "line": 88.5, "base_prob": 0.56}),
    ];
    let history = [
        json!({"player_id": "bbp1", "player_name": "Jayson Tatum", "sport": "basketball", "stat": "points", "line": 27.5, "hit": true, "created_at": "2025-09-20T00:00:00Z", "parlay_group_id": "g1"}),
        json!({"player_id": "bbp2", "player_name": "Giannis Antetokounmpo", "sport": "basketball", "stat": "points", "line": 30.5, "hit": false, "created_at": "2025-09-12T00:00:00Z", "parlay_group_id": "g1"}),
    ];

    InMemoryStore::new()
        .with_table(CANDIDATES_TABLE, active.into_iter().map(object).collect())
        .with_table(HISTORY_TABLE, history.into_iter().map(object).collect())
}
