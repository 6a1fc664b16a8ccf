use std::sync::Arc;

use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use crate::store::{InMemoryStore, Row};
use crate::workflows::parlays::domain::{LegCandidate, ScoreComponents, ScoredCandidate};
use crate::workflows::parlays::{parlay_router, RecommendationService, RecommendationSettings};

pub(super) const ACTIVE_TABLE: &str = "active_parlays";
pub(super) const HISTORY_TABLE: &str = "history_parlays";

pub(super) fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture rows must be objects, got {other}"),
    }
}

pub(super) fn active_rows() -> Vec<Row> {
    vec![
        row(json!({"player_id": "p1", "player_name": "Alice Guard", "sport": "basketball", "stat": "points", "line": 22.5, "base_prob": 0.6})),
        row(json!({"player_id": "p2", "player_name": "Bob Wing", "sport": "basketball", "stat": "rebounds", "line": 8.5, "base_prob": 0.55})),
        row(json!({"player_id": "p3", "player_name": "Carl Shot", "sport": "basketball", "stat": "assists", "line": 5.5, "base_prob": 0.5})),
        row(json!({"player_id": "p4", "player_name": "Derek Long", "sport": "basketball", "stat": "points", "line": 18.5, "base_prob": 0.58})),
    ]
}

pub(super) fn history_rows() -> Vec<Row> {
    vec![row(json!({
        "player_id": "p1",
        "player_name": "Alice Guard",
        "sport": "basketball",
        "stat": "points",
        "line": 22.5,
        "base_prob": 0.6,
        "hit": true,
        "created_at": "2025-09-20T00:00:00Z",
        "parlay_group_id": "g1"
    }))]
}

pub(super) fn store_with(active: Vec<Row>, history: Vec<Row>) -> InMemoryStore {
    InMemoryStore::new()
        .with_table(ACTIVE_TABLE, active)
        .with_table(HISTORY_TABLE, history)
}

pub(super) fn sample_store() -> InMemoryStore {
    store_with(active_rows(), history_rows())
}

pub(super) fn service_for(store: InMemoryStore) -> RecommendationService<InMemoryStore> {
    RecommendationService::new(Arc::new(store), RecommendationSettings::default())
}

pub(super) fn router_for(store: InMemoryStore) -> axum::Router {
    parlay_router(Arc::new(service_for(store)))
}

pub(super) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub(super) fn candidate(player_id: &str, stat: &str) -> LegCandidate {
    LegCandidate {
        player_id: player_id.to_string(),
        player_name: format!("Player {player_id}"),
        sport: "basketball".to_string(),
        stat: stat.to_string(),
        line: 10.5,
        base_prob: Some(0.5),
        source_row: Row::new(),
    }
}

pub(super) fn scored(player_id: &str, stat: &str, score: f64) -> ScoredCandidate {
    let components = ScoreComponents {
        base_prob: 0.5,
        hit_rate: 0.5,
        recency: 0.5,
        weighted_success: 0.25,
        sport_pref: 0.2,
    };
    ScoredCandidate {
        candidate: candidate(player_id, stat),
        score,
        rationale: components.rationale(),
        components,
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
