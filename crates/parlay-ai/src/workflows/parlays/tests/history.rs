use super::common::*;
use crate::store::Row;
use crate::workflows::parlays::history::UNDATED_RECENCY;
use crate::workflows::parlays::{
    compute_history_features, compute_user_preferences, parse_history, used_market_keys,
    MarketKey,
};
use serde_json::{json, Value};

fn outcome(player_id: &str, stat: &str, sport: &str, hit: Value, created_at: &str) -> Row {
    row(json!({
        "player_id": player_id,
        "stat": stat,
        "sport": sport,
        "hit": hit,
        "created_at": created_at,
        "parlay_group_id": "g1"
    }))
}

#[test]
fn features_decay_against_the_newest_record() {
    let rows = vec![
        outcome("p1", "points", "basketball", json!(true), "2025-09-20T00:00:00Z"),
        outcome("p1", "points", "basketball", json!(false), "2025-09-06T00:00:00Z"),
        outcome("p2", "rebounds", "basketball", json!(true), "2025-09-13T00:00:00Z"),
    ];

    let features = compute_history_features(&parse_history(&rows));

    let p1 = features[&MarketKey::new("p1", "points")];
    assert_eq!(p1.plays, 2);
    assert_eq!(p1.hits, 1);
    assert_close(p1.hit_rate, 0.5);
    assert_close(p1.recency_weight, (1.0 + (-1.0f64).exp()) / 2.0);
    assert_close(p1.weighted_success, p1.hit_rate * p1.recency_weight);

    let p2 = features[&MarketKey::new("p2", "rebounds")];
    assert_close(p2.hit_rate, 1.0);
    assert_close(p2.recency_weight, (-0.5f64).exp());
}

#[test]
fn null_outcomes_count_as_plays_without_hits() {
    let rows = vec![
        outcome("p1", "points", "basketball", json!(null), "2025-09-20T00:00:00Z"),
        outcome("p1", "points", "basketball", json!(null), "2025-09-19T00:00:00Z"),
        outcome("p2", "assists", "basketball", json!(null), "2025-09-18T00:00:00Z"),
    ];

    let features = compute_history_features(&parse_history(&rows));

    assert_eq!(features.len(), 2);
    for entry in features.values() {
        assert!(entry.plays > 0);
        assert_eq!(entry.hits, 0);
        assert_eq!(entry.hit_rate, 0.0);
        assert_eq!(entry.weighted_success, 0.0);
    }
}

#[test]
fn unparseable_timestamps_are_left_out_of_recency_only() {
    let rows = vec![
        outcome("p1", "points", "basketball", json!(true), "2025-09-20T00:00:00Z"),
        outcome("p1", "points", "basketball", json!(true), "not-a-timestamp"),
    ];

    let features = compute_history_features(&parse_history(&rows));
    let p1 = features[&MarketKey::new("p1", "points")];

    assert_eq!(p1.plays, 2);
    assert_eq!(p1.hits, 2);
    assert_close(p1.recency_weight, 1.0);
}

#[test]
fn markets_without_any_timestamp_get_the_undated_recency() {
    let rows = vec![
        outcome("p1", "points", "basketball", json!(true), "2025-09-20T00:00:00Z"),
        outcome("p5", "steals", "basketball", json!(true), "garbage"),
    ];

    let features = compute_history_features(&parse_history(&rows));

    assert_close(
        features[&MarketKey::new("p5", "steals")].recency_weight,
        UNDATED_RECENCY,
    );
}

#[test]
fn missing_columns_are_treated_as_null() {
    let rows = vec![
        row(json!({"player_id": "p1"})),
        row(json!({"player_id": "p2", "stat": "points"})),
    ];
    let records = parse_history(&rows);

    let features = compute_history_features(&records);
    assert_eq!(features.len(), 1);
    let p2 = features[&MarketKey::new("p2", "points")];
    assert_eq!(p2.plays, 1);
    assert_eq!(p2.hit_rate, 0.0);
    assert_close(p2.recency_weight, UNDATED_RECENCY);

    assert!(compute_user_preferences(&records).is_empty());
    assert_eq!(used_market_keys(&records).len(), 1);
}

#[test]
fn preferences_are_shares_of_sport_counts() {
    let rows = vec![
        outcome("p1", "points", "basketball", json!(true), "2025-09-20T00:00:00Z"),
        outcome("p2", "points", "basketball", json!(false), "2025-09-20T00:00:00Z"),
        outcome("p3", "points", "basketball", json!(false), "2025-09-20T00:00:00Z"),
        outcome("p4", "yards", "football", json!(true), "2025-09-20T00:00:00Z"),
    ];

    let preferences = compute_user_preferences(&parse_history(&rows));

    assert_close(preferences["basketball"], 0.75);
    assert_close(preferences["football"], 0.25);
}

#[test]
fn empty_history_yields_empty_mappings() {
    let records = parse_history(&[]);
    assert!(compute_history_features(&records).is_empty());
    assert!(compute_user_preferences(&records).is_empty());
    assert!(used_market_keys(&records).is_empty());
}

#[test]
fn aggregation_is_repeatable() {
    let rows = vec![
        outcome("p1", "points", "basketball", json!(true), "2025-09-20T00:00:00Z"),
        outcome("p1", "points", "basketball", json!(false), "2025-09-01T08:30:00Z"),
        outcome("p2", "rebounds", "hockey", json!("true"), "2025-08-30"),
        outcome("p3", "assists", "basketball", json!(null), "broken"),
    ];
    let records = parse_history(&rows);

    assert_eq!(
        compute_history_features(&records),
        compute_history_features(&records)
    );
    assert_eq!(
        compute_user_preferences(&records),
        compute_user_preferences(&records)
    );
}

#[test]
fn used_keys_include_missed_outcomes() {
    let rows = vec![
        outcome("p1", "points", "basketball", json!(true), "2025-09-20T00:00:00Z"),
        outcome("p2", "rebounds", "basketball", json!(false), "2025-09-20T00:00:00Z"),
    ];

    let used = used_market_keys(&parse_history(&rows));

    assert!(used.contains(&MarketKey::new("p1", "points")));
    assert!(used.contains(&MarketKey::new("p2", "rebounds")));
    assert!(!used.contains(&MarketKey::new("p2", "points")));
}
