use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::store::{Row, StoreError};

fn predict_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/api/parlays/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn predict_route_returns_recommendations_and_meta() {
    let router = router_for(sample_store());

    let response = router
        .oneshot(predict_request(json!({"user_id": "demo_user", "count": 2, "mix": true})))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let recommendations = body["recommendations"].as_array().expect("array");
    assert!(recommendations.len() <= 2);
    for parlay in recommendations {
        assert!(parlay["id"].as_str().expect("id").starts_with("pr-"));
        assert!(parlay["score"].is_number());
        for leg in parlay["legs"].as_array().expect("legs") {
            assert_eq!(leg["direction"], json!("over"));
        }
    }
    assert_eq!(body["meta"], json!({"candidates": 4, "history_rows": 1}));
}

#[tokio::test]
async fn predict_route_handles_empty_market() {
    let router = router_for(store_with(Vec::new(), Vec::new()));

    let response = router
        .oneshot(predict_request(json!({"user_id": "demo_user"})))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["recommendations"], json!([]));
    assert_eq!(body["meta"]["candidates"], json!(0));
}

fn wide_market() -> Vec<Row> {
    (1..=12)
        .map(|index| {
            row(json!({
                "player_id": format!("w{index}"),
                "player_name": format!("Wide Player {index:02}"),
                "sport": "basketball",
                "stat": "points",
                "line": 10.5,
                "base_prob": 0.5
            }))
        })
        .collect()
}

#[tokio::test]
async fn predict_route_resolves_requested_count() {
    let router = router_for(store_with(wide_market(), Vec::new()));

    let cases = [
        (json!({"user_id": "u"}), 3),
        (json!({"user_id": "u", "count": 0}), 3),
        (json!({"user_id": "u", "count": -1}), 1),
        (json!({"user_id": "u", "count": 4}), 4),
        (json!({"user_id": "u", "count": 25}), 10),
    ];

    for (payload, expected) in cases {
        let response = router
            .clone()
            .oneshot(predict_request(payload.clone()))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK, "payload {payload}");
        let body = read_json_body(response).await;
        let bundles = body["recommendations"].as_array().expect("array").len();
        assert_eq!(bundles, expected, "payload {payload}");
    }
}

#[tokio::test]
async fn predict_route_reports_query_failures() {
    let store = sample_store();
    store.fail_table(
        ACTIVE_TABLE,
        StoreError::Query {
            table: ACTIVE_TABLE.to_string(),
            message: "relation \"active_parlays\" does not exist".to_string(),
        },
    );
    let router = router_for(store);

    let response = router
        .oneshot(predict_request(json!({"user_id": "demo_user"})))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert_eq!(body["kind"], json!("query"));
    assert!(body["error"]
        .as_str()
        .expect("message")
        .contains("relation \"active_parlays\" does not exist"));
}

#[tokio::test]
async fn predict_route_reports_missing_configuration() {
    let store = sample_store();
    store.fail_table(
        ACTIVE_TABLE,
        StoreError::NotConfigured("SUPABASE_URL not set".to_string()),
    );
    let router = router_for(store);

    let response = router
        .oneshot(predict_request(json!({"user_id": "demo_user"})))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["kind"], json!("not_configured"));
}

#[tokio::test]
async fn predict_route_rejects_payloads_without_user() {
    let router = router_for(sample_store());

    let response = router
        .oneshot(predict_request(json!({"count": 2})))
        .await
        .expect("router responds");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn history_route_lists_recent_rows() {
    let router = router_for(sample_store());

    let response = router
        .oneshot(
            Request::get("/api/parlays/history?user_id=demo_user&limit=10")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["history"][0]["player_id"], json!("p1"));
}
