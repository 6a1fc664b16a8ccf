use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::service::RecommendationService;
use crate::error::AppError;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub user_id: String,
    /// Missing or zero falls back to the default; other values are clamped to `[1, 10]`.
    #[serde(default)]
    pub count: Option<i64>,
    /// Reserved for future blending strategies; accepted and ignored.
    #[serde(default)]
    pub mix: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryParams {
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

const DEFAULT_COUNT: usize = 3;
const MAX_COUNT: i64 = 10;

fn resolve_count(count: Option<i64>) -> usize {
    match count {
        None | Some(0) => DEFAULT_COUNT,
        Some(requested) => requested.clamp(1, MAX_COUNT) as usize,
    }
}

/// Router builder exposing the prediction and history endpoints.
pub fn parlay_router<S>(service: Arc<RecommendationService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/api/parlays/predict", post(predict_handler::<S>))
        .route("/api/parlays/history", get(history_handler::<S>))
        .with_state(service)
}

pub(crate) async fn predict_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    Json(request): Json<PredictRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    let PredictRequest { user_id, count, .. } = request;
    let count = resolve_count(count);

    let outcome = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::from_entropy();
        service.recommend(&user_id, count, &mut rng)
    })
    .await;

    match outcome {
        Ok(Ok(payload)) => (StatusCode::OK, Json(payload)).into_response(),
        Ok(Err(err)) => store_error_response(err),
        Err(join_error) => internal_error_response(join_error.to_string()),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    Query(params): Query<HistoryParams>,
) -> Response
where
    S: RecordStore + 'static,
{
    let HistoryParams { user_id, limit } = params;

    let outcome = tokio::task::spawn_blocking(move || service.history(&user_id, limit)).await;

    match outcome {
        Ok(Ok(rows)) => {
            let payload = json!({
                "count": rows.len(),
                "history": rows,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(Err(err)) => store_error_response(err),
        Err(join_error) => internal_error_response(join_error.to_string()),
    }
}

fn store_error_response(err: StoreError) -> Response {
    error!(kind = err.kind(), error = %err, "store request failed");
    AppError::from(err).into_response()
}

fn internal_error_response(message: String) -> Response {
    error!(error = %message, "recommendation task failed");
    let payload = json!({ "error": message, "kind": "internal" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
