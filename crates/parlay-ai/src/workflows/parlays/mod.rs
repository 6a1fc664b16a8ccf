//! Parlay recommendation pipeline: candidate building, history aggregation, scoring, and
//! assembly, composed by [`RecommendationService`].

pub mod assembly;
pub mod candidates;
pub mod domain;
pub(crate) mod fields;
pub mod history;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use assembly::{AssemblyConfig, ParlayAssembler};
pub use candidates::build_leg_candidates;
pub use domain::{
    HistoryFeatures, HistoryRecord, LegCandidate, LegDirection, LegSummary, MarketKey,
    ParlayRecommendation, RecommendationResponse, ResponseMeta, ScoreComponents,
    ScoredCandidate,
};
pub use history::{
    compute_history_features, compute_user_preferences, parse_history, used_market_keys,
};
pub use router::{parlay_router, HistoryParams, PredictRequest};
pub use scoring::{ScoreWeights, ScoringConfig, ScoringEngine};
pub use service::{RecommendationService, RecommendationSettings};
