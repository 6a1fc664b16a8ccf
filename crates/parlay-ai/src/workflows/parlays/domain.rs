use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Row;

/// Composite `(player_id, stat)` key shared by features, exclusions, and scoring lookups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarketKey {
    pub player_id: String,
    pub stat: String,
}

impl MarketKey {
    pub fn new(player_id: impl Into<String>, stat: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            stat: stat.into(),
        }
    }
}

/// Open proposition eligible for scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegCandidate {
    pub player_id: String,
    pub player_name: String,
    pub sport: String,
    pub stat: String,
    pub line: f64,
    /// Externally supplied likelihood in `[0, 1]`; the scorer substitutes 0.5 when absent.
    pub base_prob: Option<f64>,
    #[serde(skip)]
    pub source_row: Row,
}

impl LegCandidate {
    pub fn market_key(&self) -> MarketKey {
        MarketKey::new(self.player_id.clone(), self.stat.clone())
    }
}

/// One past outcome as read from the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub player_id: Option<String>,
    pub stat: Option<String>,
    pub sport: Option<String>,
    pub hit: Option<bool>,
    /// `None` when the stored timestamp is missing or unparseable.
    pub created_at: Option<DateTime<Utc>>,
    pub parlay_group_id: Option<String>,
}

impl HistoryRecord {
    pub fn market_key(&self) -> Option<MarketKey> {
        match (&self.player_id, &self.stat) {
            (Some(player_id), Some(stat)) => Some(MarketKey::new(player_id.clone(), stat.clone())),
            _ => None,
        }
    }
}

/// Aggregated performance of a single `(player_id, stat)` market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryFeatures {
    pub plays: u32,
    pub hits: u32,
    pub hit_rate: f64,
    pub recency_weight: f64,
    pub weighted_success: f64,
}

/// Individual inputs blended into a candidate score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub base_prob: f64,
    pub hit_rate: f64,
    pub recency: f64,
    pub weighted_success: f64,
    pub sport_pref: f64,
}

impl ScoreComponents {
    pub fn rationale(&self) -> Vec<String> {
        vec![
            format!("base_prob={:.2}", self.base_prob),
            format!("hit_rate={:.2}", self.hit_rate),
            format!("recency={:.2}", self.recency),
            format!("weighted_success={:.2}", self.weighted_success),
            format!("sport_pref={:.2}", self.sport_pref),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: LegCandidate,
    pub score: f64,
    pub components: ScoreComponents,
    pub rationale: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegDirection {
    Over,
}

impl LegDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegDirection::Over => "over",
        }
    }
}

/// Leg as exposed in the response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSummary {
    pub player_id: String,
    pub player_name: String,
    pub sport: String,
    pub stat: String,
    pub line: f64,
    pub base_prob: Option<f64>,
    pub direction: LegDirection,
}

impl From<&LegCandidate> for LegSummary {
    fn from(candidate: &LegCandidate) -> Self {
        Self {
            player_id: candidate.player_id.clone(),
            player_name: candidate.player_name.clone(),
            sport: candidate.sport.clone(),
            stat: candidate.stat.clone(),
            line: candidate.line,
            base_prob: candidate.base_prob,
            direction: LegDirection::Over,
        }
    }
}

/// A recommended parlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParlayRecommendation {
    pub id: String,
    pub legs: Vec<LegSummary>,
    pub score: f64,
    pub rationale: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseMeta {
    pub candidates: usize,
    pub history_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<ParlayRecommendation>,
    pub meta: ResponseMeta,
}
