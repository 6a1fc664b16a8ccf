use serde::{Deserialize, Serialize};

/// Linear blend weights for the candidate score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub base_prob: f64,
    pub hit_rate: f64,
    pub recency: f64,
    pub weighted_success: f64,
    pub sport_pref: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base_prob: 0.35,
            hit_rate: 0.25,
            recency: 0.15,
            weighted_success: 0.15,
            sport_pref: 0.10,
        }
    }
}

/// Scoring rubric: weights, neutral fallbacks, and the exploration jitter band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub default_base_prob: f64,
    pub default_hit_rate: f64,
    pub default_recency: f64,
    pub default_sport_pref: f64,
    pub jitter_min: f64,
    pub jitter_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            default_base_prob: 0.5,
            default_hit_rate: 0.5,
            default_recency: 0.5,
            default_sport_pref: 0.2,
            jitter_min: 0.97,
            jitter_max: 1.03,
        }
    }
}

impl ScoringConfig {
    /// Same rubric with the jitter band collapsed to 1.0.
    pub fn without_jitter(self) -> Self {
        Self {
            jitter_min: 1.0,
            jitter_max: 1.0,
            ..self
        }
    }
}
