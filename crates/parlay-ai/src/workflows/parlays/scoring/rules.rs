use std::collections::BTreeMap;

use super::super::domain::{HistoryFeatures, LegCandidate, MarketKey, ScoreComponents};
use super::config::{ScoreWeights, ScoringConfig};

pub(crate) fn resolve_components(
    candidate: &LegCandidate,
    features: &BTreeMap<MarketKey, HistoryFeatures>,
    preferences: &BTreeMap<String, f64>,
    config: &ScoringConfig,
) -> ScoreComponents {
    let base_prob = candidate.base_prob.unwrap_or(config.default_base_prob);
    let sport_pref = preferences
        .get(&candidate.sport)
        .copied()
        .unwrap_or(config.default_sport_pref);

    match features.get(&candidate.market_key()) {
        Some(history) => ScoreComponents {
            base_prob,
            hit_rate: history.hit_rate,
            recency: history.recency_weight,
            weighted_success: history.weighted_success,
            sport_pref,
        },
        None => {
            let hit_rate = config.default_hit_rate;
            let recency = config.default_recency;
            ScoreComponents {
                base_prob,
                hit_rate,
                recency,
                weighted_success: hit_rate * recency,
                sport_pref,
            }
        }
    }
}

pub(crate) fn blend(components: &ScoreComponents, weights: &ScoreWeights) -> f64 {
    weights.base_prob * components.base_prob
        + weights.hit_rate * components.hit_rate
        + weights.recency * components.recency
        + weights.weighted_success * components.weighted_success
        + weights.sport_pref * components.sport_pref
}
