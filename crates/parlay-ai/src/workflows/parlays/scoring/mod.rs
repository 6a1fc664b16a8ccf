mod config;
mod rules;

pub use config::{ScoreWeights, ScoringConfig};

use std::collections::BTreeMap;

use rand::Rng;

use super::domain::{HistoryFeatures, LegCandidate, MarketKey, ScoredCandidate};

/// Blends intrinsic probability, history features, and sport preference into one score.
///
/// Scores carry a small multiplicative jitter drawn from the injected generator so that
/// equal-scoring candidates do not always produce identical parlays.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score<R: Rng + ?Sized>(
        &self,
        candidate: &LegCandidate,
        features: &BTreeMap<MarketKey, HistoryFeatures>,
        preferences: &BTreeMap<String, f64>,
        rng: &mut R,
    ) -> ScoredCandidate {
        let components = rules::resolve_components(candidate, features, preferences, &self.config);
        let score = rules::blend(&components, &self.config.weights) * self.jitter(rng);

        ScoredCandidate {
            candidate: candidate.clone(),
            score,
            rationale: components.rationale(),
            components,
        }
    }

    pub fn score_all<R: Rng + ?Sized>(
        &self,
        candidates: &[LegCandidate],
        features: &BTreeMap<MarketKey, HistoryFeatures>,
        preferences: &BTreeMap<String, f64>,
        rng: &mut R,
    ) -> Vec<ScoredCandidate> {
        candidates
            .iter()
            .map(|candidate| self.score(candidate, features, preferences, rng))
            .collect()
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (low, high) = (self.config.jitter_min, self.config.jitter_max);
        if low < high {
            rng.gen_range(low..=high)
        } else {
            low
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
