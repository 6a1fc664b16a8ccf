use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{LegSummary, MarketKey, ParlayRecommendation, ScoredCandidate};

/// Leg-count bounds and attempt budget for parlay assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    pub min_legs: usize,
    pub max_legs: usize,
    pub max_attempts: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            min_legs: 2,
            max_legs: 6,
            max_attempts: 50,
        }
    }
}

/// Greedy packer turning scored candidates into parlays.
pub struct ParlayAssembler {
    config: AssemblyConfig,
}

impl ParlayAssembler {
    pub fn new(config: AssemblyConfig) -> Self {
        Self { config }
    }

    /// Builds up to `desired` parlays from the candidates whose market has never been played.
    ///
    /// Each attempt draws a target size in `[min_legs, min(max_legs, min_legs + 2)]` and walks
    /// the score-sorted pool from the top, taking at most one leg per player. The first attempt
    /// that cannot reach `min_legs` ends assembly altogether.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        scored: &[ScoredCandidate],
        used: &BTreeSet<MarketKey>,
        desired: usize,
        rng: &mut R,
    ) -> Vec<ParlayRecommendation> {
        let AssemblyConfig {
            min_legs,
            max_legs,
            max_attempts,
        } = self.config;

        if min_legs == 0 || max_legs < min_legs {
            warn!(min_legs, max_legs, "invalid leg bounds; no parlays assembled");
            return Vec::new();
        }

        let mut pool: Vec<&ScoredCandidate> = scored
            .iter()
            .filter(|entry| !used.contains(&entry.candidate.market_key()))
            .collect();
        pool.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        debug!(
            scored = scored.len(),
            eligible = pool.len(),
            excluded = scored.len() - pool.len(),
            "assembling parlays"
        );

        let size_ceiling = max_legs.min(min_legs + 2);
        let mut recommendations = Vec::new();
        let mut attempts = 0;

        while recommendations.len() < desired && attempts < max_attempts {
            attempts += 1;
            let target = rng.gen_range(min_legs..=size_ceiling);

            let mut chosen: Vec<&ScoredCandidate> = Vec::with_capacity(target);
            let mut players: HashSet<&str> = HashSet::new();
            for &entry in &pool {
                if chosen.len() >= target {
                    break;
                }
                if players.insert(entry.candidate.player_id.as_str()) {
                    chosen.push(entry);
                }
            }

            if chosen.len() < min_legs {
                debug!(
                    attempt = attempts,
                    legs = chosen.len(),
                    min_legs,
                    "candidate pool exhausted; stopping assembly"
                );
                break;
            }

            let index = recommendations.len();
            recommendations.push(build_recommendation(&chosen, index, rng));
        }

        recommendations.truncate(desired);
        recommendations
    }
}

impl Default for ParlayAssembler {
    fn default() -> Self {
        Self::new(AssemblyConfig::default())
    }
}

fn build_recommendation<R: Rng + ?Sized>(
    chosen: &[&ScoredCandidate],
    index: usize,
    rng: &mut R,
) -> ParlayRecommendation {
    let score = chosen.iter().map(|entry| entry.score).sum::<f64>() / chosen.len() as f64;
    let id = format!(
        "pr-{}-{}-{}",
        Utc::now().timestamp_millis(),
        index,
        rng.gen_range(100..=999)
    );

    ParlayRecommendation {
        id,
        legs: chosen
            .iter()
            .map(|entry| LegSummary::from(&entry.candidate))
            .collect(),
        score,
        rationale: chosen
            .iter()
            .flat_map(|entry| entry.rationale.iter().cloned())
            .collect(),
    }
}
