use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use super::assembly::{AssemblyConfig, ParlayAssembler};
use super::candidates::build_leg_candidates;
use super::domain::{RecommendationResponse, ResponseMeta};
use super::history::{
    compute_history_features, compute_user_preferences, parse_history, used_market_keys,
};
use super::scoring::{ScoringConfig, ScoringEngine};
use crate::config::ParlayConfig;
use crate::store::{RecordStore, Row, StoreError, TableQuery};

/// Table names, fetch limits, and engine tuning for the recommendation service.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSettings {
    pub candidates_table: String,
    pub history_table: String,
    /// Column used to scope history to a user; history is global when unset.
    pub history_user_column: Option<String>,
    pub history_limit: usize,
    pub history_page_limit: usize,
    pub max_count: usize,
    pub scoring: ScoringConfig,
    pub assembly: AssemblyConfig,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            candidates_table: "active_parlays".to_string(),
            history_table: "history_parlays".to_string(),
            history_user_column: None,
            history_limit: 1000,
            history_page_limit: 200,
            max_count: 10,
            scoring: ScoringConfig::default(),
            assembly: AssemblyConfig::default(),
        }
    }
}

impl RecommendationSettings {
    pub fn from_config(config: &ParlayConfig) -> Self {
        Self {
            candidates_table: config.candidates_table.clone(),
            history_table: config.history_table.clone(),
            history_user_column: config.history_user_column.clone(),
            history_limit: config.history_limit,
            ..Self::default()
        }
    }
}

/// Runs the fetch → build → aggregate → score → assemble pipeline against a store.
pub struct RecommendationService<S> {
    store: Arc<S>,
    settings: RecommendationSettings,
    scorer: ScoringEngine,
    assembler: ParlayAssembler,
}

impl<S> RecommendationService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, settings: RecommendationSettings) -> Self {
        let scorer = ScoringEngine::new(settings.scoring.clone());
        let assembler = ParlayAssembler::new(settings.assembly);
        Self {
            store,
            settings,
            scorer,
            assembler,
        }
    }

    /// Recommend up to `count` parlays (clamped to `[1, max_count]`).
    ///
    /// Store failures are returned unchanged; an empty market or history is not an error.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        user_id: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<RecommendationResponse, StoreError> {
        let desired = count.clamp(1, self.settings.max_count.max(1));

        let active_rows = self
            .store
            .execute(&TableQuery::from(self.settings.candidates_table.as_str()))?;
        let history_rows = self
            .store
            .execute(&self.history_query(user_id, self.settings.history_limit))?;

        let candidates = build_leg_candidates(&active_rows);
        let history = parse_history(&history_rows);
        let features = compute_history_features(&history);
        let preferences = compute_user_preferences(&history);
        let used = used_market_keys(&history);
        debug!(
            markets = features.len(),
            sports = preferences.len(),
            used = used.len(),
            "aggregated history"
        );

        let scored = self
            .scorer
            .score_all(&candidates, &features, &preferences, rng);
        let recommendations = self.assembler.assemble(&scored, &used, desired, rng);

        info!(
            user_id,
            candidates = candidates.len(),
            history_rows = history_rows.len(),
            parlays = recommendations.len(),
            "generated parlay recommendations"
        );

        Ok(RecommendationResponse {
            recommendations,
            meta: ResponseMeta {
                candidates: candidates.len(),
                history_rows: history_rows.len(),
            },
        })
    }

    /// Most recent history rows, newest first.
    pub fn history(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Row>, StoreError> {
        let limit = limit.unwrap_or(self.settings.history_page_limit);
        self.store.execute(&self.history_query(user_id, limit))
    }

    fn history_query(&self, user_id: &str, limit: usize) -> TableQuery {
        let query = TableQuery::from(self.settings.history_table.as_str())
            .order("created_at", true)
            .limit(limit);
        match &self.settings.history_user_column {
            Some(column) => query.eq(column.as_str(), user_id),
            None => query,
        }
    }
}
