use crate::infra::{rng_from_seed, sample_store, CANDIDATES_TABLE, HISTORY_TABLE};
use clap::Args;
use parlay_ai::error::AppError;
use parlay_ai::store::snapshot::load_rows_from_path;
use parlay_ai::store::{InMemoryStore, RecordStore};
use parlay_ai::workflows::parlays::{
    RecommendationResponse, RecommendationService, RecommendationSettings,
};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_USER: &str = "demo_user";

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// CSV export of the open markets table
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Optional CSV export of settled history rows
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
    /// Number of parlays to build (clamped to 1..=10)
    #[arg(long, default_value_t = 3)]
    pub(crate) count: usize,
    /// Seed the generator for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the response as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed the generator for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        candidates,
        history,
        count,
        seed,
        json,
    } = args;

    let active = load_rows_from_path(&candidates)?;
    let settled = match history {
        Some(path) => load_rows_from_path(path)?,
        None => Vec::new(),
    };

    let store = InMemoryStore::new()
        .with_table(CANDIDATES_TABLE, active)
        .with_table(HISTORY_TABLE, settled);
    let response = recommend_from(store, count, seed)?;

    if json {
        let rendered = serde_json::to_string_pretty(&response).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        render_recommendations(&response);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Parlay recommendation demo");
    let response = recommend_from(sample_store(), 3, args.seed)?;
    render_recommendations(&response);
    Ok(())
}

fn recommend_from<S>(
    store: S,
    count: usize,
    seed: Option<u64>,
) -> Result<RecommendationResponse, AppError>
where
    S: RecordStore + 'static,
{
    let settings = RecommendationSettings {
        candidates_table: CANDIDATES_TABLE.to_string(),
        history_table: HISTORY_TABLE.to_string(),
        ..RecommendationSettings::default()
    };
    let service = RecommendationService::new(Arc::new(store), settings);
    let mut rng = rng_from_seed(seed);
    Ok(service.recommend(DEMO_USER, count, &mut rng)?)
}

fn render_recommendations(response: &RecommendationResponse) {
    println!(
        "- {} candidate rows | {} history rows",
        response.meta.candidates, response.meta.history_rows
    );

    if response.recommendations.is_empty() {
        println!("No parlays could be assembled from the available markets.");
        return;
    }

    for parlay in &response.recommendations {
        println!(
            "\n{} ({} legs, score {:.3})",
            parlay.id,
            parlay.legs.len(),
            parlay.score
        );
        for leg in &parlay.legs {
            let base_prob = leg
                .base_prob
                .map(|value| format!("{value:.2}"))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "  - {} [{}] {} {} {} (base_prob {})",
                leg.player_name,
                leg.sport,
                leg.stat,
                leg.direction.as_str(),
                leg.line,
                base_prob
            );
        }
    }
}
