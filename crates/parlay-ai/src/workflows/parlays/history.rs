use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use super::domain::{HistoryFeatures, HistoryRecord, MarketKey};
use super::fields;
use crate::store::Row;

/// Time constant, in days, of the exponential recency decay.
pub const RECENCY_DECAY_DAYS: f64 = 14.0;

/// Recency assigned to a market none of whose records carry a usable timestamp.
pub const UNDATED_RECENCY: f64 = 0.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Decodes history rows; absent or malformed columns read as null.
pub fn parse_history(rows: &[Row]) -> Vec<HistoryRecord> {
    rows.iter()
        .map(|row| HistoryRecord {
            player_id: fields::text(row, "player_id"),
            stat: fields::text(row, "stat"),
            sport: fields::text(row, "sport"),
            hit: fields::flag(row, "hit"),
            created_at: fields::timestamp(row, "created_at"),
            parlay_group_id: fields::text(row, "parlay_group_id"),
        })
        .collect()
}

#[derive(Default)]
struct MarketAccumulator {
    plays: u32,
    hits: u32,
    decay_sum: f64,
    dated: u32,
}

/// Aggregates plays, hits, and recency per `(player_id, stat)`.
///
/// Ages are measured against the newest timestamp in the whole snapshot, so the result only
/// depends on the records themselves. A null outcome counts as a play without a hit; an
/// undated record counts as a play but is left out of the recency mean.
pub fn compute_history_features(records: &[HistoryRecord]) -> BTreeMap<MarketKey, HistoryFeatures> {
    let reference = records.iter().filter_map(|record| record.created_at).max();

    let mut groups: BTreeMap<MarketKey, MarketAccumulator> = BTreeMap::new();
    for record in records {
        let Some(key) = record.market_key() else {
            continue;
        };
        let entry = groups.entry(key).or_default();
        entry.plays += 1;
        if record.hit == Some(true) {
            entry.hits += 1;
        }
        if let (Some(reference), Some(created_at)) = (reference, record.created_at) {
            entry.decay_sum += decay(reference, created_at);
            entry.dated += 1;
        }
    }

    groups
        .into_iter()
        .map(|(key, acc)| {
            let hit_rate = if acc.plays > 0 {
                f64::from(acc.hits) / f64::from(acc.plays)
            } else {
                0.0
            };
            let recency_weight = if acc.dated > 0 {
                acc.decay_sum / f64::from(acc.dated)
            } else {
                UNDATED_RECENCY
            };
            let features = HistoryFeatures {
                plays: acc.plays,
                hits: acc.hits,
                hit_rate,
                recency_weight,
                weighted_success: hit_rate * recency_weight,
            };
            (key, features)
        })
        .collect()
}

fn decay(reference: DateTime<Utc>, created_at: DateTime<Utc>) -> f64 {
    let age_days =
        ((reference - created_at).num_milliseconds() as f64 / MILLIS_PER_DAY).max(0.0);
    (-age_days / RECENCY_DECAY_DAYS).exp()
}

/// Share of history records per sport. Records without a sport are not counted.
pub fn compute_user_preferences(records: &[HistoryRecord]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for sport in records.iter().filter_map(|record| record.sport.as_ref()) {
        *counts.entry(sport.clone()).or_default() += 1;
    }

    let total: u32 = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }

    counts
        .into_iter()
        .map(|(sport, count)| (sport, f64::from(count) / f64::from(total)))
        .collect()
}

/// Every market that appears anywhere in history, regardless of outcome.
pub fn used_market_keys(records: &[HistoryRecord]) -> BTreeSet<MarketKey> {
    records.iter().filter_map(HistoryRecord::market_key).collect()
}
