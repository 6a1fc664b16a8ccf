use std::collections::HashSet;

use tracing::debug;

use super::domain::LegCandidate;
use super::fields;
use crate::store::Row;

/// Converts open-market rows into candidates, unique per `(player_id, stat, line)`.
///
/// Rows are ordered by `player_name` (stable, case-sensitive) before deduplication so the
/// surviving duplicate is always the one with the smallest display name. Rows without a
/// player id or stat cannot be keyed and are dropped.
pub fn build_leg_candidates(rows: &[Row]) -> Vec<LegCandidate> {
    let mut parsed: Vec<LegCandidate> = rows.iter().filter_map(parse_candidate).collect();
    parsed.sort_by(|a, b| a.player_name.cmp(&b.player_name));

    let mut seen: HashSet<(String, String, u64)> = HashSet::new();
    let mut candidates = Vec::with_capacity(parsed.len());
    for candidate in parsed {
        let key = (
            candidate.player_id.clone(),
            candidate.stat.clone(),
            line_bits(candidate.line),
        );
        if seen.insert(key) {
            candidates.push(candidate);
        }
    }

    if candidates.len() < rows.len() {
        debug!(
            rows = rows.len(),
            candidates = candidates.len(),
            "dropped duplicate or unkeyed candidate rows"
        );
    }

    candidates
}

fn parse_candidate(row: &Row) -> Option<LegCandidate> {
    let player_id = fields::text(row, "player_id")?;
    let stat = fields::text(row, "stat")?;

    Some(LegCandidate {
        player_id,
        player_name: fields::text(row, "player_name").unwrap_or_default(),
        sport: fields::text(row, "sport").unwrap_or_default(),
        stat,
        line: fields::number(row, "line").unwrap_or(0.0),
        base_prob: fields::number(row, "base_prob"),
        source_row: row.clone(),
    })
}

// -0.0 and 0.0 describe the same line.
fn line_bits(line: f64) -> u64 {
    if line == 0.0 {
        0.0f64.to_bits()
    } else {
        line.to_bits()
    }
}
