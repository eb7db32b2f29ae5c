//! Statistics calculation engine.
//!
//! Pure reducers over a season snapshot:
//! - Podium rankings for per-player metrics
//! - Scalar season facts
//! - Cumulative chart series
//! - Position points and the overall leaderboard

pub mod charts;
pub mod individual;
pub mod leaderboard;
pub mod metrics;
pub mod podium;

use crate::models::Player;

/// Round to at most two decimal places. Whole numbers pass through as-is.
pub fn round_display(value: f64) -> f64 {
    if !value.is_finite() || value.fract() == 0.0 {
        value
    } else {
        (value * 100.0).round() / 100.0
    }
}

/// Percentage of `part` over `whole`, zero when `whole` is zero.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Split score-sorted players into runs of equal score.
pub fn score_groups(players: &[Player]) -> Vec<&[Player]> {
    let mut groups = Vec::new();
    let mut start = 0;

    for i in 1..=players.len() {
        if i == players.len() || players[i].total_points != players[start].total_points {
            if i > start {
                groups.push(&players[start..i]);
            }
            start = i;
        }
    }

    groups
}

/// Standard competition ranks (1-based) for score-sorted players.
///
/// Equal scores share a rank and the next distinct score skips ahead:
/// `[100, 80, 80, 50]` ranks as `[1, 2, 2, 4]`.
pub fn competition_ranks(players: &[Player]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(players.len());

    for (index, player) in players.iter().enumerate() {
        let rank = match ranks.last() {
            Some(&prev) if player.total_points == players[index - 1].total_points => prev,
            _ => index as u32 + 1,
        };
        ranks.push(rank);
    }

    ranks
}

/// Players occupying finishing position `place` (1-based) under competition
/// ranking.
///
/// A tied group covers every position it spans, so when first place is a
/// two-way tie both leaders also occupy second place.
pub fn finishers_at(players: &[Player], place: usize) -> &[Player] {
    let mut first_position = 1;

    for group in score_groups(players) {
        let last_position = first_position + group.len() - 1;
        if (first_position..=last_position).contains(&place) {
            return group;
        }
        first_position = last_position + 1;
    }

    &[]
}
