//! Per-player podium metrics.
//!
//! Each calculator walks the playlists once, accumulates a stat per player
//! and hands the projected scores to the podium reducer. Playlists a metric
//! cannot evaluate are skipped for that metric only.

use std::collections::BTreeMap;

use tracing::debug;

use super::podium::{bottom_three, top_three, top_three_counts};
use super::{competition_ranks, finishers_at, percentage, score_groups};
use crate::models::{Playlist, RankingResult, Roster};

/// Final-event results at or below this are not counted as points on offer.
pub const MIN_AVAILABLE_LAST_EVENT_POINTS: f64 = 1.0;

/// Running total and sample count for an average.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    total: f64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

fn means(stats: &BTreeMap<String, Mean>) -> Vec<(&str, f64)> {
    stats
        .iter()
        .filter(|(_, mean)| mean.count > 0)
        .map(|(name, mean)| (name.as_str(), mean.value()))
        .collect()
}

fn credit(counts: &mut BTreeMap<String, u32>, name: &str) {
    *counts.entry(name.to_string()).or_default() += 1;
}

/// Every podium metric, in display order.
pub fn all_podiums(playlists: &[Playlist], roster: &Roster) -> Vec<RankingResult> {
    let mut podiums = vec![
        most_wins(playlists),
        most_draws(playlists),
        most_second_places(playlists),
        most_last_places(playlists),
        average_loss_margins(playlists),
        most_playlists_bottled(playlists),
    ];
    podiums.extend(win_ratios(playlists));
    podiums.extend(average_finishing_positions(playlists));
    podiums.extend(average_points(playlists));
    podiums.extend(average_win_margins(playlists));
    podiums.extend(dedication_rates(playlists, roster));
    podiums
}

/// Outright wins. Draws credit nobody.
pub fn most_wins(playlists: &[Playlist]) -> RankingResult {
    let mut wins = BTreeMap::new();

    for playlist in playlists {
        if let Some(winner) = playlist.sole_winner() {
            credit(&mut wins, &winner.name);
        }
    }

    top_three_counts("Most Wins", &wins).with_subtitle("wachow")
}

/// Second places. When first place is shared the tied leaders are credited,
/// otherwise everyone on the next score down.
pub fn most_second_places(playlists: &[Playlist]) -> RankingResult {
    let mut seconds = BTreeMap::new();

    for playlist in playlists {
        if playlist.players.len() < 2 {
            debug!("Skipping {} for second places: fewer than two players", playlist.name);
            continue;
        }
        for player in finishers_at(&playlist.players, 2) {
            credit(&mut seconds, &player.name);
        }
    }

    top_three_counts("Most Second Place Finishes", &seconds)
}

/// Last places. Only the final player in the standings is credited.
pub fn most_last_places(playlists: &[Playlist]) -> RankingResult {
    let mut lasts = BTreeMap::new();

    for playlist in playlists {
        if let Some(last) = playlist.players.last() {
            credit(&mut lasts, &last.name);
        }
    }

    top_three_counts("Most Last Place Finishes", &lasts)
        .with_subtitle("king of the sewers")
        .negative(true)
}

/// Shared first places. Every tied leader is credited.
pub fn most_draws(playlists: &[Playlist]) -> RankingResult {
    let mut draws = BTreeMap::new();

    for playlist in playlists {
        let groups = score_groups(&playlist.players);
        if let Some(leaders) = groups.first().filter(|g| g.len() > 1) {
            for player in leaders.iter() {
                credit(&mut draws, &player.name);
            }
        }
    }

    top_three_counts("Most Draws", &draws).negative(true)
}

/// Wins as a percentage of appearances, over playlists with a sole winner.
/// Returns the highest and lowest podiums.
pub fn win_ratios(playlists: &[Playlist]) -> [RankingResult; 2] {
    #[derive(Default)]
    struct Record {
        wins: u32,
        appearances: u32,
    }

    let mut records: BTreeMap<String, Record> = BTreeMap::new();

    for playlist in playlists {
        let Some(winner) = playlist.sole_winner() else {
            continue;
        };
        for player in &playlist.players {
            records.entry(player.name.clone()).or_default().appearances += 1;
        }
        records.entry(winner.name.clone()).or_default().wins += 1;
    }

    let ratios: Vec<(&str, f64)> = records
        .iter()
        .map(|(name, r)| (name.as_str(), percentage(r.wins, r.appearances)))
        .collect();

    [
        top_three("Highest Win Ratio", ratios.iter().copied()),
        bottom_three("Lowest Win Ratio", ratios.iter().copied()),
    ]
}

/// Mean finishing position using competition ranking. Lower is better, so
/// the best podium is built from the bottom of the table.
pub fn average_finishing_positions(playlists: &[Playlist]) -> [RankingResult; 2] {
    let mut positions: BTreeMap<String, Mean> = BTreeMap::new();

    for playlist in playlists {
        let ranks = competition_ranks(&playlist.players);
        for (player, rank) in playlist.players.iter().zip(ranks) {
            positions
                .entry(player.name.clone())
                .or_default()
                .add(rank as f64);
        }
    }

    let averages = means(&positions);

    [
        bottom_three("Highest Average Finishing Position", averages.iter().copied())
            .negative(false)
            .inverted(true),
        top_three("Lowest Average Finishing Position", averages.iter().copied()).negative(true),
    ]
}

/// Mean playlist score. Returns the highest and lowest podiums.
pub fn average_points(playlists: &[Playlist]) -> [RankingResult; 2] {
    let mut points: BTreeMap<String, Mean> = BTreeMap::new();

    for playlist in playlists {
        for player in &playlist.players {
            points
                .entry(player.name.clone())
                .or_default()
                .add(player.total_points);
        }
    }

    let averages = means(&points);

    [
        top_three("Highest Average Points", averages.iter().copied()),
        bottom_three("Lowest Average Points", averages.iter().copied()),
    ]
}

/// Mean gap between winner and runner-up, credited to the winner.
pub fn average_win_margins(playlists: &[Playlist]) -> [RankingResult; 2] {
    const SUBTITLE: &str = "points finished ahead of second place";
    let mut margins: BTreeMap<String, Mean> = BTreeMap::new();

    for playlist in playlists {
        let Some(winner) = playlist.sole_winner() else {
            continue;
        };
        let runner_up = &playlist.players[1];
        margins
            .entry(winner.name.clone())
            .or_default()
            .add(winner.total_points - runner_up.total_points);
    }

    let averages = means(&margins);

    [
        top_three("Best Average Win Margin", averages.iter().copied()).with_subtitle(SUBTITLE),
        bottom_three("Worst Average Win Margin", averages.iter().copied()).with_subtitle(SUBTITLE),
    ]
}

/// Mean gap to the winner for every non-winning finish. Draws are ignored.
pub fn average_loss_margins(playlists: &[Playlist]) -> RankingResult {
    let mut margins: BTreeMap<String, Mean> = BTreeMap::new();

    for playlist in playlists {
        let Some(winner) = playlist.sole_winner() else {
            continue;
        };
        for player in &playlist.players[1..] {
            margins
                .entry(player.name.clone())
                .or_default()
                .add(winner.total_points - player.total_points);
        }
    }

    top_three("Highest Average Loss Margin", means(&margins))
        .with_subtitle("points difference to playlist winner")
        .negative(true)
}

/// Appearances as a percentage of the playlists each player was eligible
/// for. A roster join date narrows that player's denominator.
pub fn dedication_rates(playlists: &[Playlist], roster: &Roster) -> [RankingResult; 2] {
    const SUBTITLE: &str = "total participation in playlists since joining";
    let mut attendance: BTreeMap<String, u32> = BTreeMap::new();

    for playlist in playlists {
        for player in &playlist.players {
            if roster.is_eligible(&player.name, playlist.date) {
                credit(&mut attendance, &player.name);
            }
        }
    }

    let rates: Vec<(&str, f64)> = attendance
        .iter()
        .filter_map(|(name, &count)| {
            let eligible = playlists
                .iter()
                .filter(|p| roster.is_eligible(name, p.date))
                .count() as u32;
            (eligible > 0).then(|| (name.as_str(), percentage(count, eligible)))
        })
        .collect();

    [
        top_three("Most Dedicated", rates.iter().copied()).with_subtitle(SUBTITLE),
        bottom_three("Least Dedicated", rates.iter().copied()).with_subtitle(SUBTITLE),
    ]
}

/// The player who led going into the final sub-event, if they threw away a
/// lead they could have held.
///
/// Standings before the final event are rebuilt by subtracting each
/// player's final-event points. The pre-final leader is credited when their
/// earlier total plus the best final-event result strictly beats the
/// winner's total less the spread of final-event points on offer.
pub fn bottled_by(playlist: &Playlist) -> Option<&str> {
    if playlist.is_draw() != Some(false) {
        return None;
    }

    let mut before_final = Vec::with_capacity(playlist.players.len());
    let mut available = Vec::new();
    for player in &playlist.players {
        let (Some(last), Some(before)) =
            (player.last_event_points, player.points_before_last_event())
        else {
            return None;
        };
        if last > MIN_AVAILABLE_LAST_EVENT_POINTS {
            available.push(last);
        }
        before_final.push((player.name.as_str(), before));
    }

    let max_available = available.iter().copied().reduce(f64::max)?;
    let min_available = available.iter().copied().reduce(f64::min)?;

    before_final.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (leader, leader_points) = before_final[0];
    if before_final[1].1 == leader_points {
        return None;
    }

    let winner = &playlist.players[0];
    if leader == winner.name {
        return None;
    }

    lead_was_defensible(leader_points, winner.total_points, max_available, min_available)
        .then_some(leader)
}

/// Whether a leader on `leader_points` before the final event could have
/// held on: their best possible total must strictly exceed the winner's
/// total less the spread of final-event points on offer.
pub fn lead_was_defensible(
    leader_points: f64,
    winner_total: f64,
    max_available: f64,
    min_available: f64,
) -> bool {
    let points_to_beat = winner_total - max_available + min_available;
    leader_points + max_available > points_to_beat
}

/// Playlists lost after leading into the final sub-event.
pub fn most_playlists_bottled(playlists: &[Playlist]) -> RankingResult {
    let mut bottled = BTreeMap::new();

    for playlist in playlists {
        if playlist.players.iter().any(|p| p.last_event_points.is_none()) {
            debug!("Skipping {} for bottled: missing final-event points", playlist.name);
            continue;
        }
        if let Some(name) = bottled_by(playlist) {
            credit(&mut bottled, name);
        }
    }

    top_three_counts("Most Playlists Bottled", &bottled)
        .with_subtitle("leading the playlist in final event and lost")
        .negative(true)
}
