//! Position points and the overall leaderboard.

use std::collections::BTreeMap;

use crate::models::{PlayerResult, Playlist, RaceResult, RaceResults, Roster};

/// Points for 1st through 8th place.
pub const POINTS_TABLE: [u32; 8] = [25, 18, 15, 12, 10, 8, 6, 4];

/// Fields larger than this earn the top finishers a bonus.
pub const BONUS_FIELD_THRESHOLD: usize = 4;

/// Finishers (from the top) who receive the large-field bonus.
pub const BONUS_PLACES: usize = 3;

/// Points for finishing at `position` (0 = first) in a field of
/// `number_of_players`.
///
/// When more than four play, each of the top three gets one extra point per
/// player beyond four. Places past the end of the table score nothing.
pub fn calculate_points(position: usize, number_of_players: usize) -> u32 {
    let base = POINTS_TABLE.get(position).copied().unwrap_or(0);
    let bonus = if number_of_players > BONUS_FIELD_THRESHOLD && position < BONUS_PLACES {
        (number_of_players - BONUS_FIELD_THRESHOLD) as u32
    } else {
        0
    };
    base + bonus
}

/// Position points for every playlist. Each breakdown lists the players who
/// took part, in finishing order, followed by absent roster members on zero.
pub fn race_breakdown(playlists: &[Playlist], roster: &Roster) -> RaceResults {
    let races = playlists
        .iter()
        .map(|playlist| {
            let field = playlist.players.len();
            let mut players: Vec<PlayerResult> = playlist
                .players
                .iter()
                .enumerate()
                .map(|(position, player)| {
                    PlayerResult::new(&player.name, calculate_points(position, field) as f64)
                })
                .collect();

            players.extend(
                roster
                    .names()
                    .filter(|name| !playlist.contains(name))
                    .map(|name| PlayerResult::new(name, 0.0)),
            );

            RaceResult {
                date: playlist.date,
                players,
            }
        })
        .collect();

    RaceResults { races }
}

/// Season standings.
///
/// Every appearance adds the player's playlist score plus the position
/// points for where they finished. Absences add nothing. Sorted by points,
/// then name.
pub fn overall_leaderboard(playlists: &[Playlist]) -> Vec<PlayerResult> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for playlist in playlists {
        let field = playlist.players.len();
        for (position, player) in playlist.players.iter().enumerate() {
            *totals.entry(player.name.as_str()).or_default() +=
                player.total_points + calculate_points(position, field) as f64;
        }
    }

    let mut standings: Vec<PlayerResult> = totals
        .into_iter()
        .map(|(name, points)| PlayerResult::new(name, points))
        .collect();
    standings.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    standings
}
