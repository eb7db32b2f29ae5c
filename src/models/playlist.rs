//! Playlist and player result models.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A player's result within one playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player name, unique within a playlist
    pub name: String,

    /// Points scored across the whole playlist
    pub total_points: f64,

    /// Points scored in the final sub-event only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event_points: Option<f64>,
}

impl Player {
    /// Create a new Player without final-event points.
    pub fn new(name: impl Into<String>, total_points: f64) -> Self {
        Self {
            name: name.into(),
            total_points,
            last_event_points: None,
        }
    }

    /// Builder method to set final-event points.
    pub fn with_last_event_points(mut self, points: f64) -> Self {
        self.last_event_points = Some(points);
        self
    }

    /// Total points before the final sub-event was played.
    pub fn points_before_last_event(&self) -> Option<f64> {
        self.last_event_points.map(|last| self.total_points - last)
    }
}

/// One scored multiplayer session.
///
/// `players` is ordered by `total_points` descending. Ties sit next to each
/// other and are only visible by comparing scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub date: NaiveDate,
    /// Number of sub-events (races) in the playlist
    pub length: u32,
    pub players: Vec<Player>,
}

impl Playlist {
    /// Create a new Playlist.
    pub fn new(name: impl Into<String>, date: NaiveDate, length: u32, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            date,
            length,
            players,
        }
    }

    /// Whether first place is shared.
    ///
    /// `None` when the playlist has fewer than two players, since there is
    /// nothing to compare against.
    pub fn is_draw(&self) -> Option<bool> {
        match self.players.as_slice() {
            [first, second, ..] => Some(first.total_points == second.total_points),
            _ => None,
        }
    }

    /// The single winner, or `None` for draws and short playlists.
    pub fn sole_winner(&self) -> Option<&Player> {
        match self.is_draw() {
            Some(false) => self.players.first(),
            _ => None,
        }
    }

    /// Whether the named player took part.
    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    /// Day of the week the playlist was played.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Sort players by total points descending, keeping the order of ties.
    pub fn sort_players(&mut self) {
        self.players
            .sort_by(|a, b| b.total_points.total_cmp(&a.total_points));
    }
}

/// The current snapshot of playlists. Source order is not guaranteed to be
/// chronological.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season {
    pub playlists: Vec<Playlist>,
}

impl Season {
    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Date of the most recent playlist.
    pub fn last_playlist_date(&self) -> Option<NaiveDate> {
        self.playlists.iter().map(|p| p.date).max()
    }
}

/// Playlists in date order. Same-day playlists keep their source order.
pub fn chronological(playlists: &[Playlist]) -> Vec<&Playlist> {
    let mut sorted: Vec<&Playlist> = playlists.iter().collect();
    sorted.sort_by_key(|p| p.date);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_is_draw() {
        let draw = Playlist::new(
            "Stunts",
            date("2025-03-01"),
            8,
            vec![Player::new("A", 80.0), Player::new("B", 80.0)],
        );
        let win = Playlist::new(
            "Stunts",
            date("2025-03-01"),
            8,
            vec![Player::new("A", 100.0), Player::new("B", 80.0)],
        );
        assert_eq!(draw.is_draw(), Some(true));
        assert_eq!(win.is_draw(), Some(false));
        assert!(draw.sole_winner().is_none());
        assert_eq!(win.sole_winner().unwrap().name, "A");
    }

    #[test]
    fn test_is_draw_short_playlist() {
        let solo = Playlist::new("Solo", date("2025-03-01"), 4, vec![Player::new("A", 10.0)]);
        assert_eq!(solo.is_draw(), None);
        assert!(solo.sole_winner().is_none());
    }

    #[test]
    fn test_points_before_last_event() {
        let player = Player::new("A", 60.0).with_last_event_points(15.0);
        assert_eq!(player.points_before_last_event(), Some(45.0));
        assert_eq!(Player::new("B", 60.0).points_before_last_event(), None);
    }

    #[test]
    fn test_sort_players_stable() {
        let mut playlist = Playlist::new(
            "Mixed",
            date("2025-03-01"),
            8,
            vec![
                Player::new("C", 50.0),
                Player::new("A", 80.0),
                Player::new("B", 50.0),
            ],
        );
        playlist.sort_players();
        let names: Vec<_> = playlist.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_chronological() {
        let season = Season::new(vec![
            Playlist::new("Later", date("2025-04-02"), 8, vec![]),
            Playlist::new("Earlier", date("2025-04-01"), 8, vec![]),
            Playlist::new("Also earlier", date("2025-04-01"), 8, vec![]),
        ]);
        let names: Vec<_> = chronological(&season.playlists)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Earlier", "Also earlier", "Later"]);
        assert_eq!(season.playlists[0].name, "Later");
        assert_eq!(season.last_playlist_date(), Some(date("2025-04-02")));
    }

    #[test]
    fn test_playlist_deserialization() {
        let json = r#"{
            "name": "Friday Night",
            "date": "2025-05-16",
            "length": 10,
            "players": [
                {"name": "A", "totalPoints": 120, "lastEventPoints": 15},
                {"name": "B", "totalPoints": 98}
            ]
        }"#;
        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.date, date("2025-05-16"));
        assert_eq!(playlist.weekday(), Weekday::Fri);
        assert_eq!(playlist.players[0].last_event_points, Some(15.0));
        assert_eq!(playlist.players[1].last_event_points, None);
    }
}
