//! Derived result models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One ranked player in a podium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub score: f64,
}

impl RankedEntry {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// A top-3 or bottom-3 ranking for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub entries: Vec<RankedEntry>,
    /// The ranking highlights an undesirable trait
    pub is_negative: bool,
    /// A lower score is the better outcome
    pub invert_order: bool,
}

impl RankingResult {
    /// Builder method to set subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Builder method to set the negative framing.
    pub fn negative(mut self, is_negative: bool) -> Self {
        self.is_negative = is_negative;
        self
    }

    /// Builder method to set the invert-order hint.
    pub fn inverted(mut self, invert_order: bool) -> Self {
        self.invert_order = invert_order;
        self
    }

    /// Entry names in ranked order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Score for a named entry.
    pub fn score_of(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }
}

/// A single summary fact about the season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

impl ScalarResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            value: None,
            player: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }
}

/// One player's line in a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<u32>,
    pub color: String,
}

/// Display metadata for a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub y_step_size: u32,
    pub begin_at_zero: bool,
    /// Tooltips omit series whose value is zero
    pub hide_zero_tooltips: bool,
}

/// A cumulative time series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub options: ChartOptions,
}

/// Points for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player_name: String,
    pub points: f64,
}

impl PlayerResult {
    pub fn new(player_name: impl Into<String>, points: f64) -> Self {
        Self {
            player_name: player_name.into(),
            points,
        }
    }
}

/// Points breakdown for one playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub date: NaiveDate,
    pub players: Vec<PlayerResult>,
}

/// Per-playlist breakdown covering every roster member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceResults {
    pub races: Vec<RaceResult>,
}

/// Everything derived from one season snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonReport {
    /// When this report was computed
    pub computed_at: DateTime<Utc>,

    /// Number of playlists in the snapshot
    pub playlist_count: usize,

    pub podiums: Vec<RankingResult>,
    pub individual: Vec<ScalarResult>,
    pub charts: Vec<ChartResult>,
    pub race_breakdown: RaceResults,
    pub leaderboard: Vec<PlayerResult>,
}
