//! Podium generation.
//!
//! Turns a per-player metric into a ranked top-3 or bottom-3 result.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::round_display;
use crate::models::{RankedEntry, RankingResult};

/// Number of places on a podium.
pub const PODIUM_SIZE: usize = 3;

/// Which end of the metric the podium shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Highest,
    Lowest,
}

/// Rank `scores` and keep the first three.
///
/// Scores are rounded for display before sorting, so values that display
/// the same also compare the same. Equal scores are ordered by name.
pub fn rank<I, S>(title: &str, scores: I, direction: Direction) -> RankingResult
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut entries: Vec<RankedEntry> = scores
        .into_iter()
        .filter(|(_, score)| score.is_finite())
        .map(|(name, score)| RankedEntry::new(name, round_display(score)))
        .collect();

    entries.sort_by(|a, b| {
        let by_score = match direction {
            Direction::Highest => b.score.total_cmp(&a.score),
            Direction::Lowest => a.score.total_cmp(&b.score),
        };
        match by_score {
            Ordering::Equal => a.name.cmp(&b.name),
            other => other,
        }
    });
    entries.truncate(PODIUM_SIZE);

    RankingResult {
        title: title.to_string(),
        subtitle: None,
        entries,
        is_negative: false,
        invert_order: false,
    }
}

/// Top three, highest score first.
pub fn top_three<I, S>(title: &str, scores: I) -> RankingResult
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    rank(title, scores, Direction::Highest)
}

/// Bottom three, lowest score first. Marked negative.
pub fn bottom_three<I, S>(title: &str, scores: I) -> RankingResult
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    rank(title, scores, Direction::Lowest).negative(true)
}

/// Podium from whole-number tallies, highest first.
pub fn top_three_counts(title: &str, counts: &BTreeMap<String, u32>) -> RankingResult {
    top_three(
        title,
        counts.iter().map(|(name, count)| (name.as_str(), *count as f64)),
    )
}

/// Displayed rank for each podium entry. Equal scores share a rank, so
/// scores `[3, 3, 1]` display as `[1, 1, 3]`.
pub fn display_ranks(result: &RankingResult) -> Vec<usize> {
    let mut ranks: Vec<usize> = Vec::with_capacity(result.entries.len());

    for (i, entry) in result.entries.iter().enumerate() {
        let rank = match ranks.last() {
            Some(&prev) if entry.score == result.entries[i - 1].score => prev,
            _ => i + 1,
        };
        ranks.push(rank);
    }

    ranks
}

/// How a podium's scores should be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodiumFormat {
    Points,
    Percentage,
    Ordinal,
    Default,
}

impl PodiumFormat {
    /// Infer the format from a podium title.
    pub fn from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("points") || title.contains("margin") {
            PodiumFormat::Points
        } else if title.contains("position") {
            PodiumFormat::Ordinal
        } else if title.contains("ratio")
            || title.contains("percentage")
            || title.contains("dedicated")
        {
            PodiumFormat::Percentage
        } else {
            PodiumFormat::Default
        }
    }

    /// Render a score.
    pub fn format(&self, value: f64) -> String {
        match self {
            PodiumFormat::Points => format!("{} points", value),
            PodiumFormat::Percentage => format!("{}%", value),
            PodiumFormat::Ordinal => ordinal(value),
            PodiumFormat::Default => format!("{}", value),
        }
    }
}

fn ordinal(value: f64) -> String {
    let suffix = if value.fract() != 0.0 {
        "th"
    } else {
        match (value.abs() as u64 % 100, value.abs() as u64 % 10) {
            (11..=13, _) => "th",
            (_, 1) => "st",
            (_, 2) => "nd",
            (_, 3) => "rd",
            _ => "th",
        }
    };
    format!("{}{}", value, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> Vec<(&'static str, f64)> {
        vec![("A", 2.0), ("B", 5.0), ("C", 1.0), ("D", 4.0), ("E", 3.0)]
    }

    #[test]
    fn test_top_three_sorted_descending() {
        let result = top_three("Most Wins", scores());
        assert_eq!(result.names(), vec!["B", "D", "E"]);
        assert!(!result.is_negative);
        for pair in result.entries.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_bottom_three_sorted_ascending() {
        let result = bottom_three("Lowest Win Ratio", scores());
        assert_eq!(result.names(), vec!["C", "A", "E"]);
        assert!(result.is_negative);
        for pair in result.entries.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn test_fewer_than_three_players() {
        let result = top_three("Most Wins", vec![("A", 1.0)]);
        assert_eq!(result.entries.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let result = bottom_three("Least Dedicated", Vec::<(String, f64)>::new());
        assert!(result.entries.is_empty());
        assert_eq!(result.title, "Least Dedicated");
        assert!(result.is_negative);
    }

    #[test]
    fn test_scores_rounded() {
        let result = top_three("Highest Average Points", vec![("A", 10.0 / 3.0)]);
        assert_eq!(result.entries[0].score, 3.33);
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let result = top_three("Most Wins", vec![("Zed", 2.0), ("Amy", 2.0), ("Bob", 1.0)]);
        assert_eq!(result.names(), vec!["Amy", "Zed", "Bob"]);
    }

    #[test]
    fn test_non_finite_scores_dropped() {
        let result = top_three("Win Ratio", vec![("A", f64::NAN), ("B", 50.0)]);
        assert_eq!(result.names(), vec!["B"]);
    }

    #[test]
    fn test_top_three_counts() {
        let mut counts = BTreeMap::new();
        counts.insert("A".to_string(), 3);
        counts.insert("B".to_string(), 7);
        let result = top_three_counts("Most Draws", &counts);
        assert_eq!(result.names(), vec!["B", "A"]);
        assert_eq!(result.score_of("B"), Some(7.0));
    }

    #[test]
    fn test_display_ranks() {
        let result = top_three("Most Wins", vec![("A", 3.0), ("B", 3.0), ("C", 1.0)]);
        assert_eq!(display_ranks(&result), vec![1, 1, 3]);

        let result = top_three("Most Wins", vec![("A", 3.0), ("B", 2.0), ("C", 2.0)]);
        assert_eq!(display_ranks(&result), vec![1, 2, 2]);
    }

    #[test]
    fn test_podium_format_from_title() {
        assert_eq!(PodiumFormat::from_title("Best Average Win Margin"), PodiumFormat::Points);
        assert_eq!(
            PodiumFormat::from_title("Highest Average Finishing Position"),
            PodiumFormat::Ordinal
        );
        assert_eq!(PodiumFormat::from_title("Most Dedicated"), PodiumFormat::Percentage);
        assert_eq!(PodiumFormat::from_title("Most Wins"), PodiumFormat::Default);
    }

    #[test]
    fn test_podium_format_render() {
        assert_eq!(PodiumFormat::Points.format(12.5), "12.5 points");
        assert_eq!(PodiumFormat::Percentage.format(80.0), "80%");
        assert_eq!(PodiumFormat::Ordinal.format(1.0), "1st");
        assert_eq!(PodiumFormat::Ordinal.format(2.0), "2nd");
        assert_eq!(PodiumFormat::Ordinal.format(3.0), "3rd");
        assert_eq!(PodiumFormat::Ordinal.format(11.0), "11th");
        assert_eq!(PodiumFormat::Ordinal.format(2.5), "2.5th");
    }
}
