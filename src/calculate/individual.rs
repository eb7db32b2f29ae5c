//! Scalar season facts.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use super::round_display;
use crate::models::{chronological, Playlist, ScalarResult};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Every scalar fact, in display order. `week_year` picks the calendar year
/// for weekly binning, defaulting to the year of the earliest playlist.
pub fn all_individual_stats(playlists: &[Playlist], week_year: Option<i32>) -> Vec<ScalarResult> {
    let mut stats = vec![
        total_playlists(playlists),
        average_playlist_length(playlists),
        average_squad_size(playlists),
    ];
    stats.extend(popular_days(playlists));
    stats.push(most_playlists_in_one_week(playlists, week_year));
    stats.push(longest_winning_streak(playlists));
    stats
}

pub fn total_playlists(playlists: &[Playlist]) -> ScalarResult {
    ScalarResult::new("Total Playlists").with_value(playlists.len() as f64)
}

fn mean_of(playlists: &[Playlist], f: impl Fn(&Playlist) -> f64) -> f64 {
    if playlists.is_empty() {
        return 0.0;
    }
    let total: f64 = playlists.iter().map(f).sum();
    round_display(total / playlists.len() as f64)
}

/// Mean number of sub-events per playlist.
pub fn average_playlist_length(playlists: &[Playlist]) -> ScalarResult {
    ScalarResult::new("Average Playlist Length")
        .with_value(mean_of(playlists, |p| p.length as f64))
}

/// Mean number of players per playlist.
pub fn average_squad_size(playlists: &[Playlist]) -> ScalarResult {
    ScalarResult::new("Average Squad Size")
        .with_value(mean_of(playlists, |p| p.players.len() as f64))
}

/// Most and least common weekdays. Ties go to the earlier weekday
/// (Monday first). Days with no playlists are never "least popular".
pub fn popular_days(playlists: &[Playlist]) -> [ScalarResult; 2] {
    let mut counts = [0u32; 7];
    for playlist in playlists {
        counts[playlist.weekday().num_days_from_monday() as usize] += 1;
    }

    let played: Vec<(Weekday, u32)> = WEEKDAYS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(day, count)| (*day, count))
        .collect();

    // min_by_key/max_by_key keep the first/last of equal elements
    let most = played
        .iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .copied();
    let least = played.iter().min_by_key(|(_, count)| *count).copied();

    let describe = |title: &str, pick: Option<(Weekday, u32)>| match pick {
        Some((day, count)) => ScalarResult::new(title)
            .with_subtitle(weekday_name(day))
            .with_value(count as f64),
        None => ScalarResult::new(title),
    };

    [
        describe("Most Popular Day", most),
        describe("Least Popular Day", least),
    ]
}

/// Monday-to-Sunday weeks covering `year`. The first week starts on the
/// first Monday of the year; the last may run into the next year.
pub fn weeks_of_year(year: i32) -> Vec<(NaiveDate, NaiveDate)> {
    let mut weeks = Vec::new();
    let (Some(mut start), Some(end_of_year)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return weeks;
    };

    while start.weekday() != Weekday::Mon {
        match start.checked_add_days(Days::new(1)) {
            Some(next) => start = next,
            None => return weeks,
        }
    }

    // Stops early at the end of the representable calendar
    while start <= end_of_year {
        let Some(end) = start.checked_add_days(Days::new(6)) else {
            break;
        };
        weeks.push((start, end));
        match start.checked_add_days(Days::new(7)) {
            Some(next) => start = next,
            None => break,
        }
    }

    weeks
}

/// The Monday-to-Sunday week holding the most playlists. Ties go to the
/// earliest week.
pub fn most_playlists_in_one_week(playlists: &[Playlist], year: Option<i32>) -> ScalarResult {
    const TITLE: &str = "Most Playlists in One Week";

    let Some(year) = year.or_else(|| playlists.iter().map(|p| p.date.year()).min()) else {
        return ScalarResult::new(TITLE).with_value(0.0);
    };

    let busiest = weeks_of_year(year)
        .into_iter()
        .map(|(start, end)| {
            let count = playlists
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .count();
            (start, end, count)
        })
        .rev()
        .max_by_key(|(_, _, count)| *count);

    match busiest {
        Some((start, end, count)) if count > 0 => ScalarResult::new(TITLE)
            .with_subtitle(format!(
                "{} - {}",
                start.format("%B %-d"),
                end.format("%B %-d")
            ))
            .with_value(count as f64),
        _ => ScalarResult::new(TITLE).with_value(0.0),
    }
}

/// Longest run of consecutive outright wins by one player, in date order.
/// A draw ends every streak. Players sharing the record are listed
/// alphabetically.
pub fn longest_winning_streak(playlists: &[Playlist]) -> ScalarResult {
    let mut longest = 0u32;
    let mut current = 0u32;
    let mut current_winner: Option<&str> = None;
    let mut holders: Vec<&str> = Vec::new();

    for playlist in chronological(playlists) {
        let Some(winner) = playlist.sole_winner() else {
            current = 0;
            current_winner = None;
            continue;
        };

        if current_winner == Some(winner.name.as_str()) {
            current += 1;
        } else {
            current_winner = Some(winner.name.as_str());
            current = 1;
        }

        if current > longest {
            longest = current;
            holders = vec![winner.name.as_str()];
        } else if current == longest && !holders.contains(&winner.name.as_str()) {
            holders.push(winner.name.as_str());
        }
    }

    holders.sort_unstable();

    let result = ScalarResult::new("Longest Winning Streak").with_value(longest as f64);
    if holders.is_empty() {
        result
    } else {
        result.with_player(holders.join(", "))
    }
}
