//! Cumulative chart series per roster player.

use crate::models::{chronological, ChartOptions, ChartResult, ChartSeries, Playlist, Roster};

/// Both charts, wins first.
pub fn all_charts(playlists: &[Playlist], roster: &Roster) -> Vec<ChartResult> {
    vec![
        total_wins_chart(playlists, roster),
        total_appearances_chart(playlists, roster),
    ]
}

/// `DD-MM` label for a playlist.
pub fn chart_label(playlist: &Playlist) -> String {
    playlist.date.format("%d-%m").to_string()
}

fn options(y_axis_title: &str, hide_zero_tooltips: bool) -> ChartOptions {
    ChartOptions {
        x_axis_title: "Playlist Date".to_string(),
        y_axis_title: y_axis_title.to_string(),
        y_step_size: 1,
        begin_at_zero: true,
        hide_zero_tooltips,
    }
}

/// One running count per roster player, one point per playlist in date
/// order. `counts` decides whether a playlist adds one for a player.
fn cumulative_chart<F>(
    title: &str,
    playlists: &[Playlist],
    roster: &Roster,
    chart_options: ChartOptions,
    counts: F,
) -> ChartResult
where
    F: Fn(&Playlist, &str) -> bool,
{
    let sorted = chronological(playlists);

    let labels = sorted.iter().map(|p| chart_label(p)).collect();

    let series = roster
        .names()
        .map(|name| {
            let data = sorted
                .iter()
                .copied()
                .scan(0u32, |total, playlist| {
                    if counts(playlist, name) {
                        *total += 1;
                    }
                    Some(*total)
                })
                .collect();
            ChartSeries {
                label: name.to_string(),
                data,
                color: roster.color_of(name).to_string(),
            }
        })
        .collect();

    ChartResult {
        title: title.to_string(),
        labels,
        series,
        options: chart_options,
    }
}

/// Running total of outright wins. Draws credit nobody.
pub fn total_wins_chart(playlists: &[Playlist], roster: &Roster) -> ChartResult {
    cumulative_chart(
        "Total Wins",
        playlists,
        roster,
        options("Total Wins", false),
        |playlist, name| playlist.sole_winner().is_some_and(|w| w.name == name),
    )
}

/// Running total of playlists attended.
pub fn total_appearances_chart(playlists: &[Playlist], roster: &Roster) -> ChartResult {
    cumulative_chart(
        "Total Appearances",
        playlists,
        roster,
        options("Total Appearances", true),
        |playlist, name| playlist.contains(name),
    )
}
