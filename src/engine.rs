//! Season stats engine.
//!
//! Recomputes every result from a season snapshot in one synchronous pass and
//! publishes the report on a watch channel. `None` on the channel means no
//! snapshot has been computed yet, which is different from an empty season.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::calculate::{charts, individual, leaderboard, metrics, podium};
use crate::config::{AppConfig, ManualPodium};
use crate::models::{
    ChartResult, PlayerResult, RaceResults, RankingResult, Roster, ScalarResult, Season,
    SeasonReport,
};

pub struct StatsEngine {
    roster: Roster,
    week_year: Option<i32>,
    manual_podiums: Vec<ManualPodium>,
    tx: watch::Sender<Option<Arc<SeasonReport>>>,
}

impl StatsEngine {
    pub fn new(roster: Roster) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            roster,
            week_year: None,
            manual_podiums: Vec::new(),
            tx,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.roster())
            .with_week_year(config.season.week_year)
            .with_manual_podiums(config.manual_podiums.clone())
    }

    /// Fix the calendar year used for weekly binning.
    pub fn with_week_year(mut self, year: Option<i32>) -> Self {
        self.week_year = year;
        self
    }

    pub fn with_manual_podiums(mut self, podiums: Vec<ManualPodium>) -> Self {
        self.manual_podiums = podiums;
        self
    }

    /// Derive the full report for a snapshot without touching the cache.
    pub fn compute(&self, season: &Season) -> SeasonReport {
        let playlists = &season.playlists;

        let mut podiums: Vec<RankingResult> = self
            .manual_podiums
            .iter()
            .map(manual_podium)
            .collect();
        podiums.extend(metrics::all_podiums(playlists, &self.roster));

        SeasonReport {
            computed_at: Utc::now(),
            playlist_count: playlists.len(),
            podiums,
            individual: individual::all_individual_stats(playlists, self.week_year),
            charts: charts::all_charts(playlists, &self.roster),
            race_breakdown: leaderboard::race_breakdown(playlists, &self.roster),
            leaderboard: leaderboard::overall_leaderboard(playlists),
        }
    }

    /// Compute a report and make it the current one.
    pub fn recompute(&self, season: &Season) -> Arc<SeasonReport> {
        let report = Arc::new(self.compute(season));
        debug!(
            "Computed {} podiums for {} playlists",
            report.podiums.len(),
            report.playlist_count
        );
        self.tx.send_replace(Some(Arc::clone(&report)));
        report
    }

    /// The current report, or `None` before the first computation.
    pub fn report(&self) -> Option<Arc<SeasonReport>> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<SeasonReport>>> {
        self.tx.subscribe()
    }

    pub fn podiums(&self) -> Option<Vec<RankingResult>> {
        self.report().map(|r| r.podiums.clone())
    }

    pub fn individual_stats(&self) -> Option<Vec<ScalarResult>> {
        self.report().map(|r| r.individual.clone())
    }

    pub fn charts(&self) -> Option<Vec<ChartResult>> {
        self.report().map(|r| r.charts.clone())
    }

    pub fn race_breakdown(&self) -> Option<RaceResults> {
        self.report().map(|r| r.race_breakdown.clone())
    }

    pub fn overall_leaderboard(&self) -> Option<Vec<PlayerResult>> {
        self.report().map(|r| r.leaderboard.clone())
    }

    /// Recompute whenever the store publishes a snapshot. Returns when the
    /// store is dropped.
    pub async fn run(self: Arc<Self>, mut snapshots: watch::Receiver<Option<Arc<Season>>>) {
        loop {
            let season = snapshots.borrow_and_update().clone();
            if let Some(season) = season {
                let report = self.recompute(&season);
                info!(
                    "Season report updated: {} playlists",
                    report.playlist_count
                );
            }

            if snapshots.changed().await.is_err() {
                debug!("Snapshot channel closed, stopping engine");
                break;
            }
        }
    }
}

fn manual_podium(def: &ManualPodium) -> RankingResult {
    let result = podium::top_three_counts(&def.title, &def.tallies).negative(def.negative);
    match &def.subtitle {
        Some(subtitle) => result.with_subtitle(subtitle),
        None => result,
    }
}
