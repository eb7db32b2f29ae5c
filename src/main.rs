use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use season_stats::api::{build_router, state::AppState};
use season_stats::calculate::podium::{display_ranks, PodiumFormat};
use season_stats::config::AppConfig;
use season_stats::engine::StatsEngine;
use season_stats::models::{
    ChartResult, PlayerResult, RaceResults, RankingResult, ScalarResult, SeasonReport,
};
use season_stats::store::PlaylistStore;

#[derive(Parser)]
#[command(name = "season-stats")]
#[command(about = "Season podiums, charts and leaderboards for playlist results")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Season snapshot file (overrides the config)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the season report once and print it
    Report {
        /// Only print one section
        #[arg(long, value_enum)]
        section: Option<Section>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start the API server with periodic reloads
    Serve {
        /// Bind address (overrides the config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    Podiums,
    Individual,
    Charts,
    Races,
    Leaderboard,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("loading config from {:?}", cli.config))?
    } else {
        AppConfig::default()
    };

    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    Ok(config)
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(&config.log_level, cli.json_logs);

    tracing::info!("Starting season-stats v{}", env!("CARGO_PKG_VERSION"));
    if !cli.config.exists() {
        tracing::info!("No config at {:?}, using defaults", cli.config);
    }

    let store = Arc::new(PlaylistStore::new(&config.data_file));
    let engine = Arc::new(StatsEngine::from_config(&config));

    match cli.command {
        Commands::Report { section, json } => {
            store
                .reload()
                .await
                .with_context(|| format!("reading {:?}", config.data_file))?;
            let season = store
                .snapshot()
                .context("no snapshot after a successful load")?;
            let report = engine.recompute(&season);

            if json {
                print_json(&report, section)?;
            } else {
                print_text(&report, section);
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            tokio::spawn(Arc::clone(&engine).run(store.subscribe()));
            tokio::spawn(Arc::clone(&store).run_periodic(config.refresh_interval()));

            let state = AppState::new(engine, store).with_cors_origin(&config.server.cors_origin);
            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Serving season stats on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn print_json(report: &SeasonReport, section: Option<Section>) -> Result<()> {
    let out = match section {
        None => serde_json::to_string_pretty(report)?,
        Some(Section::Podiums) => serde_json::to_string_pretty(&report.podiums)?,
        Some(Section::Individual) => serde_json::to_string_pretty(&report.individual)?,
        Some(Section::Charts) => serde_json::to_string_pretty(&report.charts)?,
        Some(Section::Races) => serde_json::to_string_pretty(&report.race_breakdown)?,
        Some(Section::Leaderboard) => serde_json::to_string_pretty(&report.leaderboard)?,
    };
    println!("{}", out);
    Ok(())
}

fn print_text(report: &SeasonReport, section: Option<Section>) {
    let wants = |s: Section| section.is_none() || section == Some(s);

    println!("Season report: {} playlists", report.playlist_count);

    if wants(Section::Podiums) {
        println!("\n== Podiums ==");
        report.podiums.iter().for_each(print_podium);
    }
    if wants(Section::Individual) {
        println!("\n== Individual ==");
        report.individual.iter().for_each(print_scalar);
    }
    if wants(Section::Charts) {
        println!("\n== Charts ==");
        report.charts.iter().for_each(print_chart);
    }
    if wants(Section::Races) {
        println!("\n== Races ==");
        print_races(&report.race_breakdown);
    }
    if wants(Section::Leaderboard) {
        println!("\n== Leaderboard ==");
        print_leaderboard(&report.leaderboard);
    }
}

fn print_podium(result: &RankingResult) {
    let format = PodiumFormat::from_title(&result.title);
    match &result.subtitle {
        Some(subtitle) => println!("{} ({})", result.title, subtitle),
        None => println!("{}", result.title),
    }
    if result.entries.is_empty() {
        println!("  -");
    }
    for (rank, entry) in display_ranks(result).iter().zip(&result.entries) {
        println!("  {}. {:<24} {}", rank, entry.name, format.format(entry.score));
    }
}

fn print_scalar(result: &ScalarResult) {
    let mut line = result.title.clone();
    if let Some(value) = result.value {
        line.push_str(&format!(": {}", value));
    }
    if let Some(subtitle) = &result.subtitle {
        line.push_str(&format!(" ({})", subtitle));
    }
    if let Some(player) = &result.player {
        line.push_str(&format!(" - {}", player));
    }
    println!("  {}", line);
}

fn print_chart(chart: &ChartResult) {
    println!("{} [{}]", chart.title, chart.labels.join(" "));
    for series in &chart.series {
        let last = series.data.last().copied().unwrap_or(0);
        println!("  {:<24} {}", series.label, last);
    }
}

fn print_races(races: &RaceResults) {
    for race in &races.races {
        let line: Vec<String> = race
            .players
            .iter()
            .map(|p| format!("{} {}", p.player_name, p.points))
            .collect();
        println!("  {}: {}", race.date, line.join(", "));
    }
}

fn print_leaderboard(leaderboard: &[PlayerResult]) {
    for (i, player) in leaderboard.iter().enumerate() {
        println!("  {:>2}. {:<24} {}", i + 1, player.player_name, player.points);
    }
}
