use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{
    ChartResult, PlayerResult, RaceResults, RankingResult, ScalarResult, SeasonReport,
};

fn current(state: &AppState) -> Result<Arc<SeasonReport>, ApiError> {
    state.engine.report().ok_or(ApiError::NotReady)
}

pub async fn podiums(State(state): State<AppState>) -> Result<Json<Vec<RankingResult>>, ApiError> {
    Ok(Json(current(&state)?.podiums.clone()))
}

pub async fn individual(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScalarResult>>, ApiError> {
    Ok(Json(current(&state)?.individual.clone()))
}

pub async fn charts(State(state): State<AppState>) -> Result<Json<Vec<ChartResult>>, ApiError> {
    Ok(Json(current(&state)?.charts.clone()))
}

pub async fn races(State(state): State<AppState>) -> Result<Json<RaceResults>, ApiError> {
    Ok(Json(current(&state)?.race_breakdown.clone()))
}

pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResult>>, ApiError> {
    Ok(Json(current(&state)?.leaderboard.clone()))
}

/// The whole report in one response.
pub async fn report(State(state): State<AppState>) -> Result<Json<SeasonReport>, ApiError> {
    let report = current(&state)?;
    Ok(Json(SeasonReport::clone(&report)))
}
