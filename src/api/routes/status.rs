use axum::extract::State;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::store::StoreStatus;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Whether a report has been computed
    pub ready: bool,
    pub computed_at: Option<DateTime<Utc>>,
    pub store: StoreStatus,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let report = state.engine.report();
    Json(StatusResponse {
        ready: report.is_some(),
        computed_at: report.map(|r| r.computed_at),
        store: state.store.status().await,
    })
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub playlists_loaded: usize,
    pub last_playlist_date: Option<NaiveDate>,
}

/// Reload the snapshot now. The engine picks the new snapshot up from the
/// store's channel.
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    info!("Manual refresh requested");
    let playlists_loaded = state.store.reload().await?;

    Ok(Json(RefreshResponse {
        playlists_loaded,
        last_playlist_date: state.store.last_playlist_date(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::engine::StatsEngine;
    use crate::models::Roster;
    use crate::store::PlaylistStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn send(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }

    fn setup_test_state(path: &Path) -> AppState {
        AppState::new(
            Arc::new(StatsEngine::new(Roster::default())),
            Arc::new(PlaylistStore::new(path)),
        )
    }

    fn write_season(path: &Path) {
        let lines = [
            r#"{"name":"One","date":"2025-03-03","length":8,"players":[{"name":"A","totalPoints":100},{"name":"B","totalPoints":80}]}"#,
            r#"{"name":"Two","date":"2025-03-09","length":6,"players":[{"name":"B","totalPoints":70}]}"#,
        ];
        std::fs::write(path, lines.join("\n")).unwrap();
    }

    #[tokio::test]
    async fn test_status_before_load() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(&tmp.path().join("season.jsonl"));

        let (status, json) = send(build_router(state), "GET", "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ready"], false);
        assert!(json["computed_at"].is_null());
        assert!(json["store"]["last_loaded_at"].is_null());
    }

    #[tokio::test]
    async fn test_refresh_loads_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("season.jsonl");
        write_season(&path);
        let state = setup_test_state(&path);

        let (status, json) = send(build_router(state.clone()), "POST", "/api/refresh").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["playlists_loaded"], 2);
        assert_eq!(json["last_playlist_date"], "2025-03-09");

        let (_, json) = send(build_router(state), "GET", "/api/status").await;
        assert_eq!(json["store"]["playlist_count"], 2);
    }

    #[tokio::test]
    async fn test_refresh_feeds_engine() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("season.jsonl");
        write_season(&path);
        let state = setup_test_state(&path);

        let mut reports = state.engine.subscribe();
        tokio::spawn(Arc::clone(&state.engine).run(state.store.subscribe()));

        let (status, _) = send(build_router(state.clone()), "POST", "/api/refresh").await;
        assert_eq!(status, StatusCode::OK);

        reports.changed().await.unwrap();
        let (status, json) = send(build_router(state), "GET", "/api/leaderboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["player_name"], "B");
    }

    #[tokio::test]
    async fn test_refresh_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(&tmp.path().join("missing.jsonl"));

        let (status, json) = send(build_router(state.clone()), "POST", "/api/refresh").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "RELOAD_FAILED");

        let (_, json) = send(build_router(state), "GET", "/api/status").await;
        assert!(json["store"]["last_error"].is_string());
    }
}
