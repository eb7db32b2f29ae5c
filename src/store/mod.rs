//! Playlist data store.
//!
//! Holds the latest season snapshot and publishes every successful load on a
//! watch channel. A failed reload leaves the previous snapshot in place.

mod reader;

pub use reader::SeasonReader;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::models::Season;

/// Errors that can occur while loading a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Load bookkeeping, exposed through the status endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStatus {
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub playlist_count: usize,
    pub last_playlist_date: Option<NaiveDate>,
}

/// Snapshot holder and change notifier.
pub struct PlaylistStore {
    reader: SeasonReader,
    tx: watch::Sender<Option<Arc<Season>>>,
    status: RwLock<StoreStatus>,
}

impl PlaylistStore {
    /// A store for the given snapshot file. Nothing is loaded until
    /// [`reload`](Self::reload) runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            reader: SeasonReader::new(path),
            tx,
            status: RwLock::new(StoreStatus::default()),
        }
    }

    /// The current snapshot, or `None` before the first successful load.
    pub fn snapshot(&self) -> Option<Arc<Season>> {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Season>>> {
        self.tx.subscribe()
    }

    /// Publish a snapshot directly, bypassing the file.
    pub async fn replace(&self, season: Season) {
        let mut status = self.status.write().await;
        let now = Utc::now();
        status.last_loaded_at = Some(now);
        status.last_attempt_at = Some(now);
        status.last_error = None;
        status.playlist_count = season.len();
        status.last_playlist_date = season.last_playlist_date();

        self.tx.send_replace(Some(Arc::new(season)));
    }

    /// Re-read the snapshot file and publish it. On failure the previous
    /// snapshot stays current and the error is recorded.
    pub async fn reload(&self) -> Result<usize, StoreError> {
        match self.reader.read() {
            Ok(season) => {
                let count = season.len();
                info!("Loaded {} playlists from {:?}", count, self.reader.path());
                self.replace(season).await;
                Ok(count)
            }
            Err(e) => {
                warn!(
                    "Reload of {:?} failed, keeping last snapshot: {}",
                    self.reader.path(),
                    e
                );
                let mut status = self.status.write().await;
                status.last_attempt_at = Some(Utc::now());
                status.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Date of the most recent playlist in the current snapshot.
    pub fn last_playlist_date(&self) -> Option<NaiveDate> {
        self.tx
            .borrow()
            .as_ref()
            .and_then(|season| season.last_playlist_date())
    }

    pub async fn status(&self) -> StoreStatus {
        self.status.read().await.clone()
    }

    /// Reload on a fixed interval. The first tick fires immediately.
    pub async fn run_periodic(self: Arc<Self>, every: Duration) {
        let mut ticker = interval(every);

        info!("Reloading season snapshot every {:?}", every);

        loop {
            ticker.tick().await;

            if let Err(e) = self.reload().await {
                error!("Periodic reload failed: {}", e);
            }
        }
    }
}
