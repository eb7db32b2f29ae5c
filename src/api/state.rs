use std::sync::Arc;

use crate::engine::StatsEngine;
use crate::store::PlaylistStore;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<StatsEngine>,
    pub store: Arc<PlaylistStore>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(engine: Arc<StatsEngine>, store: Arc<PlaylistStore>) -> Self {
        Self {
            engine,
            store,
            cors_origin: "*".to_string(),
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }
}
