pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod letterboxd;
pub mod models;
pub mod ratelimit;
pub mod remote;
pub mod routes;
pub mod scheduler;
pub mod store;
pub mod sync;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, letterboxd::LetterboxdClient, store::Store, sync::SyncEngine};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub http: wreq::Client,
}

impl AppState {
    /// Builds the engine for one run. Each run gets its own client and with
    /// it its own request spacing, so concurrent runs for different users do
    /// not cross-throttle.
    pub fn sync_engine(&self) -> SyncEngine<LetterboxdClient> {
        let client = LetterboxdClient::new(
            self.http.clone(),
            &self.config.letterboxd_base_url,
            Duration::from_millis(self.config.min_request_delay_ms),
        );
        SyncEngine::new(client, self.store.clone())
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sync/{username}", post(routes::trigger_sync))
        .route("/api/sync/logs", get(routes::sync_logs))
        .route("/api/stats", get(routes::stats))
        .route("/api/profile", get(routes::profile))
        .route("/api/films", get(routes::films))
        .route("/api/films/{id}", get(routes::film_detail))
        .route("/api/diary", get(routes::diary))
        .route("/api/watchlist", get(routes::watchlist))
        .route("/api/dashboard", get(routes::dashboard))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
