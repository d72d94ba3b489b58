use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    DiaryRecord, FilmDetailRecord, ProfileRecord, WatchedFilmRecord, WatchlistRecord,
};

/// Failure of a single remote fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, or timeout failure from the HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] wreq::Error),

    /// The remote told us to back off. Treated as a whole-run circuit
    /// breaker, not a per-item retry.
    #[error("throttled by remote (status {status})")]
    Throttled { status: u16 },

    /// Any other non-success response.
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    /// The page came back but did not contain what we expect.
    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },
}

impl FetchError {
    /// Structured replacement for matching on error message text.
    pub fn is_throttling(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}

/// Everything the sync engine needs from the remote service. Every method is
/// rate-limited by the implementation and may fail with a [`FetchError`].
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord, FetchError>;

    /// The bulk watched list: every film the user has marked watched,
    /// including films never logged in the diary.
    async fn fetch_watched_films(&self, username: &str)
    -> Result<Vec<WatchedFilmRecord>, FetchError>;

    async fn fetch_diary(&self, username: &str) -> Result<Vec<DiaryRecord>, FetchError>;

    async fn fetch_watchlist(&self, username: &str) -> Result<Vec<WatchlistRecord>, FetchError>;

    async fn fetch_film_detail(&self, slug: &str) -> Result<FilmDetailRecord, FetchError>;
}

/// A shared handle to a source is itself a source.
#[async_trait]
impl<T: RemoteSource + ?Sized> RemoteSource for Arc<T> {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord, FetchError> {
        (**self).fetch_profile(username).await
    }

    async fn fetch_watched_films(
        &self,
        username: &str,
    ) -> Result<Vec<WatchedFilmRecord>, FetchError> {
        (**self).fetch_watched_films(username).await
    }

    async fn fetch_diary(&self, username: &str) -> Result<Vec<DiaryRecord>, FetchError> {
        (**self).fetch_diary(username).await
    }

    async fn fetch_watchlist(&self, username: &str) -> Result<Vec<WatchlistRecord>, FetchError> {
        (**self).fetch_watchlist(username).await
    }

    async fn fetch_film_detail(&self, slug: &str) -> Result<FilmDetailRecord, FetchError> {
        (**self).fetch_film_detail(slug).await
    }
}
