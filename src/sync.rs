use std::collections::HashSet;

use sea_orm::DbErr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    entities::{diary_entry, film, sync_log::SyncStatus},
    models::{DiaryRecord, SyncStats, WatchedFilmRecord, WatchlistRecord},
    remote::{FetchError, RemoteSource},
    store::{Store, UserFilmState},
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("profile fetch for {username} failed: {source}")]
    Profile { username: String, source: FetchError },
    #[error("upstream throttling (status {status}), aborting run")]
    Throttled { status: u16 },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Per-run bookkeeping. Film-detail failures are recorded here instead of
/// aborting; the run finishes and reports them in the sync log.
struct RunState {
    fetch_details: bool,
    failed: Vec<(String, String)>,
}

/// Runs one full synchronization for one user: profile, watched films, diary
/// plus aggregate derivation, watchlist. Phases commit independently, so an
/// aborted run leaves resumable partial state behind.
pub struct SyncEngine<S> {
    remote: S,
    store: Store,
}

impl<S: RemoteSource> SyncEngine<S> {
    pub fn new(remote: S, store: Store) -> Self {
        Self { remote, store }
    }

    pub async fn run(&self, username: &str, fetch_details: bool) -> Result<SyncStats, SyncError> {
        let log_id = self.store.start_sync_log("full", username).await?;
        info!(username, fetch_details, "sync run started");

        let mut run = RunState { fetch_details, failed: Vec::new() };
        match self.run_phases(username, &mut run).await {
            Ok(stats) => {
                let items = stats.diary_entries + stats.watchlist_items;
                let (status, error_message) = if stats.failed_slugs.is_empty() {
                    (SyncStatus::Completed, None)
                } else {
                    let message = format!("Failed films: [{}]", stats.failed_slugs.join(", "));
                    (SyncStatus::CompletedWithErrors, Some(message))
                };
                self.store.finish_sync_log(log_id, status, Some(items), error_message).await?;
                info!(username, items, failed = stats.films_failed, "sync run finished");
                Ok(stats)
            },
            Err(err) => {
                error!(username, error = %err, "sync run failed");
                self.store
                    .finish_sync_log(log_id, SyncStatus::Failed, None, Some(err.to_string()))
                    .await?;
                Err(err)
            },
        }
    }

    async fn run_phases(&self, username: &str, run: &mut RunState) -> Result<SyncStats, SyncError> {
        let profile = self.remote.fetch_profile(username).await.map_err(|source| {
            SyncError::Profile { username: username.to_string(), source }
        })?;
        let user = self.store.upsert_user(&profile).await?;
        debug!(user_id = user.id, "profile synced");

        let watched = self.remote.fetch_watched_films(username).await?;
        let new_pairs = self.sync_watched_films(user.id, &watched, run).await?;
        info!(total = watched.len(), new = new_pairs, "watched films synced");

        let diary = self.remote.fetch_diary(username).await?;
        let new_entries = self.sync_diary(user.id, &diary, run).await?;
        info!(total = diary.len(), new = new_entries, "diary synced");

        let watchlist = self.remote.fetch_watchlist(username).await?;
        let added = self.sync_watchlist(user.id, &watchlist, run).await?;
        info!(total = watchlist.len(), added, "watchlist synced");

        Ok(SyncStats {
            user_synced: true,
            watched_films: new_pairs,
            diary_entries: new_entries,
            watchlist_items: added,
            films_failed: run.failed.len(),
            failed_slugs: run.failed.iter().map(|(slug, _)| slug.clone()).collect(),
        })
    }

    /// The bulk watched list is the authoritative "has watched" signal.
    /// Returns how many (user, film) rows this phase created.
    async fn sync_watched_films(
        &self,
        user_id: i32,
        records: &[WatchedFilmRecord],
        run: &mut RunState,
    ) -> Result<i32, SyncError> {
        let mut created = 0;
        for record in records {
            let film = self.resolve_film(&record.slug, record.year, run).await?;
            let existing = self.store.find_user_film(user_id, film.id).await?;
            let state = merge_bulk(existing.as_ref().map(UserFilmState::from), record);
            if self.store.save_user_film(user_id, film.id, &state).await? {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Upserts diary entries by external id, then recomputes the aggregate
    /// for every film the diary touched. Returns the number of new entries.
    async fn sync_diary(
        &self,
        user_id: i32,
        entries: &[DiaryRecord],
        run: &mut RunState,
    ) -> Result<i32, SyncError> {
        let mut created = 0;
        let mut touched = HashSet::new();
        for entry in entries {
            let film = self.resolve_film(&entry.film_slug, None, run).await?;
            if self.store.upsert_diary_entry(user_id, film.id, entry).await? {
                created += 1;
            }
            touched.insert(film.id);
        }

        for film_id in touched {
            let rows = self.store.diary_entries_for(user_id, film_id).await?;
            if rows.is_empty() {
                continue;
            }
            let existing = self.store.find_user_film(user_id, film_id).await?;
            let state = derive_aggregate(existing.as_ref().map(UserFilmState::from), &rows);
            self.store.save_user_film(user_id, film_id, &state).await?;
        }
        Ok(created)
    }

    /// Membership is write-once: rows are only ever inserted, so the added
    /// timestamp keeps its first-seen value. Returns the number inserted.
    async fn sync_watchlist(
        &self,
        user_id: i32,
        records: &[WatchlistRecord],
        run: &mut RunState,
    ) -> Result<i32, SyncError> {
        let mut present = self.store.watchlist_film_ids(user_id).await?;
        let mut added = 0;
        for record in records {
            let film = self.resolve_film(&record.slug, record.year, run).await?;
            if present.insert(film.id) {
                self.store.insert_watchlist_item(user_id, film.id).await?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Film resolution with detail caching. A film whose title differs from
    /// its slug has been detailed before and is returned as-is; otherwise a
    /// placeholder is ensured and, when enabled, one detail fetch attempted.
    /// A throttled response aborts the whole run; any other detail failure
    /// leaves the placeholder for a future run and is recorded.
    async fn resolve_film(
        &self,
        slug: &str,
        year: Option<i16>,
        run: &mut RunState,
    ) -> Result<film::Model, SyncError> {
        if let Some(existing) = self.store.find_film_by_slug(slug).await? {
            if existing.is_detailed() {
                return Ok(existing);
            }
        }

        let film = self.store.create_film_if_absent(slug, year).await?;
        if !run.fetch_details {
            return Ok(film);
        }

        match self.remote.fetch_film_detail(slug).await {
            Ok(detail) => {
                debug!(slug, "film detailed");
                Ok(self.store.apply_film_detail(film.id, &detail).await?)
            },
            Err(FetchError::Throttled { status }) => {
                warn!(slug, status, "upstream throttling during film detail");
                Err(SyncError::Throttled { status })
            },
            Err(err) => {
                warn!(slug, error = %err, "film detail failed, keeping placeholder");
                run.failed.push((slug.to_string(), err.to_string()));
                Ok(film)
            },
        }
    }
}

/// Folds a bulk watched-list record into the pair's state. The rating only
/// fills a gap: a rating already present (typically diary-derived) is more
/// specific than the bulk one and is kept.
fn merge_bulk(existing: Option<UserFilmState>, record: &WatchedFilmRecord) -> UserFilmState {
    let mut state = existing.unwrap_or_default();
    state.watched = true;
    if state.rating.is_none() {
        state.rating = record.rating;
    }
    if record.liked {
        state.liked = true;
    }
    state
}

/// Recomputes the aggregate for one (user, film) from the full set of its
/// diary entries. Entries must be in ascending id order; among rated entries
/// the most recently dated wins, earliest id breaking date ties, with undated
/// entries sorting before every date.
fn derive_aggregate(
    existing: Option<UserFilmState>,
    entries: &[diary_entry::Model],
) -> UserFilmState {
    let mut state = existing.unwrap_or_default();
    state.watched = true;
    state.watch_count = entries.len() as i32;
    state.liked = entries.iter().any(|e| e.liked);

    let first = entries.iter().filter_map(|e| e.watched_date.as_deref()).min();
    if first.is_some() {
        let last = entries.iter().filter_map(|e| e.watched_date.as_deref()).max();
        state.first_watched = first.map(str::to_string);
        state.last_watched = last.map(str::to_string);
    }

    let mut best: Option<(&str, f64)> = None;
    for entry in entries {
        let Some(rating) = entry.rating else { continue };
        let date = entry.watched_date.as_deref().unwrap_or("");
        match best {
            Some((best_date, _)) if date <= best_date => {},
            _ => best = Some((date, rating)),
        }
    }
    if let Some((_, rating)) = best {
        state.rating = Some(rating);
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        id: i32,
        date: Option<&str>,
        rating: Option<f64>,
        liked: bool,
    ) -> diary_entry::Model {
        diary_entry::Model {
            id,
            letterboxd_id: format!("v{id}"),
            user_id: 1,
            film_id: 1,
            watched_date: date.map(str::to_string),
            rating,
            rewatch: false,
            liked,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn watched(rating: Option<f64>, liked: bool) -> WatchedFilmRecord {
        WatchedFilmRecord { slug: "heat".into(), name: None, year: None, rating, liked }
    }

    #[test]
    fn aggregate_from_dated_entries() {
        let rows = vec![
            entry(1, Some("2023-01-01"), Some(3.0), false),
            entry(2, Some("2023-06-15"), Some(4.5), true),
        ];
        let state = derive_aggregate(None, &rows);
        assert!(state.watched);
        assert_eq!(state.watch_count, 2);
        assert_eq!(state.first_watched.as_deref(), Some("2023-01-01"));
        assert_eq!(state.last_watched.as_deref(), Some("2023-06-15"));
        assert_eq!(state.rating, Some(4.5));
        assert!(state.liked);
    }

    #[test]
    fn diary_rating_overrides_seeded_rating() {
        let seeded = UserFilmState { watched: true, rating: Some(2.0), ..Default::default() };
        let rows = vec![entry(1, Some("2024-03-01"), Some(4.0), false)];
        let state = derive_aggregate(Some(seeded), &rows);
        assert_eq!(state.rating, Some(4.0));
    }

    #[test]
    fn unrated_entries_keep_seeded_rating() {
        let seeded = UserFilmState { watched: true, rating: Some(3.5), ..Default::default() };
        let rows = vec![entry(1, Some("2024-03-01"), None, false)];
        let state = derive_aggregate(Some(seeded), &rows);
        assert_eq!(state.rating, Some(3.5));
        assert_eq!(state.watch_count, 1);
    }

    #[test]
    fn liked_reflects_entries_not_seed() {
        let seeded = UserFilmState { watched: true, liked: true, ..Default::default() };
        let rows = vec![entry(1, Some("2024-03-01"), None, false)];
        let state = derive_aggregate(Some(seeded), &rows);
        assert!(!state.liked);
    }

    #[test]
    fn date_ties_resolve_to_earliest_entry() {
        let rows = vec![
            entry(1, Some("2024-05-05"), Some(3.0), false),
            entry(2, Some("2024-05-05"), Some(5.0), false),
        ];
        let state = derive_aggregate(None, &rows);
        assert_eq!(state.rating, Some(3.0));
    }

    #[test]
    fn undated_entries_sort_before_dated_for_rating() {
        let rows = vec![
            entry(1, None, Some(5.0), false),
            entry(2, Some("2020-01-01"), Some(2.5), false),
        ];
        let state = derive_aggregate(None, &rows);
        assert_eq!(state.rating, Some(2.5));
        assert_eq!(state.first_watched.as_deref(), Some("2020-01-01"));
        assert_eq!(state.last_watched.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn undated_rated_entries_still_set_rating() {
        let rows = vec![entry(1, None, Some(3.0), false), entry(2, None, None, true)];
        let state = derive_aggregate(None, &rows);
        assert_eq!(state.rating, Some(3.0));
        assert_eq!(state.first_watched, None);
        assert_eq!(state.last_watched, None);
        assert!(state.liked);
    }

    #[test]
    fn dates_kept_when_new_entries_are_undated() {
        let seeded = UserFilmState {
            watched: true,
            first_watched: Some("2019-02-02".into()),
            last_watched: Some("2019-02-02".into()),
            ..Default::default()
        };
        let rows = vec![entry(1, None, None, false)];
        let state = derive_aggregate(Some(seeded), &rows);
        assert_eq!(state.first_watched.as_deref(), Some("2019-02-02"));
        assert_eq!(state.last_watched.as_deref(), Some("2019-02-02"));
    }

    #[test]
    fn bulk_merge_seeds_only_missing_rating() {
        let state = merge_bulk(None, &watched(Some(4.0), false));
        assert!(state.watched);
        assert_eq!(state.rating, Some(4.0));

        let diary_rated = UserFilmState { watched: true, rating: Some(4.5), ..Default::default() };
        let state = merge_bulk(Some(diary_rated), &watched(Some(1.0), false));
        assert_eq!(state.rating, Some(4.5));
    }

    #[test]
    fn bulk_merge_never_clears_liked() {
        let liked_before = UserFilmState { watched: true, liked: true, ..Default::default() };
        let state = merge_bulk(Some(liked_before), &watched(None, false));
        assert!(state.liked);

        let state = merge_bulk(None, &watched(None, true));
        assert!(state.liked);
    }
}
