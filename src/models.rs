use jiff::civil::Date;
use serde::Serialize;

/// Profile fields scraped from a user's public page.
#[derive(Clone, Debug, Default)]
pub struct ProfileRecord {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    /// Slugs of the films pinned as favorites.
    pub favorites: Vec<String>,
    /// Counters shown on the profile (films, lists, followers, ...).
    pub stats: serde_json::Value,
}

/// One film from the bulk watched grid. The undated "has watched" signal,
/// independent of any diary entry.
#[derive(Clone, Debug, Default)]
pub struct WatchedFilmRecord {
    pub slug: String,
    pub name: Option<String>,
    pub year: Option<i16>,
    pub rating: Option<f64>,
    pub liked: bool,
}

/// One dated log from the diary, keyed by its external viewing id.
#[derive(Clone, Debug, Default)]
pub struct DiaryRecord {
    pub id: String,
    pub film_slug: String,
    pub film_name: Option<String>,
    pub watched_date: Option<Date>,
    pub rating: Option<f64>,
    pub rewatch: bool,
    pub liked: bool,
}

#[derive(Clone, Debug, Default)]
pub struct WatchlistRecord {
    pub slug: String,
    pub name: Option<String>,
    pub year: Option<i16>,
}

/// Full metadata bundle from a film's own page.
#[derive(Clone, Debug, Default)]
pub struct FilmDetailRecord {
    pub slug: String,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i16>,
    pub runtime_minutes: Option<i32>,
    pub tagline: Option<String>,
    pub synopsis: Option<String>,
    pub poster_url: Option<String>,
    pub letterboxd_url: Option<String>,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub cast: Vec<String>,
    /// Remaining credited roles, keyed by role name.
    pub crew: Option<serde_json::Value>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub studios: Vec<String>,
    pub average_rating: Option<f64>,
    pub tmdb_id: Option<i32>,
    pub imdb_id: Option<String>,
}

/// Per-run counters reported by the engine.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SyncStats {
    pub user_synced: bool,
    /// Newly created user_film rows from the bulk watched pass.
    pub watched_films: i32,
    /// Newly created diary entries.
    pub diary_entries: i32,
    /// Newly inserted watchlist items.
    pub watchlist_items: i32,
    pub films_failed: usize,
    pub failed_slugs: Vec<String>,
}
