use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    AppState,
    entities::{diary_entry, film, user_film},
    error::AppResult,
};

#[derive(Debug, Deserialize)]
pub struct SyncTriggerQuery {
    fetch_details: Option<bool>,
}

/// Fire-and-forget sync trigger. Progress is observable through the
/// persisted sync logs, not through this call.
pub async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<SyncTriggerQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(anyhow::anyhow!("username is required").into());
    }

    let fetch_details = query.fetch_details.unwrap_or(state.config.fetch_film_details);
    let engine = state.sync_engine();
    tokio::spawn(async move {
        // run() logs and records its own outcome
        if let Err(err) = engine.run(&username, fetch_details).await {
            debug!(error = %err, "background sync ended with error");
        }
    });

    Ok(Json(json!({ "status": "started" })))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    limit: Option<u64>,
}

pub async fn sync_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = query.limit.unwrap_or(20).min(200);
    let logs = state.store.recent_sync_logs(limit).await?;
    Ok(Json(json!(logs)))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    let counts = state.store.counts().await?;
    Ok(Json(json!(counts)))
}

pub async fn profile(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let Some(user) = state.store.first_user().await? else {
        return Ok(not_found("no synced profile"));
    };
    let body = json!({
        "id": user.id,
        "username": user.username,
        "display_name": user.display_name,
        "bio": user.bio,
        "location": user.location,
        "website": user.website,
        "favorites": user.favorites.unwrap_or_else(|| json!([])),
        "stats": user.stats.unwrap_or_else(|| json!({})),
        "created_at": user.created_at,
        "updated_at": user.updated_at,
    });
    Ok(Json(body).into_response())
}

#[derive(Debug, Deserialize)]
pub struct FilmsQuery {
    sort: Option<String>,
    order: Option<String>,
    genre: Option<String>,
    decade: Option<String>,
    logged_only: Option<bool>,
}

pub async fn films(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilmsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let Some(user) = state.store.first_user().await? else {
        return Ok(Json(json!([])));
    };
    let mut rows = state.store.watched_films_with_state(user.id).await?;

    if let Some(genre) = query.genre.as_deref() {
        rows.retain(|(_, film)| {
            json_strings(&film.genres).iter().any(|g| g.eq_ignore_ascii_case(genre))
        });
    }
    if let Some(decade) = query.decade.as_deref() {
        if let Ok(start) = decade.trim_end_matches('s').parse::<i32>() {
            rows.retain(|(_, film)| film.year.is_some_and(|y| y >= start && y < start + 10));
        }
    }
    if query.logged_only.unwrap_or(false) {
        rows.retain(|(uf, _)| uf.watch_count > 0);
    }

    let desc = query.order.as_deref() == Some("desc");
    rows.sort_by(|a, b| {
        let ord = match query.sort.as_deref() {
            Some("year") => a.1.year.cmp(&b.1.year),
            Some("rating") => a.0.rating.partial_cmp(&b.0.rating).unwrap_or(Ordering::Equal),
            _ => a.1.title.to_lowercase().cmp(&b.1.title.to_lowercase()),
        };
        if desc { ord.reverse() } else { ord }
    });

    let items: Vec<_> = rows.iter().map(|(uf, film)| film_list_item(uf, film)).collect();
    Ok(Json(json!(items)))
}

pub async fn film_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let Some(film) = state.store.find_film_by_id(id).await? else {
        return Ok(not_found("film not found"));
    };

    let user = state.store.first_user().await?;
    let (user_film, in_watchlist, mut entries) = match &user {
        Some(user) => (
            state.store.find_user_film(user.id, film.id).await?,
            state.store.watchlist_contains(user.id, film.id).await?,
            state.store.diary_entries_for(user.id, film.id).await?,
        ),
        None => (None, false, Vec::new()),
    };
    entries.sort_by(|a, b| b.watched_date.cmp(&a.watched_date).then(b.id.cmp(&a.id)));

    let body = json!({
        "film": {
            "id": film.id,
            "slug": film.slug,
            "title": film.title,
            "original_title": film.original_title,
            "year": film.year,
            "runtime_minutes": film.runtime_minutes,
            "tagline": film.tagline,
            "synopsis": film.synopsis,
            "poster_url": film.poster_url,
            "letterboxd_url": film.letterboxd_url,
            "genres": json_strings(&film.genres),
            "directors": json_strings(&film.directors),
            "cast": json_strings(&film.cast),
            "crew": film.crew,
            "countries": json_strings(&film.countries),
            "languages": json_strings(&film.languages),
            "studios": json_strings(&film.studios),
            "average_rating": film.average_rating,
            "tmdb_id": film.tmdb_id,
            "imdb_id": film.imdb_id,
        },
        "user_film": user_film.as_ref().map(user_film_json),
        "in_watchlist": in_watchlist,
        "diary_entries": entries.iter().map(entry_json).collect::<Vec<_>>(),
    });
    Ok(Json(body).into_response())
}

#[derive(Debug, Deserialize)]
pub struct DiaryQuery {
    year: Option<i32>,
    month: Option<i32>,
}

pub async fn diary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiaryQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let rows = state.store.diary_with_films(query.year, query.month).await?;
    let items: Vec<_> = rows.iter().map(|(entry, film)| diary_item(entry, film)).collect();
    Ok(Json(json!(items)))
}

pub async fn watchlist(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    let Some(user) = state.store.first_user().await? else {
        return Ok(Json(json!([])));
    };
    let rows = state.store.watchlist_with_films(user.id).await?;
    let items: Vec<_> = rows
        .iter()
        .map(|(item, film)| json!({ "added_at": item.added_at, "film": film_summary(film) }))
        .collect();
    Ok(Json(json!(items)))
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    let Some(user) = state.store.first_user().await? else {
        return Ok(Json(json!({ "synced": false })));
    };
    let watched = state.store.watched_films_with_state(user.id).await?;
    let diary = state.store.diary_with_films(None, None).await?;
    let counts = state.store.counts().await?;

    let total_watched = watched.len();
    let logged_films = watched.iter().filter(|(uf, _)| uf.watch_count > 0).count();
    let minutes: i64 = watched
        .iter()
        .filter_map(|(uf, film)| {
            film.runtime_minutes.map(|m| i64::from(m) * i64::from(uf.watch_count.max(1)))
        })
        .sum();

    let user_ratings: Vec<f64> = watched.iter().filter_map(|(uf, _)| uf.rating).collect();
    let community_ratings: Vec<f64> =
        watched.iter().filter_map(|(_, film)| film.average_rating).collect();

    let today: jiff::civil::Date = jiff::Zoned::now().into();
    let year_prefix = format!("{:04}", today.year());
    let month_prefix = format!("{:04}-{:02}", today.year(), today.month());
    let films_this_year = diary
        .iter()
        .filter(|(e, _)| e.watched_date.as_deref().is_some_and(|d| d.starts_with(&year_prefix)))
        .count();
    let films_this_month = diary
        .iter()
        .filter(|(e, _)| e.watched_date.as_deref().is_some_and(|d| d.starts_with(&month_prefix)))
        .count();

    let mut genre_counts: HashMap<String, i64> = HashMap::new();
    let mut director_counts: HashMap<String, i64> = HashMap::new();
    let mut decade_counts: HashMap<String, i64> = HashMap::new();
    for (_, film) in &watched {
        for genre in json_strings(&film.genres) {
            *genre_counts.entry(genre).or_default() += 1;
        }
        for director in json_strings(&film.directors) {
            *director_counts.entry(director).or_default() += 1;
        }
        if let Some(year) = film.year {
            *decade_counts.entry(format!("{}s", year - year.rem_euclid(10))).or_default() += 1;
        }
    }

    let mut rating_distribution: BTreeMap<String, i64> = BTreeMap::new();
    for rating in &user_ratings {
        *rating_distribution.entry(format!("{rating:.1}")).or_default() += 1;
    }

    let mut films_per_year: BTreeMap<String, i64> = BTreeMap::new();
    for (entry, _) in &diary {
        if let Some(date) = entry.watched_date.as_deref() {
            if date.len() >= 4 {
                *films_per_year.entry(date[..4].to_string()).or_default() += 1;
            }
        }
    }

    let recent: Vec<_> = diary.iter().take(5).map(|(e, f)| diary_item(e, f)).collect();

    Ok(Json(json!({
        "synced": true,
        "counts": counts,
        "total_watched": total_watched,
        "logged_films": logged_films,
        "unlogged_films": total_watched - logged_films,
        "hours_watched": minutes / 60,
        "average_user_rating": mean(&user_ratings),
        "average_community_rating": mean(&community_ratings),
        "films_this_year": films_this_year,
        "films_this_month": films_this_month,
        "top_genres": top_counts(genre_counts, 5),
        "top_directors": top_counts(director_counts, 5),
        "top_decades": top_counts(decade_counts, 5),
        "rating_distribution": rating_distribution,
        "films_per_year": films_per_year,
        "recent_entries": recent,
    })))
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

fn film_summary(film: &film::Model) -> serde_json::Value {
    json!({
        "id": film.id,
        "slug": film.slug,
        "title": film.title,
        "year": film.year,
        "poster_url": film.poster_url,
    })
}

fn film_list_item(uf: &user_film::Model, film: &film::Model) -> serde_json::Value {
    json!({
        "id": film.id,
        "slug": film.slug,
        "title": film.title,
        "year": film.year,
        "runtime_minutes": film.runtime_minutes,
        "poster_url": film.poster_url,
        "genres": json_strings(&film.genres),
        "directors": json_strings(&film.directors),
        "average_rating": film.average_rating,
        "rating": uf.rating,
        "liked": uf.liked,
        "watch_count": uf.watch_count,
        "first_watched": uf.first_watched,
        "last_watched": uf.last_watched,
    })
}

fn user_film_json(uf: &user_film::Model) -> serde_json::Value {
    json!({
        "watched": uf.watched,
        "rating": uf.rating,
        "liked": uf.liked,
        "watch_count": uf.watch_count,
        "first_watched": uf.first_watched,
        "last_watched": uf.last_watched,
    })
}

fn entry_json(entry: &diary_entry::Model) -> serde_json::Value {
    json!({
        "id": entry.id,
        "letterboxd_id": entry.letterboxd_id,
        "watched_date": entry.watched_date,
        "rating": entry.rating,
        "rewatch": entry.rewatch,
        "liked": entry.liked,
    })
}

fn diary_item(entry: &diary_entry::Model, film: &film::Model) -> serde_json::Value {
    let mut item = entry_json(entry);
    item["film"] = film_summary(film);
    item
}

fn json_strings(value: &Option<serde_json::Value>) -> Vec<String> {
    value
        .as_ref()
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn top_counts(counts: HashMap<String, i64>, n: usize) -> Vec<serde_json::Value> {
    let mut pairs: Vec<_> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs.truncate(n);
    pairs.into_iter().map(|(name, count)| json!({ "name": name, "count": count })).collect()
}
