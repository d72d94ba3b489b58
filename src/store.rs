use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, sea_query::OnConflict,
};

use crate::{
    entities::{
        diary_entry, film,
        sync_log::{self, SyncStatus},
        user, user_film, watchlist_item,
    },
    models::{DiaryRecord, FilmDetailRecord, ProfileRecord},
};

/// The value the engine computes for one (user, film) pair before handing it
/// to the store. Loading an existing row into this shape keeps the merge and
/// derivation logic free of persistence concerns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserFilmState {
    pub watched: bool,
    pub rating: Option<f64>,
    pub liked: bool,
    pub watch_count: i32,
    pub first_watched: Option<String>,
    pub last_watched: Option<String>,
}

impl From<&user_film::Model> for UserFilmState {
    fn from(row: &user_film::Model) -> Self {
        Self {
            watched: row.watched,
            rating: row.rating,
            liked: row.liked,
            watch_count: row.watch_count,
            first_watched: row.first_watched.clone(),
            last_watched: row.last_watched.clone(),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct EntityCounts {
    pub users: u64,
    pub films: u64,
    pub diary_entries: u64,
    pub watchlist_items: u64,
}

/// CRUD facade over the mirror's entities. Everything the engine writes is
/// keyed by a natural identifier, so re-running a sync is always safe.
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

fn json_list(items: &[String]) -> Option<serde_json::Value> {
    (!items.is_empty()).then(|| serde_json::json!(items))
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn upsert_user(&self, profile: &ProfileRecord) -> Result<user::Model, DbErr> {
        let now = now_sec();
        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(&profile.username))
            .one(&self.db)
            .await?;

        match existing {
            Some(row) => {
                let mut active: user::ActiveModel = row.into();
                active.display_name = Set(profile.display_name.clone());
                active.bio = Set(profile.bio.clone());
                active.location = Set(profile.location.clone());
                active.website = Set(profile.website.clone());
                active.favorites = Set(json_list(&profile.favorites));
                active.stats = Set(Some(profile.stats.clone()));
                active.updated_at = Set(now);
                active.update(&self.db).await
            },
            None => {
                user::ActiveModel {
                    username: Set(profile.username.clone()),
                    display_name: Set(profile.display_name.clone()),
                    bio: Set(profile.bio.clone()),
                    location: Set(profile.location.clone()),
                    website: Set(profile.website.clone()),
                    favorites: Set(json_list(&profile.favorites)),
                    stats: Set(Some(profile.stats.clone())),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            },
        }
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    pub async fn first_user(&self) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find().order_by_asc(user::Column::Id).one(&self.db).await
    }

    pub async fn find_film_by_slug(&self, slug: &str) -> Result<Option<film::Model>, DbErr> {
        film::Entity::find().filter(film::Column::Slug.eq(slug)).one(&self.db).await
    }

    pub async fn find_film_by_id(&self, id: i32) -> Result<Option<film::Model>, DbErr> {
        film::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates the placeholder row for a slug if none exists. The title is
    /// set to the slug itself, which marks the film as not yet detailed.
    pub async fn create_film_if_absent(
        &self,
        slug: &str,
        year: Option<i16>,
    ) -> Result<film::Model, DbErr> {
        if let Some(existing) = self.find_film_by_slug(slug).await? {
            return Ok(existing);
        }

        let now = now_sec();
        let placeholder = film::ActiveModel {
            slug: Set(slug.to_string()),
            title: Set(slug.to_string()),
            year: Set(year.map(i32::from)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        // A concurrent run may have inserted the same slug; do_nothing plus
        // the re-read below keeps this race-free.
        film::Entity::insert(placeholder)
            .on_conflict(OnConflict::column(film::Column::Slug).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;

        self.find_film_by_slug(slug)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("film {slug} missing after insert")))
    }

    pub async fn apply_film_detail(
        &self,
        film_id: i32,
        detail: &FilmDetailRecord,
    ) -> Result<film::Model, DbErr> {
        let active = film::ActiveModel {
            id: Set(film_id),
            title: Set(detail.title.clone()),
            original_title: Set(detail.original_title.clone()),
            year: Set(detail.year.map(i32::from)),
            runtime_minutes: Set(detail.runtime_minutes),
            tagline: Set(detail.tagline.clone()),
            synopsis: Set(detail.synopsis.clone()),
            poster_url: Set(detail.poster_url.clone()),
            letterboxd_url: Set(detail.letterboxd_url.clone()),
            genres: Set(json_list(&detail.genres)),
            directors: Set(json_list(&detail.directors)),
            cast: Set(json_list(&detail.cast)),
            crew: Set(detail.crew.clone()),
            countries: Set(json_list(&detail.countries)),
            languages: Set(json_list(&detail.languages)),
            studios: Set(json_list(&detail.studios)),
            average_rating: Set(detail.average_rating),
            tmdb_id: Set(detail.tmdb_id),
            imdb_id: Set(detail.imdb_id.clone()),
            updated_at: Set(now_sec()),
            ..Default::default()
        };
        active.update(&self.db).await
    }

    pub async fn find_user_film(
        &self,
        user_id: i32,
        film_id: i32,
    ) -> Result<Option<user_film::Model>, DbErr> {
        user_film::Entity::find()
            .filter(user_film::Column::UserId.eq(user_id))
            .filter(user_film::Column::FilmId.eq(film_id))
            .one(&self.db)
            .await
    }

    /// Writes the given state for the pair, creating the row if needed.
    /// Returns true when a new row was created.
    pub async fn save_user_film(
        &self,
        user_id: i32,
        film_id: i32,
        state: &UserFilmState,
    ) -> Result<bool, DbErr> {
        let now = now_sec();
        match self.find_user_film(user_id, film_id).await? {
            Some(row) => {
                let mut active: user_film::ActiveModel = row.into();
                active.watched = Set(state.watched);
                active.rating = Set(state.rating);
                active.liked = Set(state.liked);
                active.watch_count = Set(state.watch_count);
                active.first_watched = Set(state.first_watched.clone());
                active.last_watched = Set(state.last_watched.clone());
                active.updated_at = Set(now);
                active.update(&self.db).await?;
                Ok(false)
            },
            None => {
                user_film::ActiveModel {
                    user_id: Set(user_id),
                    film_id: Set(film_id),
                    watched: Set(state.watched),
                    rating: Set(state.rating),
                    liked: Set(state.liked),
                    watch_count: Set(state.watch_count),
                    first_watched: Set(state.first_watched.clone()),
                    last_watched: Set(state.last_watched.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                Ok(true)
            },
        }
    }

    /// Upserts a diary entry by its external id. Ratings and flags can change
    /// upstream, so those are refreshed in place; the watched date is kept
    /// from the original insert. Returns true when the entry is new.
    pub async fn upsert_diary_entry(
        &self,
        user_id: i32,
        film_id: i32,
        entry: &DiaryRecord,
    ) -> Result<bool, DbErr> {
        let now = now_sec();
        let existing = diary_entry::Entity::find()
            .filter(diary_entry::Column::LetterboxdId.eq(&entry.id))
            .one(&self.db)
            .await?;

        match existing {
            Some(row) => {
                let mut active: diary_entry::ActiveModel = row.into();
                active.rating = Set(entry.rating);
                active.rewatch = Set(entry.rewatch);
                active.liked = Set(entry.liked);
                active.updated_at = Set(now);
                active.update(&self.db).await?;
                Ok(false)
            },
            None => {
                diary_entry::ActiveModel {
                    letterboxd_id: Set(entry.id.clone()),
                    user_id: Set(user_id),
                    film_id: Set(film_id),
                    watched_date: Set(entry.watched_date.map(|d| d.to_string())),
                    rating: Set(entry.rating),
                    rewatch: Set(entry.rewatch),
                    liked: Set(entry.liked),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                Ok(true)
            },
        }
    }

    pub async fn diary_entries_for(
        &self,
        user_id: i32,
        film_id: i32,
    ) -> Result<Vec<diary_entry::Model>, DbErr> {
        diary_entry::Entity::find()
            .filter(diary_entry::Column::UserId.eq(user_id))
            .filter(diary_entry::Column::FilmId.eq(film_id))
            .order_by_asc(diary_entry::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn watchlist_film_ids(&self, user_id: i32) -> Result<HashSet<i32>, DbErr> {
        Ok(watchlist_item::Entity::find()
            .filter(watchlist_item::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|item| item.film_id)
            .collect())
    }

    /// Inserts a watchlist membership; an existing row is left untouched so
    /// the added timestamp stays at its first-seen value.
    pub async fn insert_watchlist_item(&self, user_id: i32, film_id: i32) -> Result<(), DbErr> {
        let item = watchlist_item::ActiveModel {
            user_id: Set(user_id),
            film_id: Set(film_id),
            added_at: Set(now_sec()),
            ..Default::default()
        };
        watchlist_item::Entity::insert(item)
            .on_conflict(
                OnConflict::columns([
                    watchlist_item::Column::UserId,
                    watchlist_item::Column::FilmId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn start_sync_log(&self, sync_type: &str, username: &str) -> Result<i32, DbErr> {
        let log = sync_log::ActiveModel {
            sync_type: Set(sync_type.to_string()),
            username: Set(username.to_string()),
            status: Set(SyncStatus::Running),
            started_at: Set(now_sec()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(log.id)
    }

    /// Finalizes a sync log. A log that already has a completion timestamp is
    /// terminal and is never rewritten.
    pub async fn finish_sync_log(
        &self,
        log_id: i32,
        status: SyncStatus,
        items_processed: Option<i32>,
        error_message: Option<String>,
    ) -> Result<(), DbErr> {
        let Some(log) = sync_log::Entity::find_by_id(log_id).one(&self.db).await? else {
            return Ok(());
        };
        if log.completed_at.is_some() {
            return Ok(());
        }

        let mut active: sync_log::ActiveModel = log.into();
        active.status = Set(status);
        active.completed_at = Set(Some(now_sec()));
        active.items_processed = Set(items_processed);
        active.error_message = Set(error_message);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn recent_sync_logs(&self, limit: u64) -> Result<Vec<sync_log::Model>, DbErr> {
        sync_log::Entity::find()
            .order_by_desc(sync_log::Column::StartedAt)
            .order_by_desc(sync_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn counts(&self) -> Result<EntityCounts, DbErr> {
        Ok(EntityCounts {
            users: user::Entity::find().count(&self.db).await?,
            films: film::Entity::find().count(&self.db).await?,
            diary_entries: diary_entry::Entity::find().count(&self.db).await?,
            watchlist_items: watchlist_item::Entity::find().count(&self.db).await?,
        })
    }

    /// All watched films for a user, joined with their aggregate rows.
    pub async fn watched_films_with_state(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_film::Model, film::Model)>, DbErr> {
        let user_films = user_film::Entity::find()
            .filter(user_film::Column::UserId.eq(user_id))
            .filter(user_film::Column::Watched.eq(true))
            .order_by_asc(user_film::Column::Id)
            .all(&self.db)
            .await?;

        let mut films = self.films_by_ids(user_films.iter().map(|uf| uf.film_id)).await?;
        Ok(user_films
            .into_iter()
            .filter_map(|uf| films.remove(&uf.film_id).map(|film| (uf, film)))
            .collect())
    }

    pub async fn diary_with_films(
        &self,
        year: Option<i32>,
        month: Option<i32>,
    ) -> Result<Vec<(diary_entry::Model, film::Model)>, DbErr> {
        let entries = self.list_diary(year, month).await?;
        let films = self.films_by_ids(entries.iter().map(|e| e.film_id)).await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| films.get(&e.film_id).cloned().map(|film| (e, film)))
            .collect())
    }

    pub async fn watchlist_with_films(
        &self,
        user_id: i32,
    ) -> Result<Vec<(watchlist_item::Model, film::Model)>, DbErr> {
        let items = watchlist_item::Entity::find()
            .filter(watchlist_item::Column::UserId.eq(user_id))
            .order_by_desc(watchlist_item::Column::AddedAt)
            .order_by_desc(watchlist_item::Column::Id)
            .all(&self.db)
            .await?;

        let mut films = self.films_by_ids(items.iter().map(|i| i.film_id)).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| films.remove(&item.film_id).map(|film| (item, film)))
            .collect())
    }

    pub async fn watchlist_contains(&self, user_id: i32, film_id: i32) -> Result<bool, DbErr> {
        let count = watchlist_item::Entity::find()
            .filter(watchlist_item::Column::UserId.eq(user_id))
            .filter(watchlist_item::Column::FilmId.eq(film_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Diary entries newest first. Dates are ISO strings, so the optional
    /// year and year+month filters are plain string range comparisons.
    async fn list_diary(
        &self,
        year: Option<i32>,
        month: Option<i32>,
    ) -> Result<Vec<diary_entry::Model>, DbErr> {
        let mut query = diary_entry::Entity::find();
        if let Some(year) = year {
            let (lo, hi) = match month {
                Some(m @ 1..=12) => {
                    let (next_y, next_m) = if m == 12 { (year + 1, 1) } else { (year, m + 1) };
                    (format!("{year:04}-{m:02}-01"), format!("{next_y:04}-{next_m:02}-01"))
                },
                _ => (format!("{year:04}-01-01"), format!("{:04}-01-01", year + 1)),
            };
            query = query
                .filter(diary_entry::Column::WatchedDate.gte(lo))
                .filter(diary_entry::Column::WatchedDate.lt(hi));
        }
        query
            .order_by_desc(diary_entry::Column::WatchedDate)
            .order_by_desc(diary_entry::Column::Id)
            .all(&self.db)
            .await
    }

    async fn films_by_ids(
        &self,
        ids: impl IntoIterator<Item = i32>,
    ) -> Result<HashMap<i32, film::Model>, DbErr> {
        let ids: Vec<i32> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(film::Entity::find()
            .filter(film::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|film| (film.id, film))
            .collect())
    }
}
