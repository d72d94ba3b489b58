use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username))
                    .col(string_null(Users::DisplayName))
                    .col(string_null(Users::Bio))
                    .col(string_null(Users::Location))
                    .col(string_null(Users::Website))
                    .col(json_null(Users::Favorites))
                    .col(json_null(Users::Stats))
                    .col(big_integer(Users::CreatedAt))
                    .col(big_integer(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(pk_auto(Films::Id))
                    .col(string(Films::Slug))
                    .col(string(Films::Title))
                    .col(string_null(Films::OriginalTitle))
                    .col(integer_null(Films::Year))
                    .col(integer_null(Films::RuntimeMinutes))
                    .col(string_null(Films::Tagline))
                    .col(string_null(Films::Synopsis))
                    .col(string_null(Films::PosterUrl))
                    .col(string_null(Films::LetterboxdUrl))
                    .col(json_null(Films::Genres))
                    .col(json_null(Films::Directors))
                    .col(json_null(Films::Cast))
                    .col(json_null(Films::Crew))
                    .col(json_null(Films::Countries))
                    .col(json_null(Films::Languages))
                    .col(json_null(Films::Studios))
                    .col(double_null(Films::AverageRating))
                    .col(integer_null(Films::TmdbId))
                    .col(string_null(Films::ImdbId))
                    .col(big_integer(Films::CreatedAt))
                    .col(big_integer(Films::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_films_slug")
                    .table(Films::Table)
                    .col(Films::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiaryEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(DiaryEntries::Id))
                    .col(string(DiaryEntries::LetterboxdId))
                    .col(integer(DiaryEntries::UserId))
                    .col(integer(DiaryEntries::FilmId))
                    .col(string_null(DiaryEntries::WatchedDate))
                    .col(double_null(DiaryEntries::Rating))
                    .col(boolean(DiaryEntries::Rewatch))
                    .col(boolean(DiaryEntries::Liked))
                    .col(big_integer(DiaryEntries::CreatedAt))
                    .col(big_integer(DiaryEntries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diary_entries_letterboxd_id")
                    .table(DiaryEntries::Table)
                    .col(DiaryEntries::LetterboxdId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diary_entries_user_film")
                    .table(DiaryEntries::Table)
                    .col(DiaryEntries::UserId)
                    .col(DiaryEntries::FilmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserFilms::Table)
                    .if_not_exists()
                    .col(pk_auto(UserFilms::Id))
                    .col(integer(UserFilms::UserId))
                    .col(integer(UserFilms::FilmId))
                    .col(boolean(UserFilms::Watched))
                    .col(double_null(UserFilms::Rating))
                    .col(boolean(UserFilms::Liked))
                    .col(integer(UserFilms::WatchCount))
                    .col(string_null(UserFilms::FirstWatched))
                    .col(string_null(UserFilms::LastWatched))
                    .col(big_integer(UserFilms::CreatedAt))
                    .col(big_integer(UserFilms::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_films_unique")
                    .table(UserFilms::Table)
                    .col(UserFilms::UserId)
                    .col(UserFilms::FilmId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WatchlistItems::Table)
                    .if_not_exists()
                    .col(pk_auto(WatchlistItems::Id))
                    .col(integer(WatchlistItems::UserId))
                    .col(integer(WatchlistItems::FilmId))
                    .col(big_integer(WatchlistItems::AddedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_watchlist_items_unique")
                    .table(WatchlistItems::Table)
                    .col(WatchlistItems::UserId)
                    .col(WatchlistItems::FilmId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SyncLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(SyncLogs::Id))
                    .col(string(SyncLogs::SyncType))
                    .col(string(SyncLogs::Username))
                    .col(string(SyncLogs::Status))
                    .col(big_integer(SyncLogs::StartedAt))
                    .col(big_integer_null(SyncLogs::CompletedAt))
                    .col(integer_null(SyncLogs::ItemsProcessed))
                    .col(string_null(SyncLogs::ErrorMessage))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_logs_started_at")
                    .table(SyncLogs::Table)
                    .col(SyncLogs::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SyncLogs::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(WatchlistItems::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(UserFilms::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(DiaryEntries::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Films::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    DisplayName,
    Bio,
    Location,
    Website,
    Favorites,
    Stats,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    Slug,
    Title,
    OriginalTitle,
    Year,
    RuntimeMinutes,
    Tagline,
    Synopsis,
    PosterUrl,
    LetterboxdUrl,
    Genres,
    Directors,
    Cast,
    Crew,
    Countries,
    Languages,
    Studios,
    AverageRating,
    TmdbId,
    ImdbId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DiaryEntries {
    Table,
    Id,
    LetterboxdId,
    UserId,
    FilmId,
    WatchedDate,
    Rating,
    Rewatch,
    Liked,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserFilms {
    Table,
    Id,
    UserId,
    FilmId,
    Watched,
    Rating,
    Liked,
    WatchCount,
    FirstWatched,
    LastWatched,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WatchlistItems {
    Table,
    Id,
    UserId,
    FilmId,
    AddedAt,
}

#[derive(DeriveIden)]
enum SyncLogs {
    Table,
    Id,
    SyncType,
    Username,
    Status,
    StartedAt,
    CompletedAt,
    ItemsProcessed,
    ErrorMessage,
}
