use sea_orm::entity::prelude::*;

/// Per-(user, film) aggregate derived from the bulk watched list and the
/// user's diary entries for that film.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub film_id: i32,
    pub watched: bool,
    pub rating: Option<f64>,
    pub liked: bool,
    pub watch_count: i32,
    pub first_watched: Option<String>,
    pub last_watched: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
