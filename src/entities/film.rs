use sea_orm::entity::prelude::*;

/// A film record keyed by its external slug. A title equal to the slug marks
/// a placeholder whose detail fetch has not yet succeeded.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub tagline: Option<String>,
    pub synopsis: Option<String>,
    pub poster_url: Option<String>,
    pub letterboxd_url: Option<String>,
    pub genres: Option<Json>,
    pub directors: Option<Json>,
    pub cast: Option<Json>,
    pub crew: Option<Json>,
    pub countries: Option<Json>,
    pub languages: Option<Json>,
    pub studios: Option<Json>,
    pub average_rating: Option<f64>,
    pub tmdb_id: Option<i32>,
    pub imdb_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Model {
    /// True once a detail fetch has populated real metadata.
    pub fn is_detailed(&self) -> bool {
        self.title != self.slug
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
