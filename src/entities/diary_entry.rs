use sea_orm::entity::prelude::*;

/// One logged viewing. `letterboxd_id` is the stable external id; dates are
/// ISO `YYYY-MM-DD` strings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "diary_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub letterboxd_id: String,
    pub user_id: i32,
    pub film_id: i32,
    pub watched_date: Option<String>,
    pub rating: Option<f64>,
    pub rewatch: bool,
    pub liked: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
