pub mod diary_entry;
pub mod film;
pub mod sync_log;
pub mod user;
pub mod user_film;
pub mod watchlist_item;
