use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub letterboxd_base_url: String,
    pub min_request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub fetch_film_details: bool,
    pub sync_username: Option<String>,
    pub sync_interval_hours: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://boxdsync.db?mode=rwc".to_string());

        let letterboxd_base_url = std::env::var("LETTERBOXD_BASE_URL")
            .unwrap_or_else(|_| "https://letterboxd.com".to_string());

        let min_request_delay_ms: u64 =
            std::env::var("MIN_REQUEST_DELAY_MS").ok().and_then(|s| s.parse().ok()).unwrap_or(4000);

        let request_timeout_secs: u64 =
            std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        let fetch_film_details = std::env::var("FETCH_FILM_DETAILS")
            .ok()
            .map(|s| s != "false" && s != "0")
            .unwrap_or(true);

        let sync_username = std::env::var("SYNC_USERNAME").ok().filter(|s| !s.is_empty());

        let sync_interval_hours: u64 =
            std::env::var("SYNC_INTERVAL_HOURS").ok().and_then(|s| s.parse().ok()).unwrap_or(24);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            letterboxd_base_url,
            min_request_delay_ms,
            request_timeout_secs,
            fetch_film_details,
            sync_username,
            sync_interval_hours,
        })
    }
}
