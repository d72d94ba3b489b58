use std::{sync::Arc, time::Duration};

use boxdsync::{AppState, app, config::Config, db, scheduler, store::Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,boxdsync=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = wreq::Client::builder()
        .user_agent("boxdsync/0.1")
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = Store::new(db);

    let addr = config.addr;
    let state = Arc::new(AppState { config, store, http });

    scheduler::spawn(state.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
