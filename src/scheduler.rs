use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::AppState;

/// Periodic full sync for the configured username, if any. The first tick
/// fires immediately; a failed run is logged and the schedule keeps going,
/// since the next run resumes from whatever the failed one committed.
pub fn spawn(state: Arc<AppState>) {
    let Some(username) = state.config.sync_username.clone() else {
        return;
    };
    let hours = state.config.sync_interval_hours.max(1);
    let period = Duration::from_secs(hours * 3600);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(username = %username, hours, "sync scheduler started");

        loop {
            ticker.tick().await;
            let engine = state.sync_engine();
            // run() logs and records its own outcome
            if let Err(err) = engine.run(&username, state.config.fetch_film_details).await {
                debug!(error = %err, "scheduled sync ended with error");
            }
        }
    });
}
