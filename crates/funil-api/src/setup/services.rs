//! Application state setup

use crate::state::{AppState, DbState};
use funil_core::Config;
use sqlx::PgPool;
use std::sync::Arc;

/// Build the shared state from a connected pool
pub fn initialize_services(config: &Config, pool: PgPool) -> Arc<AppState> {
    let state = Arc::new(AppState {
        config: config.clone(),
        db: DbState::new(pool),
    });

    tracing::info!("Repositories initialized");
    state
}
