//! Health check endpoints.

use axum::extract::State;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::response::ResponseEnvelope;
use crate::state::AppState;

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseHealth {
    Disabled,
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub service: String,
    pub version: String,
    pub database: DatabaseHealth,
}

/// Always succeeds while the process is serving; the database state is
/// reported, not enforced.
async fn health_check(State(state): State<AppState>) -> ResponseEnvelope<HealthReport> {
    let database = match &state.db {
        None => DatabaseHealth::Disabled,
        Some(pool) => {
            if db::ping(pool).await {
                DatabaseHealth::Up
            } else {
                DatabaseHealth::Down
            }
        }
    };

    ResponseEnvelope::success(
        "OK",
        Some(HealthReport {
            service: state.config.logging.service_name.clone(),
            version: state.config.logging.service_version.clone(),
            database,
        }),
    )
}
