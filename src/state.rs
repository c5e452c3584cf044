//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::SessionAuth;
use crate::config::ConfigV1;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Session providers guarding protected routes.
    pub auth: Arc<SessionAuth>,
    /// Connection pool, when a database is configured.
    pub db: Option<PgPool>,
}
