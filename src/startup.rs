//! Application startup and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::auth::SessionAuth;
use crate::config::ConfigV1;
use crate::db;
use crate::routes;
use crate::state::AppState;

/// Builds the shared state: session providers and, if configured, the
/// database pool (running migrations first when asked to).
///
/// # Errors
///
/// Fails when the database URL is invalid or migrations cannot be applied.
pub async fn build_state(config: Arc<ConfigV1>) -> Result<AppState, Box<dyn std::error::Error>> {
    let auth = Arc::new(SessionAuth::new(&config.providers, &config.auth));

    let db = match &config.database {
        Some(database) => {
            let pool = db::connect(database)?;
            if database.run_migrations {
                db::run_migrations(&pool, &database.migrations_dir).await?;
            }
            Some(pool)
        }
        None => {
            info!("No database configured");
            None
        }
    };

    Ok(AppState { config, auth, db })
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the state cannot be built, the server fails to bind
/// to the configured address, or serving fails.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone()).await?;
    let app = routes::create_router(state);

    info!("Starting server on {}", config.bind_address);
    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
