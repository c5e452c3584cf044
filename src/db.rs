//! Postgres pool setup.

use std::path::Path;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use tracing::info;

use crate::config::DatabaseConfig;

/// Builds a pool that connects on first use. Every new connection gets
/// `search_path` set to the configured schemas.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5));

    if let Some(statement) = search_path_statement(&config.schema_filter) {
        options = options.after_connect(move |conn, _meta| {
            let statement = statement.clone();
            Box::pin(async move {
                conn.execute(statement.as_str()).await?;
                Ok(())
            })
        });
    }

    options.connect_lazy(&config.url)
}

fn search_path_statement(schemas: &[String]) -> Option<String> {
    if schemas.is_empty() {
        return None;
    }
    let quoted: Vec<String> = schemas
        .iter()
        .map(|schema| format!("\"{}\"", schema.replace('"', "\"\"")))
        .collect();
    Some(format!("SET search_path TO {}", quoted.join(", ")))
}

/// Applies the SQL migrations found in `dir`.
pub async fn run_migrations(pool: &PgPool, dir: &str) -> Result<(), MigrateError> {
    let migrator = Migrator::new(Path::new(dir)).await?;
    info!("Applying {} migration(s) from {}", migrator.iter().count(), dir);
    migrator.run(pool).await
}

/// True when the database answers a trivial query.
pub async fn ping(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
