use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Postgres connection settings. Leaving the whole section out runs the
/// service without a database.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Schemas placed on each connection's `search_path`, in order.
    #[serde(default = "default_schema_filter")]
    pub schema_filter: Vec<String>,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
    #[serde(default)]
    pub run_migrations: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_schema_filter() -> Vec<String> {
    vec!["public".to_string()]
}

fn default_migrations_dir() -> String {
    "./supabase/migrations".to_string()
}

fn default_max_connections() -> u32 {
    5
}
