use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::database::DatabaseConfig;
use super::logging::LoggingConfig;
use crate::auth::ProviderConfig;

/// Environment variable naming the YAML file to load.
pub const CONFIG_PATH_ENV: &str = "STARTER_CONFIG";
/// Prefix for environment overrides, e.g. `STARTER_AUTH__TIMEOUT_IN_MS=500`.
pub const ENV_PREFIX: &str = "STARTER_";

const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    /// Public origin of the web front end; the only origin CORS lets through.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Settings for the session check run in front of protected routes.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
    /// Name of the session cookie. Derived from the Supabase project when unset.
    #[serde(default)]
    pub cookie_name: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            timeout_in_ms: default_timeout_in_ms(),
            cookie_name: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_in_ms() -> u64 {
    3000
}

/// Load config from the YAML file named by `STARTER_CONFIG` (default
/// `./config.yaml`), with `STARTER_`-prefixed environment overrides on top.
pub fn load_config() -> Result<ConfigV1, figment::Error> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let figment = Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    extract(figment)
}

/// Parse a config document held in memory. No environment overrides apply.
pub fn load_config_from_str(yaml: &str) -> Result<ConfigV1, figment::Error> {
    extract(Figment::new().merge(Yaml::string(yaml)))
}

fn extract(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// The JSON schema for the configuration, pretty-printed.
pub fn schema_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(Config))
}
