use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::plain_provider::{PlainProvider, PlainProviderConfig};
use super::supabase_jwt_provider::{SupabaseJwtProvider, SupabaseJwtProviderConfig};
use super::supabase_provider::{SupabaseProvider, SupabaseProviderConfig};
use crate::models::SessionUser;

/// Configuration options for each session provider.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "supabase")]
    Supabase(SupabaseProviderConfig),
    #[serde(rename = "supabase-jwt")]
    SupabaseJwt(SupabaseJwtProviderConfig),
    #[serde(rename = "plain")]
    Plain(PlainProviderConfig),
}

/// A session provider turns an access token into the user it belongs to.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_type(&self) -> &str;
    async fn get_user(&self, access_token: &str) -> Result<SessionUser, String>;
}

/// Create a session provider from a given config.
pub fn create_session_provider(config: &ProviderConfig) -> Box<dyn SessionProvider> {
    match config {
        ProviderConfig::Supabase(cfg) => Box::new(SupabaseProvider::new(cfg)),
        ProviderConfig::SupabaseJwt(cfg) => Box::new(SupabaseJwtProvider::new(cfg)),
        ProviderConfig::Plain(cfg) => Box::new(PlainProvider::new(cfg)),
    }
}
