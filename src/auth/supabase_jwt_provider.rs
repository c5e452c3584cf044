use std::collections::HashMap;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::SessionProvider;
use crate::models::session_user::DEFAULT_ROLE;
use crate::models::SessionUser;
use crate::utils::value::value_to_string;

/// Verifies Supabase access tokens offline with the project's JWT secret.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct SupabaseJwtProviderConfig {
    pub name: String,
    pub secret: String,
    /// Expected `aud` claim; `null` turns the audience check off.
    #[serde(default = "default_audience")]
    pub audience: Option<String>,
}

fn default_audience() -> Option<String> {
    Some(DEFAULT_ROLE.to_string())
}

pub struct SupabaseJwtProvider {
    pub config: SupabaseJwtProviderConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Claims {
    sub: String,
    email: Option<String>,
    role: Option<String>,
    #[serde(default)]
    app_metadata: HashMap<String, Value>,
}

impl SupabaseJwtProvider {
    pub fn new(config: &SupabaseJwtProviderConfig) -> Self {
        info!("Creating Supabase JWT session provider '{}'", config.name);
        Self {
            config: config.clone(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        match &self.config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

#[async_trait::async_trait]
impl SessionProvider for SupabaseJwtProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "supabase-jwt"
    }

    async fn get_user(&self, access_token: &str) -> Result<SessionUser, String> {
        let key = DecodingKey::from_secret(self.config.secret.as_bytes());
        let decoded = decode::<Claims>(access_token, &key, &self.validation())
            .map_err(|e| format!("Failed to decode JWT: {}", e))?;
        debug!("Decoded session claims for subject '{}'", decoded.claims.sub);

        let claims = decoded.claims;
        let attributes = claims
            .app_metadata
            .into_iter()
            .map(|(k, v)| (format!("app_metadata.{}", k), value_to_string(v)))
            .collect();
        Ok(
            SessionUser::new(claims.sub, claims.email, claims.role, self.config.name.clone())
                .with_attributes(attributes),
        )
    }
}
