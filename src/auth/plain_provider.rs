use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::SessionProvider;
use crate::models::SessionUser;

/// Static access tokens for local development and tests.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainProviderConfig {
    /// A friendly name for logs.
    pub name: String,
    pub users: Vec<PlainSessionEntry>,
}

/// One token and the user it stands for.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainSessionEntry {
    pub token: String,
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub struct PlainProvider {
    pub config: PlainProviderConfig,
}

impl PlainProvider {
    pub fn new(config: &PlainProviderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl SessionProvider for PlainProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "plain"
    }

    async fn get_user(&self, access_token: &str) -> Result<SessionUser, String> {
        if access_token.is_empty() {
            return Err("Empty access token".to_string());
        }

        let entry = self
            .config
            .users
            .iter()
            .find(|entry| entry.token == access_token)
            .ok_or_else(|| "Unknown access token".to_string())?;

        debug!("Plain session lookup matched user '{}'", entry.id);
        Ok(SessionUser::new(
            entry.id.clone(),
            entry.email.clone(),
            entry.role.clone(),
            self.config.name.clone(),
        ))
    }
}
