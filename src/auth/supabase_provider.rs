use std::collections::HashMap;
use std::time::Duration;

#[allow(unused_imports)]
use cached::proc_macro::cached;
use cached::Return;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::SessionProvider;
use crate::models::SessionUser;
use crate::utils::log_throttle::LogThrottle;
use crate::utils::value::value_to_string;

static CACHE_HIT_LOG: LogThrottle = LogThrottle::new(Duration::from_secs(30));

/// The config needed to ask a Supabase project who owns an access token.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct SupabaseProviderConfig {
    pub name: String,
    /// Project URL, e.g. `https://<project-ref>.supabase.co`.
    pub url: String,
    /// The project's public anon key, sent as the `apikey` header.
    pub anon_key: String,
}

/// A provider that checks sessions against the Supabase Auth `user` endpoint.
pub struct SupabaseProvider {
    pub config: SupabaseProviderConfig,
}

impl SupabaseProvider {
    pub fn new(config: &SupabaseProviderConfig) -> Self {
        info!(
            "Creating Supabase session provider '{}' for {}",
            config.name, config.url
        );
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait::async_trait]
impl SessionProvider for SupabaseProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "supabase"
    }

    async fn get_user(&self, access_token: &str) -> Result<SessionUser, String> {
        let cached_user = query(
            self.config.url.clone(),
            self.config.anon_key.clone(),
            access_token.to_string(),
            self.config.name.clone(),
        )
        .await?;
        if cached_user.was_cached {
            if let Some(suppressed_count) = CACHE_HIT_LOG.admit("auth.supabase.cache.hit") {
                debug!(
                    event_name = "auth.supabase.cache.hit",
                    event_domain = "auth",
                    provider_name = self.config.name.as_str(),
                    cache_result = "hit",
                    cache_ttl_seconds = 60,
                    suppressed_count,
                    "session check served from cache"
                );
            }
        }
        Ok((*cached_user).clone())
    }
}

/// The parts of the Supabase user object we keep.
#[derive(Deserialize, Debug)]
struct SupabaseUser {
    id: String,
    email: Option<String>,
    role: Option<String>,
    #[serde(default)]
    app_metadata: HashMap<String, Value>,
    #[serde(default)]
    user_metadata: HashMap<String, Value>,
}

impl SupabaseUser {
    fn into_session_user(self, provider: String) -> SessionUser {
        let attributes = self
            .app_metadata
            .into_iter()
            .map(|(k, v)| (format!("app_metadata.{}", k), value_to_string(v)))
            .chain(
                self.user_metadata
                    .into_iter()
                    .map(|(k, v)| (format!("user_metadata.{}", k), value_to_string(v))),
            )
            .collect();
        let email = self.email.filter(|e| !e.is_empty());
        SessionUser::new(self.id, email, self.role, provider).with_attributes(attributes)
    }
}

/// Calls `GET {url}/auth/v1/user` with the token, returning the user on success.
#[cfg_attr(
    not(test),
    cached(time = 60, result = true, with_cached_flag = true, sync_writes = true)
)]
async fn query(
    url: String,
    anon_key: String,
    token: String,
    provider: String,
) -> Result<Return<SessionUser>, String> {
    let endpoint = format!("{}/auth/v1/user", url.trim_end_matches('/'));
    debug!("Checking Supabase session at {}", endpoint);

    let response = reqwest::Client::new()
        .get(&endpoint)
        .header("apikey", anon_key)
        .bearer_auth(&token)
        .send()
        .await
        .map_err(|e| format!("Error sending request: {}", e))?;

    let status = response.status();
    if status.is_success() {
        let user: SupabaseUser = response
            .json()
            .await
            .map_err(|e| format!("Error parsing user JSON: {}", e))?;
        Ok(Return::new(user.into_session_user(provider)))
    } else if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
    {
        Err("Invalid session".to_string())
    } else {
        Err(format!("Unexpected status code: {}", status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const USER_BODY: &str = r#"{
        "id": "8d0c5b1e-0000-4000-8000-000000000001",
        "aud": "authenticated",
        "role": "authenticated",
        "email": "ada@example.com",
        "phone": "",
        "app_metadata": {"provider": "email", "providers": ["email"]},
        "user_metadata": {"full_name": "Ada"}
    }"#;

    fn provider(url: String) -> SupabaseProvider {
        SupabaseProvider::new(&SupabaseProviderConfig {
            name: "Supabase".to_string(),
            url,
            anon_key: "anon-key".to_string(),
        })
    }

    #[tokio::test]
    async fn test_supabase_provider_success() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/auth/v1/user")
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer good-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(USER_BODY)
            .create_async()
            .await;

        let user = provider(server.url()).get_user("good-token").await.unwrap();
        m.assert_async().await;

        assert_eq!(user.id, "8d0c5b1e-0000-4000-8000-000000000001");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.role, "authenticated");
        assert_eq!(user.provider, "Supabase");
        assert_eq!(
            user.attributes.get("app_metadata.provider").map(String::as_str),
            Some("email")
        );
        assert_eq!(
            user.attributes.get("user_metadata.full_name").map(String::as_str),
            Some("Ada")
        );
    }

    #[tokio::test]
    async fn test_supabase_provider_rejects_invalid_session() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/auth/v1/user")
            .match_header("authorization", Matcher::Any)
            .with_status(401)
            .with_body(r#"{"code":401,"msg":"invalid JWT"}"#)
            .create_async()
            .await;

        let result = provider(server.url()).get_user("expired").await;
        m.assert_async().await;
        assert_eq!(result.unwrap_err(), "Invalid session");
    }

    #[tokio::test]
    async fn test_supabase_provider_reports_unexpected_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/auth/v1/user")
            .with_status(502)
            .create_async()
            .await;

        let err = provider(format!("{}/", server.url()))
            .get_user("token")
            .await
            .unwrap_err();
        assert!(err.contains("502"), "unexpected error: {}", err);
    }
}
