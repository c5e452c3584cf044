use std::time::Duration;

use futures::future::{select_ok, FutureExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::base::{create_session_provider, ProviderConfig, SessionProvider};
use super::cookies::default_cookie_name;
use crate::config::AuthConfig;
use crate::models::SessionUser;

/// Holds the configured session providers and the cookie they read from.
pub struct SessionAuth {
    pub providers: Vec<Box<dyn SessionProvider>>,
    timeout: Duration,
    cookie_name: String,
}

impl SessionAuth {
    pub fn new(provider_config: &[ProviderConfig], config: &AuthConfig) -> Self {
        info!("Creating session providers...");
        let providers = provider_config
            .iter()
            .map(create_session_provider)
            .collect();

        let cookie_name = config
            .cookie_name
            .clone()
            .unwrap_or_else(|| default_cookie_name(provider_config));
        debug!("Session cookie name: '{}'", cookie_name);

        SessionAuth {
            providers,
            timeout: Duration::from_millis(config.timeout_in_ms),
            cookie_name,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Asks every provider about the token at once and keeps the first
    /// answer that names a user. Each provider gets its own timeout so a
    /// slow one cannot hold the request hostage. `None` if nobody vouches.
    pub async fn authenticate(&self, access_token: &str, ip: &str) -> Option<SessionUser> {
        if self.providers.is_empty() {
            warn!("No session providers configured; rejecting request from {}", ip);
            return None;
        }

        debug!(
            "Checking session with {} provider(s) from IP='{}'",
            self.providers.len(),
            ip
        );

        let timeout_duration = self.timeout;
        let futures = self
            .providers
            .iter()
            .map(|provider| {
                let name = provider.get_name().to_owned();
                async move {
                    match timeout(timeout_duration, provider.get_user(access_token)).await {
                        Ok(Ok(user)) => Ok((name, user)),
                        Ok(Err(e)) => Err(format!("Provider '{}' failed: {}", name, e)),
                        Err(_) => Err(format!("Provider '{}' timed out", name)),
                    }
                }
                .boxed()
            })
            .collect::<Vec<_>>();

        match select_ok(futures).await {
            Ok(((provider_name, user), _remaining)) => {
                info!(
                    "Provider '{}' accepted session for user '{}'",
                    provider_name, user.id
                );
                Some(user)
            }
            Err(e) => {
                warn!("All providers rejected the session; last error: {}", e);
                None
            }
        }
    }
}
