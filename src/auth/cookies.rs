//! Finding the access token on an incoming request.
//!
//! Supabase's SSR helpers keep the session in a cookie named
//! `sb-<project-ref>-auth-token`. Large sessions are split across
//! `name.0`, `name.1`, ... and newer versions store the JSON session as
//! `base64-<base64url>`.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;
use tracing::debug;

use super::ProviderConfig;

pub const FALLBACK_COOKIE_NAME: &str = "sb-auth-token";

/// The cookie Supabase would use for the first configured project, or
/// [`FALLBACK_COOKIE_NAME`] when no Supabase project is configured.
pub fn default_cookie_name(providers: &[ProviderConfig]) -> String {
    providers
        .iter()
        .find_map(|provider| match provider {
            ProviderConfig::Supabase(cfg) => project_ref(&cfg.url),
            _ => None,
        })
        .map(|project| format!("sb-{}-auth-token", project))
        .unwrap_or_else(|| FALLBACK_COOKIE_NAME.to_string())
}

fn project_ref(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    host.split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

/// Splits every `Cookie` header into name/value pairs, skipping nameless ones.
pub fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// The session cookie's value, reassembled from chunks if needed.
pub fn session_cookie_value(cookies: &[(String, String)], name: &str) -> Option<String> {
    let lookup = |wanted: &str| {
        cookies
            .iter()
            .find(|(n, _)| n == wanted)
            .map(|(_, v)| v.as_str())
    };

    if let Some(value) = lookup(name) {
        return Some(value.to_string());
    }

    let mut joined = String::new();
    let mut index = 0;
    while let Some(chunk) = lookup(&format!("{}.{}", name, index)) {
        joined.push_str(chunk);
        index += 1;
    }
    if index == 0 {
        None
    } else {
        Some(joined)
    }
}

/// Pulls the access token out of a session cookie value.
pub fn access_token_from_cookie(value: &str) -> Option<String> {
    let decoded = match value.strip_prefix("base64-") {
        Some(encoded) => {
            let bytes = URL_SAFE_NO_PAD
                .decode(encoded.trim_end_matches('='))
                .map_err(|e| debug!("Session cookie is not valid base64url: {}", e))
                .ok()?;
            String::from_utf8(bytes).ok()?
        }
        None => value.to_string(),
    };

    match serde_json::from_str::<Value>(&decoded) {
        Ok(Value::Object(session)) => session
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string),
        // Older helpers stored `[access_token, refresh_token, ...]`.
        Ok(Value::Array(items)) => items.first().and_then(Value::as_str).map(str::to_string),
        _ if looks_like_jwt(&decoded) => Some(decoded),
        _ => None,
    }
}

fn looks_like_jwt(value: &str) -> bool {
    value.split('.').count() == 3 && !value.chars().any(char::is_whitespace)
}

/// Bearer header first, then the session cookie.
pub fn extract_access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    let cookies = parse_cookies(headers);
    let value = session_cookie_value(&cookies, cookie_name)?;
    access_token_from_cookie(&value)
}
