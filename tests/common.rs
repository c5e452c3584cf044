#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request};
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use starter_rpc::config::{load_config_from_str, ConfigV1};
use starter_rpc::routes::create_router;
use starter_rpc::startup::build_state;

pub const JWT_SECRET: &str = "integration-secret-with-enough-length-for-hs256";

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:0
logging:
  level: debug
  format: console
auth:
  timeout_in_ms: 1000
providers:
  - type: plain
    name: Dev tokens
    users:
      - token: dev-token
        id: dev-user
        email: dev@example.com
        role: service_role
  - type: supabase-jwt
    name: Supabase JWT
    secret: integration-secret-with-enough-length-for-hs256
"#;

pub fn load_test_config() -> ConfigV1 {
    load_config_from_str(TEST_CONFIG).expect("Failed to parse test config YAML")
}

pub async fn build_app(config: ConfigV1) -> Router {
    let state = build_state(Arc::new(config))
        .await
        .expect("failed to build state");
    create_router(state)
}

pub fn request(path: &str, method: Method) -> axum::http::request::Builder {
    Request::builder().method(method).uri(path)
}

/// Finishes a request and attaches a loopback peer address, as `serve` would.
pub fn with_peer(builder: axum::http::request::Builder) -> Request<Body> {
    let mut request = builder.body(Body::empty()).expect("failed to build request");
    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        0,
    )));
    request
}

/// A Supabase-style access token signed with [`JWT_SECRET`].
pub fn access_token(sub: &str) -> String {
    encode(
        &Header::default(),
        &json!({
            "sub": sub,
            "aud": "authenticated",
            "role": "authenticated",
            "email": format!("{}@example.com", sub),
            "exp": Utc::now().timestamp() + 600,
        }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to sign token")
}

/// The cookie Supabase's SSR helpers would set for that token.
pub fn session_cookie(name: &str, access_token: &str) -> String {
    let session = json!({
        "access_token": access_token,
        "refresh_token": "refresh",
        "token_type": "bearer",
    });
    format!("{}=base64-{}", name, URL_SAFE_NO_PAD.encode(session.to_string()))
}
