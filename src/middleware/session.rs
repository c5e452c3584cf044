use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::auth::cookies::extract_access_token;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Lets the request through only when a session provider recognises its
/// access token. The user is left in the request extensions for the
/// `SessionUser` extractor.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let Some(token) = extract_access_token(request.headers(), state.auth.cookie_name()) else {
        debug!("No access token on request from {}", client_ip);
        return HTTPError::unauthorized().into_response();
    };

    match state.auth.authenticate(&token, &client_ip).await {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            warn!("Rejected session from {}", client_ip);
            HTTPError::unauthorized().into_response()
        }
    }
}
