//! Routes that require a signed-in user.

use axum::middleware::from_fn_with_state;
use axum::{routing::get, Router};

use crate::middleware::require_session;
use crate::models::SessionUser;
use crate::response::ResponseEnvelope;
use crate::state::AppState;

/// Registers the session routes behind `require_session`.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/session", get(current_session))
        .route_layer(from_fn_with_state(state, require_session))
}

/// Returns the user the session belongs to.
async fn current_session(user: SessionUser) -> ResponseEnvelope<SessionUser> {
    ResponseEnvelope::success("Authenticated", Some(user))
}
