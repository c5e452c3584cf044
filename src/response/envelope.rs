use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Outcome tag carried by every envelope.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
}

/// The uniform wrapper applied to every API response.
///
/// `data` is `None` for failures and for operations that produce no payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseEnvelope<T> {
    pub status: ResponseStatus,
    pub message: String,
    pub data: Option<T>,
}

/// Builds an envelope from its three parts, verbatim.
pub fn create_response<T>(
    status: ResponseStatus,
    message: impl Into<String>,
    data: Option<T>,
) -> ResponseEnvelope<T> {
    ResponseEnvelope {
        status,
        message: message.into(),
        data,
    }
}

impl<T> ResponseEnvelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        create_response(ResponseStatus::Success, message, data)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        create_response(ResponseStatus::Fail, message, None)
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Envelopes always travel with a 200 so the client parses them; handlers
/// that need a transport-level failure return `HTTPError` instead.
impl<T: Serialize> IntoResponse for ResponseEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
