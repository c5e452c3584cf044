use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::envelope::{create_response, ResponseEnvelope};
use super::transport::TransportResponse;

/// Message used when a failure carries no text of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Awaits a pending API call and normalizes whatever happens into an envelope.
///
/// - a non-2xx response becomes `fail` with the raw body text as the message,
///   even when that body happens to be JSON;
/// - a 2xx response is decoded as an envelope and returned field for field;
/// - a transport error, unreadable body or malformed envelope becomes `fail`
///   with the error's text;
/// - a panic while awaiting the call becomes `fail` with
///   [`DEFAULT_ERROR_MESSAGE`].
///
/// Each call makes exactly one attempt. There is no retry and no timeout;
/// impose those on `call` before handing it over.
pub async fn parse_api_response<T, R, E, F>(call: F) -> ResponseEnvelope<T>
where
    F: Future<Output = Result<R, E>>,
    R: TransportResponse,
    E: Display,
    T: DeserializeOwned + Send + 'static,
{
    match AssertUnwindSafe(attempt::<T, R, E, F>(call))
        .catch_unwind()
        .await
    {
        Ok(Ok(envelope)) => envelope,
        Ok(Err(message)) => {
            debug!("API call failed before an envelope was read: {}", message);
            ResponseEnvelope::fail(message_or_default(message))
        }
        Err(_) => {
            warn!("API call panicked; returning a generic failure");
            ResponseEnvelope::fail(DEFAULT_ERROR_MESSAGE)
        }
    }
}

async fn attempt<T, R, E, F>(call: F) -> Result<ResponseEnvelope<T>, String>
where
    F: Future<Output = Result<R, E>>,
    R: TransportResponse,
    E: Display,
    T: DeserializeOwned + Send + 'static,
{
    let response = call.await.map_err(|e| e.to_string())?;

    if !response.is_success() {
        let body = TransportResponse::text(response)
            .await
            .map_err(|e| e.to_string())?;
        return Ok(ResponseEnvelope::fail(message_or_default(body)));
    }

    let envelope: ResponseEnvelope<T> = TransportResponse::json(response)
        .await
        .map_err(|e| e.to_string())?;
    Ok(create_response(
        envelope.status,
        envelope.message,
        envelope.data,
    ))
}

fn message_or_default(message: String) -> String {
    if message.is_empty() {
        DEFAULT_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
