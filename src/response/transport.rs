use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Errors raised while reading a response that has already arrived.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// The few things the unwrapper needs from a response: a success flag and
/// the body, as text or as JSON.
#[async_trait]
pub trait TransportResponse: Send + Sized {
    fn is_success(&self) -> bool;

    async fn text(self) -> Result<String, TransportError>;

    async fn json<T>(self) -> Result<T, TransportError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let body = self.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TransportResponse for reqwest::Response {
    fn is_success(&self) -> bool {
        self.status().is_success()
    }

    async fn text(self) -> Result<String, TransportError> {
        Ok(reqwest::Response::text(self).await?)
    }

    async fn json<T>(self) -> Result<T, TransportError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Ok(reqwest::Response::json(self).await?)
    }
}

/// Lets a router's response be unwrapped in-process, without a socket.
#[async_trait]
impl TransportResponse for axum::response::Response {
    fn is_success(&self) -> bool {
        self.status().is_success()
    }

    async fn text(self) -> Result<String, TransportError> {
        let bytes = axum::body::to_bytes(self.into_body(), usize::MAX)
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        // Lossy, matching reqwest's `text()`.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
