//! A small typed client for the `/api` surface.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DEFAULT_BASE_URL;
use crate::response::{parse_api_response, ResponseEnvelope};

/// Sends requests to the API and unwraps every answer into an envelope.
///
/// None of the methods fail: transport and server errors come back as `fail`
/// envelopes.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    bearer: Option<String>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            http,
            bearer: None,
        }
    }

    /// Attaches `Authorization: Bearer <token>` to every request.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Full URL for a path such as `/api/health`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T>(&self, path: &str) -> ResponseEnvelope<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        parse_api_response(self.request(Method::GET, path).send()).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ResponseEnvelope<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        parse_api_response(self.request(Method::POST, path).json(body).send()).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ResponseEnvelope<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        parse_api_response(self.request(Method::PUT, path).json(body).send()).await
    }

    pub async fn delete<T>(&self, path: &str) -> ResponseEnvelope<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        parse_api_response(self.request(Method::DELETE, path).send()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseStatus;
    use mockito::{Matcher, Server};
    use serde_json::{json, Value};

    #[test]
    fn joins_paths_without_double_slash() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/api/health"), "http://localhost:3000/api/health");
        assert_eq!(ApiClient::default().url("/api"), "http://localhost:3000/api");
    }

    #[tokio::test]
    async fn sends_bearer_and_json_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/notes")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(json!({ "title": "hello" })))
            .with_status(200)
            .with_body(r#"{"status":"success","message":"created","data":{"id":7}}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).with_bearer("tok");
        let envelope: ResponseEnvelope<Value> =
            client.post("/api/notes", &json!({ "title": "hello" })).await;
        m.assert_async().await;

        assert_eq!(envelope.status, ResponseStatus::Success);
        assert_eq!(envelope.message, "created");
        assert_eq!(envelope.data, Some(json!({ "id": 7 })));
    }

    #[tokio::test]
    async fn delete_failure_comes_back_as_envelope() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/notes/7")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let envelope: ResponseEnvelope<Value> =
            ApiClient::new(server.url()).delete("/api/notes/7").await;
        assert_eq!(envelope, ResponseEnvelope::fail("forbidden"));
    }

    #[tokio::test]
    async fn put_without_payload_is_a_void_success() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/api/notes/7")
            .with_status(200)
            .with_body(r#"{"status":"success","message":"updated","data":null}"#)
            .create_async()
            .await;

        let envelope: ResponseEnvelope<Value> = ApiClient::new(server.url())
            .put("/api/notes/7", &json!({ "title": "renamed" }))
            .await;
        assert!(envelope.is_success());
        assert_eq!(envelope.data, None);
    }
}
