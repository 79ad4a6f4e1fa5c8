//! HTTP transport for the fitness service API.

pub mod events;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use fitsync_core::auth::{bearer_header, is_token_expired, TokenStore};
use fitsync_core::remote::{status_to_remote_error, Endpoint, Method, RemoteClient, RemoteError};

/// [`RemoteClient`] over HTTP with `reqwest`.
///
/// When a token store is attached, every request carries the stored access
/// token as a bearer header unless it has expired.
#[derive(Clone)]
pub struct HttpRemoteClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl HttpRemoteClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            tokens: None,
        }
    }

    /// Create from environment (FITSYNC_API_URL or default).
    pub fn from_env() -> Self {
        let base_url = std::env::var("FITSYNC_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());
        Self::new(base_url)
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint path; query parameters are added by the
    /// request builder.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Starts a request for `endpoint` with the bearer header attached.
    async fn builder(&self, endpoint: &Endpoint) -> reqwest::RequestBuilder {
        let url = self.url(&endpoint.path);
        let builder = match endpoint.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = if endpoint.query.is_empty() {
            builder
        } else {
            builder.query(&endpoint.query)
        };

        match self.authorization().await {
            Some(header) => builder.header(reqwest::header::AUTHORIZATION, header),
            None => builder,
        }
    }

    async fn authorization(&self) -> Option<String> {
        let store = self.tokens.as_ref()?;
        match store.load().await {
            Ok(Some(tokens)) if !is_token_expired(&tokens, Utc::now()) => {
                Some(bearer_header(&tokens.access_token))
            }
            Ok(Some(_)) => {
                tracing::debug!("Stored access token expired, sending request unauthenticated");
                None
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "Could not read stored tokens");
                None
            }
        }
    }

    /// Opens a streaming GET, used by the realtime channel.
    pub(crate) async fn open_stream(&self, endpoint: &Endpoint) -> crate::Result<reqwest::Response> {
        let response = self
            .builder(endpoint)
            .await
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(crate::ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

/// Decodes a success body. An empty body is `null`.
fn parse_body(endpoint: &Endpoint, text: &str) -> Result<Value, RemoteError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| RemoteError::Decode(format!("{endpoint}: {e}")))
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn request(&self, endpoint: &Endpoint, body: Option<Value>) -> Result<Value, RemoteError> {
        let builder = self.builder(endpoint).await;
        let builder = match &body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if status.is_success() {
            tracing::trace!(endpoint = %endpoint, status = status.as_u16(), "Request succeeded");
            parse_body(endpoint, &text)
        } else {
            let error = status_to_remote_error(status.as_u16(), &text);
            tracing::debug!(endpoint = %endpoint, status = status.as_u16(), error = %error, "Request failed");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let client = HttpRemoteClient::new("http://localhost:8080/api/");
        assert_eq!(client.url("/classes"), "http://localhost:8080/api/classes");
        assert_eq!(client.base_url(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_parse_body_empty_is_null() {
        let endpoint = Endpoint::delete("/bookings/b1");
        assert_eq!(parse_body(&endpoint, "").unwrap(), Value::Null);
        assert_eq!(parse_body(&endpoint, "  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_body_reports_endpoint() {
        let endpoint = Endpoint::get("/classes");
        let err = parse_body(&endpoint, "<html>").unwrap_err();
        match err {
            RemoteError::Decode(message) => assert!(message.starts_with("GET /classes: ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = HttpRemoteClient::new("http://127.0.0.1:9");
        let err = client
            .request(&Endpoint::get("/classes"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
