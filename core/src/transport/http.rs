//! HTTP API Client
//!
//! `reqwest`-backed [`Api`]. Every call sends and accepts JSON, carries the
//! bearer token once one is attached, and is bounded by the configured
//! timeout.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use super::traits::{Api, ApiError, Method};
use crate::config::{ServerConfig, TransportSettings};

/// API client
pub struct HttpApi {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
    max_payload_bytes: usize,
}

impl HttpApi {
    /// Create a client for a validated server configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(server: &ServerConfig, settings: TransportSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                method: "INIT",
                endpoint: server.api_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            base_url: server.api_url.clone(),
            http,
            token: None,
            max_payload_bytes: settings.max_payload_bytes,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn request(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<Value, ApiError> {
        let transport_error = |e: reqwest::Error| ApiError::Transport {
            method: method.as_str(),
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        };

        let url = self.url(endpoint);
        let mut request = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        }
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json");

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        tracing::debug!(method = method.as_str(), %url, "API request");
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if bytes.len() > self.max_payload_bytes {
            return Err(ApiError::TooLarge {
                endpoint: endpoint.to_string(),
                size: bytes.len(),
                limit: self.max_payload_bytes,
            });
        }

        tracing::debug!(%status, size = bytes.len(), "API response");
        serde_json::from_slice(&bytes).map_err(|source| ApiError::MalformedPayload {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_url_joins_endpoint() {
        let config = ClientConfig::default();
        let api = HttpApi::new(&config.server, config.transport).unwrap();
        assert_eq!(api.url("auth/login"), "http://localhost:3000/api/auth/login");
        assert_eq!(api.url("/friends"), "http://localhost:3000/api/friends");
    }

    #[test]
    fn test_token_is_attached_and_cleared() {
        let config = ClientConfig::default();
        let mut api = HttpApi::new(&config.server, config.transport).unwrap();
        api.set_token(Some("T".to_string()));
        assert_eq!(api.token.as_deref(), Some("T"));
        api.set_token(None);
        assert!(api.token.is_none());
    }
}
