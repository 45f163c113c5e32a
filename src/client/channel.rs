//! Request channel to the TuringDB service
//!
//! Every endpoint is `POST {host}/{endpoint}`. Queries travel as a plain text
//! body, control endpoints send an empty body, and session parameters go in
//! the query string.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, TuringError};

/// Header carrying the target instance (`Turing-Instance-Id`)
pub const INSTANCE_ID_HEADER: HeaderName = HeaderName::from_static("turing-instance-id");

/// Request body variants
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Text(String),
}

/// One request to the service
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRequest {
    pub endpoint: String,
    pub body: RequestBody,
    pub params: Vec<(String, String)>,
    /// Upper bound for this request
    pub timeout: Duration,
}

impl ChannelRequest {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            body: RequestBody::Empty,
            params: Vec::new(),
            timeout,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.body = RequestBody::Text(text.into());
        self
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Value of a query-string parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Text body, if any
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            RequestBody::Text(text) => Some(text),
            RequestBody::Empty => None,
        }
    }
}

/// Transport for requests to the service.
///
/// Implementations return the decoded JSON payload of a successful (2xx)
/// response; payload-level `error` fields are interpreted by the caller.
#[async_trait]
pub trait QueryChannel: Send + Sync {
    async fn send(&self, request: ChannelRequest) -> Result<serde_json::Value>;
}

/// reqwest-backed channel
pub struct HttpChannel {
    client: reqwest::Client,
    host: String,
}

impl HttpChannel {
    /// Build the HTTP client with the session headers baked in
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(instance_id) = config.instance_id.as_deref().filter(|s| !s.is_empty()) {
            let value = HeaderValue::from_str(instance_id)
                .map_err(|e| TuringError::Config(format!("Invalid instance id: {}", e)))?;
            headers.insert(INSTANCE_ID_HEADER, value);
        }

        if let Some(token) = config.auth_token.as_deref().filter(|s| !s.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| TuringError::Config(format!("Invalid auth token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| TuringError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.host, endpoint)
    }
}

#[async_trait]
impl QueryChannel for HttpChannel {
    async fn send(&self, request: ChannelRequest) -> Result<serde_json::Value> {
        let url = self.url(&request.endpoint);
        debug!(endpoint = %request.endpoint, timeout = ?request.timeout, "POST {}", url);

        let mut builder = self
            .client
            .post(&url)
            .query(&request.params)
            .timeout(request.timeout);

        builder = match request.body {
            RequestBody::Empty => builder.body(""),
            RequestBody::Text(text) => builder.body(text),
        };

        let response = builder.send().await?.error_for_status()?;
        let text = response.text().await?;

        Ok(serde_json::from_str(&text)?)
    }
}
