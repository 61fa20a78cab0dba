//! `HttpTransport` over [`reqwest`].
//!
//! Every status code is handed back as an `ApiResponse`; only failures to get a response
//! at all (connect, TLS, timeout, unreadable body) become `ClientError::Transport`.

use std::time::Duration;

use async_trait::async_trait;
use domains::{ApiRequest, ApiResponse, ClientError, HttpTransport, Method, Result};

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with reqwest's defaults (no request timeout).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing [`reqwest::Client`] (connection pool, proxies, TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    fn to_reqwest(&self, request: &ApiRequest) -> Result<reqwest::Request> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
            builder = builder.body(bytes);
        }
        builder
            .build()
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let outbound = self.to_reqwest(&request)?;
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let response = self
            .client
            .execute(outbound)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        tracing::debug!(status, url = %request.url, "response received");
        Ok(ApiResponse::new(status, body))
    }
}
