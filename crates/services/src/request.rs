//! # Authenticated Request Builder
//!
//! One policy for every outbound call: JSON content type, and a bearer token when the
//! session holds one. Retry and error handling are left to the caller.

use std::sync::Arc;

use domains::{ApiRequest, Method};
use secrecy::ExposeSecret;

use crate::session::SessionStore;

/// Which backend root a path is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiBase {
    /// Account, profile, preferences and alert history (`/api/auth`).
    Auth,
    /// Everything else, e.g. favorites (`/api`).
    Service,
}

/// Base URLs of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    auth: String,
    service: String,
}

impl Endpoints {
    pub fn new(auth: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            auth: auth.into().trim_end_matches('/').to_string(),
            service: service.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, base: ApiBase, path: &str) -> String {
        let root = match base {
            ApiBase::Auth => &self.auth,
            ApiBase::Service => &self.service,
        };
        format!("{}/{}", root, path.trim_start_matches('/'))
    }
}

#[derive(Clone)]
pub struct RequestBuilder {
    endpoints: Arc<Endpoints>,
    session: SessionStore,
}

impl RequestBuilder {
    pub fn new(endpoints: Endpoints, session: SessionStore) -> Self {
        Self {
            endpoints: Arc::new(endpoints),
            session,
        }
    }

    /// Builds a request carrying the session's bearer token, if there is one.
    /// Without a token the request simply goes out unauthenticated.
    pub fn build(
        &self,
        base: ApiBase,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiRequest {
        let request = self.build_public(base, method, path, body);
        match self.session.token() {
            Some(token) => request.with_header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Same headers minus `Authorization`, for login and registration.
    pub fn build_public(
        &self,
        base: ApiBase,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiRequest {
        let request = ApiRequest::new(method, self.endpoints.url(base, path))
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json");
        match body {
            Some(body) => request.with_body(body),
            None => request,
        }
    }
}
