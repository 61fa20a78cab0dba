//! aqi-alert/crates/services/src/middleware.rs
//!
//! The gateway every resource client sends through. It wraps the request builder and the
//! transport, and hosts the unauthorized-access interceptor: a 401 on an authenticated call
//! clears the session once, then the failure goes back to the caller untouched.

use std::sync::Arc;

use domains::{ApiResponse, ClientError, HttpTransport, Method, Result};

use crate::request::{ApiBase, RequestBuilder};
use crate::session::SessionStore;

const UNAUTHORIZED_DEFAULT: &str = "session rejected by the server";

/// Shared plumbing for all resource clients. Cheap to clone.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn HttpTransport>,
    builder: RequestBuilder,
    session: SessionStore,
}

/// Optional parts of a call.
#[derive(Debug, Default)]
pub struct CallOptions {
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl CallOptions {
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl Gateway {
    pub fn new(transport: Arc<dyn HttpTransport>, builder: RequestBuilder, session: SessionStore) -> Self {
        Self {
            transport,
            builder,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Authenticated call guarded by the interceptor.
    ///
    /// Returns the response for any status except 401, which becomes
    /// `ClientError::Unauthorized` after the session has been cleared. No retry.
    pub async fn call(
        &self,
        base: ApiBase,
        method: Method,
        path: &str,
        options: CallOptions,
    ) -> Result<ApiResponse> {
        let mut request = self.builder.build(base, method, path, options.body);
        for (key, value) in options.query {
            request = request.with_query(key, value);
        }

        let response = self.transport.send(request).await?;
        if response.is_unauthorized() {
            self.session.clear_session();
            let message = response
                .server_message()
                .unwrap_or_else(|| UNAUTHORIZED_DEFAULT.to_string());
            tracing::warn!(method = method.as_str(), path, "401 from backend, session cleared");
            return Err(ClientError::Unauthorized(message));
        }
        Ok(response)
    }

    /// Call without credentials and without the interceptor (login, registration...).
    pub async fn call_public(
        &self,
        base: ApiBase,
        method: Method,
        path: &str,
        options: CallOptions,
    ) -> Result<ApiResponse> {
        let mut request = self.builder.build_public(base, method, path, options.body);
        for (key, value) in options.query {
            request = request.with_query(key, value);
        }
        self.transport.send(request).await
    }
}
