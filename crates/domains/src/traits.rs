//! # Core Traits (Ports)
//!
//! Adapters implement these traits so the services layer never touches storage or sockets.

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{ApiRequest, ApiResponse};

/// Process-wide string key-value storage backing the session.
///
/// Only the session store may talk to this. Operations are infallible, like browser storage.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Outbound HTTP contract.
///
/// Any status code, including 4xx/5xx, is a successful `send`; only failures to obtain a
/// response at all are errors (`ClientError::Transport`).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
