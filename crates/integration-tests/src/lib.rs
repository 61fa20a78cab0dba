//! Shared fixtures for the scenario tests: a scripted transport that records every request
//! and a store wrapper that counts how often the session was wiped.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domains::{ApiRequest, ApiResponse, ClientError, HttpTransport, KeyValueStore, Method, Result};
use services::{AirQualityClient, Endpoints};
use storage_adapters::MemoryStore;

pub const AUTH_BASE: &str = "http://backend.test/api/auth";
pub const API_BASE: &str = "http://backend.test/api";

pub fn api(path: &str) -> String {
    format!("{API_BASE}{path}")
}

pub fn auth(path: &str) -> String {
    format!("{AUTH_BASE}{path}")
}

/// Answers by `(method, url)`. Each route replays its queued responses in order and keeps
/// repeating the last one. Unscripted calls fail with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, url: impl AsRef<str>, status: u16, body: impl Into<String>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(route_key(method, url.as_ref()))
            .or_default()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: impl AsRef<str>) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url == url.as_ref())
            .count()
    }
}

fn route_key(method: Method, url: &str) -> String {
    format!("{} {}", method.as_str(), url)
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.sent.lock().unwrap().push(request.clone());

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&route_key(request.method, &request.url))
            .ok_or_else(|| ClientError::Transport(format!("no scripted response for {} {}", request.method.as_str(), request.url)))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| ClientError::Transport("empty route".into()))
    }
}

/// `MemoryStore` that counts removals of the token key, i.e. session clears.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    clears: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) {
        if key == "token" {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.remove(key)
    }
}

pub fn client_with(transport: Arc<ScriptedTransport>, store: Arc<dyn KeyValueStore>) -> AirQualityClient {
    AirQualityClient::new(Endpoints::new(AUTH_BASE, API_BASE), transport, store)
}

/// Scripts a successful login for user 7 and returns its body.
pub fn script_login(transport: &ScriptedTransport) -> &'static str {
    let body = r#"{"success":true,"token":"jwt-7","userId":7,"message":"Connexion réussie"}"#;
    transport.on(Method::Post, auth("/login"), 200, body);
    body
}
