//! Shared fixtures for unit tests in this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use domains::{KeyValueStore, MockHttpTransport, UserId};

use crate::middleware::Gateway;
use crate::request::{Endpoints, RequestBuilder};
use crate::session::SessionStore;

/// Storage double backed by a HashMap. A stateful fake rather than `MockKeyValueStore`:
/// these tests read back what the session wrote instead of scripting every key.
#[derive(Default)]
pub struct MapStore(Mutex<HashMap<String, String>>);

impl KeyValueStore for MapStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).cloned()
    }
    fn set(&self, key: &str, value: &str) {
        self.0.lock().unwrap().insert(key.to_string(), value.to_string());
    }
    fn remove(&self, key: &str) {
        self.0.lock().unwrap().remove(key);
    }
}

/// Gateway over the given transport, with a logged-in session for user 5.
pub fn gateway_with(transport: MockHttpTransport) -> Gateway {
    gateway_and_session(transport).0
}

pub fn gateway_and_session(transport: MockHttpTransport) -> (Gateway, SessionStore) {
    let session = SessionStore::new(Arc::new(MapStore::default()));
    session.set_session("tok", UserId::from(5));
    let builder = RequestBuilder::new(
        Endpoints::new("http://backend/api/auth", "http://backend/api"),
        session.clone(),
    );
    (Gateway::new(Arc::new(transport), builder, session.clone()), session)
}
