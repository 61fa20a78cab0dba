//! aqi-alert/crates/services/src/lib.rs
//!
//! The session-bound data-consistency layer: session store, authenticated requests,
//! unauthorized-access interception, resource clients and the profile aggregator.

pub mod aggregator;
pub mod client;
pub mod clients;
pub mod middleware;
pub mod request;
pub mod session;

#[cfg(test)]
mod testing;

pub use aggregator::{normalize_history, NormalizedHistory, ProfileAggregator};
pub use client::AirQualityClient;
pub use clients::{AlertHistoryClient, AuthClient, FavoritesClient, PreferencesClient, ProfileClient};
pub use middleware::{CallOptions, Gateway};
pub use request::{ApiBase, Endpoints, RequestBuilder};
pub use session::{Session, SessionStore};
