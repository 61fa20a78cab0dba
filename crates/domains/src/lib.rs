//! aqi-alert/crates/domains/src/lib.rs
//!
//! Data model, error taxonomy and port traits for the air-quality alert client.
//! Nothing in here performs I/O; adapters implement the ports.

pub mod error;
pub mod http;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use http::*;
pub use models::*;
pub use traits::*;
