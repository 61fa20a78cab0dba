//! # api-adapters
//!
//! `HttpTransport` implementations talking to the real backend.

#[cfg(feature = "http-reqwest")]
pub mod reqwest_transport;

#[cfg(feature = "http-reqwest")]
pub use reqwest_transport::ReqwestTransport;
