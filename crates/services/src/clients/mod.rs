//! # Resource clients
//!
//! One client per backend resource. Every user-scoped operation takes the user id as an
//! `Option` and fails with `MissingIdentity` before touching the network when it is absent.

pub mod alert_history;
pub mod auth;
pub mod favorites;
pub mod preferences;
pub mod profile;

pub use alert_history::AlertHistoryClient;
pub use auth::AuthClient;
pub use favorites::FavoritesClient;
pub use preferences::PreferencesClient;
pub use profile::ProfileClient;

use domains::{Acknowledgement, ApiResponse, ClientError, Result, UserId};
use serde::Serialize;

/// Blank ids count as absent.
pub(crate) fn require_identity(user_id: Option<&UserId>) -> Result<&UserId> {
    user_id
        .filter(|id| !id.is_empty())
        .ok_or(ClientError::MissingIdentity)
}

pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ClientError::InvalidRequest(e.to_string()))
}

/// Reads a `{message, success, userId}` style answer. An empty body counts as a plain ack,
/// and an explicit `success: false` is a failure even on a 2xx status.
pub(crate) fn acknowledgement(response: ApiResponse, default_message: &str) -> Result<Acknowledgement> {
    let response = response.error_for_status(default_message)?;
    if response.body.trim().is_empty() {
        return Ok(Acknowledgement::default());
    }
    let ack: Acknowledgement = response.json()?;
    if ack.success == Some(false) {
        return Err(ClientError::Server {
            status: response.status,
            message: ack.message.unwrap_or_else(|| default_message.to_string()),
        });
    }
    Ok(ack)
}
