use domains::{Method, Preferences, Result, UserId};

use super::{require_identity, to_body};
use crate::middleware::{CallOptions, Gateway};
use crate::request::ApiBase;

const UPDATE_FAILED: &str = "failed to update preferences";

#[derive(Clone)]
pub struct PreferencesClient {
    gateway: Gateway,
}

impl PreferencesClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /preferences/{userId}`
    pub async fn get_preferences(&self, user_id: Option<&UserId>) -> Result<Preferences> {
        let user_id = require_identity(user_id)?;
        self.gateway
            .call(
                ApiBase::Auth,
                Method::Get,
                &format!("/preferences/{user_id}"),
                CallOptions::default(),
            )
            .await?
            .error_for_status("failed to load preferences")?
            .json()
    }

    /// `PUT /preferences/{userId}` with the full preference set.
    ///
    /// When the server answers with a bare acknowledgement instead of the stored
    /// preferences, the submitted value is returned.
    pub async fn update_preferences(
        &self,
        user_id: Option<&UserId>,
        preferences: &Preferences,
    ) -> Result<Preferences> {
        let user_id = require_identity(user_id)?;
        let response = self
            .gateway
            .call(
                ApiBase::Auth,
                Method::Put,
                &format!("/preferences/{user_id}"),
                CallOptions::default().body(to_body(preferences)?),
            )
            .await?
            .error_for_status(UPDATE_FAILED)?;

        match response.json::<Preferences>() {
            Ok(stored) => Ok(stored),
            Err(_) => {
                tracing::debug!(user_id = %user_id, "update acknowledged without preferences body");
                Ok(*preferences)
            }
        }
    }
}
