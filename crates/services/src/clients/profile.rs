use domains::{Method, Result, UserId, UserProfile};

use super::require_identity;
use crate::middleware::{CallOptions, Gateway};
use crate::request::ApiBase;

#[derive(Clone)]
pub struct ProfileClient {
    gateway: Gateway,
}

impl ProfileClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /user/{userId}`
    pub async fn get_profile(&self, user_id: Option<&UserId>) -> Result<UserProfile> {
        let user_id = require_identity(user_id)?;
        self.gateway
            .call(
                ApiBase::Auth,
                Method::Get,
                &format!("/user/{user_id}"),
                CallOptions::default(),
            )
            .await?
            .error_for_status("failed to load profile")?
            .json()
    }
}
