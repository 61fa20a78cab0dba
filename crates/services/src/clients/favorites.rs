use domains::{Acknowledgement, FavoriteCity, Method, NewFavorite, RecordId, Result, UserId};

use super::{acknowledgement, require_identity, to_body};
use crate::middleware::{CallOptions, Gateway};
use crate::request::ApiBase;

/// Favorite cities, served under the service base with the user id as a query parameter.
#[derive(Clone)]
pub struct FavoritesClient {
    gateway: Gateway,
}

impl FavoritesClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /favorites?userId=`
    pub async fn list_favorites(&self, user_id: Option<&UserId>) -> Result<Vec<FavoriteCity>> {
        let user_id = require_identity(user_id)?;
        self.gateway
            .call(
                ApiBase::Service,
                Method::Get,
                "/favorites",
                CallOptions::default().query("userId", user_id.as_str()),
            )
            .await
            .and_then(|r| r.error_for_status("failed to load favorites"))
            .and_then(|r| r.json())
            .inspect_err(|e| tracing::debug!(user_id = %user_id, error = %e, "listing favorites failed"))
    }

    /// `POST /favorites?userId=`
    pub async fn add_favorite(&self, user_id: Option<&UserId>, city: &NewFavorite) -> Result<FavoriteCity> {
        let user_id = require_identity(user_id)?;
        let options = CallOptions::default()
            .query("userId", user_id.as_str())
            .body(to_body(city)?);
        self.gateway
            .call(ApiBase::Service, Method::Post, "/favorites", options)
            .await
            .and_then(|r| r.error_for_status("failed to add favorite"))
            .and_then(|r| r.json())
            .inspect_err(|e| tracing::debug!(user_id = %user_id, city = %city.city_name, error = %e, "adding favorite failed"))
    }

    /// `DELETE /favorites/{id}?userId=`
    pub async fn remove_favorite(
        &self,
        user_id: Option<&UserId>,
        favorite_id: &RecordId,
    ) -> Result<Acknowledgement> {
        let user_id = require_identity(user_id)?;
        self.gateway
            .call(
                ApiBase::Service,
                Method::Delete,
                &format!("/favorites/{favorite_id}"),
                CallOptions::default().query("userId", user_id.as_str()),
            )
            .await
            .and_then(|r| acknowledgement(r, "failed to remove favorite"))
            .inspect_err(|e| tracing::debug!(user_id = %user_id, favorite_id = %favorite_id, error = %e, "removing favorite failed"))
    }
}
