//! # AirQualityClient
//!
//! Wires the session store, request builder, gateway and every resource client over one
//! transport and one storage. This is what a front end holds on to.

use std::sync::Arc;

use domains::{
    Acknowledgement, FavoriteCity, HttpTransport, KeyValueStore, NewFavorite, Preferences, ProfileView,
    RecordId, Result,
};

use crate::aggregator::ProfileAggregator;
use crate::clients::{AlertHistoryClient, AuthClient, FavoritesClient, PreferencesClient, ProfileClient};
use crate::middleware::Gateway;
use crate::request::{Endpoints, RequestBuilder};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AirQualityClient {
    session: SessionStore,
    auth: AuthClient,
    profiles: ProfileClient,
    preferences: PreferencesClient,
    history: AlertHistoryClient,
    favorites: FavoritesClient,
    aggregator: ProfileAggregator,
}

impl AirQualityClient {
    pub fn new(endpoints: Endpoints, transport: Arc<dyn HttpTransport>, storage: Arc<dyn KeyValueStore>) -> Self {
        let session = SessionStore::new(storage);
        let builder = RequestBuilder::new(endpoints, session.clone());
        let gateway = Gateway::new(transport, builder, session.clone());

        Self {
            auth: AuthClient::new(gateway.clone()),
            profiles: ProfileClient::new(gateway.clone()),
            preferences: PreferencesClient::new(gateway.clone()),
            history: AlertHistoryClient::new(gateway.clone()),
            favorites: FavoritesClient::new(gateway.clone()),
            aggregator: ProfileAggregator::new(gateway),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn profiles(&self) -> &ProfileClient {
        &self.profiles
    }

    pub fn preferences(&self) -> &PreferencesClient {
        &self.preferences
    }

    pub fn alert_history(&self) -> &AlertHistoryClient {
        &self.history
    }

    pub fn favorites(&self) -> &FavoritesClient {
        &self.favorites
    }

    pub fn aggregator(&self) -> &ProfileAggregator {
        &self.aggregator
    }

    /// Aggregated view for the signed-in user.
    pub async fn load_profile_view(&self, held: Option<&Preferences>) -> Result<ProfileView> {
        let user_id = self.session.user_id();
        self.aggregator.load(user_id.as_ref(), held).await
    }

    pub async fn submit_preferences(&self, preferences: &Preferences) -> Result<ProfileView> {
        let user_id = self.session.user_id();
        self.aggregator
            .submit_preferences(user_id.as_ref(), preferences)
            .await
    }

    pub async fn list_favorites(&self) -> Result<Vec<FavoriteCity>> {
        let user_id = self.session.user_id();
        self.favorites.list_favorites(user_id.as_ref()).await
    }

    pub async fn add_favorite(&self, city: &NewFavorite) -> Result<FavoriteCity> {
        let user_id = self.session.user_id();
        self.favorites.add_favorite(user_id.as_ref(), city).await
    }

    pub async fn remove_favorite(&self, favorite_id: &RecordId) -> Result<Acknowledgement> {
        let user_id = self.session.user_id();
        self.favorites
            .remove_favorite(user_id.as_ref(), favorite_id)
            .await
    }
}
