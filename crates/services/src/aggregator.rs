//! # Profile aggregation
//!
//! Fan-out/fan-in over three independent resources:
//! - profile (mandatory: its failure fails the whole view),
//! - preferences (optional: on failure the caller's held value is kept),
//! - alert history (optional: on failure the history is empty; malformed records are dropped).
//!
//! The three fetches are issued together and all of them settle before the view is built.

use domains::{AlertHistoryEntry, Preferences, ProfileView, Result, SectionStatus, UserId};
use serde_json::Value;

use crate::clients::{require_identity, AlertHistoryClient, PreferencesClient, ProfileClient};
use crate::middleware::Gateway;

#[derive(Clone)]
pub struct ProfileAggregator {
    profiles: ProfileClient,
    preferences: PreferencesClient,
    history: AlertHistoryClient,
}

/// Result of validating a raw history payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistory {
    pub entries: Vec<AlertHistoryEntry>,
    pub skipped: usize,
}

/// Keeps records that are objects with an identity, in server order, in canonical shape.
pub fn normalize_history(records: &[Value]) -> NormalizedHistory {
    let entries: Vec<AlertHistoryEntry> = records
        .iter()
        .filter_map(AlertHistoryEntry::from_record)
        .collect();
    NormalizedHistory {
        skipped: records.len() - entries.len(),
        entries,
    }
}

impl ProfileAggregator {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            profiles: ProfileClient::new(gateway.clone()),
            preferences: PreferencesClient::new(gateway.clone()),
            history: AlertHistoryClient::new(gateway),
        }
    }

    /// Loads the combined view for `user_id`.
    ///
    /// `held` is the preferences value the caller currently shows; it survives a failed
    /// preferences fetch. `None` means the built-in default.
    pub async fn load(&self, user_id: Option<&UserId>, held: Option<&Preferences>) -> Result<ProfileView> {
        let user_id = require_identity(user_id)?;

        let (profile, preferences, history) = tokio::join!(
            self.profiles.get_profile(Some(user_id)),
            self.preferences.get_preferences(Some(user_id)),
            self.history.get_alert_history(Some(user_id)),
        );

        let profile = profile?;

        let (preferences, preferences_status) = match preferences {
            Ok(fresh) => (fresh, SectionStatus::Loaded),
            Err(err) => {
                tracing::debug!(user_id = %user_id, error = %err, "preferences unavailable, keeping held value");
                (held.copied().unwrap_or_default(), SectionStatus::Unavailable)
            }
        };

        let (history, history_status) = match history {
            Ok(records) => (normalize_history(&records), SectionStatus::Loaded),
            Err(err) => {
                tracing::debug!(user_id = %user_id, error = %err, "alert history unavailable");
                (
                    NormalizedHistory {
                        entries: Vec::new(),
                        skipped: 0,
                    },
                    SectionStatus::Unavailable,
                )
            }
        };
        if history.skipped > 0 {
            tracing::debug!(user_id = %user_id, skipped = history.skipped, "dropped alert records without id");
        }

        Ok(ProfileView {
            profile,
            preferences,
            preferences_status,
            alert_history: history.entries,
            history_status,
            skipped_history_records: history.skipped,
        })
    }

    /// Writes the preferences, then reloads the whole view so it shows server-confirmed state.
    /// A failed write is returned as-is and nothing is reloaded.
    pub async fn submit_preferences(
        &self,
        user_id: Option<&UserId>,
        preferences: &Preferences,
    ) -> Result<ProfileView> {
        let user_id = require_identity(user_id)?;
        let confirmed = self
            .preferences
            .update_preferences(Some(user_id), preferences)
            .await?;
        tracing::info!(user_id = %user_id, "preferences updated");
        self.load(Some(user_id), Some(&confirmed)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::gateway_with;
    use domains::{ApiResponse, ClientError, Method, MockHttpTransport, RecordId};
    use serde_json::json;

    const PROFILE: &str = r#"{"username":"ana","email":"ana@example.org"}"#;
    const PREFS: &str = r#"{"aqiThreshold":5,"emailNotificationsEnabled":false,"appNotificationsEnabled":false}"#;

    /// Transport answering by URL suffix.
    fn routed(profile: ApiResponse, prefs: ApiResponse, history: ApiResponse) -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().returning(move |req| {
            assert_eq!(req.method, Method::Get);
            if req.url.ends_with("/user/5") {
                Ok(profile.clone())
            } else if req.url.ends_with("/preferences/5") {
                Ok(prefs.clone())
            } else if req.url.ends_with("/alerts/history/5") {
                Ok(history.clone())
            } else {
                panic!("unexpected request to {}", req.url)
            }
        });
        transport
    }

    fn ok(body: &str) -> ApiResponse {
        ApiResponse::new(200, body)
    }

    fn failed() -> ApiResponse {
        ApiResponse::new(500, "")
    }

    #[test]
    fn normalization_keeps_order_and_drops_id_less_records() {
        let raw = vec![
            json!({"id": 1, "cityName": "Paris", "aqi": 80, "timestamp": "2024-01-01T10:00:00Z"}),
            json!({"cityName": "NoId"}),
            json!({"id": 2, "aqi": 150}),
        ];
        let normalized = normalize_history(&raw);

        assert_eq!(normalized.skipped, 1);
        let ids: Vec<_> = normalized.entries.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec![RecordId::Number(1), RecordId::Number(2)]);
        assert_eq!(normalized.entries[1].city_name, None);
    }

    #[test]
    fn normalization_skips_non_objects() {
        let raw = vec![Value::Null, json!("text"), json!([1, 2]), json!({"id": "a-1"})];
        let normalized = normalize_history(&raw);
        assert_eq!(normalized.entries.len(), 1);
        assert_eq!(normalized.skipped, 3);
    }

    #[tokio::test]
    async fn missing_identity_issues_no_request() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();

        let err = ProfileAggregator::new(gateway_with(transport))
            .load(None, None)
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::MissingIdentity);
    }

    #[tokio::test]
    async fn profile_failure_discards_successful_siblings() {
        let transport = routed(
            ApiResponse::new(404, r#"{"message":"Utilisateur introuvable"}"#),
            ok(PREFS),
            ok(r#"[{"id":1}]"#),
        );

        let err = ProfileAggregator::new(gateway_with(transport))
            .load(Some(&UserId::from(5)), None)
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::NotFound("Utilisateur introuvable".into()));
    }

    #[tokio::test]
    async fn failed_preferences_fall_back_to_default_on_first_load() {
        let transport = routed(ok(PROFILE), failed(), ok("[]"));

        let view = ProfileAggregator::new(gateway_with(transport))
            .load(Some(&UserId::from(5)), None)
            .await
            .unwrap();
        assert_eq!(view.preferences, Preferences::default());
        assert_eq!(view.preferences_status, SectionStatus::Unavailable);
        assert_eq!(view.history_status, SectionStatus::Loaded);
    }

    #[tokio::test]
    async fn failed_preferences_keep_the_held_value() {
        let transport = routed(ok(PROFILE), failed(), ok("[]"));
        let held = Preferences {
            aqi_threshold: 1,
            email_notifications_enabled: false,
            app_notifications_enabled: true,
        };

        let view = ProfileAggregator::new(gateway_with(transport))
            .load(Some(&UserId::from(5)), Some(&held))
            .await
            .unwrap();
        assert_eq!(view.preferences, held);
    }

    #[tokio::test]
    async fn failed_history_is_empty_not_an_error() {
        let transport = routed(ok(PROFILE), ok(PREFS), failed());

        let view = ProfileAggregator::new(gateway_with(transport))
            .load(Some(&UserId::from(5)), None)
            .await
            .unwrap();
        assert!(view.alert_history.is_empty());
        assert_eq!(view.history_status, SectionStatus::Unavailable);
        assert_eq!(view.preferences.aqi_threshold, 5);
        assert_eq!(view.preferences_status, SectionStatus::Loaded);
    }

    #[tokio::test]
    async fn failed_submit_does_not_reload() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .withf(|req| req.method == Method::Put)
            .returning(|_| Ok(ApiResponse::new(400, r#"{"message":"Erreur: invalid"}"#)));

        let err = ProfileAggregator::new(gateway_with(transport))
            .submit_preferences(Some(&UserId::from(5)), &Preferences::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Server {
                status: 400,
                message: "Erreur: invalid".into()
            }
        );
    }
}
