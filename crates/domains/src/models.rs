//! # Domain Models
//!
//! These structs mirror the payloads exchanged with the alerting backend.
//! Field names follow the backend's camelCase JSON.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Server-assigned identifier. The backend emits numeric ids, but string ids are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Reads an identity out of a raw JSON value. Zero, empty strings, null and
    /// non-scalar values do not count as an identity.
    pub fn from_present(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().filter(|n| *n != 0).map(RecordId::Number),
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

/// The identifier every user-scoped resource is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// Login answers with a JSON number, the session storage holds strings.
impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RecordId::deserialize(deserializer)? {
            RecordId::Number(n) => UserId(n.to_string()),
            RecordId::Text(s) => UserId(s),
        })
    }
}

/// Snapshot of the user account. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Whatever else the server sends along (embedded preferences, flags...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Notification settings. Always written back in full, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Severity level (1-5) from which alerts are sent.
    pub aqi_threshold: i32,
    pub email_notifications_enabled: bool,
    pub app_notifications_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            aqi_threshold: 3,
            email_notifications_enabled: true,
            app_notifications_enabled: true,
        }
    }
}

/// The five severity levels the backend assigns to alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Good,
    Moderate,
    Unhealthy,
    Dangerous,
    VeryDangerous,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 5] = [
        AlertLevel::Good,
        AlertLevel::Moderate,
        AlertLevel::Unhealthy,
        AlertLevel::Dangerous,
        AlertLevel::VeryDangerous,
    ];

    pub fn level(&self) -> i64 {
        match self {
            AlertLevel::Good => 1,
            AlertLevel::Moderate => 2,
            AlertLevel::Unhealthy => 3,
            AlertLevel::Dangerous => 4,
            AlertLevel::VeryDangerous => 5,
        }
    }

    /// The backend's own label, so a `LEVEL_n` name and a `{label, color}` object agree.
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Good => "Bon",
            AlertLevel::Moderate => "Modéré",
            AlertLevel::Unhealthy => "Malsain",
            AlertLevel::Dangerous => "Dangereux",
            AlertLevel::VeryDangerous => "Très Dangereux",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AlertLevel::Good => "#00e400",
            AlertLevel::Moderate => "#ffff00",
            AlertLevel::Unhealthy => "#ff7e00",
            AlertLevel::Dangerous => "#ff0000",
            AlertLevel::VeryDangerous => "#8f3f97",
        }
    }

    /// Maps an AQI index (1-5 scale) onto a level; anything at or above 5 is the top level.
    pub fn from_aqi(aqi: i64) -> Self {
        match aqi {
            i64::MIN..=1 => AlertLevel::Good,
            2 => AlertLevel::Moderate,
            3 => AlertLevel::Unhealthy,
            4 => AlertLevel::Dangerous,
            _ => AlertLevel::VeryDangerous,
        }
    }

    pub fn from_level(level: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.level() == level)
    }

    /// Parses the server's enum name, e.g. `LEVEL_3`.
    pub fn from_name(name: &str) -> Option<Self> {
        name.strip_prefix("LEVEL_")
            .and_then(|n| n.parse().ok())
            .and_then(Self::from_level)
    }

    pub fn priority(&self) -> AlertPriority {
        AlertPriority {
            label: self.label().to_string(),
            color: self.color().to_string(),
        }
    }
}

/// Display attributes of an alert's severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPriority {
    pub label: String,
    pub color: String,
}

impl AlertPriority {
    /// Accepts `{label, color}`, `{level}` or the bare enum name. Anything else is absent.
    pub fn from_raw(value: &Value) -> Option<Self> {
        match value {
            Value::Object(fields) => {
                let label = fields.get("label").and_then(Value::as_str);
                let color = fields.get("color").and_then(Value::as_str);
                match (label, color) {
                    (Some(label), Some(color)) => Some(Self {
                        label: label.to_string(),
                        color: color.to_string(),
                    }),
                    _ => fields
                        .get("level")
                        .and_then(Value::as_i64)
                        .and_then(AlertLevel::from_level)
                        .map(|l| l.priority()),
                }
            }
            Value::String(name) => AlertLevel::from_name(name).map(|l| l.priority()),
            _ => None,
        }
    }
}

/// One past alert, in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertHistoryEntry {
    pub id: RecordId,
    pub city_name: Option<String>,
    pub aqi: Option<i64>,
    pub priority: Option<AlertPriority>,
    /// ISO-8601, as sent by the server.
    pub timestamp: Option<String>,
    pub message: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AlertHistoryEntry {
    /// Maps a raw history record onto the canonical shape, dropping unknown fields.
    /// Returns `None` when the record is not an object or carries no identity.
    pub fn from_record(record: &Value) -> Option<Self> {
        let fields = record.as_object()?;
        let id = fields.get("id").and_then(RecordId::from_present)?;
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
        let float = |key: &str| fields.get(key).and_then(Value::as_f64);

        Some(Self {
            id,
            city_name: text("cityName"),
            aqi: fields.get("aqi").and_then(Value::as_i64),
            priority: fields.get("priority").and_then(AlertPriority::from_raw),
            timestamp: text("timestamp"),
            message: text("message"),
            latitude: float("latitude"),
            longitude: float("longitude"),
        })
    }

    /// RFC 3339, or the backend's zone-less `yyyy-MM-ddTHH:mm:ss` (read as UTC).
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

/// A city the user follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCity {
    pub id: RecordId,
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_aqi: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

/// Body of an add-favorite call. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Answer of the login endpoint.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("success", &self.success)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("user_id", &self.user_id)
            .field("message", &self.message)
            .finish()
    }
}

/// Generic `{message, success, userId}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Whether an optional section of the profile view reflects a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Loaded,
    /// The fetch failed; the section holds the fallback value.
    Unavailable,
}

/// The combined result of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub profile: UserProfile,
    pub preferences: Preferences,
    pub preferences_status: SectionStatus,
    pub alert_history: Vec<AlertHistoryEntry>,
    pub history_status: SectionStatus,
    /// Raw history records dropped for lacking an identity.
    pub skipped_history_records: usize,
}
