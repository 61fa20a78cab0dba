use clap::{Args, Parser, Subcommand};
use domains::{AlertLevel, Credentials, NewFavorite, Preferences, RecordId, Registration};
use serde_json::{json, Value};
use services::AirQualityClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Air-quality alert account client")]
pub struct Cli {
    /// Settings file; defaults to ./aqi-alert.toml when present.
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, short, global = true, env = "AQI_ALERT_USERNAME")]
    pub username: Option<String>,

    #[arg(long, short, global = true, env = "AQI_ALERT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Profile, preferences and alert history in one view.
    Profile,
    /// Replace the notification preferences and print the refreshed profile view.
    SetPreferences(PreferenceArgs),
    #[command(subcommand)]
    Favorites(FavoriteCommand),
    /// Create an account; a verification code is sent by email.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        threshold: Option<i32>,
    },
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    ResendVerification {
        #[arg(long)]
        email: String,
    },
    /// Ask the server whether the stored session is still accepted.
    Check,
    /// Print the alert level for an AQI index. Works offline.
    Level { aqi: i64 },
}

#[derive(Args, Debug)]
pub struct PreferenceArgs {
    /// Level (1-5) from which alerts are sent.
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
    pub threshold: i32,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub email_notifications: bool,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub app_notifications: bool,
}

#[derive(Subcommand, Debug)]
pub enum FavoriteCommand {
    List,
    Add {
        #[arg(long)]
        city: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    Remove { id: String },
}

impl Command {
    /// Registration, verification and the offline lookup run without logging in.
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            Command::Register { .. } | Command::Verify { .. } | Command::ResendVerification { .. } | Command::Level { .. }
        )
    }
}

pub async fn run(client: &AirQualityClient, command: Command, credentials: Option<Credentials>) -> anyhow::Result<Value> {
    let output = match command {
        Command::Profile => serde_json::to_value(client.load_profile_view(None).await?)?,
        Command::SetPreferences(args) => {
            let preferences = Preferences {
                aqi_threshold: args.threshold,
                email_notifications_enabled: args.email_notifications,
                app_notifications_enabled: args.app_notifications,
            };
            serde_json::to_value(client.submit_preferences(&preferences).await?)?
        }
        Command::Favorites(FavoriteCommand::List) => serde_json::to_value(client.list_favorites().await?)?,
        Command::Favorites(FavoriteCommand::Add { city, lat, lon }) => {
            let city = NewFavorite {
                city_name: city,
                latitude: lat,
                longitude: lon,
            };
            serde_json::to_value(client.add_favorite(&city).await?)?
        }
        Command::Favorites(FavoriteCommand::Remove { id }) => {
            serde_json::to_value(client.remove_favorite(&parse_record_id(&id)).await?)?
        }
        Command::Register { email, threshold } => {
            let Some(Credentials { username, password }) = credentials else {
                anyhow::bail!("register needs a username and password");
            };
            let registration = Registration {
                username,
                email,
                password,
                preferences: threshold.map(|aqi_threshold| Preferences {
                    aqi_threshold,
                    ..Preferences::default()
                }),
            };
            serde_json::to_value(client.auth().register(&registration).await?)?
        }
        Command::Verify { email, code } => serde_json::to_value(client.auth().verify_account(&email, &code).await?)?,
        Command::ResendVerification { email } => {
            serde_json::to_value(client.auth().resend_verification(&email).await?)?
        }
        Command::Check => {
            client.auth().check_session().await?;
            json!({ "authenticated": true })
        }
        Command::Level { aqi } => {
            let level = AlertLevel::from_aqi(aqi);
            json!({ "level": level.level(), "label": level.label(), "color": level.color() })
        }
    };
    Ok(output)
}

/// Numeric ids stay numeric on the wire.
fn parse_record_id(raw: &str) -> RecordId {
    raw.parse::<i64>()
        .map(RecordId::Number)
        .unwrap_or_else(|_| RecordId::Text(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use domains::{ApiResponse, Method, MockHttpTransport};
    use services::Endpoints;
    use storage_adapters::MemoryStore;

    fn client(transport: MockHttpTransport) -> AirQualityClient {
        AirQualityClient::new(
            Endpoints::new("http://backend/api/auth", "http://backend/api"),
            Arc::new(transport),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn offline_commands_skip_login() {
        let cli = Cli::try_parse_from(["aqi-alert", "level", "3"]).unwrap();
        assert!(!cli.command.needs_session());

        let cli = Cli::try_parse_from(["aqi-alert", "favorites", "list"]).unwrap();
        assert!(cli.command.needs_session());
    }

    #[test]
    fn threshold_outside_scale_is_rejected() {
        assert!(Cli::try_parse_from(["aqi-alert", "set-preferences", "--threshold", "9"]).is_err());
    }

    #[test]
    fn record_ids_keep_their_kind() {
        assert_eq!(parse_record_id("12"), RecordId::Number(12));
        assert_eq!(parse_record_id("fav-12"), RecordId::Text("fav-12".into()));
    }

    #[tokio::test]
    async fn register_without_credentials_sends_nothing() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();
        let command = Command::Register {
            email: "ana@example.org".into(),
            threshold: None,
        };

        let err = run(&client(transport), command, None).await.unwrap_err();
        assert!(err.to_string().contains("username and password"));
    }

    #[tokio::test]
    async fn level_is_answered_offline() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();

        let out = run(&client(transport), Command::Level { aqi: 3 }, None).await.unwrap();
        assert_eq!(out, json!({ "level": 3, "label": "Malsain", "color": "#ff7e00" }));
    }

    #[tokio::test]
    async fn verify_prints_the_acknowledgement() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .withf(|req| {
                req.method == Method::Post
                    && req.url == "http://backend/api/auth/verify"
                    && req.query_param("code") == Some("123456")
            })
            .returning(|_| Ok(ApiResponse::new(200, r#"{"success":true,"message":"Compte vérifié"}"#)));
        let command = Command::Verify {
            email: "ana@example.org".into(),
            code: "123456".into(),
        };

        let out = run(&client(transport), command, None).await.unwrap();
        assert_eq!(out, json!({ "success": true, "message": "Compte vérifié" }));
    }

    #[tokio::test]
    async fn check_without_session_fails_fast() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();

        let err = run(&client(transport), Command::Check, None).await.unwrap_err();
        assert_eq!(err.downcast_ref::<domains::ClientError>(), Some(&domains::ClientError::MissingIdentity));
    }
}
