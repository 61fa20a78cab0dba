mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use domains::{Credentials, HttpTransport};
use secrecy::ExposeSecret;
use services::{AirQualityClient, Endpoints};
use storage_adapters::MemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Transport chosen at compile time.
#[cfg(feature = "http-reqwest")]
use api_adapters::ReqwestTransport;
use configs::{LogFormat, Settings};

#[cfg(not(feature = "http-reqwest"))]
compile_error!("aqi-alert needs an HTTP transport: enable the `http-reqwest` feature");

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(Path::new(path))),
        None => Settings::load(),
    }
    .context("loading settings")?;

    init_tracing(&settings);

    let client = AirQualityClient::new(
        Endpoints::new(&settings.auth_base_url, &settings.api_base_url),
        build_transport(&settings)?,
        MemoryStore::process_wide(),
    );

    let credentials = credentials(&cli, &settings);
    if cli.command.needs_session() {
        let credentials = credentials
            .as_ref()
            .context("this command needs a username and password (flags, config file or AQI_ALERT__CREDENTIALS__*)")?;
        client.auth().login(credentials).await.context("login failed")?;
    }

    tracing::debug!(command = ?cli.command, "running command");
    let output = cli::run(&client, cli.command, credentials).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(feature = "http-reqwest")]
fn build_transport(settings: &Settings) -> anyhow::Result<Arc<dyn HttpTransport>> {
    Ok(match settings.request_timeout() {
        Some(timeout) => Arc::new(ReqwestTransport::with_timeout(timeout)?),
        None => Arc::new(ReqwestTransport::new()),
    })
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output; logs go to stderr.
    match settings.log.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Command-line flags win over configured credentials.
fn credentials(cli: &Cli, settings: &Settings) -> Option<Credentials> {
    let username = cli
        .username
        .clone()
        .or_else(|| settings.credentials.username.clone());
    let password = cli.password.clone().or_else(|| {
        settings
            .credentials
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_string())
    });

    Some(Credentials {
        username: username?,
        password: password?,
    })
}
