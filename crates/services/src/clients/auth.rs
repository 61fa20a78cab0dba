//! Account operations. Login, registration and verification go out without credentials
//! and bypass the interceptor; `check_session` is a regular authenticated call.

use domains::{Acknowledgement, ClientError, Credentials, LoginResponse, Method, Registration, Result};

use super::{acknowledgement, to_body};
use crate::middleware::{CallOptions, Gateway};
use crate::request::ApiBase;

#[derive(Clone)]
pub struct AuthClient {
    gateway: Gateway,
}

impl AuthClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `POST /login`. On `{success: true}` the token and user id are stored together.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let response = self
            .gateway
            .call_public(
                ApiBase::Auth,
                Method::Post,
                "/login",
                CallOptions::default().body(to_body(credentials)?),
            )
            .await?;

        let login: LoginResponse = match response.json() {
            Ok(login) => login,
            Err(decode_err) => {
                return Err(response
                    .error_for_status("login failed")
                    .err()
                    .unwrap_or(decode_err))
            }
        };

        if !login.success {
            let message = login
                .message
                .clone()
                .unwrap_or_else(|| "invalid credentials".to_string());
            tracing::info!(username = %credentials.username, "login rejected");
            return Err(ClientError::LoginRejected(message));
        }

        let token = login.token.as_deref().filter(|t| !t.is_empty());
        match (token, login.user_id.clone()) {
            (Some(token), Some(user_id)) => {
                self.gateway.session().set_session(token, user_id.clone());
                tracing::info!(user_id = %user_id, "logged in");
                Ok(login)
            }
            _ => Err(ClientError::InvalidResponse(
                "login succeeded without both a token and a user id".to_string(),
            )),
        }
    }

    /// `POST /register`
    pub async fn register(&self, registration: &Registration) -> Result<Acknowledgement> {
        let response = self
            .gateway
            .call_public(
                ApiBase::Auth,
                Method::Post,
                "/register",
                CallOptions::default().body(to_body(registration)?),
            )
            .await?;
        acknowledgement(response, "registration failed")
    }

    /// `POST /verify?email=&code=`
    pub async fn verify_account(&self, email: &str, code: &str) -> Result<Acknowledgement> {
        let options = CallOptions::default().query("email", email).query("code", code);
        let response = self
            .gateway
            .call_public(ApiBase::Auth, Method::Post, "/verify", options)
            .await?;
        acknowledgement(response, "verification failed")
    }

    /// `POST /resend-verification?email=`
    pub async fn resend_verification(&self, email: &str) -> Result<Acknowledgement> {
        let response = self
            .gateway
            .call_public(
                ApiBase::Auth,
                Method::Post,
                "/resend-verification",
                CallOptions::default().query("email", email),
            )
            .await?;
        acknowledgement(response, "could not resend the verification code")
    }

    /// `GET /check`. A 401 here clears the session like any other authenticated call.
    pub async fn check_session(&self) -> Result<()> {
        if !self.gateway.session().is_authenticated() {
            return Err(ClientError::MissingIdentity);
        }
        self.gateway
            .call(ApiBase::Auth, Method::Get, "/check", CallOptions::default())
            .await?
            .error_for_status("session check failed")?;
        Ok(())
    }

    pub fn logout(&self) {
        self.gateway.session().clear_session();
        tracing::info!("logged out");
    }
}
