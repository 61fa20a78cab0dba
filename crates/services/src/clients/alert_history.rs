use domains::{ClientError, Method, Result, UserId};
use serde_json::Value;

use super::require_identity;
use crate::middleware::{CallOptions, Gateway};
use crate::request::ApiBase;

#[derive(Clone)]
pub struct AlertHistoryClient {
    gateway: Gateway,
}

impl AlertHistoryClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /alerts/history/{userId}`
    ///
    /// Returns the records untouched, malformed ones included. Normalization is the
    /// aggregator's job. A body that is not a JSON list is an `InvalidResponse`.
    pub async fn get_alert_history(&self, user_id: Option<&UserId>) -> Result<Vec<Value>> {
        let user_id = require_identity(user_id)?;
        let body: Value = self
            .gateway
            .call(
                ApiBase::Auth,
                Method::Get,
                &format!("/alerts/history/{user_id}"),
                CallOptions::default(),
            )
            .await?
            .error_for_status("failed to load alert history")?
            .json()?;

        match body {
            Value::Array(records) => Ok(records),
            other => Err(ClientError::InvalidResponse(format!(
                "alert history is not a list: {}",
                kind_of(&other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
