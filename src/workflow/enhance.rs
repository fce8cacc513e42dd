//! Client for the task-enhancement workflow webhook.

use super::{build_http_client, post_json_with_retry};
use crate::config::WebhookConfig;
use crate::error::ApiError;
use crate::types::Task;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Payload posted to the enhancement webhook.
///
/// Field names are the webhook's wire contract, hence camelCase.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhancePayload<'a> {
    todo_id: &'a str,
    current_title: &'a str,
    current_description: &'a str,
    current_due_date: Option<NaiveDate>,
    user_prompt: &'a str,
    timestamp: String,
}

/// Interpreted webhook reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhanceOutcome {
    /// The workflow returned replacement text; absent fields stay unchanged.
    Structured {
        title: Option<String>,
        description: Option<String>,
    },
    /// Any other well-formed reply: apply the local deterministic rewrite.
    Fallback,
}

/// Parse a webhook reply body into an outcome.
///
/// Only `{success: true, enhancedData: {...}}` counts as structured;
/// empty strings in the enhanced fields are treated as absent, matching
/// the workflow's "keep the original" convention.
pub fn parse_reply(value: &Value) -> EnhanceOutcome {
    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match (success, value.get("enhancedData")) {
        (true, Some(data)) => {
            let title = data
                .get("enhancedTitle")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from);
            let description = data
                .get("enhancedDescription")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from);
            EnhanceOutcome::Structured { title, description }
        }
        _ => EnhanceOutcome::Fallback,
    }
}

/// HTTP client for the enhancement workflow endpoint.
#[derive(Clone)]
pub struct EnhanceClient {
    http: reqwest::Client,
    url: String,
}

impl EnhanceClient {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config.timeout)?,
            url: config.enhance_url.clone(),
        })
    }

    /// Submit the task's current fields plus the user instruction and
    /// interpret the reply. Transport failures (including non-success
    /// statuses) surface as upstream errors.
    pub async fn request_enhancement(
        &self,
        task: &Task,
        prompt: &str,
    ) -> Result<EnhanceOutcome, ApiError> {
        let payload = EnhancePayload {
            todo_id: &task.id,
            current_title: &task.title,
            current_description: &task.description,
            current_due_date: task.due_date,
            user_prompt: prompt,
            timestamp: Utc::now().to_rfc3339(),
        };

        let response = post_json_with_retry(&self.http, &self.url, &payload).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "enhancement webhook returned an error status");
            return Err(ApiError::Upstream(format!(
                "enhancement webhook returned {status}"
            )));
        }

        let value: Value = response.json().await.map_err(|err| {
            ApiError::Upstream(format!("enhancement webhook reply was not JSON: {err}"))
        })?;

        Ok(parse_reply(&value))
    }
}
