//! Chat relay: forwards free-text messages to the chatbot webhook.

use super::{build_http_client, post_json_with_retry};
use crate::config::WebhookConfig;
use crate::error::ApiError;
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// Fixed reply used when the webhook body matches none of the known shapes.
pub const CHAT_FALLBACK_REPLY: &str = "Response received from chatbot";

/// Payload posted to the chatbot webhook (camelCase wire contract).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatPayload<'a> {
    message: &'a str,
    timestamp: String,
    session_id: String,
}

/// Normalize a chatbot reply body to a single text field.
///
/// The workflow has emitted several shapes over time; they are matched in
/// priority order: nested `output.answer`, top-level `answers`, top-level
/// `response`, a bare JSON string, and finally the fixed placeholder.
pub fn extract_reply(value: &Value) -> String {
    if let Some(answer) = value.pointer("/output/answer").and_then(Value::as_str) {
        return answer.to_string();
    }
    if let Some(answers) = value.get("answers").and_then(Value::as_str) {
        return answers.to_string();
    }
    if let Some(response) = value.get("response").and_then(Value::as_str) {
        return response.to_string();
    }
    if let Some(text) = value.as_str() {
        return text.to_string();
    }
    CHAT_FALLBACK_REPLY.to_string()
}

/// HTTP client for the chatbot workflow endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    url: String,
}

impl ChatClient {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config.timeout)?,
            url: config.chat_url.clone(),
        })
    }

    /// Relay a message and return the normalized reply text.
    ///
    /// Only transport failures (non-success status, network error) produce
    /// an error; any reply body, however malformed, yields text.
    pub async fn send_message(&self, message: &str) -> Result<String, ApiError> {
        let payload = ChatPayload {
            message,
            timestamp: Utc::now().to_rfc3339(),
            session_id: format!("user-session-{}", Uuid::now_v7()),
        };

        let response = post_json_with_retry(&self.http, &self.url, &payload).await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "chatbot webhook returned an error status");
            return Err(ApiError::Upstream(format!(
                "chatbot webhook returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Upstream(format!("failed to read chatbot reply: {err}")))?;

        Ok(match serde_json::from_str::<Value>(&body) {
            Ok(value) => extract_reply(&value),
            Err(_) => CHAT_FALLBACK_REPLY.to_string(),
        })
    }
}
