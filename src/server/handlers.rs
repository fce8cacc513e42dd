//! Request handlers for the HTTP surface.
//!
//! Each handler validates input, delegates to the task service or a
//! workflow client, and maps the result into the
//! `{success, data | error}` envelope. Failure mapping lives in
//! [`crate::error::ApiError`].

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::templates;
use crate::error::{ApiError, ApiResult};
use crate::types::{NewTask, Task, TaskPatch};

/// Success envelope for data-carrying responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    success: bool,
    message: &'static str,
    timestamp: String,
    version: &'static str,
}

/// Response for successful deletions.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    success: bool,
    message: &'static str,
}

/// Enhance response: the updated task plus a flag marking whether the
/// local fallback rewrite was applied instead of workflow output.
#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    success: bool,
    data: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    #[serde(default)]
    prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    response: String,
}

/// Root endpoint - serves the task board UI page.
pub async fn index() -> Html<&'static str> {
    Html(templates::INDEX_TEMPLATE)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "API is up",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/tasks - list all tasks, newest first.
pub async fn list_tasks(State(state): State<AppState>) -> Json<Envelope<Vec<Task>>> {
    Json(Envelope::new(state.service.list()))
}

/// POST /api/tasks - create a task.
pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Envelope<Task>>)> {
    let task = state.service.create(body)?;
    Ok((StatusCode::CREATED, Json(Envelope::new(task))))
}

/// GET /api/tasks/{id} - fetch a single task.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task = state.service.get(&id)?;
    Ok(Json(Envelope::new(task)))
}

/// PUT /api/tasks/{id} - partial update.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task = state.service.update(&id, patch)?;
    Ok(Json(Envelope::new(task)))
}

/// DELETE /api/tasks/{id} - idempotent delete.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.service.delete(&id)?;
    Ok(Json(DeleteResponse {
        success: true,
        message: "Task deleted",
    }))
}

/// POST /api/tasks/{id}/toggle - set the completion flag.
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ToggleRequest>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task = state.service.toggle(&id, body.completed)?;
    Ok(Json(Envelope::new(task)))
}

/// POST /api/tasks/{id}/enhance - run the enhancement workflow.
pub async fn enhance_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<EnhanceRequest>,
) -> ApiResult<Json<EnhanceResponse>> {
    let enhanced = state
        .service
        .enhance(&id, &body.prompt, &state.enhance)
        .await?;
    Ok(Json(EnhanceResponse {
        success: true,
        data: enhanced.task,
        fallback: enhanced.fallback.then_some(true),
    }))
}

/// POST /api/chat - relay a message to the chatbot workflow.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<Json<Envelope<ChatReply>>> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::validation("message", "must not be empty"));
    }

    let response = state.chat.send_message(message).await?;
    Ok(Json(Envelope::new(ChatReply { response })))
}
