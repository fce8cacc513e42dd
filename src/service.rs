//! Task lifecycle service.
//!
//! Single source of truth for task operations: validation and
//! normalization live here, the store adapter only maps rows, and the
//! enhancement workflow is orchestrated here so the HTTP layer stays a
//! thin status-code mapping.

use crate::db::{Database, now_ms};
use crate::error::{ApiError, ApiResult};
use crate::types::{NewTask, Task, TaskChanges, TaskPatch};
use crate::workflow::enhance::{EnhanceClient, EnhanceOutcome};
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of an enhancement run: the updated task plus whether the
/// deterministic local fallback was applied instead of workflow output.
#[derive(Debug, Clone)]
pub struct EnhancedTask {
    pub task: Task,
    pub fallback: bool,
}

/// Service facade over the task store.
pub struct TaskService {
    db: Database,
}

impl TaskService {
    /// Create a service using the provided database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List all tasks, newest-created first.
    ///
    /// Store read failures degrade to an empty list instead of an error;
    /// the cause is logged at the boundary.
    pub fn list(&self) -> Vec<Task> {
        match self.db.list_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "task list query failed, returning empty list");
                Vec::new()
            }
        }
    }

    /// Get a single task by id.
    pub fn get(&self, task_id: &str) -> ApiResult<Task> {
        self.db
            .get_task(task_id)?
            .ok_or_else(|| ApiError::task_not_found(task_id))
    }

    /// Create a new task from a validated request.
    pub fn create(&self, input: NewTask) -> ApiResult<Task> {
        let title = input.title.as_deref().unwrap_or("").trim();
        if title.is_empty() {
            return Err(ApiError::validation("title", "must not be empty"));
        }

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .to_string();

        let now = now_ms();
        let task = Task {
            id: Uuid::now_v7().to_string(),
            title: title.to_string(),
            description,
            due_date: input.due_date,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_task(&task)?;
        Ok(task)
    }

    /// Apply a partial update. Only fields present in the patch change;
    /// an empty patch still refreshes `updated_at`.
    pub fn update(&self, task_id: &str, patch: TaskPatch) -> ApiResult<Task> {
        let changes = normalize_patch(patch)?;
        self.db
            .update_task(task_id, &changes)?
            .ok_or_else(|| ApiError::task_not_found(task_id))
    }

    /// Set the completion flag.
    pub fn toggle(&self, task_id: &str, completed: bool) -> ApiResult<Task> {
        let changes = TaskChanges {
            completed: Some(completed),
            ..TaskChanges::default()
        };
        self.db
            .update_task(task_id, &changes)?
            .ok_or_else(|| ApiError::task_not_found(task_id))
    }

    /// Delete a task. Idempotent: deleting an absent id succeeds, the
    /// contract is only that the id does not resolve afterwards.
    pub fn delete(&self, task_id: &str) -> ApiResult<()> {
        let removed = self.db.delete_task(task_id)?;
        if !removed {
            debug!(task_id = %task_id, "delete of absent task treated as success");
        }
        Ok(())
    }

    /// Run the enhancement workflow for a task.
    ///
    /// Resolves the current task, submits it with the user instruction to
    /// the workflow endpoint, and applies either the structured reply or
    /// the deterministic local fallback. Transport failures surface as
    /// upstream errors and leave the task unmodified.
    pub async fn enhance(
        &self,
        task_id: &str,
        prompt: &str,
        client: &EnhanceClient,
    ) -> ApiResult<EnhancedTask> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ApiError::validation("prompt", "must not be empty"));
        }

        let task = self.get(task_id)?;
        let outcome = client.request_enhancement(&task, prompt).await?;
        let (title, description, fallback) = apply_enhancement(&task, &outcome, prompt);

        let changes = TaskChanges {
            title: Some(title),
            description: Some(description),
            ..TaskChanges::default()
        };
        let task = self
            .db
            .update_task(task_id, &changes)?
            .ok_or_else(|| ApiError::task_not_found(task_id))?;

        Ok(EnhancedTask { task, fallback })
    }
}

/// Validate and trim a wire-level patch into normalized store changes.
fn normalize_patch(patch: TaskPatch) -> ApiResult<TaskChanges> {
    let title = match patch.title {
        Some(inner) => {
            let trimmed = inner.as_deref().unwrap_or("").trim().to_string();
            if trimmed.is_empty() {
                return Err(ApiError::validation("title", "must not be empty"));
            }
            Some(trimmed)
        }
        None => None,
    };

    let description = patch
        .description
        .map(|inner| inner.as_deref().unwrap_or("").trim().to_string());

    Ok(TaskChanges {
        title,
        description,
        due_date: patch.due_date,
        completed: patch.completed,
    })
}

/// Compute the replacement title and description for an enhancement
/// outcome. Structured replies replace only the fields the workflow
/// provided; everything else gets the deterministic fallback rewrite.
fn apply_enhancement(task: &Task, outcome: &EnhanceOutcome, prompt: &str) -> (String, String, bool) {
    match outcome {
        EnhanceOutcome::Structured { title, description } => (
            title.clone().unwrap_or_else(|| task.title.clone()),
            description.clone().unwrap_or_else(|| task.description.clone()),
            false,
        ),
        EnhanceOutcome::Fallback => (
            format!("{} (Enhanced)", task.title),
            format!(
                "{}\n\n\u{1f4a1} Suggested improvements: {}",
                task.description, prompt
            ),
            true,
        ),
    }
}
