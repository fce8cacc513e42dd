//! Task row mapping and CRUD statements.

use super::{Database, now_ms};
use crate::types::{Task, TaskChanges};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let due_date: Option<String> = row.get("due_date")?;
    let completed: i64 = row.get("completed")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date: due_date.and_then(|s| s.parse::<NaiveDate>().ok()),
        completed: completed != 0,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Internal helper to get a task using an existing connection (avoids re-lock).
fn get_task_internal(conn: &Connection, task_id: &str) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;

    let result = stmt.query_row(params![task_id], parse_task_row);

    match result {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Insert a fully-formed task row.
    pub fn insert_task(&self, task: &Task) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (id, title, description, due_date, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    &task.id,
                    &task.title,
                    &task.description,
                    task.due_date.map(|d| d.to_string()),
                    task.completed as i64,
                    task.created_at,
                    task.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// List all tasks, newest-created first.
    ///
    /// `rowid` breaks ties between rows created within one millisecond.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM tasks ORDER BY created_at DESC, rowid DESC")?;
            let rows = stmt.query_map([], parse_task_row)?;

            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(row?);
            }
            Ok(tasks)
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// Apply normalized field changes to a task.
    ///
    /// Returns the updated row, or `None` when the id does not resolve.
    /// `updated_at` is refreshed on every call, including an empty change
    /// set, and kept strictly greater than its previous value so that rapid
    /// successive updates within one millisecond still order correctly.
    pub fn update_task(&self, task_id: &str, changes: &TaskChanges) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let Some(current) = get_task_internal(conn, task_id)? else {
                return Ok(None);
            };

            let title = changes.title.as_deref().unwrap_or(&current.title);
            let description = changes
                .description
                .as_deref()
                .unwrap_or(&current.description);
            let due_date = match changes.due_date {
                Some(new_value) => new_value,
                None => current.due_date,
            };
            let completed = changes.completed.unwrap_or(current.completed);
            let updated_at = now_ms().max(current.updated_at + 1);

            conn.execute(
                "UPDATE tasks
                 SET title = ?2, description = ?3, due_date = ?4, completed = ?5, updated_at = ?6
                 WHERE id = ?1",
                params![
                    task_id,
                    title,
                    description,
                    due_date.map(|d| d.to_string()),
                    completed as i64,
                    updated_at,
                ],
            )?;

            get_task_internal(conn, task_id)
        })
    }

    /// Delete a task by id. Returns whether a row was actually removed.
    pub fn delete_task(&self, task_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(affected > 0)
        })
    }
}
