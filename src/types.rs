//! Core types for the Taskdeck server.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Request body for task creation.
///
/// All fields are optional at the wire level; the service rejects a missing
/// or whitespace-only title so the client gets the envelope error rather
/// than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Request body for a partial task update.
///
/// Distinguishes "field absent" (outer `None`, leave unchanged) from
/// "field set to null" (inner `None`) via [`double_option`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Normalized field changes consumed by the store layer.
///
/// Produced by the service after validation; `title`/`description` are
/// already trimmed, `due_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
}

/// Deserialize a field so that an explicit `null` becomes `Some(None)`
/// while an absent field stays `None` (via `#[serde(default)]`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: TaskPatch = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.description, None);
        assert_eq!(patch.completed, None);
    }

    #[test]
    fn patch_parses_present_fields() {
        let patch: TaskPatch = serde_json::from_str(
            r#"{"title": "Buy milk", "due_date": "2025-06-01", "completed": true}"#,
        )
        .unwrap();
        assert_eq!(patch.title, Some(Some("Buy milk".to_string())));
        assert_eq!(
            patch.due_date,
            Some(Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
        );
        assert_eq!(patch.completed, Some(true));
    }

    #[test]
    fn empty_patch_has_no_changes() {
        let patch: TaskPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.due_date.is_none());
        assert!(patch.completed.is_none());
    }

    #[test]
    fn task_serializes_date_as_iso_string() {
        let task = Task {
            id: "t1".into(),
            title: "Ship it".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2025, 12, 24),
            completed: false,
            created_at: 1,
            updated_at: 1,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["due_date"], "2025-12-24");
        assert_eq!(json["completed"], false);
    }
}
