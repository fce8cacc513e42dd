//! Integration tests for the task service over an in-memory database.
//!
//! These tests exercise the lifecycle contract end to end: validation,
//! normalization, ordering, timestamp behavior, and delete semantics.

use taskdeck::db::Database;
use taskdeck::error::ApiError;
use taskdeck::service::TaskService;
use taskdeck::types::{NewTask, TaskPatch};

/// Helper to create a service over a fresh in-memory database.
fn setup_service() -> TaskService {
    let db = Database::open_in_memory().expect("Failed to create in-memory database");
    TaskService::new(db)
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: Some(title.to_string()),
        description: None,
        due_date: None,
    }
}

mod create_tests {
    use super::*;

    #[test]
    fn create_sets_defaults() {
        let service = setup_service();

        let task = service.create(new_task("Buy milk")).unwrap();

        assert!(!task.id.is_empty());
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn create_trims_title_and_description() {
        let service = setup_service();

        let task = service
            .create(NewTask {
                title: Some("  Buy milk  ".to_string()),
                description: Some("  2 liters  ".to_string()),
                due_date: None,
            })
            .unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2 liters");
    }

    #[test]
    fn create_rejects_empty_title_without_writing() {
        let service = setup_service();

        let result = service.create(new_task(""));

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert!(service.list().is_empty());
    }

    #[test]
    fn create_rejects_whitespace_title() {
        let service = setup_service();

        let result = service.create(new_task("   "));

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert!(service.list().is_empty());
    }

    #[test]
    fn create_rejects_missing_title() {
        let service = setup_service();

        let result = service.create(NewTask::default());

        assert!(result.is_err());
    }

    #[test]
    fn create_stores_due_date() {
        let service = setup_service();
        let due = chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        let task = service
            .create(NewTask {
                title: Some("File taxes".to_string()),
                description: None,
                due_date: Some(due),
            })
            .unwrap();

        assert_eq!(task.due_date, Some(due));
        assert_eq!(service.get(&task.id).unwrap().due_date, Some(due));
    }

    #[test]
    fn ids_are_unique() {
        let service = setup_service();

        let a = service.create(new_task("one")).unwrap();
        let b = service.create(new_task("two")).unwrap();

        assert_ne!(a.id, b.id);
    }
}

mod list_tests {
    use super::*;

    #[test]
    fn list_returns_empty_for_fresh_store() {
        let service = setup_service();

        assert!(service.list().is_empty());
    }

    #[test]
    fn list_orders_newest_created_first() {
        let service = setup_service();

        let first = service.create(new_task("first")).unwrap();
        let second = service.create(new_task("second")).unwrap();
        let third = service.create(new_task("third")).unwrap();

        let ids: Vec<String> = service.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }
}

mod get_tests {
    use super::*;

    #[test]
    fn get_returns_created_task() {
        let service = setup_service();
        let task = service.create(new_task("find me")).unwrap();

        let found = service.get(&task.id).unwrap();

        assert_eq!(found, task);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let service = setup_service();

        assert!(matches!(
            service.get("no-such-id"),
            Err(ApiError::TaskNotFound(_))
        ));
    }
}

mod update_tests {
    use super::*;

    #[test]
    fn empty_patch_bumps_only_updated_at() {
        let service = setup_service();
        let task = service.create(new_task("stable")).unwrap();

        let updated = service.update(&task.id, TaskPatch::default()).unwrap();

        assert_eq!(updated.title, task.title);
        assert_eq!(updated.description, task.description);
        assert_eq!(updated.due_date, task.due_date);
        assert_eq!(updated.completed, task.completed);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at > task.updated_at);
    }

    #[test]
    fn partial_update_leaves_other_fields_untouched() {
        let service = setup_service();
        let task = service
            .create(NewTask {
                title: Some("original".to_string()),
                description: Some("keep me".to_string()),
                due_date: None,
            })
            .unwrap();

        let patch = TaskPatch {
            title: Some(Some("renamed".to_string())),
            ..TaskPatch::default()
        };
        let updated = service.update(&task.id, patch).unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.description, "keep me");
    }

    #[test]
    fn update_rejects_empty_title() {
        let service = setup_service();
        let task = service.create(new_task("valid")).unwrap();

        let patch = TaskPatch {
            title: Some(Some("   ".to_string())),
            ..TaskPatch::default()
        };

        assert!(matches!(
            service.update(&task.id, patch),
            Err(ApiError::Validation { .. })
        ));
        assert_eq!(service.get(&task.id).unwrap().title, "valid");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let service = setup_service();

        let result = service.update("missing", TaskPatch::default());

        assert!(matches!(result, Err(ApiError::TaskNotFound(_))));
    }

    #[test]
    fn null_due_date_clears_the_field() {
        let service = setup_service();
        let due = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let task = service
            .create(NewTask {
                title: Some("dated".to_string()),
                description: None,
                due_date: Some(due),
            })
            .unwrap();

        let patch = TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        };
        let updated = service.update(&task.id, patch).unwrap();

        assert_eq!(updated.due_date, None);
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let service = setup_service();
        let task = service.create(new_task("clock check")).unwrap();

        let updated = service.update(&task.id, TaskPatch::default()).unwrap();

        assert!(updated.updated_at >= updated.created_at);
    }
}

mod toggle_tests {
    use super::*;

    #[test]
    fn toggle_roundtrip_restores_completed() {
        let service = setup_service();
        let task = service.create(new_task("flip me")).unwrap();
        assert!(!task.completed);

        let on = service.toggle(&task.id, true).unwrap();
        assert!(on.completed);

        let off = service.toggle(&task.id, false).unwrap();
        assert!(!off.completed);

        assert!(on.updated_at > task.updated_at);
        assert!(off.updated_at > on.updated_at);
    }

    #[test]
    fn toggle_unknown_id_is_not_found() {
        let service = setup_service();

        assert!(matches!(
            service.toggle("missing", true),
            Err(ApiError::TaskNotFound(_))
        ));
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn tasks_survive_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("tasks.db");

        let id = {
            let service = TaskService::new(Database::open(&path).unwrap());
            service.create(new_task("durable")).unwrap().id
        };

        let service = TaskService::new(Database::open(&path).unwrap());
        assert_eq!(service.get(&id).unwrap().title, "durable");
    }
}

mod delete_tests {
    use super::*;

    #[test]
    fn deleted_task_is_absent_from_list() {
        let service = setup_service();
        let keep = service.create(new_task("keep")).unwrap();
        let drop = service.create(new_task("drop")).unwrap();

        service.delete(&drop.id).unwrap();

        let ids: Vec<String> = service.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![keep.id]);
        assert!(matches!(
            service.get(&drop.id),
            Err(ApiError::TaskNotFound(_))
        ));
    }

    #[test]
    fn delete_of_absent_id_succeeds() {
        let service = setup_service();

        assert!(service.delete("never-existed").is_ok());
    }

    #[test]
    fn delete_is_idempotent() {
        let service = setup_service();
        let task = service.create(new_task("twice")).unwrap();

        service.delete(&task.id).unwrap();
        assert!(service.delete(&task.id).is_ok());
    }
}
