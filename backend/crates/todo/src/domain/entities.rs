//! Domain Entities
//!
//! Todo records and the validated inputs used to create or change them.

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::{TodoId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Priority, TodoDescription, TodoTitle};

/// Todo entity as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Owner
    pub user: UserId,
    #[serde(with = "kernel::time::record_timestamp")]
    pub created: DateTime<Utc>,
    #[serde(with = "kernel::time::record_timestamp")]
    pub updated: DateTime<Utc>,
}

/// Raw values from the "new todo" form
#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Validated new todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub priority: Priority,
}

impl TodoDraft {
    /// Missing description becomes empty, missing priority becomes medium
    pub fn validate(input: &NewTodo) -> AppResult<Self> {
        Ok(Self {
            title: TodoTitle::new(&input.title)?,
            description: match &input.description {
                Some(raw) => TodoDescription::new(raw)?,
                None => TodoDescription::default(),
            },
            priority: input.priority.unwrap_or_default(),
        })
    }
}

/// Raw field changes; `None` leaves the field as it is
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

/// Validated partial update, serialized as the PATCH body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TodoTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TodoDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TodoPatch {
    pub fn validate(changes: &TodoChanges) -> AppResult<Self> {
        Ok(Self {
            title: changes.title.as_deref().map(TodoTitle::new).transpose()?,
            description: changes
                .description
                .as_deref()
                .map(TodoDescription::new)
                .transpose()?,
            completed: changes.completed,
            priority: changes.priority,
        })
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
    }
}

/// Counts shown above the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TodoStats {
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed).count();
        Self {
            total: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_backend_record() {
        let todo: Todo = serde_json::from_value(json!({
            "id": "t1",
            "collectionId": "pbc_todos",
            "collectionName": "todos",
            "title": "Buy milk",
            "description": "",
            "completed": false,
            "priority": "high",
            "user": "u1",
            "created": "2024-05-01 10:20:30.123Z",
            "updated": "2024-05-01 10:20:30.123Z"
        }))
        .unwrap();

        assert_eq!(todo.id.as_str(), "t1");
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.user.as_str(), "u1");
    }

    #[test]
    fn test_missing_priority_defaults_to_medium() {
        let todo: Todo = serde_json::from_value(json!({
            "id": "t1",
            "title": "Buy milk",
            "user": "u1",
            "created": "2024-05-01 10:20:30.123Z",
            "updated": "2024-05-01 10:20:30.123Z"
        }))
        .unwrap();

        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.description, "");
        assert!(!todo.completed);
    }

    #[test]
    fn test_draft_defaults() {
        let draft = TodoDraft::validate(&NewTodo::titled("  Walk the dog ")).unwrap();
        assert_eq!(draft.title.as_str(), "Walk the dog");
        assert!(draft.description.is_empty());
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn test_draft_rejects_empty_title() {
        let err = TodoDraft::validate(&NewTodo::titled("   ")).unwrap_err();
        assert_eq!(err.message(), "Title is required");
    }

    #[test]
    fn test_patch_only_serializes_changed_fields() {
        let patch = TodoPatch::validate(&TodoChanges {
            title: Some(" New title ".to_string()),
            priority: Some(Priority::Low),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "title": "New title", "priority": "low" })
        );
        assert!(TodoPatch::default().is_empty());
        assert_eq!(
            serde_json::to_value(TodoPatch::completed(true)).unwrap(),
            json!({ "completed": true })
        );
    }

    #[test]
    fn test_stats() {
        let todo = |id: &str, completed: bool| Todo {
            id: TodoId::new(id),
            title: id.to_string(),
            description: String::new(),
            completed,
            priority: Priority::Medium,
            user: UserId::new("u1"),
            created: Utc::now(),
            updated: Utc::now(),
        };
        let todos = vec![todo("a", false), todo("b", true), todo("c", false)];
        assert_eq!(
            TodoStats::of(&todos),
            TodoStats {
                total: 3,
                active: 2,
                completed: 1
            }
        );
    }
}
