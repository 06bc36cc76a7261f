//! View models
//!
//! Data the presentation layer renders. Every user-supplied string is
//! HTML-escaped here, so templates can insert it verbatim.

use auth::models::user::User;
use platform::sanitize::escape_html;
use serde::Serialize;
use todo::models::{Todo, TodoStats};

/// Page header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    /// `None` when signed out
    pub user_name: Option<String>,
}

impl HeaderView {
    pub fn new(user: Option<&User>) -> Self {
        Self {
            user_name: user.map(|u| escape_html(u.display_name())),
        }
    }

    pub fn greeting(&self) -> String {
        match &self.user_name {
            Some(name) => format!("Welcome, {name}"),
            None => "Welcome".to_string(),
        }
    }
}

/// One row of the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItemView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: &'static str,
    pub completed: bool,
}

impl From<&Todo> for TodoItemView {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.as_str().to_string(),
            title: escape_html(&todo.title),
            description: escape_html(&todo.description),
            priority: todo.priority.as_str(),
            completed: todo.completed,
        }
    }
}

/// The todo page: active items first, then completed ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoPageView {
    pub header: HeaderView,
    pub active: Vec<TodoItemView>,
    pub completed: Vec<TodoItemView>,
    pub total: usize,
    pub error: Option<String>,
}

impl TodoPageView {
    pub fn new<'a>(
        user: Option<&User>,
        todos: impl IntoIterator<Item = &'a Todo>,
        stats: TodoStats,
        error: Option<&str>,
    ) -> Self {
        let (completed, active): (Vec<_>, Vec<_>) = todos
            .into_iter()
            .map(TodoItemView::from)
            .partition(|t| t.completed);

        Self {
            header: HeaderView::new(user),
            active,
            completed,
            total: stats.total,
            error: error.map(escape_html),
        }
    }
}
