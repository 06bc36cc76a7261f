//! Todo Context
//!
//! Holds the signed-in user's todo list. Every mutation goes to the backend
//! first and the list is changed only with the record it returns; a failed
//! call leaves the list untouched and records an error message.

use std::sync::Arc;

use kernel::id::{TodoId, UserId};

use crate::domain::entities::{NewTodo, Todo, TodoChanges, TodoDraft, TodoPatch, TodoStats};
use crate::domain::repository::TodoGateway;
use crate::error::{TodoError, TodoResult};

const LOAD_ALL_FAILED: &str = "Failed to load todos";
const LOAD_ONE_FAILED: &str = "Failed to load todo";
const CREATE_FAILED: &str = "Failed to create todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";

/// Todo state machine
pub struct TodoContext<G>
where
    G: TodoGateway,
{
    gateway: Arc<G>,
    todos: Vec<Todo>,
    is_loading: bool,
    error: Option<String>,
}

impl<G> TodoContext<G>
where
    G: TodoGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            todos: Vec::new(),
            is_loading: false,
            error: None,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Replace the list with the backend's
    pub async fn fetch_todos(&mut self) -> TodoResult<&[Todo]> {
        self.begin();
        let result = self.gateway.list().await;
        let todos = self.settle(result, LOAD_ALL_FAILED)?;

        tracing::debug!(count = todos.len(), "Loaded todos");
        self.todos = todos;
        Ok(&self.todos)
    }

    /// Fetch one record; the list is not changed
    pub async fn get_todo(&mut self, id: &TodoId) -> TodoResult<Todo> {
        self.begin();
        let result = self.gateway.get(id).await;
        self.settle(result, LOAD_ONE_FAILED)
    }

    pub async fn create_todo(&mut self, owner: &UserId, input: NewTodo) -> TodoResult<Todo> {
        self.begin();
        let result = match TodoDraft::validate(&input) {
            Ok(draft) => self.gateway.create(owner, &draft).await,
            Err(e) => Err(TodoError::validation(e)),
        };
        let todo = self.settle(result, CREATE_FAILED)?;

        tracing::info!(todo_id = %todo.id, priority = %todo.priority, "Todo created");
        self.todos.insert(0, todo.clone());
        Ok(todo)
    }

    /// Send the given changes; with nothing to change no write is made
    pub async fn update_todo(&mut self, id: &TodoId, changes: TodoChanges) -> TodoResult<Todo> {
        self.begin();
        let result = match TodoPatch::validate(&changes) {
            Ok(patch) if patch.is_empty() => match self.todos.iter().find(|t| &t.id == id) {
                Some(todo) => Ok(todo.clone()),
                None => self.gateway.get(id).await,
            },
            Ok(patch) => self.gateway.update(id, &patch).await,
            Err(e) => Err(TodoError::validation(e)),
        };
        let todo = self.settle(result, UPDATE_FAILED)?;

        tracing::info!(todo_id = %todo.id, "Todo updated");
        self.replace(todo.clone());
        Ok(todo)
    }

    /// Flip the completion flag of a loaded todo
    pub async fn toggle_complete(&mut self, id: &TodoId) -> TodoResult<Todo> {
        self.begin();
        let result = match self.todos.iter().find(|t| &t.id == id) {
            Some(current) => {
                let patch = TodoPatch::completed(!current.completed);
                self.gateway.update(id, &patch).await
            }
            None => Err(TodoError::NotFound(id.clone())),
        };
        let todo = self.settle(result, UPDATE_FAILED)?;

        tracing::info!(todo_id = %todo.id, completed = todo.completed, "Todo toggled");
        self.replace(todo.clone());
        Ok(todo)
    }

    pub async fn delete_todo(&mut self, id: &TodoId) -> TodoResult<()> {
        self.begin();
        let result = self.gateway.delete(id).await;
        self.settle(result, DELETE_FAILED)?;

        tracing::info!(todo_id = %id, "Todo deleted");
        self.todos.retain(|t| &t.id != id);
        Ok(())
    }

    /// Forget everything; called on sign out
    pub fn clear(&mut self) {
        self.todos.clear();
        self.error = None;
        self.is_loading = false;
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn active(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|t| !t.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|t| t.completed)
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::of(&self.todos)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn settle<T>(&mut self, result: TodoResult<T>, fallback: &str) -> TodoResult<T> {
        self.is_loading = false;
        if let Err(e) = &result {
            e.log();
            self.error = Some(e.user_message(fallback));
        }
        result
    }

    fn replace(&mut self, todo: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
        }
    }
}
