//! Repository Traits
//!
//! Interface to the backend's todo records. The backend scopes every call
//! to the signed-in user.

use kernel::id::{TodoId, UserId};

use crate::domain::entities::{Todo, TodoDraft, TodoPatch};
use crate::error::TodoResult;

/// Backend todo operations
#[trait_variant::make(TodoGateway: Send)]
pub trait LocalTodoGateway {
    /// All todos of the current user, newest first
    async fn list(&self) -> TodoResult<Vec<Todo>>;

    async fn get(&self, id: &TodoId) -> TodoResult<Todo>;

    /// Create a todo owned by `owner`
    async fn create(&self, owner: &UserId, draft: &TodoDraft) -> TodoResult<Todo>;

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> TodoResult<Todo>;

    async fn delete(&self, id: &TodoId) -> TodoResult<()>;
}
