//! HTTP Todo Gateway
//!
//! Records API of the `todos` collection:
//!
//! - `GET    /api/collections/todos/records?page=N&perPage=200&sort=-created`
//! - `GET    /api/collections/todos/records/{id}`
//! - `POST   /api/collections/todos/records`
//! - `PATCH  /api/collections/todos/records/{id}`
//! - `DELETE /api/collections/todos/records/{id}`

use kernel::id::{TodoId, UserId};
use platform::client::ApiClient;
use serde::{Deserialize, Serialize};

use crate::application::config::TodoConfig;
use crate::domain::entities::{Todo, TodoDraft, TodoPatch};
use crate::domain::repository::TodoGateway;
use crate::domain::value_objects::{Priority, TodoDescription, TodoTitle};
use crate::error::{TodoError, TodoResult};

/// One page of a list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage<T> {
    page: u32,
    total_pages: u32,
    #[serde(default)]
    total_items: u32,
    items: Vec<T>,
}

#[derive(Serialize)]
struct CreateTodoRequest<'a> {
    title: &'a TodoTitle,
    description: &'a TodoDescription,
    priority: Priority,
    completed: bool,
    user: &'a UserId,
}

/// Todo gateway backed by [`ApiClient`]
///
/// Relies on the token installed in the shared client by the auth gateway.
#[derive(Debug, Clone)]
pub struct HttpTodoGateway {
    client: ApiClient,
    config: TodoConfig,
}

impl HttpTodoGateway {
    pub fn new(client: ApiClient, config: TodoConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn records_path(&self) -> String {
        format!("/api/collections/{}/records", self.config.collection)
    }

    fn record_path(&self, id: &TodoId) -> TodoResult<String> {
        // Ids are backend-issued; anything else could escape the collection path
        let valid = !id.is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(TodoError::NotFound(id.clone()));
        }
        Ok(format!("{}/{}", self.records_path(), id))
    }
}

impl TodoGateway for HttpTodoGateway {
    async fn list(&self) -> TodoResult<Vec<Todo>> {
        let path = self.records_path();
        let mut todos = Vec::new();
        let mut page = 1u32;

        loop {
            let query = [
                ("page", page.to_string()),
                ("perPage", self.config.page_size.to_string()),
                ("sort", self.config.sort.clone()),
            ];
            let res: ListPage<Todo> = self.client.get(&path, &query).await?;

            tracing::trace!(
                page = res.page,
                total_pages = res.total_pages,
                total_items = res.total_items,
                "Fetched todo page"
            );

            let done = res.items.is_empty() || res.page >= res.total_pages;
            todos.extend(res.items);
            if done {
                break;
            }
            page = res.page + 1;
        }

        Ok(todos)
    }

    async fn get(&self, id: &TodoId) -> TodoResult<Todo> {
        let path = self.record_path(id)?;
        Ok(self.client.get(&path, &[]).await?)
    }

    async fn create(&self, owner: &UserId, draft: &TodoDraft) -> TodoResult<Todo> {
        let body = CreateTodoRequest {
            title: &draft.title,
            description: &draft.description,
            priority: draft.priority,
            completed: false,
            user: owner,
        };
        Ok(self.client.post(&self.records_path(), &body).await?)
    }

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> TodoResult<Todo> {
        let path = self.record_path(id)?;
        Ok(self.client.patch(&path, patch).await?)
    }

    async fn delete(&self, id: &TodoId) -> TodoResult<()> {
        let path = self.record_path(id)?;
        self.client.delete(&path).await?;
        Ok(())
    }
}
