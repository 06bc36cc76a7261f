//! Application facade
//!
//! Wires the auth and todo contexts over one shared API client and keeps
//! them consistent: signing in loads the user's todos, signing out drops
//! them.

use std::sync::Arc;

use auth::domain::repository::{AuthGateway, SessionRepository};
use auth::models::user::User;
use auth::{AuthConfig, AuthContext, AuthResult, HttpAuthGateway, KeyValueSessionRepository};
use platform::client::ApiClient;
use platform::config::ClientConfig;
use platform::storage::KeyValueStore;
use todo::domain::repository::TodoGateway;
use todo::models::{NewTodo, Todo, TodoChanges};
use todo::{HttpTodoGateway, TodoConfig, TodoContext, TodoError, TodoResult};

use kernel::id::TodoId;

use crate::routes::{Navigation, Route, guard};
use crate::view::TodoPageView;

/// Both contexts of a running client
pub struct TodoApp<G, S, K, T>
where
    G: AuthGateway,
    S: SessionRepository,
    K: KeyValueStore + Send + Sync,
    T: TodoGateway,
{
    auth: AuthContext<G, S, K>,
    todos: TodoContext<T>,
}

/// The production wiring: HTTP gateways over one [`ApiClient`]
pub type HttpTodoApp<K> = TodoApp<HttpAuthGateway, KeyValueSessionRepository<K>, K, HttpTodoGateway>;

impl<K> HttpTodoApp<K>
where
    K: KeyValueStore + Send + Sync,
{
    /// Session and rate-limit counters are kept in `store`
    pub fn over_http(client: ApiClient, store: Arc<K>, config: &ClientConfig) -> Self {
        let auth_config = AuthConfig::from_client_config(config);
        let sessions = Arc::new(KeyValueSessionRepository::new(
            Arc::clone(&store),
            auth_config.session_key.clone(),
        ));

        let auth = AuthContext::new(
            Arc::new(HttpAuthGateway::new(client.clone())),
            sessions,
            store,
            &auth_config,
        );
        let todos = TodoContext::new(Arc::new(HttpTodoGateway::new(
            client,
            TodoConfig::default(),
        )));

        Self::new(auth, todos)
    }
}

impl<G, S, K, T> TodoApp<G, S, K, T>
where
    G: AuthGateway,
    S: SessionRepository,
    K: KeyValueStore + Send + Sync,
    T: TodoGateway,
{
    pub fn new(auth: AuthContext<G, S, K>, todos: TodoContext<T>) -> Self {
        Self { auth, todos }
    }

    /// Restore the stored session and, when signed in, load the todos
    pub async fn start(&mut self) {
        self.auth.initialize().await;
        if self.auth.is_authenticated() {
            self.load_todos().await;
        }
    }

    pub async fn login(&mut self, email: &str, password: String) -> AuthResult<User> {
        let user = self.auth.login(email, password).await?;
        self.load_todos().await;
        Ok(user)
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: String,
        password_confirm: String,
        name: &str,
    ) -> AuthResult<User> {
        let user = self
            .auth
            .register(email, password, password_confirm, name)
            .await?;
        self.load_todos().await;
        Ok(user)
    }

    pub async fn logout(&mut self) {
        self.auth.logout().await;
        self.todos.clear();
    }

    /// Create a todo owned by the signed-in user
    pub async fn create_todo(&mut self, input: NewTodo) -> TodoResult<Todo> {
        let Some(owner) = self.auth.current_user().map(|u| u.id.clone()) else {
            return Err(TodoError::NotAuthenticated);
        };
        self.todos.create_todo(&owner, input).await
    }

    pub async fn update_todo(&mut self, id: &TodoId, changes: TodoChanges) -> TodoResult<Todo> {
        self.todos.update_todo(id, changes).await
    }

    pub async fn toggle_complete(&mut self, id: &TodoId) -> TodoResult<Todo> {
        self.todos.toggle_complete(id).await
    }

    pub async fn delete_todo(&mut self, id: &TodoId) -> TodoResult<()> {
        self.todos.delete_todo(id).await
    }

    /// Where `path` leads in the current auth state
    pub fn navigate(&self, path: &str) -> Navigation {
        guard(Route::parse(path), self.auth.is_authenticated())
    }

    pub fn todo_page(&self) -> TodoPageView {
        TodoPageView::new(
            self.auth.current_user(),
            self.todos.todos(),
            self.todos.stats(),
            self.todos.error(),
        )
    }

    pub fn auth(&self) -> &AuthContext<G, S, K> {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthContext<G, S, K> {
        &mut self.auth
    }

    pub fn todos(&self) -> &TodoContext<T> {
        &self.todos
    }

    pub fn todos_mut(&mut self) -> &mut TodoContext<T> {
        &mut self.todos
    }

    async fn load_todos(&mut self) {
        // The error stays in the todo context for the page to show
        if let Err(e) = self.todos.fetch_todos().await {
            tracing::warn!(error = %e, "Could not load todos after sign in");
        }
    }
}
