//! Todo Client Entry Point
//!
//! Restores the stored session, optionally signs in from the environment
//! and prints the todo page. Uses `anyhow` for startup errors, but
//! application-level errors go through `kernel::error::AppError`.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use app::{HttpTodoApp, Navigation, Route};
use platform::client::ApiClient;
use platform::config::ClientConfig;
use platform::storage::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,auth=info,todo=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().context("Invalid client configuration")?;
    let store = Arc::new(
        FileStore::open(&config.storage_dir)
            .await
            .with_context(|| format!("Cannot open {}", config.storage_dir.display()))?,
    );
    let client = ApiClient::new(&config.api_url).context("Invalid TODO_API_URL")?;

    tracing::info!(api_url = %config.api_url, "Starting todo client");

    let mut app = HttpTodoApp::over_http(client, store, &config);
    app.start().await;

    if !app.auth().is_authenticated() {
        if let (Ok(email), Ok(password)) = (env::var("TODO_EMAIL"), env::var("TODO_PASSWORD")) {
            app.login(&email, password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))
                .context("Sign in failed")?;
        }
    }

    match app.navigate(Route::Todos.path()) {
        Navigation::Redirect(to) => {
            tracing::info!(route = %to, "Not signed in; set TODO_EMAIL and TODO_PASSWORD");
        }
        Navigation::Render(_) => {
            let page = app.todo_page();
            tracing::info!(
                total = page.total,
                active = page.active.len(),
                completed = page.completed.len(),
                "{}",
                page.header.greeting()
            );
            if let Some(error) = &page.error {
                tracing::warn!(error = %error, "Todo list is incomplete");
            }
            for item in page.active.iter().chain(page.completed.iter()) {
                println!(
                    "[{}] {} ({})",
                    if item.completed { "x" } else { " " },
                    item.title,
                    item.priority
                );
            }
        }
    }

    Ok(())
}
