mod models;
mod handlers;
mod services;
mod middleware;
mod views;
mod config;
mod errors;

use axum::{
    routing::{get, post},
    Router,
    middleware::from_fn,
};
use tower_http::services::ServeDir;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use tracing_subscriber::EnvFilter;
use std::sync::Arc;
use anyhow::Context;
use crate::{
    services::FixtureStore,
    config::Config,
    errors::AppResult,
};

// Shared by every handler: the read-only dataset and the loaded configuration.
pub type AppState = (Arc<FixtureStore>, Config);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the configured level applies
    let config = Config::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .init();

    let store = load_store(&config).context("Failed to build fixture store")?;

    let app = build_router(Arc::new(store), config.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}

fn load_store(config: &Config) -> AppResult<FixtureStore> {
    let store = match &config.fixtures.path {
        Some(path) => {
            tracing::info!("Loading fixtures from {}", path);
            FixtureStore::load(path, config.fixtures.bcrypt_cost)?
        }
        None => FixtureStore::seed(config.fixtures.bcrypt_cost)?,
    };
    Ok(store)
}

fn build_router(store: Arc<FixtureStore>, config: Config) -> Router {
    // Session store setup
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(config.session.cookie_name.clone());

    Router::new()
        // Auth routes
        .route("/", get(handlers::serve_login_page))
        .route("/login", post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))

        // Role screens
        .route("/dashboard", get(handlers::serve_dashboard))
        .route("/dashboard/profile", get(handlers::serve_profile).post(handlers::submit_profile))
        .route("/dashboard/profile/password", post(handlers::submit_password))
        .route("/dashboard/projects", get(handlers::serve_projects))
        .route("/dashboard/managers", get(handlers::serve_managers))
        .route("/dashboard/members", get(handlers::serve_members))
        .route("/dashboard/tasks", get(handlers::serve_tasks))
        .route("/dashboard/tasks/:task_id/status", post(handlers::update_task_status))

        // Forms
        .route("/dashboard/add-admin", get(handlers::serve_add_admin).post(handlers::submit_add_admin))
        .route("/dashboard/add-manager", get(handlers::serve_add_manager).post(handlers::submit_add_manager))
        .route("/dashboard/add-member", get(handlers::serve_add_member).post(handlers::submit_add_member))
        .route("/dashboard/add-project", get(handlers::serve_add_project).post(handlers::submit_add_project))
        .route("/dashboard/assign-task", get(handlers::serve_assign_task).post(handlers::submit_assign_task))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Add middleware
        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)

        .with_state((store, config))
}

#[cfg(test)]
mod tests;
