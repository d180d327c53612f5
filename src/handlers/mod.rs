mod auth;
mod dashboard;
mod projects;
mod directory;
mod tasks;
mod forms;
mod profile;

pub use auth::{serve_login_page, handle_login, handle_logout};
pub use dashboard::serve_dashboard;
pub use projects::serve_projects;
pub use directory::{serve_managers, serve_members};
pub use tasks::{serve_tasks, update_task_status};
pub use forms::{
    serve_add_admin, submit_add_admin, serve_add_manager, submit_add_manager,
    serve_add_member, submit_add_member, serve_add_project, submit_add_project,
    serve_assign_task, submit_assign_task,
};
pub use profile::{serve_profile, submit_profile, submit_password};

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::AuthUser;
use crate::services::web_session::require_identity;
use crate::views::nav::Screen;

// Logged-in visitor who is allowed to open `screen`.
async fn screen_user(session: &Session, screen: Screen) -> AppResult<AuthUser> {
    let user = require_identity(session).await?;
    screen.ensure_allowed(&user)?;
    tracing::info!("{} opened {}", user.id, screen.path());
    Ok(user)
}

// Sends the visitor back to a form with an inline error message.
fn back_with_error(screen: Screen, message: &str) -> Response {
    tracing::debug!("Rejected submission on {}: {}", screen.path(), message);
    Redirect::to(&format!("{}?error={}", screen.path(), urlencoding::encode(message))).into_response()
}
