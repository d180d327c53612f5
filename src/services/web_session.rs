use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::AuthUser;
use super::overlay::StatusOverlay;

pub const AUTH_KEY: &str = "auth_user";
pub const OVERLAY_KEY: &str = "task_status_overrides";

pub async fn load_identity(session: &Session) -> AppResult<Option<AuthUser>> {
    Ok(session.get::<AuthUser>(AUTH_KEY).await?)
}

/// Identity of the logged-in visitor, or an `Auth` error that sends them to the login page.
pub async fn require_identity(session: &Session) -> AppResult<AuthUser> {
    load_identity(session)
        .await?
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))
}

/// Persists the identity, or clears it together with every piece of view state.
pub async fn store_identity(session: &Session, user: Option<AuthUser>) -> AppResult<()> {
    match user {
        Some(user) => session.insert(AUTH_KEY, user).await?,
        None => {
            session.remove::<AuthUser>(AUTH_KEY).await?;
            clear_overlay(session).await?;
        }
    }
    Ok(())
}

pub async fn load_overlay(session: &Session) -> AppResult<StatusOverlay> {
    Ok(session
        .get::<StatusOverlay>(OVERLAY_KEY)
        .await?
        .unwrap_or_default())
}

pub async fn store_overlay(session: &Session, overlay: &StatusOverlay) -> AppResult<()> {
    session.insert(OVERLAY_KEY, overlay).await?;
    Ok(())
}

pub async fn clear_overlay(session: &Session) -> AppResult<()> {
    session.remove::<StatusOverlay>(OVERLAY_KEY).await?;
    Ok(())
}
