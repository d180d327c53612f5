use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Response, Redirect},
};
use tower_sessions::Session;
use crate::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{FlashQuery, LoginForm};
use crate::services::AuthSession;
use crate::services::web_session::{clear_overlay, load_identity, store_identity};
use crate::views::{escape, load_template};

pub async fn serve_login_page(
    State((store, config)): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    if AuthSession::resume(&store, load_identity(&session).await?).is_authenticated() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let template = load_template(&config, "login.html")?;

    let error = flash
        .error
        .map(|e| format!(r#"<div class="alert alert-error">{}</div>"#, escape(&e)))
        .unwrap_or_default();

    let demo = store
        .login_names()
        .into_iter()
        .map(|(username, role)| {
            format!(r#"<p><code>{}</code> <span class="muted">{}</span></p>"#, escape(username), role.label())
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Html(template.replace("{{demo}}", &demo).replace("{{error}}", &error)).into_response())
}

pub async fn handle_login(
    State((store, _)): State<AppState>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("Login attempt for user: {}", login_form.username);

    let previous = load_identity(&session).await?;
    let previous_id = previous.as_ref().map(|u| u.id.clone());
    let mut auth = AuthSession::resume(&store, previous);
    if !auth.login(&login_form.username, &login_form.password) {
        tracing::warn!("Rejected login for user: {}", login_form.username);
        return Err(AppError::Auth("Invalid username or password".into()));
    }

    session.cycle_id().await?;
    let user = auth.into_user();
    if let Some(user) = &user {
        tracing::info!("{} logged in as {}", user.id, user.role.as_str());
        // Overrides belong to the identity that made them.
        if previous_id.as_deref().is_some_and(|id| id != user.id) {
            clear_overlay(&session).await?;
        }
    }
    store_identity(&session, user).await?;
    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn handle_logout(
    State((store, _)): State<AppState>,
    session: Session,
) -> AppResult<Response> {
    let mut auth = AuthSession::resume(&store, load_identity(&session).await?);
    if let Some(user) = auth.user() {
        tracing::info!("{} logged out", user.id);
    }
    auth.logout();
    store_identity(&session, auth.into_user()).await?;
    Ok(Redirect::to("/").into_response())
}
