use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use crate::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthUser, FlashQuery, PasswordForm, ProfileForm, User};
use crate::services::AuthSession;
use crate::views::nav::Screen;
use crate::views::{escape, render_page, workload_bar, Page};
use super::{back_with_error, screen_user};

fn profile_body(user: &User) -> String {
    let photo = if user.photo_url.is_empty() {
        let initial = user.name.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
        format!(r#"<div class="avatar">{}</div>"#, escape(&initial))
    } else {
        format!(r#"<img class="avatar" src="{}" alt="{}">"#, escape(&user.photo_url), escape(&user.name))
    };

    format!(
        r#"<div class="card detail">{}
<h2>{}</h2><p class="muted">{} · {}</p>
<p><strong>Department</strong> {}</p>
<p><strong>Date of Birth</strong> {}</p>
<p><strong>Address</strong> {}</p>
<p><strong>Experience</strong> {} years</p>
<p><strong>Current Workload</strong> {}</p></div>
<h2>Edit Profile</h2>
<form method="post" action="/dashboard/profile">
<label for="name">Full Name</label><input id="name" name="name" value="{}" required>
<label for="date_of_birth">Date of Birth</label><input id="date_of_birth" name="date_of_birth" type="date" value="{}">
<label for="address">Address</label><input id="address" name="address" value="{}">
<label for="photo_url">Photo URL</label><input id="photo_url" name="photo_url" value="{}">
<button type="submit">Save Changes</button>
</form>
<h2>Change Password</h2>
<form method="post" action="/dashboard/profile/password">
<label for="current">Current Password</label><input id="current" name="current" type="password" required>
<label for="new_password">New Password</label><input id="new_password" name="new_password" type="password" required>
<label for="confirm">Confirm Password</label><input id="confirm" name="confirm" type="password" required>
<button type="submit">Change Password</button>
</form>"#,
        photo,
        escape(&user.name),
        escape(&user.email),
        user.role.label(),
        escape(&user.department),
        user.date_of_birth.format("%Y-%m-%d"),
        escape(&user.address),
        user.experience,
        workload_bar(user.current_workload),
        escape(&user.name),
        user.date_of_birth.format("%Y-%m-%d"),
        escape(&user.address),
        escape(&user.photo_url)
    )
}

pub async fn serve_profile(
    State((store, config)): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Profile).await?;
    let auth = AuthSession::resume(&store, Some(user.clone()));
    let record = auth
        .get_user_data(&user.id)
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.id)))?;

    let mut page = Page::new(Screen::Profile, "My Profile", profile_body(record));
    page.error = flash.error.as_deref();
    page.notice = flash.notice.as_deref();
    Ok(render_page(&config, &user, page)?.into_response())
}

fn acknowledge(
    (store, config): &AppState,
    user: &AuthUser,
    notice: &str,
) -> AppResult<Response> {
    let auth = AuthSession::resume(store, Some(user.clone()));
    let record = auth
        .get_user_data(&user.id)
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.id)))?;

    let mut page = Page::new(Screen::Profile, "My Profile", profile_body(record));
    page.notice = Some(notice);
    page.refresh = Some((config.forms.banner_seconds, Screen::Profile.path()));
    Ok(render_page(config, user, page)?.into_response())
}

pub async fn submit_profile(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Profile).await?;
    if let Err(message) = form.validate() {
        return Ok(back_with_error(Screen::Profile, &message));
    }
    tracing::info!("{} submitted a profile edit (not persisted)", user.id);
    acknowledge(&state, &user, "Profile updated successfully!")
}

pub async fn submit_password(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PasswordForm>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Profile).await?;
    if let Err(message) = form.validate() {
        return Ok(back_with_error(Screen::Profile, &message));
    }
    tracing::info!("{} submitted a password change (not persisted)", user.id);
    acknowledge(&state, &user, "Password changed successfully!")
}
