use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use crate::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthUser, Role, StatusForm, Task, TaskQuery, TaskStatus};
use crate::services::queries::{can_see_task, filter_by_status, visible_tasks};
use crate::services::web_session::{load_overlay, store_overlay};
use crate::services::{FixtureStore, StatusOverlay};
use crate::views::badge::{priority_tone, task_status_tone};
use crate::views::nav::Screen;
use crate::views::{badge, escape, options, render_page, Page};
use super::screen_user;

pub async fn serve_tasks(
    State((store, config)): State<AppState>,
    session: Session,
    Query(query): Query<TaskQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Tasks).await?;
    let overlay = load_overlay(&session).await?;

    // "all", empty and unknown values all mean no filter
    let filter = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<TaskStatus>().ok());

    let detail = match query.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => task_detail(&store, &user, &overlay, id)?,
        None => String::new(),
    };

    let tasks = filter_by_status(visible_tasks(&store, &user), filter);
    tracing::debug!("{} sees {} tasks (filter {:?})", user.id, tasks.len(), filter);

    let show_assignee = user.role == Role::Manager;
    let rows = tasks
        .iter()
        .map(|t| task_row(&store, &overlay, t, show_assignee))
        .collect::<String>();
    let list = if tasks.is_empty() {
        r#"<p class="muted">No tasks found.</p>"#.to_string()
    } else {
        format!(
            r#"<table><tr><th>Task</th><th>Priority</th><th>Project</th>{}<th>Due</th><th>Status</th></tr>{}</table>"#,
            if show_assignee { "<th>Assignee</th>" } else { "" },
            rows
        )
    };

    let selected = filter.map(|s| s.as_str()).unwrap_or("all");
    let filter_options = options(
        std::iter::once(("all", "All Tasks".to_string()))
            .chain(TaskStatus::ALL.iter().map(|s| (s.as_str(), s.label().to_string()))),
        selected,
    );

    let subtitle = match user.role {
        Role::Manager => "Manage your team tasks",
        Role::Admin | Role::Member => "View and track your assigned tasks",
    };
    let body = format!(
        r#"<p class="muted">{}</p>{}
<form method="get" action="/dashboard/tasks"><select name="status">{}</select><button type="submit">Filter</button></form>
{}"#,
        subtitle, detail, filter_options, list
    );
    Ok(render_page(&config, &user, Page::new(Screen::Tasks, "Tasks", body))?.into_response())
}

pub async fn update_task_status(
    State((store, _)): State<AppState>,
    session: Session,
    Path(task_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Tasks).await?;
    let task = store
        .task(&task_id)
        .filter(|t| can_see_task(&store, &user, t))
        .ok_or_else(|| AppError::NotFound(format!("task {}", task_id)))?;

    let mut overlay = load_overlay(&session).await?;
    overlay.set(&task.id, form.status);
    store_overlay(&session, &overlay).await?;
    tracing::info!("{} marked {} as {} (session only)", user.id, task.id, form.status.as_str());

    Ok(Redirect::to(&format!("/dashboard/tasks?id={}", urlencoding::encode(&task.id))).into_response())
}

fn task_row(store: &FixtureStore, overlay: &StatusOverlay, task: &Task, show_assignee: bool) -> String {
    let project = store
        .project(&task.project_id)
        .map(|p| escape(&p.name))
        .unwrap_or_default();
    let assignee = if show_assignee {
        let name = store
            .user(&task.assigned_to)
            .map(|u| escape(&u.name))
            .unwrap_or_default();
        format!("<td>{}</td>", name)
    } else {
        String::new()
    };
    let status = overlay.display_status(task);
    format!(
        r#"<tr><td><a href="/dashboard/tasks?id={}"><strong>{}</strong></a><br><span class="muted">{}</span></td><td>{}</td><td>{}</td>{}<td>{}</td><td>{}</td></tr>"#,
        escape(&task.id),
        escape(&task.title),
        escape(&task.description),
        badge(priority_tone(task.priority), task.priority.label()),
        project,
        assignee,
        task.due_date.format("%Y-%m-%d"),
        badge(task_status_tone(status), status.label())
    )
}

fn task_detail(store: &FixtureStore, user: &AuthUser, overlay: &StatusOverlay, id: &str) -> AppResult<String> {
    let task = store
        .task(id)
        .filter(|t| can_see_task(store, user, t))
        .ok_or_else(|| AppError::NotFound(format!("task {}", id)))?;

    let (project_name, project_description) = store
        .project(&task.project_id)
        .map(|p| (escape(&p.name), escape(&p.description)))
        .unwrap_or_default();
    let (assignee, department) = store
        .user(&task.assigned_to)
        .map(|u| (escape(&u.name), format!("{} Department", escape(&u.department))))
        .unwrap_or_default();

    let status = overlay.display_status(task);
    let status_options = options(
        TaskStatus::ALL.iter().map(|s| (s.as_str(), s.label().to_string())),
        status.as_str(),
    );

    Ok(format!(
        r#"<div class="card detail"><h2>{}</h2><p>{}</p>
<p><strong>Project</strong> {} <span class="muted">{}</span></p>
<p><strong>Assigned to</strong> {} <span class="muted">{}</span></p>
<p><strong>Priority</strong> {}</p>
<form method="post" action="/dashboard/tasks/{}/status"><label for="status">Status</label><select id="status" name="status">{}</select><button type="submit">Update</button></form>
<p class="muted">Created {} · Due {}</p></div>"#,
        escape(&task.title),
        escape(&task.description),
        project_name,
        project_description,
        assignee,
        department,
        badge(priority_tone(task.priority), task.priority.label()),
        escape(&task.id),
        status_options,
        task.created_at.format("%Y-%m-%d"),
        task.due_date.format("%Y-%m-%d")
    ))
}
