use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use crate::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthUser, DetailQuery, Project, Role};
use crate::services::queries::{
    can_see_project, project_members, project_task_summary, tasks_for_project, visible_projects,
};
use crate::services::FixtureStore;
use crate::views::badge::{project_status_tone, task_status_tone};
use crate::views::nav::Screen;
use crate::views::{badge, escape, progress_bar, render_page, Page};
use super::screen_user;

pub async fn serve_projects(
    State((store, config)): State<AppState>,
    session: Session,
    Query(query): Query<DetailQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Projects).await?;

    let detail = match query.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => project_detail(&store, &user, id)?,
        None => String::new(),
    };

    let projects = visible_projects(&store, &user);
    tracing::debug!("{} sees {} projects", user.id, projects.len());

    let cards = if projects.is_empty() {
        r#"<p class="muted">No projects found.</p>"#.to_string()
    } else {
        projects
            .iter()
            .map(|p| project_card(&store, p))
            .collect::<String>()
    };

    let (title, subtitle) = match user.role {
        Role::Admin => ("All Projects", "Overview of all company projects"),
        Role::Manager | Role::Member => ("Your Projects", "View your assigned projects"),
    };
    let body = format!(
        r#"<p class="muted">{}</p>{}<section class="grid">{}</section>"#,
        subtitle, detail, cards
    );
    Ok(render_page(&config, &user, Page::new(Screen::Projects, title, body))?.into_response())
}

fn project_card(store: &FixtureStore, project: &Project) -> String {
    let summary = project_task_summary(store, &project.id);
    format!(
        r#"<div class="card"><a href="/dashboard/projects?id={}"><strong>{}</strong></a>
<p class="muted">{}</p>{} <span>{}%</span>{}
<p class="muted">{} members · {}/{} tasks</p></div>"#,
        escape(&project.id),
        escape(&project.name),
        escape(&project.description),
        badge(project_status_tone(project.status), project.status.label()),
        project.progress,
        progress_bar(project.progress),
        project.member_ids.len(),
        summary.done,
        summary.total
    )
}

fn project_detail(store: &FixtureStore, user: &AuthUser, id: &str) -> AppResult<String> {
    let project = store
        .project(id)
        .filter(|p| can_see_project(user, p))
        .ok_or_else(|| AppError::NotFound(format!("project {}", id)))?;

    let manager = store
        .user(&project.manager_id)
        .map(|m| escape(&m.name))
        .unwrap_or_default();

    let members = project_members(store, project)
        .iter()
        .map(|m| format!("<li>{} <span class=\"muted\">{}</span></li>", escape(&m.name), escape(&m.email)))
        .collect::<String>();

    let tasks = tasks_for_project(store, &project.id)
        .iter()
        .map(|t| {
            format!(
                "<li>{} {}</li>",
                escape(&t.title),
                badge(task_status_tone(t.status), t.status.label())
            )
        })
        .collect::<String>();

    Ok(format!(
        r#"<div class="card detail"><h2>{}</h2><p>{}</p>
<p>Status: {} · Manager: {} · Created {}</p>
<p>Progress {}%</p>{}
<h3>Team Members</h3><ul>{}</ul>
<h3>Tasks</h3><ul>{}</ul></div>"#,
        escape(&project.name),
        escape(&project.description),
        badge(project_status_tone(project.status), project.status.label()),
        manager,
        project.created_at.format("%Y-%m-%d"),
        project.progress,
        progress_bar(project.progress),
        members,
        tasks
    ))
}
