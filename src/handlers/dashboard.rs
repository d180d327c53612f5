use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use crate::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{FlashQuery, Project, Task};
use crate::services::AuthSession;
use crate::services::queries::{
    dashboard, tasks_for_project, AdminOverview, Dashboard, ManagerOverview, MemberOverview,
};
use crate::services::FixtureStore;
use crate::views::badge::{priority_tone, project_status_tone, task_status_tone};
use crate::views::nav::Screen;
use crate::views::{badge, escape, progress_bar, render_page, workload_bar, Page};
use super::screen_user;

pub async fn serve_dashboard(
    State((store, config)): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Dashboard).await?;
    let auth = AuthSession::resume(&store, Some(user.clone()));

    let body = match dashboard(&auth) {
        Some(Dashboard::Admin(overview)) => admin_body(&overview),
        Some(Dashboard::Manager(overview)) => manager_body(&store, &overview),
        Some(Dashboard::Member(overview)) => member_body(&overview),
        None => return Err(AppError::Auth("Not authenticated".into())),
    };

    let title = format!("Welcome back, {}", user.name);
    let mut page = Page::new(Screen::Dashboard, &title, body);
    page.notice = flash.notice.as_deref();
    page.error = flash.error.as_deref();
    Ok(render_page(&config, &user, page)?.into_response())
}

fn stat(label: &str, value: impl std::fmt::Display) -> String {
    format!(r#"<div class="card"><p class="muted">{}</p><p class="stat">{}</p></div>"#, label, value)
}

fn project_line(project: &Project) -> String {
    format!(
        r#"<div class="card"><a href="/dashboard/projects?id={}"><strong>{}</strong></a> {}{}<span class="muted">{}% complete</span></div>"#,
        escape(&project.id),
        escape(&project.name),
        badge(project_status_tone(project.status), project.status.label()),
        progress_bar(project.progress),
        project.progress
    )
}

fn task_line(task: &Task) -> String {
    format!(
        r#"<div class="card"><a href="/dashboard/tasks?id={}"><strong>{}</strong></a> {} {}<p class="muted">Due: {}</p></div>"#,
        escape(&task.id),
        escape(&task.title),
        badge(priority_tone(task.priority), task.priority.label()),
        badge(task_status_tone(task.status), task.status.label()),
        task.due_date.format("%Y-%m-%d")
    )
}

fn admin_body(overview: &AdminOverview<'_>) -> String {
    tracing::debug!(
        projects = overview.total_projects,
        completed = overview.completed_projects,
        in_progress = overview.in_progress_projects,
        done_tasks = overview.done_tasks,
        total_tasks = overview.total_tasks,
        "Admin dashboard figures"
    );

    let recent_projects = overview.recent_projects.iter().map(|p| project_line(p)).collect::<String>();
    // Admins have no task screen, so recent tasks are shown without a link.
    let recent_tasks = overview
        .recent_tasks
        .iter()
        .map(|t| {
            format!(
                r#"<div class="card"><strong>{}</strong> {}</div>"#,
                escape(&t.title),
                badge(task_status_tone(t.status), t.status.label())
            )
        })
        .collect::<String>();

    format!(
        r#"<section class="grid">{}{}{}{}{}</section>
<h2>Recent Project Updates</h2><section class="grid">{}</section>
<h2>Recent Task Changes</h2><section class="grid">{}</section>"#,
        stat("Total Projects", overview.total_projects),
        stat("Completed Projects", overview.completed_projects),
        stat("Projects In Progress", overview.in_progress_projects),
        stat("Tasks Done", format!("{}/{}", overview.done_tasks, overview.total_tasks)),
        stat("Task Completion", format!("{}%", overview.task_completion)),
        recent_projects,
        recent_tasks
    )
}

fn manager_body(store: &FixtureStore, overview: &ManagerOverview<'_>) -> String {
    tracing::debug!(
        projects = overview.projects.len(),
        open_tasks = overview.open_tasks,
        "Manager dashboard figures"
    );

    let new_projects = if overview.new_projects.is_empty() {
        String::new()
    } else {
        let names = overview
            .new_projects
            .iter()
            .map(|p| format!("<li>{}</li>", escape(&p.name)))
            .collect::<String>();
        format!(r#"<div class="alert alert-success"><strong>New projects</strong><ul>{}</ul></div>"#, names)
    };

    let projects = if overview.projects.is_empty() {
        r#"<p class="muted">No projects assigned yet.</p>"#.to_string()
    } else {
        overview
            .projects
            .iter()
            .map(|p| {
                format!(
                    r#"<div class="card"><a href="/dashboard/projects?id={}"><strong>{}</strong></a> {}<p class="muted">{} tasks</p>{}<span class="muted">{}% complete</span></div>"#,
                    escape(&p.id),
                    escape(&p.name),
                    badge(project_status_tone(p.status), p.status.label()),
                    tasks_for_project(store, &p.id).len(),
                    progress_bar(p.progress),
                    p.progress
                )
            })
            .collect::<String>()
    };

    let team = overview
        .team
        .iter()
        .map(|m| {
            format!(
                r#"<tr><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                escape(&m.name),
                escape(&m.department),
                workload_bar(m.current_workload)
            )
        })
        .collect::<String>();

    format!(
        r#"{}<section class="grid">{}{}{}</section>
<h2>Your Projects</h2><section class="grid">{}</section>
<h2>Team Members</h2><table><tr><th>Name</th><th>Department</th><th>Workload</th></tr>{}</table>"#,
        new_projects,
        stat("Team Members", overview.team.len()),
        stat("Active Projects", overview.projects.len()),
        stat("Pending Tasks", overview.open_tasks),
        projects,
        team
    )
}

fn member_body(overview: &MemberOverview<'_>) -> String {
    tracing::debug!(
        to_do = overview.to_do,
        in_progress = overview.in_progress,
        done = overview.done,
        progress = overview.progress,
        "Member dashboard figures"
    );

    let mut notices = String::new();
    if !overview.new_projects.is_empty() {
        let names = overview
            .new_projects
            .iter()
            .map(|p| format!("<li>{}</li>", escape(&p.name)))
            .collect::<String>();
        notices.push_str(&format!(
            r#"<div class="alert alert-success"><strong>You were added to</strong><ul>{}</ul></div>"#,
            names
        ));
    }
    if !overview.new_tasks.is_empty() {
        let items = overview
            .new_tasks
            .iter()
            .map(|t| {
                format!(
                    r#"<li><a href="/dashboard/tasks?id={}">{}</a> <span class="muted">Due: {}</span></li>"#,
                    escape(&t.id),
                    escape(&t.title),
                    t.due_date.format("%Y-%m-%d")
                )
            })
            .collect::<String>();
        notices.push_str(&format!(
            r#"<div class="alert alert-success"><strong>New tasks</strong><ul>{}</ul></div>"#,
            items
        ));
    }

    let projects = if overview.projects.is_empty() {
        r#"<p class="muted">You are not on any project yet.</p>"#.to_string()
    } else {
        overview.projects.iter().map(|p| project_line(p)).collect::<String>()
    };

    let tasks = if overview.tasks.is_empty() {
        r#"<p class="muted">No tasks assigned.</p>"#.to_string()
    } else {
        overview.tasks.iter().take(5).map(|t| task_line(t)).collect::<String>()
    };

    format!(
        r#"{}<section class="grid">{}{}{}</section>
<div class="card"><h2>Your Progress</h2>{}<p class="muted">{} of {} tasks completed ({}%)</p></div>
<h2>Your Projects</h2><section class="grid">{}</section>
<h2>Your Tasks</h2><p><a href="/dashboard/tasks">View All</a></p><section class="grid">{}</section>"#,
        notices,
        stat("To Do", overview.to_do),
        stat("In Progress", overview.in_progress),
        stat("Completed", overview.done),
        progress_bar(overview.progress),
        overview.done,
        overview.tasks.len(),
        overview.progress,
        projects,
        tasks
    )
}
