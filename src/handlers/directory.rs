use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use crate::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{DetailQuery, Role, User};
use crate::services::queries::{
    manager_team_size, member_progress, projects_managed_by, tasks_assigned_to,
};
use crate::services::{AuthSession, FixtureStore};
use crate::views::badge::task_status_tone;
use crate::views::nav::Screen;
use crate::views::{badge, escape, progress_bar, render_page, workload_bar, Page};
use super::screen_user;

pub async fn serve_managers(
    State((store, config)): State<AppState>,
    session: Session,
    Query(query): Query<DetailQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Managers).await?;
    let auth = AuthSession::resume(&store, Some(user.clone()));
    let managers = auth.get_managers_for_admin();

    let detail = match query.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => {
            let manager = find_listed(&managers, id)?;
            manager_detail(&store, manager)
        }
        None => String::new(),
    };

    let cards = if managers.is_empty() {
        r#"<p class="muted">No managers found.</p>"#.to_string()
    } else {
        managers
            .iter()
            .map(|m| {
                format!(
                    r#"<div class="card"><a href="/dashboard/managers?id={}"><strong>{}</strong></a>
<p class="muted">{} · {}</p><p>{} years experience · {} projects</p>{}</div>"#,
                    escape(&m.id),
                    escape(&m.name),
                    escape(&m.email),
                    escape(&m.department),
                    m.experience,
                    projects_managed_by(&store, &m.id).len(),
                    workload_bar(m.current_workload)
                )
            })
            .collect::<String>()
    };

    let body = format!(r#"{}<section class="grid">{}</section>"#, detail, cards);
    Ok(render_page(&config, &user, Page::new(Screen::Managers, "Managers", body))?.into_response())
}

pub async fn serve_members(
    State((store, config)): State<AppState>,
    session: Session,
    Query(query): Query<DetailQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::Members).await?;
    let auth = AuthSession::resume(&store, Some(user.clone()));
    let members = match user.role {
        Role::Manager => auth.get_members_under_manager(&user.id),
        Role::Admin | Role::Member => auth.get_all_members(),
    };

    let detail = match query.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => {
            let member = find_listed(&members, id)?;
            member_detail(&store, member)
        }
        None => String::new(),
    };

    let cards = if members.is_empty() {
        r#"<p class="muted">No members found.</p>"#.to_string()
    } else {
        members
            .iter()
            .map(|m| {
                let progress = member_progress(&store, &m.id);
                format!(
                    r#"<div class="card"><a href="/dashboard/members?id={}"><strong>{}</strong></a>
<p class="muted">{} · {}</p><p>{} tasks · {} years experience</p>
<p>Progress {}%</p>{}<p>Workload</p>{}</div>"#,
                    escape(&m.id),
                    escape(&m.name),
                    escape(&m.email),
                    escape(&m.department),
                    tasks_assigned_to(&store, &m.id).len(),
                    m.experience,
                    progress,
                    progress_bar(progress),
                    workload_bar(m.current_workload)
                )
            })
            .collect::<String>()
    };

    let body = format!(r#"{}<section class="grid">{}</section>"#, detail, cards);
    Ok(render_page(&config, &user, Page::new(Screen::Members, "Team Members", body))?.into_response())
}

fn find_listed<'a>(listed: &[&'a User], id: &str) -> AppResult<&'a User> {
    listed
        .iter()
        .find(|u| u.id == id)
        .copied()
        .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
}

fn manager_detail(store: &FixtureStore, manager: &User) -> String {
    let projects = projects_managed_by(store, &manager.id);
    let items = if projects.is_empty() {
        r#"<li class="muted">No projects assigned</li>"#.to_string()
    } else {
        projects
            .iter()
            .map(|p| format!("<li>{} <span class=\"muted\">{} team members</span></li>", escape(&p.name), p.member_ids.len()))
            .collect::<String>()
    };
    format!(
        r#"<div class="card detail"><h2>{}</h2><p>{} · {}</p>
<h3>Projects</h3><ul>{}</ul>
<p>Team size across projects: {}</p><p>Workload</p>{}</div>"#,
        escape(&manager.name),
        escape(&manager.email),
        escape(&manager.department),
        items,
        manager_team_size(store, &manager.id),
        workload_bar(manager.current_workload)
    )
}

fn member_detail(store: &FixtureStore, member: &User) -> String {
    let tasks = tasks_assigned_to(store, &member.id);
    let items = if tasks.is_empty() {
        r#"<li class="muted">No tasks assigned</li>"#.to_string()
    } else {
        tasks
            .iter()
            .map(|t| format!("<li>{} {}</li>", escape(&t.title), badge(task_status_tone(t.status), t.status.label())))
            .collect::<String>()
    };
    let progress = member_progress(store, &member.id);
    format!(
        r#"<div class="card detail"><h2>{}</h2><p>{} · {}</p>
<h3>Tasks</h3><ul>{}</ul>
<p>Overall Progress {}%</p>{}</div>"#,
        escape(&member.name),
        escape(&member.email),
        escape(&member.department),
        items,
        progress,
        progress_bar(progress)
    )
}
