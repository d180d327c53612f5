//! Creation forms. A valid submission is acknowledged with a banner and a
//! draft reference, then the page falls back to a blank form. Nothing is
//! written to the fixture store.

use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use uuid::Uuid;
use crate::AppState;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::{AssignTaskForm, AuthUser, FlashQuery, NewUserForm, ProjectForm, Role, TaskPriority};
use crate::services::queries::projects_managed_by;
use crate::services::{AuthSession, FixtureStore};
use crate::views::nav::Screen;
use crate::views::{escape, options, render_page, workload_bar, Page};
use super::{back_with_error, screen_user};

fn draft_reference() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

fn render_form(
    config: &Config,
    user: &AuthUser,
    screen: Screen,
    body: String,
    error: Option<&str>,
    notice: Option<&str>,
) -> AppResult<Response> {
    let mut page = Page::new(screen, screen.label(), body);
    page.error = error;
    page.notice = notice;
    if notice.is_some() {
        page.refresh = Some((config.forms.banner_seconds, screen.path()));
    }
    Ok(render_page(config, user, page)?.into_response())
}

// Add admin / manager / member

fn user_form_body(store: &FixtureStore, screen: Screen, role: Role) -> String {
    let departments = options(
        std::iter::once(("", "Select a department".to_string()))
            .chain(store.departments().iter().map(|d| (d.id.as_str(), d.name.clone())))
            .chain(std::iter::once(("other", "Other".to_string()))),
        "",
    );
    let note = match role {
        Role::Admin => "New admins will have full system access including user management, project creation, and system configuration.",
        Role::Manager => "Managers can lead projects and assign tasks to members.",
        Role::Member => "Members can be added to projects and receive tasks.",
    };
    format!(
        r#"<form method="post" action="{}">
<label for="name">Full Name</label><input id="name" name="name" required>
<label for="email">Email Address</label><input id="email" name="email" type="email" required>
<label for="department">Department</label><select id="department" name="department" required>{}</select>
<label for="other_department">Department name (if Other)</label><input id="other_department" name="other_department">
<button type="submit">Create {} Account</button>
</form>
<p class="muted">{}</p>"#,
        screen.path(),
        departments,
        role.label(),
        note
    )
}

async fn serve_user_form(
    (store, config): AppState,
    session: Session,
    flash: FlashQuery,
    screen: Screen,
    role: Role,
) -> AppResult<Response> {
    let user = screen_user(&session, screen).await?;
    let body = user_form_body(&store, screen, role);
    render_form(&config, &user, screen, body, flash.error.as_deref(), None)
}

async fn submit_user_form(
    (store, config): AppState,
    session: Session,
    form: NewUserForm,
    screen: Screen,
    role: Role,
) -> AppResult<Response> {
    let user = screen_user(&session, screen).await?;

    if let Err(message) = form.validate() {
        return Ok(back_with_error(screen, &message));
    }
    let department = if form.department == "other" {
        form.other_department.trim().to_string()
    } else {
        match store.department(&form.department) {
            Some(d) => d.name.clone(),
            None => return Ok(back_with_error(screen, "Unknown department")),
        }
    };
    if store.users().iter().any(|u| u.email.eq_ignore_ascii_case(form.email.trim())) {
        return Ok(back_with_error(screen, "A user with this email already exists"));
    }

    let reference = draft_reference();
    tracing::info!(
        "{} submitted a {} account for {} in {} (ref {})",
        user.id,
        role.as_str(),
        form.name,
        department,
        reference
    );
    let notice = format!(
        "{} account for {} created successfully! Reference {}.",
        role.label(),
        form.name.trim(),
        reference
    );
    let body = user_form_body(&store, screen, role);
    render_form(&config, &user, screen, body, None, Some(&notice))
}

pub async fn serve_add_admin(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    serve_user_form(state, session, flash, Screen::AddAdmin, Role::Admin).await
}

pub async fn submit_add_admin(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewUserForm>,
) -> AppResult<Response> {
    submit_user_form(state, session, form, Screen::AddAdmin, Role::Admin).await
}

pub async fn serve_add_manager(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    serve_user_form(state, session, flash, Screen::AddManager, Role::Manager).await
}

pub async fn submit_add_manager(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewUserForm>,
) -> AppResult<Response> {
    submit_user_form(state, session, form, Screen::AddManager, Role::Manager).await
}

pub async fn serve_add_member(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    serve_user_form(state, session, flash, Screen::AddMember, Role::Member).await
}

pub async fn submit_add_member(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewUserForm>,
) -> AppResult<Response> {
    submit_user_form(state, session, form, Screen::AddMember, Role::Member).await
}

// Add project

fn project_form_body(auth: &AuthSession<'_>) -> String {
    let managers = options(
        std::iter::once(("", "Select a manager".to_string())).chain(
            auth.get_all_managers()
                .into_iter()
                .map(|m| (m.id.as_str(), format!("{} - {}", m.name, m.department))),
        ),
        "",
    );
    let members = auth
        .get_all_members()
        .into_iter()
        .map(|m| {
            format!(
                r#"<label><input type="checkbox" name="members" value="{}"> {} <span class="muted">{}</span></label>{}"#,
                escape(&m.id),
                escape(&m.name),
                escape(&m.department),
                workload_bar(m.current_workload)
            )
        })
        .collect::<String>();
    format!(
        r#"<form method="post" action="{}">
<label for="name">Project Name</label><input id="name" name="name" required>
<label for="description">Description</label><textarea id="description" name="description" required></textarea>
<label for="manager">Assign Manager</label><select id="manager" name="manager" required>{}</select>
<fieldset><legend>Team Members</legend>{}</fieldset>
<button type="submit">Create Project</button>
</form>
<p class="muted">You can add members to this project after creation.</p>"#,
        Screen::AddProject.path(),
        managers,
        members
    )
}

pub async fn serve_add_project(
    State((store, config)): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::AddProject).await?;
    let body = project_form_body(&AuthSession::resume(&store, Some(user.clone())));
    render_form(&config, &user, Screen::AddProject, body, flash.error.as_deref(), None)
}

// Repeated `members` fields need the html-form flavoured extractor.
pub async fn submit_add_project(
    State((store, config)): State<AppState>,
    session: Session,
    axum_extra::extract::Form(form): axum_extra::extract::Form<ProjectForm>,
) -> AppResult<Response> {
    let screen = Screen::AddProject;
    let user = screen_user(&session, screen).await?;
    let auth = AuthSession::resume(&store, Some(user.clone()));

    if let Err(message) = form.validate() {
        return Ok(back_with_error(screen, &message));
    }
    let manager = match auth.get_user_data(&form.manager).filter(|m| m.role == Role::Manager) {
        Some(manager) => manager,
        None => return Ok(back_with_error(screen, "Selected manager does not exist")),
    };
    let all_members = form.members.iter().all(|id| {
        auth.get_user_data(id).is_some_and(|m| m.role == Role::Member)
    });
    if !all_members {
        return Ok(back_with_error(screen, "Only members can join a project team"));
    }

    let reference = draft_reference();
    tracing::info!(
        "{} submitted project {} for manager {} with {} members (ref {})",
        user.id,
        form.name,
        manager.id,
        form.members.len(),
        reference
    );
    let notice = format!(
        "Project '{}' created successfully with {} member(s) under {}! Reference {}.",
        form.name.trim(),
        form.members.len(),
        manager.name,
        reference
    );
    let body = project_form_body(&auth);
    render_form(&config, &user, screen, body, None, Some(&notice))
}

// Assign task

fn assign_task_body(store: &FixtureStore, auth: &AuthSession<'_>, manager_id: &str) -> String {
    let projects = options(
        std::iter::once(("", "Select a project".to_string()))
            .chain(
                projects_managed_by(store, manager_id)
                    .into_iter()
                    .map(|p| (p.id.as_str(), p.name.clone())),
            )
            .chain(std::iter::once(("other", "Other".to_string()))),
        "",
    );
    let members = options(
        std::iter::once(("", "Select a member".to_string())).chain(
            auth.get_members_under_manager(manager_id)
                .into_iter()
                .map(|m| (m.id.as_str(), format!("{} - {}% workload", m.name, m.current_workload))),
        ),
        "",
    );
    let priorities = options(
        TaskPriority::ALL.iter().map(|p| (p.as_str(), p.label().to_string())),
        TaskPriority::default().as_str(),
    );
    format!(
        r#"<form method="post" action="{}">
<label for="title">Task Title</label><input id="title" name="title" required>
<label for="description">Description</label><textarea id="description" name="description" required></textarea>
<label for="project">Select Project</label><select id="project" name="project" required>{}</select>
<label for="custom_project">Project Name (if Other)</label><input id="custom_project" name="custom_project">
<label for="assigned_to">Assign To Member</label><select id="assigned_to" name="assigned_to" required>{}</select>
<label for="priority">Priority Level</label><select id="priority" name="priority">{}</select>
<label for="due_date">Due Date</label><input id="due_date" name="due_date" type="date" required>
<button type="submit">Assign Task</button>
</form>
<p class="muted">The assigned member will receive a notification about the new task on their dashboard.</p>"#,
        Screen::AssignTask.path(),
        projects,
        members,
        priorities
    )
}

pub async fn serve_assign_task(
    State((store, config)): State<AppState>,
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    let user = screen_user(&session, Screen::AssignTask).await?;
    let auth = AuthSession::resume(&store, Some(user.clone()));
    let body = assign_task_body(&store, &auth, &user.id);
    render_form(&config, &user, Screen::AssignTask, body, flash.error.as_deref(), None)
}

pub async fn submit_assign_task(
    State((store, config)): State<AppState>,
    session: Session,
    Form(form): Form<AssignTaskForm>,
) -> AppResult<Response> {
    let screen = Screen::AssignTask;
    let user = screen_user(&session, screen).await?;
    let auth = AuthSession::resume(&store, Some(user.clone()));

    if let Err(message) = form.validate() {
        return Ok(back_with_error(screen, &message));
    }
    let project_name = if form.project == "other" {
        form.custom_project.trim().to_string()
    } else {
        match projects_managed_by(&store, &user.id).into_iter().find(|p| p.id == form.project) {
            Some(project) => project.name.clone(),
            None => return Ok(back_with_error(screen, "You can only assign tasks on your own projects")),
        }
    };
    let assignee = match auth
        .get_members_under_manager(&user.id)
        .into_iter()
        .find(|m| m.id == form.assigned_to)
    {
        Some(member) => member,
        None => return Ok(back_with_error(screen, "Selected member does not exist")),
    };

    let reference = draft_reference();
    tracing::info!(
        "{} assigned '{}' on {} to {} ({} priority, due {}, ref {})",
        user.id,
        form.title,
        project_name,
        assignee.id,
        form.priority.as_str(),
        form.due_date,
        reference
    );
    let notice = format!(
        "Task '{}' assigned to {} successfully! Reference {}.",
        form.title.trim(),
        assignee.name,
        reference
    );
    let body = assign_task_body(&store, &auth, &user.id);
    render_form(&config, &user, screen, body, None, Some(&notice))
}
