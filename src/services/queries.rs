//! Role-scoped views over the fixture store and the figures derived from them.
//!
//! Every visibility rule dispatches on [`Role`] in one `match`, so a new role
//! fails to compile until each rule says what it may see.

use std::collections::HashSet;
use crate::models::{AuthUser, Project, ProjectStatus, Role, Task, TaskStatus, User};
use super::auth_session::AuthSession;
use super::fixture_store::FixtureStore;

pub fn can_see_project(viewer: &AuthUser, project: &Project) -> bool {
    match viewer.role {
        Role::Admin => true,
        Role::Manager => project.manager_id == viewer.id,
        Role::Member => project.has_member(&viewer.id),
    }
}

pub fn visible_projects<'a>(store: &'a FixtureStore, viewer: &AuthUser) -> Vec<&'a Project> {
    store
        .projects()
        .iter()
        .filter(|p| can_see_project(viewer, p))
        .collect()
}

pub fn visible_tasks<'a>(store: &'a FixtureStore, viewer: &AuthUser) -> Vec<&'a Task> {
    match viewer.role {
        Role::Admin => store.tasks().iter().collect(),
        Role::Manager => {
            let own: HashSet<&str> = projects_managed_by(store, &viewer.id)
                .into_iter()
                .map(|p| p.id.as_str())
                .collect();
            store
                .tasks()
                .iter()
                .filter(|t| own.contains(t.project_id.as_str()))
                .collect()
        }
        Role::Member => tasks_assigned_to(store, &viewer.id),
    }
}

pub fn can_see_task(store: &FixtureStore, viewer: &AuthUser, task: &Task) -> bool {
    match viewer.role {
        Role::Admin => true,
        Role::Manager => store
            .project(&task.project_id)
            .is_some_and(|p| p.manager_id == viewer.id),
        Role::Member => task.assigned_to == viewer.id,
    }
}

/// Whole-number percentage, rounded half up. Zero when there is nothing to count.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

pub fn count_status(tasks: &[&Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|t| t.status == status).count()
}

pub fn filter_by_status<'a>(tasks: Vec<&'a Task>, status: Option<TaskStatus>) -> Vec<&'a Task> {
    match status {
        Some(status) => tasks.into_iter().filter(|t| t.status == status).collect(),
        None => tasks,
    }
}

pub fn projects_managed_by<'a>(store: &'a FixtureStore, manager_id: &str) -> Vec<&'a Project> {
    store
        .projects()
        .iter()
        .filter(|p| p.manager_id == manager_id)
        .collect()
}

pub fn tasks_for_project<'a>(store: &'a FixtureStore, project_id: &str) -> Vec<&'a Task> {
    store
        .tasks()
        .iter()
        .filter(|t| t.project_id == project_id)
        .collect()
}

pub fn tasks_assigned_to<'a>(store: &'a FixtureStore, user_id: &str) -> Vec<&'a Task> {
    store
        .tasks()
        .iter()
        .filter(|t| t.assigned_to == user_id)
        .collect()
}

/// Team members in directory order. Ids that match no user are skipped.
pub fn project_members<'a>(store: &'a FixtureStore, project: &Project) -> Vec<&'a User> {
    store
        .users()
        .iter()
        .filter(|u| project.has_member(&u.id))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSummary {
    pub done: usize,
    pub total: usize,
}

pub fn project_task_summary(store: &FixtureStore, project_id: &str) -> TaskSummary {
    let tasks = tasks_for_project(store, project_id);
    TaskSummary {
        done: count_status(&tasks, TaskStatus::Done),
        total: tasks.len(),
    }
}

pub fn member_progress(store: &FixtureStore, member_id: &str) -> u8 {
    let tasks = tasks_assigned_to(store, member_id);
    percentage(count_status(&tasks, TaskStatus::Done), tasks.len())
}

/// Head count across a manager's projects. People on two projects count twice.
pub fn manager_team_size(store: &FixtureStore, manager_id: &str) -> usize {
    projects_managed_by(store, manager_id)
        .iter()
        .map(|p| p.member_ids.len())
        .sum()
}

fn last_two<T: Copy>(items: &[T]) -> Vec<T> {
    items[items.len().saturating_sub(2)..].to_vec()
}

#[derive(Debug)]
pub struct AdminOverview<'a> {
    pub total_projects: usize,
    pub completed_projects: usize,
    pub in_progress_projects: usize,
    pub done_tasks: usize,
    pub total_tasks: usize,
    pub task_completion: u8,
    pub recent_projects: Vec<&'a Project>,
    pub recent_tasks: Vec<&'a Task>,
}

#[derive(Debug)]
pub struct ManagerOverview<'a> {
    pub projects: Vec<&'a Project>,
    pub open_tasks: usize,
    pub new_projects: Vec<&'a Project>,
    pub team: Vec<&'a User>,
}

#[derive(Debug)]
pub struct MemberOverview<'a> {
    pub tasks: Vec<&'a Task>,
    pub to_do: usize,
    pub in_progress: usize,
    pub done: usize,
    pub progress: u8,
    pub new_tasks: Vec<&'a Task>,
    pub projects: Vec<&'a Project>,
    pub new_projects: Vec<&'a Project>,
}

#[derive(Debug)]
pub enum Dashboard<'a> {
    Admin(AdminOverview<'a>),
    Manager(ManagerOverview<'a>),
    Member(MemberOverview<'a>),
}

/// Figures for the landing screen of whoever is logged in.
pub fn dashboard<'a>(session: &AuthSession<'a>) -> Option<Dashboard<'a>> {
    let viewer = session.user()?;
    let store = session.store();
    let projects = visible_projects(store, viewer);
    let tasks = visible_tasks(store, viewer);

    let dashboard = match viewer.role {
        Role::Admin => Dashboard::Admin(AdminOverview {
            total_projects: projects.len(),
            completed_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Completed)
                .count(),
            in_progress_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::InProgress)
                .count(),
            done_tasks: count_status(&tasks, TaskStatus::Done),
            total_tasks: tasks.len(),
            task_completion: percentage(count_status(&tasks, TaskStatus::Done), tasks.len()),
            recent_projects: projects.iter().take(3).copied().collect(),
            recent_tasks: tasks.iter().take(3).copied().collect(),
        }),
        Role::Manager => Dashboard::Manager(ManagerOverview {
            open_tasks: tasks.iter().filter(|t| t.status != TaskStatus::Done).count(),
            new_projects: last_two(&projects),
            team: session.get_members_under_manager(&viewer.id),
            projects,
        }),
        Role::Member => {
            let done = count_status(&tasks, TaskStatus::Done);
            Dashboard::Member(MemberOverview {
                to_do: count_status(&tasks, TaskStatus::ToDo),
                in_progress: count_status(&tasks, TaskStatus::InProgress),
                done,
                progress: percentage(done, tasks.len()),
                new_tasks: tasks
                    .iter()
                    .filter(|t| t.status == TaskStatus::ToDo)
                    .take(2)
                    .copied()
                    .collect(),
                new_projects: last_two(&projects),
                projects,
                tasks,
            })
        }
    };
    Some(dashboard)
}
