use crate::errors::{AppError, AppResult};
use crate::models::{AuthUser, Role};

/// Every screen the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Profile,
    Projects,
    Managers,
    Members,
    Tasks,
    AddAdmin,
    AddManager,
    AddMember,
    AddProject,
    AssignTask,
}

const ADMIN_MENU: &[Screen] = &[
    Screen::Dashboard,
    Screen::Profile,
    Screen::Projects,
    Screen::Managers,
    Screen::Members,
    Screen::AddAdmin,
    Screen::AddManager,
    Screen::AddMember,
    Screen::AddProject,
];

const MANAGER_MENU: &[Screen] = &[
    Screen::Dashboard,
    Screen::Profile,
    Screen::Projects,
    Screen::Members,
    Screen::Tasks,
    Screen::AssignTask,
];

const MEMBER_MENU: &[Screen] = &[
    Screen::Dashboard,
    Screen::Profile,
    Screen::Projects,
    Screen::Tasks,
];

impl Screen {
    /// The one place a role is mapped to the screens it may open.
    pub fn menu(role: Role) -> &'static [Screen] {
        match role {
            Role::Admin => ADMIN_MENU,
            Role::Manager => MANAGER_MENU,
            Role::Member => MEMBER_MENU,
        }
    }

    pub fn allows(self, role: Role) -> bool {
        Self::menu(role).contains(&self)
    }

    pub fn ensure_allowed(self, user: &AuthUser) -> AppResult<()> {
        if self.allows(user.role) {
            Ok(())
        } else {
            tracing::warn!("{} ({}) refused {}", user.id, user.role.as_str(), self.path());
            Err(AppError::Forbidden(self.path().to_string()))
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Screen::Dashboard => "/dashboard",
            Screen::Profile => "/dashboard/profile",
            Screen::Projects => "/dashboard/projects",
            Screen::Managers => "/dashboard/managers",
            Screen::Members => "/dashboard/members",
            Screen::Tasks => "/dashboard/tasks",
            Screen::AddAdmin => "/dashboard/add-admin",
            Screen::AddManager => "/dashboard/add-manager",
            Screen::AddMember => "/dashboard/add-member",
            Screen::AddProject => "/dashboard/add-project",
            Screen::AssignTask => "/dashboard/assign-task",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Profile => "Profile",
            Screen::Projects => "Projects",
            Screen::Managers => "Managers",
            Screen::Members => "Members",
            Screen::Tasks => "Tasks",
            Screen::AddAdmin => "Add Admin",
            Screen::AddManager => "Add Manager",
            Screen::AddMember => "Add Member",
            Screen::AddProject => "Add Project",
            Screen::AssignTask => "Assign Task",
        }
    }
}
