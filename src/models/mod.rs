mod user;
mod project;
mod forms;
mod task;

pub use user::{AuthUser, Credential, Department, Role, User};
pub use project::{Project, ProjectStatus};
pub use forms::{
    AssignTaskForm, DetailQuery, FlashQuery, LoginForm, NewUserForm, PasswordForm, ProfileForm,
    ProjectForm, StatusForm, TaskQuery,
};
pub use task::{Task, TaskPriority, TaskStatus};
