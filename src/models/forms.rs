use serde::Deserialize;
use super::task::{TaskPriority, TaskStatus};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Shared by the add-admin, add-manager and add-member screens.
#[derive(Debug, Deserialize, Default)]
pub struct NewUserForm {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub other_department: String,
}

impl NewUserForm {
    pub fn validate(&self) -> Result<(), String> {
        require("Full name", &self.name)?;
        require("Email address", &self.email)?;
        if !self.email.contains('@') {
            return Err("Email address must contain '@'".into());
        }
        require("Department", &self.department)?;
        if self.department == "other" {
            require("Department name", &self.other_department)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub manager: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<(), String> {
        require("Project name", &self.name)?;
        require("Description", &self.description)?;
        require("Manager", &self.manager)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AssignTaskForm {
    pub title: String,
    pub description: String,
    pub project: String,
    #[serde(default)]
    pub custom_project: String,
    pub assigned_to: String,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: String,
}

impl AssignTaskForm {
    pub fn validate(&self) -> Result<(), String> {
        require("Task title", &self.title)?;
        require("Description", &self.description)?;
        require("Project", &self.project)?;
        if self.project == "other" {
            require("Project name", &self.custom_project)?;
        }
        require("Member", &self.assigned_to)?;
        require("Due date", &self.due_date)?;
        chrono::NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d")
            .map_err(|_| "Due date must be a valid date".to_string())?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ProfileForm {
    pub name: String,
    pub address: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub photo_url: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), String> {
        require("Full name", &self.name)?;
        if !self.date_of_birth.trim().is_empty() {
            chrono::NaiveDate::parse_from_str(&self.date_of_birth, "%Y-%m-%d")
                .map_err(|_| "Date of birth must be a valid date".to_string())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PasswordForm {
    pub current: String,
    pub new_password: String,
    pub confirm: String,
}

impl PasswordForm {
    pub fn validate(&self) -> Result<(), String> {
        require("Current password", &self.current)?;
        require("New password", &self.new_password)?;
        if self.new_password != self.confirm {
            return Err("Passwords don't match".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: TaskStatus,
}

/// `?error=` / `?notice=` carried back to a screen after a redirect.
#[derive(Debug, Deserialize, Default)]
pub struct FlashQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DetailQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub id: Option<String>,
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}
