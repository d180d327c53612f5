use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::models::{Task, TaskStatus};

/// Per-visitor task status changes made from the task screen.
///
/// Lives only in the visitor's session and is dropped at logout. It is never
/// written back to the fixture store, so a fresh lookup always returns the
/// task as loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusOverlay {
    overrides: HashMap<String, TaskStatus>,
}

impl StatusOverlay {
    pub fn set(&mut self, task_id: &str, status: TaskStatus) {
        self.overrides.insert(task_id.to_string(), status);
    }

    pub fn get(&self, task_id: &str) -> Option<TaskStatus> {
        self.overrides.get(task_id).copied()
    }

    /// The status to show for `task`: the override if one exists, else its own.
    pub fn display_status(&self, task: &Task) -> TaskStatus {
        self.get(&task.id).unwrap_or(task.status)
    }

}
