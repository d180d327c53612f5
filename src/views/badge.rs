// Presentation tiers for statuses, priorities and percentages.
use crate::models::{ProjectStatus, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Outline,
    Default,
    Secondary,
    Danger,
    Warning,
    Success,
}

impl Tone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Outline => "badge badge-outline",
            Tone::Default => "badge badge-default",
            Tone::Secondary => "badge badge-secondary",
            Tone::Danger => "badge badge-danger",
            Tone::Warning => "badge badge-warning",
            Tone::Success => "badge badge-success",
        }
    }
}

pub fn project_status_tone(status: ProjectStatus) -> Tone {
    match status {
        ProjectStatus::Planning => Tone::Outline,
        ProjectStatus::InProgress => Tone::Default,
        ProjectStatus::Completed => Tone::Secondary,
    }
}

pub fn task_status_tone(status: TaskStatus) -> Tone {
    match status {
        TaskStatus::ToDo => Tone::Outline,
        TaskStatus::InProgress => Tone::Default,
        TaskStatus::Done => Tone::Secondary,
    }
}

pub fn priority_tone(priority: TaskPriority) -> Tone {
    match priority {
        TaskPriority::High => Tone::Danger,
        TaskPriority::Medium => Tone::Warning,
        TaskPriority::Low => Tone::Success,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    Complete,
    High,
    Medium,
    Low,
    NotStarted,
}

impl ProgressTier {
    pub fn css_class(&self) -> &'static str {
        match self {
            ProgressTier::Complete => "bar bar-complete",
            ProgressTier::High => "bar bar-high",
            ProgressTier::Medium => "bar bar-medium",
            ProgressTier::Low => "bar bar-low",
            ProgressTier::NotStarted => "bar bar-none",
        }
    }
}

pub fn progress_tier(percent: u8) -> ProgressTier {
    match percent {
        100.. => ProgressTier::Complete,
        61..=99 => ProgressTier::High,
        31..=60 => ProgressTier::Medium,
        1..=30 => ProgressTier::Low,
        0 => ProgressTier::NotStarted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadTier {
    Critical,
    Elevated,
    Normal,
}

impl WorkloadTier {
    pub fn css_class(&self) -> &'static str {
        match self {
            WorkloadTier::Critical => "bar bar-critical",
            WorkloadTier::Elevated => "bar bar-elevated",
            WorkloadTier::Normal => "bar bar-normal",
        }
    }
}

pub fn workload_tier(percent: u8) -> WorkloadTier {
    if percent > 80 {
        WorkloadTier::Critical
    } else if percent > 60 {
        WorkloadTier::Elevated
    } else {
        WorkloadTier::Normal
    }
}
