use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Incomplete,
    InProgress,
    Done,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "incomplete" => Some(Self::Incomplete),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Homework tied to a subject by `subject_id`. The foreign key is not
/// checked on insert; a dangling reference shows up as "unassigned" in
/// display code and is cleaned up by the subject cascade on delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i32,
    pub subject_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    pub priority: Priority,
}

impl Assignment {
    pub fn new(subject_id: i32, title: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self {
            id: 0,
            subject_id,
            title: title.into(),
            description: None,
            due_date,
            status: AssignmentStatus::Incomplete,
            priority: Priority::Normal,
        }
    }

    /// Days from `today` until the due date; negative once overdue, `None`
    /// when no due date is set.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|due| (due - today).num_days())
    }

    /// Due within two days (or already overdue).
    pub fn is_urgent(&self, today: NaiveDate) -> bool {
        matches!(self.days_remaining(today), Some(days) if days <= 2)
    }
}
