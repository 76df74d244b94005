use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A scheduled exam for a subject. `kind` is free-form ("midterm", "final",
/// "quiz", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: i32,
    pub subject_id: i32,
    pub title: String,
    pub kind: Option<String>,
    pub datetime: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl Exam {
    pub fn new(
        subject_id: i32,
        title: impl Into<String>,
        kind: Option<String>,
        datetime: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id: 0,
            subject_id,
            title: title.into(),
            kind,
            datetime,
            location: None,
            description: None,
        }
    }

    /// Whole hours from `now` until the exam; negative once it has started,
    /// `None` when no date is set.
    pub fn hours_remaining(&self, now: NaiveDateTime) -> Option<i64> {
        self.datetime.map(|at| (at - now).num_hours())
    }

    /// Starts within the next 24 hours.
    pub fn is_imminent(&self, now: NaiveDateTime) -> bool {
        matches!(self.hours_remaining(now), Some(hours) if hours > 0 && hours <= 24)
    }
}
