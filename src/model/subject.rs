use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A course in the weekly timetable. A subject is *scheduled* when it has a
/// weekday and both times; unscheduled subjects never take part in conflict
/// checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i32,
    pub name: String,
    pub credits: u32,
    pub professor: Option<String>,
    pub classroom: Option<String>,
    pub category: Option<String>,
    pub day_of_week: Option<Weekday>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl Subject {
    pub fn new(name: impl Into<String>, credits: u32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            credits,
            professor: None,
            classroom: None,
            category: None,
            day_of_week: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_schedule(mut self, day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        self.day_of_week = Some(day);
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn is_scheduled(&self) -> bool {
        self.day_of_week.is_some() && self.start_time.is_some() && self.end_time.is_some()
    }

    /// A weekday without both times (or a reversed interval) is rejected
    /// before any mutation is applied.
    pub fn validate(&self) -> Result<(), String> {
        if self.day_of_week.is_some() {
            let (start, end) = match (self.start_time, self.end_time) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    return Err(format!(
                        "subject '{}' has a weekday but no start/end time",
                        self.name
                    ));
                }
            };
            if start >= end {
                return Err(format!(
                    "subject '{}' has start {} not before end {}",
                    self.name,
                    start.format("%H:%M"),
                    end.format("%H:%M")
                ));
            }
        }
        Ok(())
    }
}
