//! Timetable conflict detection over the subject collection.
//!
//! Two subjects conflict when they share a weekday and their half-open
//! `[start, end)` intervals overlap. Touching intervals (one ends exactly
//! when the other starts) do not conflict. Subjects without a full schedule
//! never conflict.

use chrono::NaiveTime;

use crate::model::Subject;

/// Pairwise check; symmetric.
pub fn conflicts(a: &Subject, b: &Subject) -> bool {
    let (Some(day_a), Some(day_b)) = (a.day_of_week, b.day_of_week) else {
        return false;
    };
    if day_a != day_b {
        return false;
    }
    match (a.start_time, a.end_time, b.start_time, b.end_time) {
        (Some(start_a), Some(end_a), Some(start_b), Some(end_b)) => {
            overlaps(start_a, end_a, start_b, end_b)
        }
        _ => false,
    }
}

fn overlaps(start_a: NaiveTime, end_a: NaiveTime, start_b: NaiveTime, end_b: NaiveTime) -> bool {
    start_a < end_b && start_b < end_a
}

/// O(n) scan of `subjects` for a slot collision with `candidate`.
/// `except_id` lets edit flows skip the subject being edited so it never
/// conflicts with itself.
pub fn has_conflict(subjects: &[Subject], candidate: &Subject, except_id: Option<i32>) -> bool {
    find_conflict(subjects, candidate, except_id).is_some()
}

/// Like [`has_conflict`] but reports the id of the first colliding subject.
pub fn find_conflict(
    subjects: &[Subject],
    candidate: &Subject,
    except_id: Option<i32>,
) -> Option<i32> {
    subjects
        .iter()
        .filter(|existing| Some(existing.id) != except_id)
        .find(|existing| conflicts(existing, candidate))
        .map(|existing| existing.id)
}

/// Full O(n²) consistency scan; returns every conflicting id pair once.
/// Intended for small collections (tens of subjects).
pub fn scan_conflicts(subjects: &[Subject]) -> Vec<(i32, i32)> {
    let mut pairs = Vec::new();
    for (idx, a) in subjects.iter().enumerate() {
        for b in &subjects[idx + 1..] {
            if conflicts(a, b) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}
