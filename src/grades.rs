//! Pure aggregation over store snapshots. Nothing here touches the store or
//! the filesystem; every function is re-derivable from the query copies,
//! which keeps the math testable without a data directory.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::model::{GradeRecord, LetterGrade, Subject, UserGrade};

fn subject_map(subjects: &[Subject]) -> HashMap<i32, &Subject> {
    subjects.iter().map(|s| (s.id, s)).collect()
}

/// Credit-weighted GPA over non-F grades whose subject still exists:
/// `Σ(point·credits) / Σ(credits)`. 0.0 when nothing counts.
pub fn gpa(grades: &[GradeRecord], subjects: &[Subject]) -> f64 {
    let by_id = subject_map(subjects);
    let mut total_points = 0.0;
    let mut total_credits = 0u32;
    for grade in grades {
        if !grade.passed() {
            continue;
        }
        if let Some(subject) = by_id.get(&grade.subject_id) {
            total_points += grade.grade_point * f64::from(subject.credits);
            total_credits += subject.credits;
        }
    }
    if total_credits == 0 {
        0.0
    } else {
        total_points / f64::from(total_credits)
    }
}

/// GPA restricted to one semester label.
pub fn semester_gpa(semester: &str, grades: &[GradeRecord], subjects: &[Subject]) -> f64 {
    let filtered: Vec<GradeRecord> = grades
        .iter()
        .filter(|g| g.semester == semester)
        .cloned()
        .collect();
    gpa(&filtered, subjects)
}

/// Passed credits per subject category. Only grades whose subject exists and
/// carries a category contribute; the key set is whatever categories the
/// subjects use.
pub fn credits_by_category(grades: &[GradeRecord], subjects: &[Subject]) -> HashMap<String, u32> {
    let by_id = subject_map(subjects);
    let mut totals: HashMap<String, u32> = HashMap::new();
    for grade in grades {
        if !grade.passed() {
            continue;
        }
        let Some(subject) = by_id.get(&grade.subject_id) else {
            continue;
        };
        if let Some(category) = &subject.category {
            *totals.entry(category.clone()).or_insert(0) += subject.credits;
        }
    }
    totals
}

/// Total passed credits across all grades with a surviving subject.
pub fn total_credits(grades: &[GradeRecord], subjects: &[Subject]) -> u32 {
    let by_id = subject_map(subjects);
    grades
        .iter()
        .filter(|g| g.passed())
        .filter_map(|g| by_id.get(&g.subject_id).map(|s| s.credits))
        .sum()
}

/// Count of records per letter grade; every letter appears in the result,
/// zero-filled.
pub fn grade_distribution(grades: &[GradeRecord]) -> HashMap<LetterGrade, u32> {
    let mut counts: HashMap<LetterGrade, u32> =
        LetterGrade::ALL.iter().map(|l| (*l, 0)).collect();
    for grade in grades {
        *counts.entry(grade.letter).or_insert(0) += 1;
    }
    counts
}

/// Graduation thresholds. `category_minimums` maps a subject category to the
/// minimum passed credits required in it.
#[derive(Debug, Clone, PartialEq)]
pub struct GraduationRequirements {
    pub min_total_credits: u32,
    pub min_gpa: f64,
    pub category_minimums: HashMap<String, u32>,
}

impl Default for GraduationRequirements {
    fn default() -> Self {
        Self {
            min_total_credits: 130,
            min_gpa: 2.5,
            category_minimums: HashMap::new(),
        }
    }
}

pub fn meets_graduation_requirements(
    grades: &[GradeRecord],
    subjects: &[Subject],
    requirements: &GraduationRequirements,
) -> bool {
    if total_credits(grades, subjects) < requirements.min_total_credits {
        return false;
    }
    if gpa(grades, subjects) < requirements.min_gpa {
        return false;
    }
    let earned = credits_by_category(grades, subjects);
    requirements
        .category_minimums
        .iter()
        .all(|(category, minimum)| earned.get(category).copied().unwrap_or(0) >= *minimum)
}

/// GPA over the ad hoc grade entries, weighted by each record's own credit
/// count. Every record counts here, F included, matching the calculator
/// panel this mirrors.
pub fn user_gpa(grades: &[UserGrade]) -> f64 {
    let mut total_points = 0.0;
    let mut total_credits = 0u32;
    for grade in grades {
        total_points += grade.gpa * f64::from(grade.credits);
        total_credits += grade.credits;
    }
    if total_credits == 0 {
        0.0
    } else {
        total_points / f64::from(total_credits)
    }
}

pub fn user_total_credits(grades: &[UserGrade]) -> u32 {
    grades.iter().map(|g| g.credits).sum()
}

pub fn user_major_credits(grades: &[UserGrade]) -> u32 {
    grades.iter().filter(|g| g.is_major).map(|g| g.credits).sum()
}

pub const USER_GRADUATION_TOTAL_CREDITS: u32 = 130;
pub const USER_GRADUATION_MAJOR_CREDITS: u32 = 60;
pub const USER_GRADUATION_MIN_GPA: f64 = 2.5;

pub fn user_meets_graduation(grades: &[UserGrade]) -> bool {
    user_total_credits(grades) >= USER_GRADUATION_TOTAL_CREDITS
        && user_major_credits(grades) >= USER_GRADUATION_MAJOR_CREDITS
        && user_gpa(grades) >= USER_GRADUATION_MIN_GPA
}

/// Semester label for a date: March-August is `"YYYY-1"`, September-December
/// `"YYYY-2"`, and January/February still belong to the previous year's
/// second semester.
pub fn current_semester(today: NaiveDate) -> String {
    let year = today.year();
    let month = today.month();
    if (3..=8).contains(&month) {
        format!("{year}-1")
    } else if month >= 9 {
        format!("{year}-2")
    } else {
        format!("{}-2", year - 1)
    }
}
