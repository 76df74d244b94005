use std::collections::HashMap;

use chrono::NaiveDate;
use planner_store::grades::{
    credits_by_category, current_semester, gpa, grade_distribution, meets_graduation_requirements,
    semester_gpa, total_credits, user_gpa, user_major_credits, user_meets_graduation,
    user_total_credits, GraduationRequirements,
};
use planner_store::{GradeRecord, LetterGrade, Subject, UserGrade};

fn subject(id: i32, name: &str, credits: u32, category: Option<&str>) -> Subject {
    let mut subject = Subject::new(name, credits);
    subject.id = id;
    subject.category = category.map(str::to_string);
    subject
}

fn grade(id: i32, subject_id: i32, semester: &str, letter: LetterGrade) -> GradeRecord {
    let mut record = GradeRecord::new(subject_id, semester, 0.0, letter);
    record.id = id;
    record
}

#[test]
fn gpa_is_credit_weighted_over_non_f_grades() {
    let subjects = vec![
        subject(1, "Databases", 3, None),
        subject(2, "Ethics", 2, None),
    ];
    let grades = vec![
        grade(1, 1, "2025-1", LetterGrade::A),
        grade(2, 2, "2025-1", LetterGrade::F),
    ];
    assert_eq!(gpa(&grades, &subjects), 4.0);
    assert_eq!(total_credits(&grades, &subjects), 3);
}

#[test]
fn gpa_over_nothing_is_zero() {
    assert_eq!(gpa(&[], &[]), 0.0);
    // A grade whose subject was deleted contributes nothing.
    let orphan = vec![grade(1, 9, "2025-1", LetterGrade::A)];
    assert_eq!(gpa(&orphan, &[]), 0.0);
}

#[test]
fn gpa_mixes_letters_by_credit_weight() {
    let subjects = vec![
        subject(1, "Databases", 3, None),
        subject(2, "Networks", 1, None),
    ];
    let grades = vec![
        grade(1, 1, "2025-1", LetterGrade::A),    // 4.0 * 3
        grade(2, 2, "2025-1", LetterGrade::B),    // 3.0 * 1
    ];
    assert!((gpa(&grades, &subjects) - 3.75).abs() < 1e-9);
}

#[test]
fn semester_gpa_filters_by_label() {
    let subjects = vec![
        subject(1, "Databases", 3, None),
        subject(2, "Networks", 3, None),
    ];
    let grades = vec![
        grade(1, 1, "2025-1", LetterGrade::A),
        grade(2, 2, "2025-2", LetterGrade::C),
    ];
    assert_eq!(semester_gpa("2025-1", &grades, &subjects), 4.0);
    assert_eq!(semester_gpa("2025-2", &grades, &subjects), 2.0);
    assert_eq!(semester_gpa("2024-1", &grades, &subjects), 0.0);
}

#[test]
fn category_totals_count_only_passed_credits() {
    let subjects = vec![
        subject(1, "Databases", 3, Some("major-required")),
        subject(2, "Networks", 3, Some("major-required")),
        subject(3, "Writing", 2, Some("liberal-arts")),
        subject(4, "Reading group", 1, None),
    ];
    let grades = vec![
        grade(1, 1, "2025-1", LetterGrade::A),
        grade(2, 2, "2025-1", LetterGrade::F),
        grade(3, 3, "2025-1", LetterGrade::BPlus),
        grade(4, 4, "2025-1", LetterGrade::A),
    ];
    let totals = credits_by_category(&grades, &subjects);
    assert_eq!(totals.get("major-required"), Some(&3));
    assert_eq!(totals.get("liberal-arts"), Some(&2));
    // Subjects without a category contribute to no bucket.
    assert_eq!(totals.len(), 2);
}

#[test]
fn distribution_counts_every_letter_and_zero_fills_the_rest() {
    let grades = vec![
        grade(1, 1, "2025-1", LetterGrade::A),
        grade(2, 2, "2025-1", LetterGrade::A),
        grade(3, 3, "2025-1", LetterGrade::F),
    ];
    let distribution = grade_distribution(&grades);
    assert_eq!(distribution.len(), LetterGrade::ALL.len());
    assert_eq!(distribution[&LetterGrade::A], 2);
    assert_eq!(distribution[&LetterGrade::F], 1);
    assert_eq!(distribution[&LetterGrade::BPlus], 0);
}

#[test]
fn graduation_check_applies_every_threshold() {
    let subjects = vec![
        subject(1, "Capstone", 100, Some("major-required")),
        subject(2, "Electives", 40, Some("liberal-arts")),
    ];
    let grades = vec![
        grade(1, 1, "2025-1", LetterGrade::A),
        grade(2, 2, "2025-1", LetterGrade::B),
    ];
    let mut requirements = GraduationRequirements::default();
    assert!(meets_graduation_requirements(&grades, &subjects, &requirements));

    requirements.category_minimums =
        HashMap::from([("major-required".to_string(), 110u32)]);
    assert!(!meets_graduation_requirements(&grades, &subjects, &requirements));

    let strict = GraduationRequirements {
        min_total_credits: 200,
        ..GraduationRequirements::default()
    };
    assert!(!meets_graduation_requirements(&grades, &subjects, &strict));
}

#[test]
fn user_grade_calculator_matches_the_panel_rules() {
    let grades = vec![
        UserGrade::new("Databases", LetterGrade::APlus, 3, true), // 4.5
        UserGrade::new("Writing", LetterGrade::B, 2, false),      // 3.0
    ];
    assert_eq!(user_total_credits(&grades), 5);
    assert_eq!(user_major_credits(&grades), 3);
    let expected = (4.5 * 3.0 + 3.0 * 2.0) / 5.0;
    assert!((user_gpa(&grades) - expected).abs() < 1e-9);
    // Far short of 130 credits.
    assert!(!user_meets_graduation(&grades));
}

#[test]
fn semester_labels_split_the_year_in_march_and_september() {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    assert_eq!(current_semester(date(2025, 3, 1)), "2025-1");
    assert_eq!(current_semester(date(2025, 8, 31)), "2025-1");
    assert_eq!(current_semester(date(2025, 9, 1)), "2025-2");
    assert_eq!(current_semester(date(2025, 12, 31)), "2025-2");
    // January still belongs to the previous year's second semester.
    assert_eq!(current_semester(date(2026, 1, 15)), "2025-2");
    assert_eq!(current_semester(date(2026, 2, 28)), "2025-2");
}
