//! Interchange formats on top of the flat files: a whole-planner JSON
//! snapshot and CSV export/import of the subject collection. Both are side
//! formats; the pipe-delimited files under the data directory stay the
//! source of truth.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PersistenceError, PersistenceResult};
use crate::codec;
use crate::model::{Assignment, Exam, GradeRecord, Subject, UserGrade};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PlannerSnapshot {
    pub subjects: Vec<Subject>,
    pub assignments: Vec<Assignment>,
    pub exams: Vec<Exam>,
    pub grades: Vec<GradeRecord>,
    pub user_grades: Vec<UserGrade>,
}

fn check_unique_ids(ids: impl Iterator<Item = i32>, what: &str) -> PersistenceResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate {what} id {id}"
            )));
        }
    }
    Ok(())
}

fn validate_snapshot(snapshot: &PlannerSnapshot) -> PersistenceResult<()> {
    check_unique_ids(snapshot.subjects.iter().map(|s| s.id), "subject")?;
    check_unique_ids(snapshot.assignments.iter().map(|a| a.id), "assignment")?;
    check_unique_ids(snapshot.exams.iter().map(|e| e.id), "exam")?;
    check_unique_ids(snapshot.grades.iter().map(|g| g.id), "grade")?;
    for subject in &snapshot.subjects {
        subject.validate().map_err(PersistenceError::InvalidData)?;
    }
    Ok(())
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(
    snapshot: &PlannerSnapshot,
    path: P,
) -> PersistenceResult<()> {
    validate_snapshot(snapshot)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<PlannerSnapshot> {
    let file = File::open(path)?;
    let snapshot: PlannerSnapshot = serde_json::from_reader(file)?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

#[derive(Serialize, Deserialize)]
struct SubjectCsvRecord {
    id: i32,
    name: String,
    credits: u32,
    professor: String,
    classroom: String,
    category: String,
    day_of_week: String,
    start_time: String,
    end_time: String,
}

impl From<&Subject> for SubjectCsvRecord {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name.clone(),
            credits: subject.credits,
            professor: subject.professor.clone().unwrap_or_default(),
            classroom: subject.classroom.clone().unwrap_or_default(),
            category: subject.category.clone().unwrap_or_default(),
            day_of_week: codec::format_opt_day(subject.day_of_week),
            start_time: codec::format_opt_time(subject.start_time),
            end_time: codec::format_opt_time(subject.end_time),
        }
    }
}

impl SubjectCsvRecord {
    fn into_subject(self) -> PersistenceResult<Subject> {
        let day_of_week = codec::decode_opt_day(&self.day_of_week).ok_or_else(|| {
            PersistenceError::InvalidData(format!("invalid weekday '{}'", self.day_of_week))
        })?;
        let start_time = codec::decode_opt_time(&self.start_time).ok_or_else(|| {
            PersistenceError::InvalidData(format!("invalid time '{}'", self.start_time))
        })?;
        let end_time = codec::decode_opt_time(&self.end_time).ok_or_else(|| {
            PersistenceError::InvalidData(format!("invalid time '{}'", self.end_time))
        })?;
        Ok(Subject {
            id: self.id,
            name: self.name,
            credits: self.credits,
            professor: codec::decode_opt_string(&self.professor),
            classroom: codec::decode_opt_string(&self.classroom),
            category: codec::decode_opt_string(&self.category),
            day_of_week,
            start_time,
            end_time,
        })
    }
}

pub fn export_subjects_to_csv<P: AsRef<Path>>(
    subjects: &[Subject],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for subject in subjects {
        writer.serialize(SubjectCsvRecord::from(subject))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn import_subjects_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Subject>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut subjects = Vec::new();
    for record in reader.deserialize::<SubjectCsvRecord>() {
        let subject = record?.into_subject()?;
        subject.validate().map_err(PersistenceError::InvalidData)?;
        subjects.push(subject);
    }
    check_unique_ids(subjects.iter().map(|s| s.id), "subject")?;
    Ok(subjects)
}
