//! The authoritative in-memory planner state.
//!
//! One `PlannerStore` instance owns every collection for the process
//! lifetime: collections load once at `open`, every mutation rewrites the
//! owning file synchronously, then fans out a change event. There are no
//! transactions — a failed persist leaves memory ahead of disk, which is
//! surfaced to the caller and recoverable via [`PlannerStore::reload`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::codec::Entity;
use crate::conflict;
use crate::model::{Assignment, Exam, GradeRecord, Subject, UserGrade};
use crate::notify::{ChangeEvent, ChangeKind, ChangeListener, ChangeNotifier, EntityKind};
use crate::persistence::{BackupReport, FileAdapter, PersistenceError, PersistenceResult};

#[derive(Debug)]
pub enum StoreError {
    Persistence(PersistenceError),
    InvalidData(String),
    NotFound { kind: EntityKind, id: i32 },
    DuplicateName(String),
    ScheduleConflict { with: i32 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Persistence(err) => write!(f, "persistence error: {err}"),
            StoreError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            StoreError::NotFound { kind, id } => write!(f, "{} {id} not found", kind.as_str()),
            StoreError::DuplicateName(name) => {
                write!(f, "a subject named '{name}' already exists")
            }
            StoreError::ScheduleConflict { with } => {
                write!(f, "schedule conflicts with subject {with}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

fn high_water<E: Entity>(records: &[E]) -> i32 {
    records.iter().map(Entity::id).max().unwrap_or(0)
}

pub struct PlannerStore {
    files: FileAdapter,
    notifier: ChangeNotifier,
    subjects: Vec<Subject>,
    assignments: Vec<Assignment>,
    exams: Vec<Exam>,
    grades: Vec<GradeRecord>,
    user_grades: Vec<UserGrade>,
    // Per-collection id high-water marks. Allocation is high-water + 1, and
    // the mark only ever moves up, so ids are never reused after a delete.
    subject_ids: i32,
    assignment_ids: i32,
    exam_ids: i32,
    grade_ids: i32,
}

impl PlannerStore {
    /// Opens the data directory and loads every collection. Missing files
    /// start their collections empty; malformed lines are skipped by the
    /// adapter.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let files = FileAdapter::open(data_dir.as_ref())?;
        let subjects: Vec<Subject> = files.load()?;
        let assignments: Vec<Assignment> = files.load()?;
        let exams: Vec<Exam> = files.load()?;
        let grades: Vec<GradeRecord> = files.load()?;
        let user_grades: Vec<UserGrade> = files.load()?;
        let subject_ids = high_water(&subjects);
        let assignment_ids = high_water(&assignments);
        let exam_ids = high_water(&exams);
        let grade_ids = high_water(&grades);
        Ok(Self {
            files,
            notifier: ChangeNotifier::new(),
            subjects,
            assignments,
            exams,
            grades,
            user_grades,
            subject_ids,
            assignment_ids,
            exam_ids,
            grade_ids,
        })
    }

    // --- subscriptions ---

    pub fn subscribe(&self, listener: Arc<dyn ChangeListener>) {
        self.notifier.subscribe(listener);
    }

    pub fn unsubscribe(&self, listener: &Arc<dyn ChangeListener>) {
        self.notifier.unsubscribe(listener);
    }

    // --- queries (defensive copies) ---

    pub fn subjects(&self) -> Vec<Subject> {
        self.subjects.clone()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.assignments.clone()
    }

    pub fn exams(&self) -> Vec<Exam> {
        self.exams.clone()
    }

    pub fn grade_records(&self) -> Vec<GradeRecord> {
        self.grades.clone()
    }

    pub fn user_grades(&self) -> Vec<UserGrade> {
        self.user_grades.clone()
    }

    pub fn subject_by_id(&self, id: i32) -> Option<Subject> {
        self.subjects.iter().find(|s| s.id == id).cloned()
    }

    pub fn assignment_by_id(&self, id: i32) -> Option<Assignment> {
        self.assignments.iter().find(|a| a.id == id).cloned()
    }

    pub fn exam_by_id(&self, id: i32) -> Option<Exam> {
        self.exams.iter().find(|e| e.id == id).cloned()
    }

    pub fn grade_by_id(&self, id: i32) -> Option<GradeRecord> {
        self.grades.iter().find(|g| g.id == id).cloned()
    }

    pub fn assignments_for_subject(&self, subject_id: i32) -> Vec<Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.subject_id == subject_id)
            .cloned()
            .collect()
    }

    pub fn exams_for_subject(&self, subject_id: i32) -> Vec<Exam> {
        self.exams
            .iter()
            .filter(|e| e.subject_id == subject_id)
            .cloned()
            .collect()
    }

    pub fn grades_for_subject(&self, subject_id: i32) -> Vec<GradeRecord> {
        self.grades
            .iter()
            .filter(|g| g.subject_id == subject_id)
            .cloned()
            .collect()
    }

    /// Display name for a foreign key; `None` marks a dangling reference
    /// ("unassigned" in display logic).
    pub fn subject_name(&self, subject_id: i32) -> Option<String> {
        self.subjects
            .iter()
            .find(|s| s.id == subject_id)
            .map(|s| s.name.clone())
    }

    /// Would `candidate` collide with a scheduled subject? `except_id`
    /// excludes the subject being edited.
    pub fn has_conflict(&self, candidate: &Subject, except_id: Option<i32>) -> bool {
        conflict::has_conflict(&self.subjects, candidate, except_id)
    }

    // --- subject CRUD ---

    pub fn add_subject(&mut self, mut subject: Subject) -> StoreResult<i32> {
        subject.validate().map_err(StoreError::InvalidData)?;
        // Subject identity is by id, but names must stay unique so the
        // timetable never shows two entries users cannot tell apart.
        if self.subjects.iter().any(|s| s.name == subject.name) {
            return Err(StoreError::DuplicateName(subject.name));
        }
        if let Some(with) = conflict::find_conflict(&self.subjects, &subject, None) {
            return Err(StoreError::ScheduleConflict { with });
        }
        self.subject_ids += 1;
        let id = self.subject_ids;
        subject.id = id;
        self.subjects.push(subject);
        let persisted = self.files.save(&self.subjects);
        self.publish(EntityKind::Subject, ChangeKind::Add, id);
        persisted?;
        Ok(id)
    }

    pub fn update_subject(&mut self, subject: Subject) -> StoreResult<()> {
        subject.validate().map_err(StoreError::InvalidData)?;
        let Some(position) = self.subjects.iter().position(|s| s.id == subject.id) else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Subject,
                id: subject.id,
            });
        };
        if self
            .subjects
            .iter()
            .any(|s| s.id != subject.id && s.name == subject.name)
        {
            return Err(StoreError::DuplicateName(subject.name));
        }
        if let Some(with) = conflict::find_conflict(&self.subjects, &subject, Some(subject.id)) {
            return Err(StoreError::ScheduleConflict { with });
        }
        let id = subject.id;
        self.subjects[position] = subject;
        let persisted = self.files.save(&self.subjects);
        self.publish(EntityKind::Subject, ChangeKind::Update, id);
        persisted?;
        Ok(())
    }

    /// Deletes a subject and, in the same logical operation, every
    /// assignment, exam and grade record that references it.
    pub fn delete_subject(&mut self, id: i32) -> StoreResult<()> {
        let Some(position) = self.subjects.iter().position(|s| s.id == id) else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Subject,
                id,
            });
        };
        self.subjects.remove(position);
        let assignments_before = self.assignments.len();
        let exams_before = self.exams.len();
        let grades_before = self.grades.len();
        self.assignments.retain(|a| a.subject_id != id);
        self.exams.retain(|e| e.subject_id != id);
        self.grades.retain(|g| g.subject_id != id);

        // Persist every affected collection even if an earlier save fails;
        // the first error wins.
        let mut persisted: PersistenceResult<()> = self.files.save(&self.subjects);
        if self.assignments.len() != assignments_before {
            persisted = persisted.and(self.files.save(&self.assignments));
        }
        if self.exams.len() != exams_before {
            persisted = persisted.and(self.files.save(&self.exams));
        }
        if self.grades.len() != grades_before {
            persisted = persisted.and(self.files.save(&self.grades));
        }
        self.publish(EntityKind::Subject, ChangeKind::Delete, id);
        persisted?;
        Ok(())
    }

    // --- assignment CRUD ---

    pub fn add_assignment(&mut self, mut assignment: Assignment) -> StoreResult<i32> {
        self.assignment_ids += 1;
        let id = self.assignment_ids;
        assignment.id = id;
        self.assignments.push(assignment);
        let persisted = self.files.save(&self.assignments);
        self.publish(EntityKind::Assignment, ChangeKind::Add, id);
        persisted?;
        Ok(id)
    }

    pub fn update_assignment(&mut self, assignment: Assignment) -> StoreResult<()> {
        let Some(position) = self
            .assignments
            .iter()
            .position(|a| a.id == assignment.id)
        else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Assignment,
                id: assignment.id,
            });
        };
        let id = assignment.id;
        self.assignments[position] = assignment;
        let persisted = self.files.save(&self.assignments);
        self.publish(EntityKind::Assignment, ChangeKind::Update, id);
        persisted?;
        Ok(())
    }

    pub fn delete_assignment(&mut self, id: i32) -> StoreResult<()> {
        let Some(position) = self.assignments.iter().position(|a| a.id == id) else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Assignment,
                id,
            });
        };
        self.assignments.remove(position);
        let persisted = self.files.save(&self.assignments);
        self.publish(EntityKind::Assignment, ChangeKind::Delete, id);
        persisted?;
        Ok(())
    }

    // --- exam CRUD ---

    pub fn add_exam(&mut self, mut exam: Exam) -> StoreResult<i32> {
        self.exam_ids += 1;
        let id = self.exam_ids;
        exam.id = id;
        self.exams.push(exam);
        let persisted = self.files.save(&self.exams);
        self.publish(EntityKind::Exam, ChangeKind::Add, id);
        persisted?;
        Ok(id)
    }

    pub fn update_exam(&mut self, exam: Exam) -> StoreResult<()> {
        let Some(position) = self.exams.iter().position(|e| e.id == exam.id) else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Exam,
                id: exam.id,
            });
        };
        let id = exam.id;
        self.exams[position] = exam;
        let persisted = self.files.save(&self.exams);
        self.publish(EntityKind::Exam, ChangeKind::Update, id);
        persisted?;
        Ok(())
    }

    pub fn delete_exam(&mut self, id: i32) -> StoreResult<()> {
        let Some(position) = self.exams.iter().position(|e| e.id == id) else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Exam,
                id,
            });
        };
        self.exams.remove(position);
        let persisted = self.files.save(&self.exams);
        self.publish(EntityKind::Exam, ChangeKind::Delete, id);
        persisted?;
        Ok(())
    }

    // --- grade record CRUD ---

    pub fn add_grade(&mut self, mut grade: GradeRecord) -> StoreResult<i32> {
        self.grade_ids += 1;
        let id = self.grade_ids;
        grade.id = id;
        self.grades.push(grade);
        let persisted = self.files.save(&self.grades);
        self.publish(EntityKind::Grade, ChangeKind::Add, id);
        persisted?;
        Ok(id)
    }

    pub fn update_grade(&mut self, grade: GradeRecord) -> StoreResult<()> {
        let Some(position) = self.grades.iter().position(|g| g.id == grade.id) else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Grade,
                id: grade.id,
            });
        };
        let id = grade.id;
        self.grades[position] = grade;
        let persisted = self.files.save(&self.grades);
        self.publish(EntityKind::Grade, ChangeKind::Update, id);
        persisted?;
        Ok(())
    }

    pub fn delete_grade(&mut self, id: i32) -> StoreResult<()> {
        let Some(position) = self.grades.iter().position(|g| g.id == id) else {
            return Err(StoreError::NotFound {
                kind: EntityKind::Grade,
                id,
            });
        };
        self.grades.remove(position);
        let persisted = self.files.save(&self.grades);
        self.publish(EntityKind::Grade, ChangeKind::Delete, id);
        persisted?;
        Ok(())
    }

    // --- ad hoc user grades ---

    /// Replaces the whole ad hoc grade list, as the calculator panel saves
    /// it. These records carry no id, so no change event is published.
    pub fn set_user_grades(&mut self, grades: Vec<UserGrade>) -> StoreResult<()> {
        self.user_grades = grades;
        self.files.save(&self.user_grades)?;
        Ok(())
    }

    // --- whole-store operations ---

    /// Empties every collection and rewrites every file. Emits one `Clear`
    /// per entity kind with the sentinel id.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        self.subjects.clear();
        self.assignments.clear();
        self.exams.clear();
        self.grades.clear();
        self.user_grades.clear();
        let persisted = self.save_all();
        for kind in EntityKind::ALL {
            self.publish(kind, ChangeKind::Clear, ChangeEvent::ALL);
        }
        persisted?;
        Ok(())
    }

    /// Discards in-memory state and reloads from disk; the recovery path
    /// after an external change or a failed persist. Every collection is
    /// read before any is swapped in, so a load error leaves memory
    /// untouched. Id high-water marks never move down, so reload cannot
    /// cause id reuse.
    pub fn reload(&mut self) -> StoreResult<()> {
        let subjects: Vec<Subject> = self.files.load()?;
        let assignments: Vec<Assignment> = self.files.load()?;
        let exams: Vec<Exam> = self.files.load()?;
        let grades: Vec<GradeRecord> = self.files.load()?;
        let user_grades: Vec<UserGrade> = self.files.load()?;
        self.subjects = subjects;
        self.assignments = assignments;
        self.exams = exams;
        self.grades = grades;
        self.user_grades = user_grades;
        self.subject_ids = self.subject_ids.max(high_water(&self.subjects));
        self.assignment_ids = self.assignment_ids.max(high_water(&self.assignments));
        self.exam_ids = self.exam_ids.max(high_water(&self.exams));
        self.grade_ids = self.grade_ids.max(high_water(&self.grades));
        for kind in EntityKind::ALL {
            self.publish(kind, ChangeKind::Reload, ChangeEvent::ALL);
        }
        Ok(())
    }

    /// Explicit persist-everything call for shutdown paths. Not a mutation;
    /// publishes nothing.
    pub fn flush(&self) -> StoreResult<()> {
        self.save_all()?;
        Ok(())
    }

    /// Best-effort timestamped backup of every data file.
    pub fn backup_all(&self) -> BackupReport {
        self.files.backup_all()
    }

    fn save_all(&self) -> PersistenceResult<()> {
        // Attempt every file; report the first failure.
        self.files
            .save(&self.subjects)
            .and(self.files.save(&self.assignments))
            .and(self.files.save(&self.exams))
            .and(self.files.save(&self.grades))
            .and(self.files.save(&self.user_grades))
    }

    fn publish(&self, entity: EntityKind, change: ChangeKind, id: i32) {
        self.notifier.publish(ChangeEvent::new(entity, change, id));
    }
}
