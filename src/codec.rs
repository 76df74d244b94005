//! Pipe-delimited line format for the flat data files.
//!
//! One record per line, fields joined with `|` in a fixed order. Optional
//! fields encode as the empty string and decode back to `None`, so an empty
//! string and an absent value are indistinguishable on the wire. The
//! delimiter is not escaped: a field value containing `|` corrupts that line
//! on reload. This is a known limitation kept for compatibility with the
//! existing file layout; callers must not put `|` in free-form fields.
//!
//! `decode` is tolerant by contract: too few fields, or a required
//! numeric/date/enum field that fails to parse, yields `None` so the loader
//! can skip the line and keep going.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::model::{
    Assignment, AssignmentStatus, Exam, GradeRecord, LetterGrade, Priority, Subject, UserGrade,
};
use crate::notify::EntityKind;

pub const DELIMITER: char = '|';

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
// The previous implementation wrote datetimes without seconds; accept both.
const DATETIME_FORMAT_SHORT: &str = "%Y-%m-%dT%H:%M";

/// One line in a flat data file.
pub trait Record: Sized {
    const FILE_NAME: &'static str;
    const MIN_FIELDS: usize;

    fn encode(&self) -> String;
    fn decode(line: &str) -> Option<Self>;
}

/// A record with a store-assigned integer identity.
pub trait Entity: Record {
    const KIND: EntityKind;

    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
}

impl Record for Subject {
    const FILE_NAME: &'static str = "subjects.txt";
    const MIN_FIELDS: usize = 9;

    fn encode(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.name,
            self.credits,
            opt_str(&self.professor),
            opt_str(&self.classroom),
            opt_str(&self.category),
            format_opt_day(self.day_of_week),
            format_opt_time(self.start_time),
            format_opt_time(self.end_time),
        )
    }

    fn decode(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Some(Self {
            id: fields[0].parse().ok()?,
            name: fields[1].to_string(),
            credits: fields[2].parse().ok()?,
            professor: decode_opt_string(fields[3]),
            classroom: decode_opt_string(fields[4]),
            category: decode_opt_string(fields[5]),
            day_of_week: decode_opt_day(fields[6])?,
            start_time: decode_opt_time(fields[7])?,
            end_time: decode_opt_time(fields[8])?,
        })
    }
}

impl Entity for Subject {
    const KIND: EntityKind = EntityKind::Subject;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl Record for Assignment {
    const FILE_NAME: &'static str = "assignments.txt";
    const MIN_FIELDS: usize = 7;

    fn encode(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.subject_id,
            self.title,
            opt_str(&self.description),
            format_opt_date(self.due_date),
            self.status.as_str(),
            self.priority.as_str(),
        )
    }

    fn decode(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Some(Self {
            id: fields[0].parse().ok()?,
            subject_id: fields[1].parse().ok()?,
            title: fields[2].to_string(),
            description: decode_opt_string(fields[3]),
            due_date: decode_opt_date(fields[4])?,
            status: AssignmentStatus::from_str(fields[5])?,
            priority: Priority::from_str(fields[6])?,
        })
    }
}

impl Entity for Assignment {
    const KIND: EntityKind = EntityKind::Assignment;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl Record for Exam {
    const FILE_NAME: &'static str = "exams.txt";
    const MIN_FIELDS: usize = 7;

    fn encode(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.subject_id,
            self.title,
            opt_str(&self.kind),
            format_opt_datetime(self.datetime),
            opt_str(&self.location),
            opt_str(&self.description),
        )
    }

    fn decode(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Some(Self {
            id: fields[0].parse().ok()?,
            subject_id: fields[1].parse().ok()?,
            title: fields[2].to_string(),
            kind: decode_opt_string(fields[3]),
            datetime: decode_opt_datetime(fields[4])?,
            location: decode_opt_string(fields[5]),
            description: decode_opt_string(fields[6]),
        })
    }
}

impl Entity for Exam {
    const KIND: EntityKind = EntityKind::Exam;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl Record for GradeRecord {
    const FILE_NAME: &'static str = "grades.txt";
    const MIN_FIELDS: usize = 6;

    fn encode(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.id,
            self.subject_id,
            self.semester,
            self.score,
            self.letter.as_str(),
            self.grade_point,
        )
    }

    fn decode(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Some(Self {
            id: fields[0].parse().ok()?,
            subject_id: fields[1].parse().ok()?,
            semester: fields[2].to_string(),
            score: fields[3].parse().ok()?,
            letter: LetterGrade::from_str(fields[4])?,
            grade_point: fields[5].parse().ok()?,
        })
    }
}

impl Entity for GradeRecord {
    const KIND: EntityKind = EntityKind::Grade;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl Record for UserGrade {
    const FILE_NAME: &'static str = "user_grades.txt";
    const MIN_FIELDS: usize = 5;

    fn encode(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.subject_name,
            self.letter.as_str(),
            self.gpa,
            self.credits,
            self.is_major,
        )
    }

    fn decode(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        Some(Self {
            subject_name: fields[0].to_string(),
            letter: LetterGrade::from_str(fields[1])?,
            gpa: fields[2].parse().ok()?,
            credits: fields[3].parse().ok()?,
            is_major: decode_bool(fields[4])?,
        })
    }
}

fn opt_str(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

pub(crate) fn decode_opt_string(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

pub(crate) fn format_opt_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// `Some(None)` for an empty field, `None` for an unparseable one.
pub(crate) fn decode_opt_time(field: &str) -> Option<Option<NaiveTime>> {
    if field.is_empty() {
        return Some(None);
    }
    NaiveTime::parse_from_str(field, TIME_FORMAT).ok().map(Some)
}

pub(crate) fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn decode_opt_date(field: &str) -> Option<Option<NaiveDate>> {
    if field.is_empty() {
        return Some(None);
    }
    NaiveDate::parse_from_str(field, DATE_FORMAT).ok().map(Some)
}

pub(crate) fn format_opt_datetime(datetime: Option<NaiveDateTime>) -> String {
    datetime
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

fn decode_opt_datetime(field: &str) -> Option<Option<NaiveDateTime>> {
    if field.is_empty() {
        return Some(None);
    }
    NaiveDateTime::parse_from_str(field, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(field, DATETIME_FORMAT_SHORT))
        .ok()
        .map(Some)
}

pub(crate) fn format_opt_day(day: Option<Weekday>) -> String {
    day.map(|d| d.to_string()).unwrap_or_default()
}

pub(crate) fn decode_opt_day(field: &str) -> Option<Option<Weekday>> {
    if field.is_empty() {
        return Some(None);
    }
    field.parse::<Weekday>().ok().map(Some)
}

fn decode_bool(field: &str) -> Option<bool> {
    match field {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_optional_fields_decode_to_none() {
        let line = "3|Algorithms|3||||||";
        let subject = Subject::decode(line).unwrap();
        assert_eq!(subject.id, 3);
        assert_eq!(subject.professor, None);
        assert_eq!(subject.day_of_week, None);
        assert_eq!(subject.start_time, None);
    }

    #[test]
    fn short_line_is_rejected() {
        assert!(Subject::decode("1|Databases|3").is_none());
        assert!(Assignment::decode("").is_none());
    }

    #[test]
    fn bad_numeric_field_is_rejected() {
        assert!(Subject::decode("one|Databases|3||||||").is_none());
        assert!(GradeRecord::decode("1|2|2025-1|ninety|A|4.0").is_none());
    }

    #[test]
    fn datetime_without_seconds_is_accepted() {
        let exam = Exam::decode("1|2|Final||2025-06-12T09:00||").unwrap();
        assert_eq!(
            exam.datetime.unwrap().format("%H:%M").to_string(),
            "09:00"
        );
    }
}
