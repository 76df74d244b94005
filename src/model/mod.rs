pub mod assignment;
pub mod exam;
pub mod grade;
pub mod subject;

pub use assignment::{Assignment, AssignmentStatus, Priority};
pub use exam::Exam;
pub use grade::{GradeRecord, LetterGrade, UserGrade};
pub use subject::Subject;
