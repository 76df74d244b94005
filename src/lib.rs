pub mod codec;
pub mod conflict;
pub mod grades;
pub mod model;
pub mod notify;
pub mod persistence;
pub mod store;

pub use codec::{Entity, Record};
pub use model::{
    Assignment, AssignmentStatus, Exam, GradeRecord, LetterGrade, Priority, Subject, UserGrade,
};
pub use notify::{
    ChangeEvent, ChangeKind, ChangeListener, ChangeNotifier, EntityKind, ListenerResult,
};
pub use persistence::{BackupReport, FileAdapter, PersistenceError, PlannerSnapshot};
pub use store::{PlannerStore, StoreError, StoreResult};
