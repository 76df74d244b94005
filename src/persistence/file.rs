use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{BackupReport, PersistenceResult};
use crate::codec::Record;
use crate::model::{Assignment, Exam, GradeRecord, Subject, UserGrade};

/// Subdirectory of the data directory that receives backups.
pub const BACKUP_DIR: &str = "backups";

/// Every flat file the planner owns, in load order.
pub const DATA_FILES: [&str; 5] = [
    Subject::FILE_NAME,
    Assignment::FILE_NAME,
    Exam::FILE_NAME,
    GradeRecord::FILE_NAME,
    UserGrade::FILE_NAME,
];

/// Flat-file persistence for one data directory. Each collection owns one
/// file; `save` always rewrites the whole file because the in-memory
/// collection is the single source of truth.
pub struct FileAdapter {
    data_dir: PathBuf,
}

impl FileAdapter {
    /// Opens (and creates, if needed) the data directory.
    pub fn open(data_dir: impl Into<PathBuf>) -> PersistenceResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Loads a collection. A missing file is the normal first-run state and
    /// yields an empty list; malformed lines are logged and skipped, never
    /// fatal.
    pub fn load<R: Record>(&self) -> PersistenceResult<Vec<R>> {
        let path = self.path_for(R::FILE_NAME);
        if !path.exists() {
            log::debug!("{} absent, starting empty", R::FILE_NAME);
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        let mut records = Vec::new();
        for line in contents.lines() {
            if line.is_empty() {
                continue;
            }
            match R::decode(line) {
                Some(record) => records.push(record),
                None => log::warn!("skipping malformed line in {}: {line}", R::FILE_NAME),
            }
        }
        log::debug!("loaded {} records from {}", records.len(), R::FILE_NAME);
        Ok(records)
    }

    /// Fully overwrites the collection's file with `records`.
    pub fn save<R: Record>(&self, records: &[R]) -> PersistenceResult<()> {
        let mut contents = String::new();
        for record in records {
            contents.push_str(&record.encode());
            contents.push('\n');
        }
        fs::write(self.path_for(R::FILE_NAME), contents)?;
        Ok(())
    }

    /// Copies one data file into the backup directory under a timestamped
    /// name. `Ok(None)` when the source file does not exist yet.
    pub fn backup(&self, file_name: &str) -> PersistenceResult<Option<PathBuf>> {
        let source = self.path_for(file_name);
        if !source.exists() {
            return Ok(None);
        }
        let backup_dir = self.data_dir.join(BACKUP_DIR);
        fs::create_dir_all(&backup_dir)?;
        let stamp = Utc::now().timestamp_millis();
        let destination = backup_dir.join(format!("backup_{stamp}_{file_name}"));
        fs::copy(&source, &destination)?;
        Ok(Some(destination))
    }

    /// Backs up every data file, best effort. A failure on one file is
    /// recorded and the pass continues with the rest.
    pub fn backup_all(&self) -> BackupReport {
        let mut report = BackupReport::default();
        for file_name in DATA_FILES {
            match self.backup(file_name) {
                Ok(Some(path)) => report.created.push(path),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("backup of {file_name} failed: {err}");
                    report.failed.push((file_name.to_string(), err));
                }
            }
        }
        report
    }
}
