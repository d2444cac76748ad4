//! Append-only consultation store.
//!
//! Saved consultations are written as one JSON object per line to
//! `<data_dir>/consultations.jsonl`. Records are never updated or deleted.
//!
//! Reading is forgiving: a line that fails to parse is logged and skipped so that one damaged
//! record does not hide the rest of the history.

use crate::config::CoreConfig;
use crate::report::summary_line;
use crate::{ConsultError, ConsultResult};
use chrono::{DateTime, Utc};
use consult_engine::{Answers, Complaint, DiagnosisResult, Gender, UrgencyLevel};
use consult_types::Username;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One saved consultation, flattened for the row-oriented store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub complaint: Option<Complaint>,
    pub urgency_level: UrgencyLevel,
    /// One-line text rendering of the diagnosis result.
    pub summary: String,
}

impl ConsultationRecord {
    /// Build a record stamped with a fresh id and the current time.
    pub fn new(username: &Username, answers: &Answers, result: &DiagnosisResult) -> Self {
        Self::at(Utc::now(), username, answers, result)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        username: &Username,
        answers: &Answers,
        result: &DiagnosisResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            username: username.to_string(),
            patient_name: answers.patient_name.clone(),
            age: answers.age,
            gender: answers.gender,
            complaint: answers.complaint.clone(),
            urgency_level: result.urgency_level,
            summary: summary_line(result),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConsultationStore {
    path: PathBuf,
}

impl ConsultationStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::at(cfg.consultations_path())
    }

    /// Store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, creating the file and its directory on first use.
    ///
    /// # Errors
    ///
    /// Returns a storage or serialisation error; the file is left as it was.
    pub fn append(&self, record: &ConsultationRecord) -> ConsultResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ConsultError::StorageDirCreation)?;
        }

        let mut line = serde_json::to_string(record).map_err(ConsultError::Serialization)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(ConsultError::FileWrite)?;
        file.write_all(line.as_bytes())
            .map_err(ConsultError::FileWrite)?;

        tracing::info!(id = %record.id, user = %record.username, "saved consultation");
        Ok(())
    }

    /// All records, oldest first. A missing file is an empty history.
    pub fn list(&self) -> ConsultResult<Vec<ConsultationRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ConsultError::FileRead(e)),
        };

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ConsultationRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    "skipping malformed consultation record at {}:{}: {}",
                    self.path.display(),
                    index + 1,
                    e
                ),
            }
        }
        Ok(records)
    }

    /// The record with this id, if any. Ids are unique, so the first match wins.
    pub fn get(&self, id: Uuid) -> ConsultResult<Option<ConsultationRecord>> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Records saved by one user, oldest first.
    pub fn list_for_user(&self, username: &Username) -> ConsultResult<Vec<ConsultationRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.username == username.as_str())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_engine::infer;
    use tempfile::TempDir;

    fn user(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    fn record_for(name: &str, complaint: Complaint) -> ConsultationRecord {
        let answers = Answers {
            patient_name: Some("Sarah Williams".into()),
            age: Some(34),
            gender: Some(Gender::Female),
            ..Answers::with_complaint(complaint)
        };
        ConsultationRecord::new(&user(name), &answers, &infer(&answers))
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = ConsultationStore::at(dir.path().join("nothing.jsonl"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn appends_and_lists_in_order() {
        let dir = TempDir::new().unwrap();
        let store = ConsultationStore::at(dir.path().join("nested").join("c.jsonl"));

        let first = record_for("doctor1", Complaint::Toothache);
        let second = record_for("admin", Complaint::Swelling);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        let all = store.list().unwrap();
        assert_eq!(all, vec![first.clone(), second]);

        let mine = store.list_for_user(&user("doctor1")).unwrap();
        assert_eq!(mine, vec![first]);
    }

    #[test]
    fn get_finds_a_record_by_id() {
        let dir = TempDir::new().unwrap();
        let store = ConsultationStore::at(dir.path().join("c.jsonl"));
        assert_eq!(store.get(Uuid::new_v4()).unwrap(), None);

        let first = record_for("doctor1", Complaint::Toothache);
        let second = record_for("doctor2", Complaint::BrokenTooth);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.get(second.id).unwrap(), Some(second));
        assert_eq!(store.get(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.jsonl");
        let store = ConsultationStore::at(&path);

        let good = record_for("doctor1", Complaint::MouthUlcer);
        store.append(&good).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();
        store.append(&good).unwrap();

        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn record_flattens_result_into_one_line() {
        let record = record_for("doctor1", Complaint::BrokenTooth);
        assert!(!record.summary.contains('\n'));
        assert!(record.summary.contains("fractured tooth"));
        assert_eq!(record.complaint, Some(Complaint::BrokenTooth));
        assert_eq!(record.urgency_level, UrgencyLevel::Routine);
    }
}
