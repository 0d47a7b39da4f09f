//! Traceability record store
//!
//! Records are append-only and uniquely keyed by `traceability_id`; a
//! duplicate put is a conflict, and an unknown ID on get is an expected
//! business state (`Ok(None)`), not a fault.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::entity::Entity;
use crate::trace::record::TraceabilityRecord;

/// Errors surfaced by record stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this traceability ID already exists
    #[error("traceability record '{0}' already exists")]
    Conflict(String),

    /// The backing storage cannot be reached; retry policy belongs to the caller
    #[error("traceability storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    #[error("failed to parse record file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize record '{id}': {message}")]
    Serialize { id: String, message: String },
}

/// Summary row for record listings
#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub traceability_id: String,
    pub target_type: String,
    pub target_value: String,
    pub query_by: String,
    pub query_date: chrono::DateTime<chrono::Utc>,
}

impl From<&TraceabilityRecord> for RecordSummary {
    fn from(record: &TraceabilityRecord) -> Self {
        Self {
            traceability_id: record.traceability_id.clone(),
            target_type: record.query_target.target_type.to_string(),
            target_value: record.query_target.target_value.clone(),
            query_by: record.query_by.clone(),
            query_date: record.query_date,
        }
    }
}

/// Append-only access to traceability records
pub trait RecordStore {
    /// Fetch a record by traceability ID; unknown IDs are `Ok(None)`
    fn get(&self, traceability_id: &str) -> Result<Option<TraceabilityRecord>, StoreError>;

    /// Persist a new record; duplicate IDs conflict
    fn put(&self, record: &TraceabilityRecord) -> Result<(), StoreError>;

    /// Summaries of all stored records, in insertion (file) order
    fn list(&self) -> Result<Vec<RecordSummary>, StoreError>;
}

/// Store backed by a directory of `TRC-*.cqt.yaml` files
pub struct YamlRecordStore {
    dir: PathBuf,
}

impl YamlRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.to_string_lossy().ends_with(".cqt.yaml"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn load(path: &Path) -> Result<TraceabilityRecord, StoreError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl RecordStore for YamlRecordStore {
    fn get(&self, traceability_id: &str) -> Result<Option<TraceabilityRecord>, StoreError> {
        for path in self.record_paths()? {
            let record = Self::load(&path)?;
            if record.traceability_id == traceability_id {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    fn put(&self, record: &TraceabilityRecord) -> Result<(), StoreError> {
        if self.get(&record.traceability_id)?.is_some() {
            return Err(StoreError::Conflict(record.traceability_id.clone()));
        }

        std::fs::create_dir_all(&self.dir)?;
        let yaml = serde_yaml::to_string(record).map_err(|e| StoreError::Serialize {
            id: record.traceability_id.clone(),
            message: e.to_string(),
        })?;
        let path = self.dir.join(format!("{}.cqt.yaml", record.id()));
        std::fs::write(path, yaml)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<RecordSummary>, StoreError> {
        let mut summaries = Vec::new();
        for path in self.record_paths()? {
            let record = Self::load(&path)?;
            summaries.push(RecordSummary::from(&record));
        }
        Ok(summaries)
    }
}

/// In-memory store used by tests
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<BTreeMap<String, TraceabilityRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, traceability_id: &str) -> Result<Option<TraceabilityRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("record store lock poisoned")
            .get(traceability_id)
            .cloned())
    }

    fn put(&self, record: &TraceabilityRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("record store lock poisoned");
        if records.contains_key(&record.traceability_id) {
            return Err(StoreError::Conflict(record.traceability_id.clone()));
        }
        records.insert(record.traceability_id.clone(), record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<RecordSummary>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("record store lock poisoned")
            .values()
            .map(RecordSummary::from)
            .collect())
    }
}
