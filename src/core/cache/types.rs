//! Cache type definitions

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Cached component metadata (fast access without YAML parsing)
#[derive(Debug, Clone)]
pub struct CachedComponent {
    pub id: String,
    pub part_number: String,
    pub manufacturer: String,
    pub primary_category: String,
    pub secondary_category: Option<String>,
    pub package: Option<String>,
    pub quality_level: Option<String>,
    pub lifecycle: String,
    pub reference_price: f64,
    pub author: String,
    pub created: DateTime<Utc>,
    pub file_path: PathBuf,
}

/// Cached traceability record metadata
#[derive(Debug, Clone)]
pub struct CachedRecord {
    pub id: String,
    pub traceability_id: String,
    pub target_type: String,
    pub target_value: String,
    pub query_by: String,
    pub query_date: DateTime<Utc>,
    pub file_path: PathBuf,
}

/// Count of rows grouped by a field
#[derive(Debug, Clone)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

/// Statistics from a sync operation
#[derive(Debug, Default)]
pub struct SyncStats {
    pub files_scanned: usize,
    pub entries_added: usize,
    pub entries_removed: usize,
    pub duration_ms: u64,
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    pub total_components: usize,
    pub total_records: usize,
    pub by_category: HashMap<String, usize>,
    pub db_size_bytes: u64,
}
