//! SQLite-backed read-through catalog cache
//!
//! The cache accelerates facet enumeration, statistics, and lookups over
//! the YAML corpus. It is purely a latency layer: queries are correct
//! without it, and staleness is resolved only by explicit invalidation
//! (`cqt cache clear` / `cqt cache rebuild` after a bulk re-import) or by
//! the mtime auto-sync on open. There is no TTL.
//!
//! The cache file is user-local and gitignored.

mod queries;
mod schema;
mod sync;
mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, TimeZone, Utc};
use miette::{IntoDiagnostic, Result};
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::core::project::Project;

/// Cache file location within a project
const CACHE_FILE: &str = ".cqt/cache.db";

/// Current schema version - cache is rebuilt on version mismatch
const SCHEMA_VERSION: i32 = 2;

/// The catalog cache backed by SQLite
pub struct CatalogCache {
    conn: Connection,
    project_root: PathBuf,
}

impl CatalogCache {
    /// Open or create the cache for a project
    ///
    /// If the cache doesn't exist, it is created and populated. If any
    /// entity file changed since the last sync, the cache resyncs
    /// automatically.
    pub fn open(project: &Project) -> Result<Self> {
        let cache_path = project.root().join(CACHE_FILE);

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }

        let needs_init = !cache_path.exists();
        let conn = Connection::open(&cache_path).into_diagnostic()?;

        // WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .into_diagnostic()?;

        let mut cache = Self {
            conn,
            project_root: project.root().to_path_buf(),
        };

        if needs_init {
            cache.init_schema()?;
            cache.rebuild()?;
        } else {
            if cache.needs_schema_rebuild()? {
                cache.reinitialize_schema()?;
            }
            cache.auto_sync()?;
        }

        Ok(cache)
    }

    /// Check if schema version matches current version
    fn needs_schema_rebuild(&self) -> Result<bool> {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(current_version != SCHEMA_VERSION)
    }

    /// Drop all tables, reinitialize the schema, and rebuild
    fn reinitialize_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                DROP TABLE IF EXISTS schema_version;
                DROP TABLE IF EXISTS components;
                DROP TABLE IF EXISTS trace_records;
                "#,
            )
            .into_diagnostic()?;

        self.init_schema()?;
        self.rebuild()?;

        Ok(())
    }

    /// Auto-sync: resync when any entity file is newer than the cached max
    /// mtime, or when files were added/removed
    fn auto_sync(&mut self) -> Result<()> {
        let cached_max_mtime: Option<i64> = self
            .conn
            .query_row(
                "SELECT MAX(mtime) FROM (SELECT file_mtime AS mtime FROM components \
                 UNION ALL SELECT file_mtime FROM trace_records)",
                [],
                |row| row.get(0),
            )
            .optional()
            .into_diagnostic()?
            .flatten();

        if self.has_newer_files(cached_max_mtime.unwrap_or(0))? {
            self.rebuild()?;
        }

        Ok(())
    }

    /// Check if any entity files are newer than the given mtime, or if the
    /// file count drifted from the cached row count
    fn has_newer_files(&self, max_cached_mtime: i64) -> Result<bool> {
        let mut actual_count = 0i64;

        for dir in Project::entity_directories() {
            let full_path = self.project_root.join(dir);
            if !full_path.exists() {
                continue;
            }

            for entry in WalkDir::new(&full_path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                if !path.to_string_lossy().ends_with(".cqt.yaml") {
                    continue;
                }

                actual_count += 1;
                if get_file_mtime(path)? > max_cached_mtime {
                    return Ok(true);
                }
            }
        }

        let cached_count: i64 = self
            .conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM components) + (SELECT COUNT(*) FROM trace_records)",
                [],
                |row| row.get(0),
            )
            .into_diagnostic()?;

        Ok(actual_count != cached_count)
    }

    /// Open cache without auto-sync (for testing)
    pub fn open_without_sync(project: &Project) -> Result<Self> {
        let cache_path = project.root().join(CACHE_FILE);

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }

        let needs_init = !cache_path.exists();
        let conn = Connection::open(&cache_path).into_diagnostic()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .into_diagnostic()?;

        let mut cache = Self {
            conn,
            project_root: project.root().to_path_buf(),
        };

        if needs_init {
            cache.init_schema()?;
        }

        Ok(cache)
    }

    /// Get cache statistics
    pub fn statistics(&self) -> Result<CacheStats> {
        let total_components: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM components", [], |row| row.get(0))
            .into_diagnostic()?;

        let total_records: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM trace_records", [], |row| row.get(0))
            .into_diagnostic()?;

        let mut by_category = std::collections::HashMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT primary_category, COUNT(*) FROM components GROUP BY primary_category")
                .into_diagnostic()?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, usize>(1)?))
                })
                .into_diagnostic()?;

            for row in rows {
                let (category, count) = row.into_diagnostic()?;
                by_category.insert(category, count);
            }
        }

        let db_path = self.project_root.join(CACHE_FILE);
        let db_size_bytes = fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

        Ok(CacheStats {
            total_components,
            total_records,
            by_category,
            db_size_bytes,
        })
    }

    /// Explicit invalidation: drop every cached row (the operator-triggered
    /// cache clear after bulk re-import)
    pub fn clear(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            DELETE FROM components;
            DELETE FROM trace_records;
            "#,
            )
            .into_diagnostic()?;
        Ok(())
    }
}

/// Get file modification time as Unix timestamp
fn get_file_mtime(path: &Path) -> Result<i64> {
    let metadata = fs::metadata(path).into_diagnostic()?;
    let mtime = metadata
        .modified()
        .into_diagnostic()?
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    Ok(mtime)
}

/// Compute SHA256 hash of content
fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Parse datetime string to DateTime<Utc>
fn parse_datetime(s: String) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Component;
    use crate::core::loader::write_entity;
    use tempfile::tempdir;

    fn seeded_project() -> (tempfile::TempDir, Project) {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        for (part, manufacturer, category) in [
            ("STM32F103C8T6", "ST", "数字单片集成电路"),
            ("LM324AN", "TI", "模拟集成电路"),
            ("AD8066ARZ", "ADI", "模拟集成电路"),
        ] {
            let cmp = Component::new(
                part.to_string(),
                manufacturer.to_string(),
                category.to_string(),
                "seed".to_string(),
            );
            write_entity(&project.catalog_dir(), &cmp).unwrap();
        }
        (tmp, project)
    }

    #[test]
    fn test_open_populates_cache() {
        let (_tmp, project) = seeded_project();
        let cache = CatalogCache::open(&project).unwrap();
        let stats = cache.statistics().unwrap();
        assert_eq!(stats.total_components, 3);
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.by_category.get("模拟集成电路"), Some(&2));
    }

    #[test]
    fn test_clear_empties_cache() {
        let (_tmp, project) = seeded_project();
        let mut cache = CatalogCache::open(&project).unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.statistics().unwrap().total_components, 0);
    }

    #[test]
    fn test_reopen_syncs_new_files() {
        let (_tmp, project) = seeded_project();
        {
            let cache = CatalogCache::open(&project).unwrap();
            assert_eq!(cache.statistics().unwrap().total_components, 3);
        }

        let extra = Component::new(
            "MAX232CPE".to_string(),
            "Maxim".to_string(),
            "接口电路".to_string(),
            "seed".to_string(),
        );
        write_entity(&project.catalog_dir(), &extra).unwrap();

        let cache = CatalogCache::open(&project).unwrap();
        assert_eq!(cache.statistics().unwrap().total_components, 4);
    }
}
