//! Cache synchronization with the filesystem

use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, Result};
use rusqlite::params;
use walkdir::WalkDir;

use super::{compute_hash, get_file_mtime, CatalogCache, SyncStats};
use crate::core::project::Project;

impl CatalogCache {
    /// Full rebuild of the cache from the filesystem
    pub fn rebuild(&mut self) -> Result<SyncStats> {
        let start = std::time::Instant::now();
        let mut stats = SyncStats::default();

        let removed: usize = self
            .conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM components) + (SELECT COUNT(*) FROM trace_records)",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);
        stats.entries_removed = removed;

        self.conn
            .execute_batch(
                r#"
            DELETE FROM components;
            DELETE FROM trace_records;
            "#,
            )
            .into_diagnostic()?;

        for dir in Project::entity_directories() {
            let full_path = self.project_root.join(dir);
            if full_path.exists() {
                self.scan_directory(&full_path, &mut stats)?;
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Scan a directory and cache every entity file in it
    fn scan_directory(&mut self, dir: &Path, stats: &mut SyncStats) -> Result<()> {
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if !path.to_string_lossy().ends_with(".cqt.yaml") {
                continue;
            }

            stats.files_scanned += 1;

            if let Err(e) = self.cache_entity_file(path) {
                eprintln!("Warning: Failed to cache {}: {}", path.display(), e);
            } else {
                stats.entries_added += 1;
            }
        }

        Ok(())
    }

    /// Cache a single entity file
    fn cache_entity_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).into_diagnostic()?;
        let mtime = get_file_mtime(path)?;
        let hash = compute_hash(&content);
        let rel_path = path
            .strip_prefix(&self.project_root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let value: serde_yaml::Value = serde_yaml::from_str(&content).into_diagnostic()?;

        let id = value["id"]
            .as_str()
            .ok_or_else(|| miette::miette!("Missing 'id' field"))?;
        let prefix = id
            .split('-')
            .next()
            .ok_or_else(|| miette::miette!("Invalid ID format"))?;

        match prefix {
            "CMP" => self.cache_component_row(id, &value, &rel_path, mtime, &hash),
            "TRC" => self.cache_record_row(id, &value, &rel_path, mtime, &hash),
            other => Err(miette::miette!("Unknown entity prefix: {}", other)),
        }
    }

    fn cache_component_row(
        &mut self,
        id: &str,
        value: &serde_yaml::Value,
        rel_path: &str,
        mtime: i64,
        hash: &str,
    ) -> Result<()> {
        let part_number = value["part_number"]
            .as_str()
            .ok_or_else(|| miette::miette!("Missing 'part_number' field"))?;
        let manufacturer = value["manufacturer"].as_str().unwrap_or("");
        let primary_category = value["primary_category"].as_str().unwrap_or("");
        let secondary_category = value["secondary_category"].as_str();
        let package = value["package"].as_str();
        let quality_level = value["quality_level"].as_str();
        let lifecycle = value["lifecycle"].as_str().unwrap_or("producing");
        let reference_price = value["reference_price"].as_f64().unwrap_or(0.0);
        let author = value["author"].as_str().unwrap_or("");
        let created = value["created"].as_str().unwrap_or("");

        self.conn
            .execute(
                r#"INSERT OR REPLACE INTO components
                   (id, part_number, manufacturer, primary_category, secondary_category,
                    package, quality_level, lifecycle, reference_price, author, created,
                    file_path, file_mtime, file_hash)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"#,
                params![
                    id,
                    part_number,
                    manufacturer,
                    primary_category,
                    secondary_category,
                    package,
                    quality_level,
                    lifecycle,
                    reference_price,
                    author,
                    created,
                    rel_path,
                    mtime,
                    hash
                ],
            )
            .into_diagnostic()?;

        Ok(())
    }

    fn cache_record_row(
        &mut self,
        id: &str,
        value: &serde_yaml::Value,
        rel_path: &str,
        mtime: i64,
        hash: &str,
    ) -> Result<()> {
        let traceability_id = value["traceability_id"]
            .as_str()
            .ok_or_else(|| miette::miette!("Missing 'traceability_id' field"))?;
        let target_type = value["query_target"]["target_type"]
            .as_str()
            .unwrap_or("component");
        let target_value = value["query_target"]["target_value"].as_str().unwrap_or("");
        let query_by = value["query_by"].as_str().unwrap_or("");
        let query_date = value["query_date"].as_str().unwrap_or("");

        self.conn
            .execute(
                r#"INSERT OR REPLACE INTO trace_records
                   (id, traceability_id, target_type, target_value, query_by, query_date,
                    file_path, file_mtime, file_hash)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                params![
                    id,
                    traceability_id,
                    target_type,
                    target_value,
                    query_by,
                    query_date,
                    rel_path,
                    mtime,
                    hash
                ],
            )
            .into_diagnostic()?;

        Ok(())
    }
}
