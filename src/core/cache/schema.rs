//! Database schema initialization

use miette::{IntoDiagnostic, Result};
use rusqlite::params;

use super::{CatalogCache, SCHEMA_VERSION};

impl CatalogCache {
    /// Initialize database schema
    pub(super) fn init_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Component catalog metadata
            CREATE TABLE IF NOT EXISTS components (
                id TEXT PRIMARY KEY,
                part_number TEXT NOT NULL,
                manufacturer TEXT NOT NULL,
                primary_category TEXT NOT NULL,
                secondary_category TEXT,
                package TEXT,
                quality_level TEXT,
                lifecycle TEXT NOT NULL,
                reference_price REAL NOT NULL DEFAULT 0,
                author TEXT NOT NULL,
                created TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_mtime INTEGER NOT NULL,
                file_hash TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_components_part_number ON components(part_number);
            CREATE INDEX IF NOT EXISTS idx_components_manufacturer ON components(manufacturer);
            CREATE INDEX IF NOT EXISTS idx_components_category ON components(primary_category);
            CREATE INDEX IF NOT EXISTS idx_components_quality ON components(quality_level);

            -- Traceability record metadata
            CREATE TABLE IF NOT EXISTS trace_records (
                id TEXT PRIMARY KEY,
                traceability_id TEXT NOT NULL UNIQUE,
                target_type TEXT NOT NULL,
                target_value TEXT NOT NULL,
                query_by TEXT NOT NULL,
                query_date TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_mtime INTEGER NOT NULL,
                file_hash TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_trace_target ON trace_records(target_value, target_type);
            CREATE INDEX IF NOT EXISTS idx_trace_query_by ON trace_records(query_by);
            "#,
            )
            .into_diagnostic()?;

        self.conn
            .execute("DELETE FROM schema_version", [])
            .into_diagnostic()?;
        self.conn
            .execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .into_diagnostic()?;

        Ok(())
    }
}
