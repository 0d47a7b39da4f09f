//! Query methods for retrieving cached catalog metadata

use std::path::PathBuf;

use rusqlite::params;

use super::{parse_datetime, CachedComponent, CachedRecord, CatalogCache, GroupCount};

impl CatalogCache {
    /// Get a component by part number (exact, then substring match)
    pub fn get_component(&self, part_number: &str) -> Option<CachedComponent> {
        let exact = self.query_components(
            "SELECT id, part_number, manufacturer, primary_category, secondary_category, \
             package, quality_level, lifecycle, reference_price, author, created, file_path \
             FROM components WHERE part_number = ?1 ORDER BY file_path",
            params![part_number],
        );
        if let Some(found) = exact.into_iter().next() {
            return Some(found);
        }

        self.query_components(
            "SELECT id, part_number, manufacturer, primary_category, secondary_category, \
             package, quality_level, lifecycle, reference_price, author, created, file_path \
             FROM components WHERE part_number LIKE ?1 ORDER BY file_path",
            params![format!("%{}%", part_number)],
        )
        .into_iter()
        .next()
    }

    /// List cached components, optionally narrowed by category/manufacturer
    pub fn list_components(
        &self,
        category: Option<&str>,
        manufacturer: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<CachedComponent> {
        let mut sql = String::from(
            "SELECT id, part_number, manufacturer, primary_category, secondary_category, \
             package, quality_level, lifecycle, reference_price, author, created, file_path \
             FROM components WHERE 1=1",
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![];

        if let Some(category) = category {
            sql.push_str(" AND (primary_category = ? OR secondary_category = ?)");
            params_vec.push(Box::new(category.to_string()));
            params_vec.push(Box::new(category.to_string()));
        }

        if let Some(manufacturer) = manufacturer {
            sql.push_str(" AND manufacturer = ?");
            params_vec.push(Box::new(manufacturer.to_string()));
        }

        sql.push_str(" ORDER BY part_number ASC");

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        self.query_components(&sql, params_refs.as_slice())
    }

    /// Distinct non-empty values for a component column, sorted
    pub fn distinct_component_values(&self, column: &str) -> Vec<String> {
        let sql = match column {
            "manufacturer" => {
                "SELECT DISTINCT manufacturer FROM components WHERE manufacturer != '' ORDER BY manufacturer"
            }
            "primary_category" => {
                "SELECT DISTINCT primary_category FROM components WHERE primary_category != '' ORDER BY primary_category"
            }
            "quality_level" => {
                "SELECT DISTINCT quality_level FROM components WHERE quality_level IS NOT NULL AND quality_level != '' ORDER BY quality_level"
            }
            _ => return vec![],
        };

        let mut stmt = match self.conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let rows = match stmt.query_map([], |row| row.get::<_, String>(0)) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(|r| r.ok()).collect()
    }

    /// Count components grouped by primary category
    pub fn count_by_category(&self) -> Vec<GroupCount> {
        let mut stmt = match self.conn.prepare(
            "SELECT primary_category, COUNT(*) as cnt FROM components \
             GROUP BY primary_category ORDER BY cnt DESC",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let rows = match stmt.query_map([], |row| {
            Ok(GroupCount {
                group: row.get(0)?,
                count: row.get::<_, i64>(1)? as usize,
            })
        }) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(|r| r.ok()).collect()
    }

    /// List cached traceability record summaries, newest query first
    pub fn list_records(&self, target_value: Option<&str>) -> Vec<CachedRecord> {
        let mut sql = String::from(
            "SELECT id, traceability_id, target_type, target_value, query_by, query_date, \
             file_path FROM trace_records WHERE 1=1",
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![];

        if let Some(target) = target_value {
            sql.push_str(" AND target_value LIKE ?");
            params_vec.push(Box::new(format!("%{}%", target)));
        }

        sql.push_str(" ORDER BY query_date DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = match self.conn.prepare(&sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let rows = match stmt.query_map(params_refs.as_slice(), |row| {
            Ok(CachedRecord {
                id: row.get(0)?,
                traceability_id: row.get(1)?,
                target_type: row.get(2)?,
                target_value: row.get(3)?,
                query_by: row.get(4)?,
                query_date: parse_datetime(row.get::<_, String>(5)?),
                file_path: PathBuf::from(row.get::<_, String>(6)?),
            })
        }) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(|r| r.ok()).collect()
    }

    fn query_components<P: rusqlite::Params>(&self, sql: &str, params: P) -> Vec<CachedComponent> {
        let mut stmt = match self.conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let rows = match stmt.query_map(params, |row| {
            Ok(CachedComponent {
                id: row.get(0)?,
                part_number: row.get(1)?,
                manufacturer: row.get(2)?,
                primary_category: row.get(3)?,
                secondary_category: row.get(4)?,
                package: row.get(5)?,
                quality_level: row.get(6)?,
                lifecycle: row.get(7)?,
                reference_price: row.get(8)?,
                author: row.get(9)?,
                created: parse_datetime(row.get::<_, String>(10)?),
                file_path: PathBuf::from(row.get::<_, String>(11)?),
            })
        }) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(|r| r.ok()).collect()
    }
}
