//! Query-parameter surface consumed from the CLI/API boundary
//!
//! Everything arrives string-encoded (stale bookmarked query state
//! included) and is parsed and clamped here before the engine sees it.
//! Malformed values degrade to "unconstrained" rather than failing.

use std::collections::BTreeMap;

use crate::catalog::filter::FilterCriteria;
use crate::catalog::query::{PageRequest, SortKey, SortOrder, SortSpec};

/// Raw string-encoded query parameters, as a UI or API layer would send them
#[derive(Debug, Clone, Default)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn set_opt(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Parse `key=value` pairs, ignoring malformed entries
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut params = Self::new();
        for pair in pairs {
            if let Some((key, value)) = pair.split_once('=') {
                params.set(key.trim(), value.trim());
            }
        }
        params
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Build the filter criteria; unknown or malformed values are dropped
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.get("keyword").map(str::to_string),
            category: self.get("category").map(str::to_string),
            manufacturer: self.get("manufacturer").map(str::to_string),
            quality_level: self.get("qualityLevel").map(str::to_string),
            lifecycle: self.get("lifecycle").map(str::to_string),
            price_min: self.get_f64("priceMin"),
            price_max: self.get_f64("priceMax"),
            total_dose_min: self.get_f64("totalDoseMin"),
            total_dose_max: self.get_f64("totalDoseMax"),
        }
    }

    /// Build the pagination request, clamping invalid values
    pub fn page_request(&self) -> PageRequest {
        PageRequest::clamped(self.get_i64("page").unwrap_or(1), self.get_i64("limit").unwrap_or(0))
    }

    /// Build the sort spec, if a recognized sortBy was given
    pub fn sort(&self) -> Option<SortSpec> {
        let key = match self.get("sortBy")? {
            "partNumber" | "part_number" => SortKey::PartNumber,
            "manufacturer" => SortKey::Manufacturer,
            "referencePrice" | "reference_price" | "price" => SortKey::ReferencePrice,
            "qualityLevel" | "quality_level" => SortKey::QualityLevel,
            "created" => SortKey::Created,
            _ => return None,
        };
        let order = match self.get("sortOrder") {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        Some(SortSpec { key, order })
    }
}
