//! Component entity type - one catalog entry per electronic part

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Component lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Lifecycle {
    #[default]
    Producing,
    EngineeringSample,
    Discontinued,
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Producing => write!(f, "producing"),
            Lifecycle::EngineeringSample => write!(f, "engineering_sample"),
            Lifecycle::Discontinued => write!(f, "discontinued"),
        }
    }
}

impl std::str::FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "producing" => Ok(Lifecycle::Producing),
            "engineering_sample" | "engineeringsample" => Ok(Lifecycle::EngineeringSample),
            "discontinued" => Ok(Lifecycle::Discontinued),
            _ => Err(format!(
                "Invalid lifecycle: {}. Use producing, engineering_sample, or discontinued",
                s
            )),
        }
    }
}

/// A Component entity - one catalog entry
///
/// Part numbers are not globally unique; the (part_number, manufacturer)
/// pair identifies a part within the catalog. Classification categories are
/// open string sets that vary per domain area, and `parameters` carries the
/// per-family technical attributes (voltage, frequency, gain, ...) that are
/// intentionally not normalized into a fixed schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier (CMP-xxx)
    pub id: EntityId,

    /// Part number
    pub part_number: String,

    /// Manufacturer name
    pub manufacturer: String,

    /// Primary category (open set, e.g. "数字单片集成电路")
    pub primary_category: String,

    /// Secondary category (open set)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secondary_category: String,

    /// Package designation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package: String,

    /// Quality level label (free text; ordered only where comparison is needed)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub quality_level: String,

    /// Lifecycle state
    #[serde(default)]
    pub lifecycle: Lifecycle,

    /// Applicable standards (QPL listings, MIL specs, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standards: Vec<String>,

    /// Short description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Functional/performance summary text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub functional_performance: String,

    /// Reference price; 0.0 is the "no quote available" sentinel
    #[serde(default)]
    pub reference_price: f64,

    /// Total ionizing dose rating in krad, when characterized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_dose_krad: Option<f64>,

    /// Free-form technical parameters (schema varies per family)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who imported/seeded this entry)
    pub author: String,
}

impl Entity for Component {
    const PREFIX: &'static str = "CMP";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.part_number
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Component {
    /// Create a new component with the given identity and classification
    pub fn new(
        part_number: String,
        manufacturer: String,
        primary_category: String,
        author: String,
    ) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Cmp),
            part_number,
            manufacturer,
            primary_category,
            secondary_category: String::new(),
            package: String::new(),
            quality_level: String::new(),
            lifecycle: Lifecycle::default(),
            standards: Vec::new(),
            description: String::new(),
            functional_performance: String::new(),
            reference_price: 0.0,
            total_dose_krad: None,
            parameters: BTreeMap::new(),
            created: Utc::now(),
            author,
        }
    }

    /// The reference price, with the 0.0 "no quote" sentinel mapped to None
    pub fn quoted_price(&self) -> Option<f64> {
        if self.reference_price > 0.0 {
            Some(self.reference_price)
        } else {
            None
        }
    }
}
