//! Entity trait - common interface for catalog and traceability entities

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::EntityId;

/// Common trait for all cqt entities stored as YAML files
pub trait Entity: Serialize + DeserializeOwned {
    /// The entity type prefix (e.g., "CMP", "TRC")
    const PREFIX: &'static str;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Get a short human-readable label (part number, traceability ID)
    fn label(&self) -> &str;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;

    /// Get the author
    fn author(&self) -> &str;
}

/// Quality level ordering used for sorting and risk escalation
///
/// The catalog stores quality levels as free text; this enum exists only
/// where comparison is required. Unrecognized labels fall outside the order
/// and compare by their raw string instead.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Consumer,
    Industrial,
    Automotive,
    Military,
    Aerospace,
}

impl QualityLevel {
    /// Parse a catalog label into an ordered level, if recognized
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "consumer" => Some(QualityLevel::Consumer),
            "industrial" => Some(QualityLevel::Industrial),
            "automotive" => Some(QualityLevel::Automotive),
            "military" => Some(QualityLevel::Military),
            "aerospace" | "medical" | "aerospace/medical" => Some(QualityLevel::Aerospace),
            _ => None,
        }
    }

    /// Rank within the informal ordering (consumer lowest)
    pub fn rank(&self) -> u8 {
        match self {
            QualityLevel::Consumer => 0,
            QualityLevel::Industrial => 1,
            QualityLevel::Automotive => 2,
            QualityLevel::Military => 3,
            QualityLevel::Aerospace => 4,
        }
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityLevel::Consumer => write!(f, "consumer"),
            QualityLevel::Industrial => write!(f, "industrial"),
            QualityLevel::Automotive => write!(f, "automotive"),
            QualityLevel::Military => write!(f, "military"),
            QualityLevel::Aerospace => write!(f, "aerospace"),
        }
    }
}

/// Risk severity common to identified risks and the overall assessment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}
