//! Traceability record entity - one append-only snapshot per query execution
//!
//! A record captures the full genealogy of a query target (component, batch,
//! lot, serial number, or project) at the moment the query ran. Later
//! changes to the underlying facts never retroactively alter a stored
//! record. Every embedded sequence preserves insertion order; that order is
//! the chronological/causal order and must not be re-sorted by storage or
//! query layers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, RiskLevel};
use crate::core::identity::EntityId;

/// Bounds for the configured traceability depth
pub const MIN_TRACE_DEPTH: u8 = 1;
pub const MAX_TRACE_DEPTH: u8 = 10;

/// What kind of thing the query targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum TargetType {
    #[default]
    Component,
    Batch,
    Lot,
    SerialNumber,
    Project,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::Component => write!(f, "component"),
            TargetType::Batch => write!(f, "batch"),
            TargetType::Lot => write!(f, "lot"),
            TargetType::SerialNumber => write!(f, "serial_number"),
            TargetType::Project => write!(f, "project"),
        }
    }
}

impl std::str::FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "component" => Ok(TargetType::Component),
            "batch" => Ok(TargetType::Batch),
            "lot" => Ok(TargetType::Lot),
            "serial_number" | "serialnumber" | "serial" => Ok(TargetType::SerialNumber),
            "project" => Ok(TargetType::Project),
            _ => Err(format!(
                "Invalid target type: {}. Use component, batch, lot, serial_number, or project",
                s
            )),
        }
    }
}

/// The query target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryTarget {
    #[serde(default)]
    pub target_type: TargetType,

    /// Part number, batch number, serial, or project code
    pub target_value: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Component genealogy
// ---------------------------------------------------------------------------

/// Basic identification of the traced part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub part_number: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manufacturer: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// One design-change event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignChange {
    pub change_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub change_reason: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub changed_by: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub impact_assessment: String,
}

/// Design lineage: original design plus the ordered change history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignGenealogy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_designer: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub design_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub design_changes: Vec<DesignChange>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_components: Vec<String>,
}

/// A closed date interval
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateInterval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Manufacturing lineage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManufacturingGenealogy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manufacturing_site: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub production_line: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manufacturing_process: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub process_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub quality_level: String,

    #[serde(default)]
    pub manufacturing_period: DateInterval,
}

/// Design, manufacturing, and identification lineage of the part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentGenealogy {
    #[serde(default)]
    pub basic_info: BasicInfo,

    #[serde(default)]
    pub design_genealogy: DesignGenealogy,

    #[serde(default)]
    pub manufacturing_genealogy: ManufacturingGenealogy,
}

// ---------------------------------------------------------------------------
// Batch traceability
// ---------------------------------------------------------------------------

/// Batch identification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub batch_number: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lot_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wafer_lot: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_lot: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_lot: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_date: Option<NaiveDate>,
}

/// One raw-material receipt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialReceipt {
    pub material_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub material_grade: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub supplier_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub supplier_lot: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inspection_results: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificate_number: String,
}

/// One named process parameter with its tolerance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessParameter {
    pub parameter: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tolerance: String,
}

/// One production process step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionStep {
    pub process_step: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub process_parameters: Vec<ProcessParameter>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub equipment: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub process_result: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quality_check_results: Vec<String>,
}

/// Pass/fail verdict on a test parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TestVerdict {
    #[default]
    Pass,
    Fail,
}

/// One measured test parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestParameter {
    pub parameter: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub specification: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub actual_value: String,

    #[serde(default)]
    pub result: TestVerdict,
}

/// One test execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestExecution {
    pub test_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test_standard: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_parameters: Vec<TestParameter>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test_equipment: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test_operator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test_report: String,
}

/// Batch/lot level traceability
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchTraceability {
    #[serde(default)]
    pub batch_info: BatchInfo,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub material_traceability: Vec<MaterialReceipt>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub production_traceability: Vec<ProductionStep>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_traceability: Vec<TestExecution>,
}

// ---------------------------------------------------------------------------
// Quality history
// ---------------------------------------------------------------------------

/// One recorded quality issue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityIssue {
    pub issue_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issue_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issue_description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reported_by: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub severity: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resolution: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closure_date: Option<NaiveDate>,
}

/// One quality improvement action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityImprovement {
    pub improvement_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub improvement_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub improvement_description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub implemented_by: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub effectiveness_assessment: String,
}

/// Certification status over its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum CertificationStatus {
    #[default]
    Valid,
    Expired,
    Suspended,
    Withdrawn,
}

impl std::fmt::Display for CertificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CertificationStatus::Valid => write!(f, "valid"),
            CertificationStatus::Expired => write!(f, "expired"),
            CertificationStatus::Suspended => write!(f, "suspended"),
            CertificationStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// One certification event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Certification {
    pub certification_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certification_body: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificate_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: CertificationStatus,
}

/// Quality history of the traced target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityHistory {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quality_issues: Vec<QualityIssue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quality_improvements: Vec<QualityImprovement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certification_history: Vec<Certification>,
}

// ---------------------------------------------------------------------------
// Supply chain traceability
// ---------------------------------------------------------------------------

/// Supplier relationship status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum RelationshipStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl std::fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipStatus::Active => write!(f, "active"),
            RelationshipStatus::Inactive => write!(f, "inactive"),
            RelationshipStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// One supplier in the tier hierarchy (tier 1 is the direct supplier)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierTier {
    pub tier: u8,
    pub supplier_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub supplier_code: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub supplier_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certification_level: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_start: Option<NaiveDate>,

    #[serde(default)]
    pub relationship_status: RelationshipStatus,
}

/// One shipment event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shipment {
    pub shipment_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from_location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to_location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub carrier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_conditions: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handling_history: Vec<String>,
}

/// One inventory movement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub movement_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from_location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to_location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub authorized_by: String,
}

/// Current stock location plus its movement history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryTraceability {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub warehouse_location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_conditions: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inventory_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_inventory_check: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movement_history: Vec<InventoryMovement>,
}

/// Supply-chain traceability
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplyChainTraceability {
    /// Ordered by integer tier 1..N
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supplier_tiers: Vec<SupplierTier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logistics_traceability: Vec<Shipment>,

    #[serde(default)]
    pub inventory_traceability: InventoryTraceability,
}

// ---------------------------------------------------------------------------
// Application traceability
// ---------------------------------------------------------------------------

/// Project application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ApplicationStatus {
    #[default]
    Planned,
    InUse,
    Completed,
    Retired,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Planned => write!(f, "planned"),
            ApplicationStatus::InUse => write!(f, "in_use"),
            ApplicationStatus::Completed => write!(f, "completed"),
            ApplicationStatus::Retired => write!(f, "retired"),
        }
    }
}

/// One project that applied the part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectApplication {
    pub project_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_quantity: Option<u32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub application_location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub responsible_engineer: String,

    #[serde(default)]
    pub application_status: ApplicationStatus,
}

/// Measured performance of an integrated system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub parameter: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_date: Option<NaiveDate>,
}

/// One system the part was integrated into
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemIntegration {
    pub system_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_function: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operating_conditions: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performance_data: Vec<PerformanceSample>,
}

/// One maintenance event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    pub maintenance_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maintenance_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maintenance_description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maintenance_results: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_maintenance_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maintenance_by: String,
}

/// Application history of the traced part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationTraceability {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_applications: Vec<ProjectApplication>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_integration: Vec<SystemIntegration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintenance_history: Vec<MaintenanceEvent>,
}

// ---------------------------------------------------------------------------
// Analysis, configuration, results
// ---------------------------------------------------------------------------

/// Completeness of the assembled genealogy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletenessAssessment {
    /// 0-100
    #[serde(default)]
    pub overall_completeness: u8,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_information: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_quality_issues: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_actions: Vec<String>,
}

/// One identified risk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifiedRisk {
    pub risk_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub risk_description: String,

    #[serde(default)]
    pub risk_level: RiskLevel,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mitigation: String,
}

/// Risk findings over the genealogy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskIdentification {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identified_risks: Vec<IdentifiedRisk>,

    #[serde(default)]
    pub overall_risk_level: RiskLevel,
}

/// Compliance status of the traced target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    Partial,
    #[default]
    Unknown,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "compliant"),
            ComplianceStatus::NonCompliant => write!(f, "non_compliant"),
            ComplianceStatus::Partial => write!(f, "partial"),
            ComplianceStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Regulatory compliance check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceCheck {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regulatory_requirements: Vec<String>,

    #[serde(default)]
    pub compliance_status: ComplianceStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_compliance_issues: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correction_actions: Vec<String>,
}

/// Derived analysis stored with the snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceabilityAnalysis {
    #[serde(default)]
    pub completeness_assessment: CompletenessAssessment,

    #[serde(default)]
    pub risk_identification: RiskIdentification,

    #[serde(default)]
    pub compliance_check: ComplianceCheck,
}

/// Request configuration the query ran with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfiguration {
    /// How many supplier tiers / genealogy hops to traverse (1-10)
    #[serde(default = "default_depth")]
    pub traceability_depth: u8,

    #[serde(default)]
    pub time_range: DateInterval,

    #[serde(default = "default_true")]
    pub include_suppliers: bool,

    #[serde(default = "default_true")]
    pub include_quality_data: bool,

    #[serde(default = "default_true")]
    pub include_test_data: bool,

    #[serde(default = "default_true")]
    pub include_application_data: bool,
}

fn default_true() -> bool {
    true
}

fn default_depth() -> u8 {
    MAX_TRACE_DEPTH
}

impl Default for QueryConfiguration {
    fn default() -> Self {
        Self {
            traceability_depth: MAX_TRACE_DEPTH,
            time_range: DateInterval::default(),
            include_suppliers: true,
            include_quality_data: true,
            include_test_data: true,
            include_application_data: true,
        }
    }
}

impl QueryConfiguration {
    /// The configured depth clamped into its valid range
    pub fn effective_depth(&self) -> u8 {
        self.traceability_depth.clamp(MIN_TRACE_DEPTH, MAX_TRACE_DEPTH)
    }
}

/// Response metadata from the query execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResults {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub result_summary: String,

    #[serde(default)]
    pub total_records_found: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_sources_accessed: Vec<String>,

    /// Milliseconds
    #[serde(default)]
    pub query_execution_time: u32,

    /// 0-100
    #[serde(default)]
    pub result_completeness: u8,

    /// 0-100
    #[serde(default)]
    pub result_confidence: u8,
}

/// Traceability record entity - a point-in-time snapshot of a query result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceabilityRecord {
    /// Unique identifier (TRC-xxx)
    pub id: EntityId,

    /// Caller-supplied unique traceability ID (store key)
    pub traceability_id: String,

    /// When the query ran
    pub query_date: DateTime<Utc>,

    /// Who ran the query (owns the record for audit purposes only)
    pub query_by: String,

    #[serde(default)]
    pub query_target: QueryTarget,

    #[serde(default)]
    pub component_genealogy: ComponentGenealogy,

    #[serde(default)]
    pub batch_traceability: BatchTraceability,

    #[serde(default)]
    pub quality_history: QualityHistory,

    #[serde(default)]
    pub supply_chain_traceability: SupplyChainTraceability,

    #[serde(default)]
    pub application_traceability: ApplicationTraceability,

    #[serde(default)]
    pub traceability_analysis: TraceabilityAnalysis,

    #[serde(default)]
    pub query_configuration: QueryConfiguration,

    #[serde(default)]
    pub query_results: QueryResults,
}

impl Entity for TraceabilityRecord {
    const PREFIX: &'static str = "TRC";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.traceability_id
    }

    fn created(&self) -> DateTime<Utc> {
        self.query_date
    }

    fn author(&self) -> &str {
        &self.query_by
    }
}

impl TraceabilityRecord {
    /// Create an empty record for the given target
    pub fn new(traceability_id: String, query_by: String, query_target: QueryTarget) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Trc),
            traceability_id,
            query_date: Utc::now(),
            query_by,
            query_target,
            component_genealogy: ComponentGenealogy::default(),
            batch_traceability: BatchTraceability::default(),
            quality_history: QualityHistory::default(),
            supply_chain_traceability: SupplyChainTraceability::default(),
            application_traceability: ApplicationTraceability::default(),
            traceability_analysis: TraceabilityAnalysis::default(),
            query_configuration: QueryConfiguration::default(),
            query_results: QueryResults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TraceabilityRecord {
        TraceabilityRecord::new(
            "TRACE-2023-001".to_string(),
            "auditor".to_string(),
            QueryTarget {
                target_type: TargetType::Component,
                target_value: "LM324AN".to_string(),
                description: "Op-amp lot audit".to_string(),
            },
        )
    }

    #[test]
    fn test_record_creation() {
        let rec = record();
        assert!(rec.id.to_string().starts_with("TRC-"));
        assert_eq!(rec.label(), "TRACE-2023-001");
        assert_eq!(rec.query_configuration.effective_depth(), MAX_TRACE_DEPTH);
    }

    #[test]
    fn test_record_roundtrip_preserves_sequence_order() {
        let mut rec = record();
        for step in ["die attach", "wire bond", "mold", "trim"] {
            rec.batch_traceability
                .production_traceability
                .push(ProductionStep {
                    process_step: step.to_string(),
                    ..Default::default()
                });
        }

        let yaml = serde_yaml::to_string(&rec).unwrap();
        let parsed: TraceabilityRecord = serde_yaml::from_str(&yaml).unwrap();

        let steps: Vec<&str> = parsed
            .batch_traceability
            .production_traceability
            .iter()
            .map(|s| s.process_step.as_str())
            .collect();
        assert_eq!(steps, vec!["die attach", "wire bond", "mold", "trim"]);
    }

    #[test]
    fn test_depth_clamped_to_valid_range() {
        let mut rec = record();
        rec.query_configuration.traceability_depth = 0;
        assert_eq!(rec.query_configuration.effective_depth(), MIN_TRACE_DEPTH);
        rec.query_configuration.traceability_depth = 99;
        assert_eq!(rec.query_configuration.effective_depth(), MAX_TRACE_DEPTH);
    }

    #[test]
    fn test_enum_serialization() {
        let mut rec = record();
        rec.quality_history.certification_history.push(Certification {
            certification_type: "QML-V".to_string(),
            status: CertificationStatus::Suspended,
            ..Default::default()
        });
        rec.application_traceability
            .project_applications
            .push(ProjectApplication {
                project_id: "SAT-7".to_string(),
                application_status: ApplicationStatus::InUse,
                ..Default::default()
            });

        let yaml = serde_yaml::to_string(&rec).unwrap();
        assert!(yaml.contains("status: suspended"));
        assert!(yaml.contains("application_status: in_use"));
        assert!(yaml.contains("target_type: component"));
    }

    #[test]
    fn test_partial_yaml_deserializes_with_defaults() {
        let yaml = format!(
            "id: {}\ntraceability_id: T-1\nquery_date: 2023-05-01T00:00:00Z\nquery_by: qa\n",
            EntityId::new(crate::core::EntityPrefix::Trc)
        );
        let rec: TraceabilityRecord = serde_yaml::from_str(&yaml).unwrap();
        assert!(rec.batch_traceability.material_traceability.is_empty());
        assert_eq!(
            rec.traceability_analysis.compliance_check.compliance_status,
            ComplianceStatus::Unknown
        );
        assert_eq!(rec.query_configuration.effective_depth(), MAX_TRACE_DEPTH);
    }
}
