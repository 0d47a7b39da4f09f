//! Completeness and risk scoring over a traceability record
//!
//! Partial data is never an error here: missing sections fold into the
//! completeness score so callers see a quantified confidence instead of a
//! failure.

use serde::Serialize;

use crate::core::entity::RiskLevel;
use crate::trace::record::{
    ApplicationTraceability, BatchTraceability, ComplianceStatus, ComponentGenealogy,
    QualityHistory, SupplyChainTraceability, TraceabilityRecord,
};

/// The genealogy sections that count toward completeness
pub const SECTION_NAMES: [&str; 5] = [
    "component_genealogy",
    "batch_traceability",
    "quality_history",
    "supply_chain_traceability",
    "application_traceability",
];

/// Aggregate score for a record
#[derive(Debug, Clone, Serialize)]
pub struct TraceabilityScore {
    /// 0-100: share of genealogy sections that are populated
    pub completeness: u8,

    /// Names of the sections found empty
    pub missing_sections: Vec<&'static str>,

    /// Maximum severity among identified risks
    pub risk_level: RiskLevel,

    /// False when no risks were identified and `risk_level` is the
    /// low-confidence fallback; callers must not read that as an explicit
    /// low finding
    pub risk_assessed: bool,

    /// Result confidence (0-100) carried over from the query execution
    pub confidence: u8,

    pub compliance: ComplianceStatus,
}

/// Score a record's completeness, risk, and compliance
pub fn score(record: &TraceabilityRecord) -> TraceabilityScore {
    let sections = [
        component_genealogy_populated(&record.component_genealogy),
        batch_traceability_populated(&record.batch_traceability),
        quality_history_populated(&record.quality_history),
        supply_chain_populated(&record.supply_chain_traceability),
        application_populated(&record.application_traceability),
    ];

    let populated = sections.iter().filter(|present| **present).count();
    let completeness = (populated * 100 / sections.len()) as u8;
    let missing_sections = SECTION_NAMES
        .iter()
        .zip(sections)
        .filter(|(_, present)| !*present)
        .map(|(name, _)| *name)
        .collect();

    let risks = &record
        .traceability_analysis
        .risk_identification
        .identified_risks;
    let (risk_level, risk_assessed) = match risks.iter().map(|r| r.risk_level).max() {
        Some(level) => (level, true),
        None => (RiskLevel::Low, false),
    };

    // A non-empty issue list overrides a stale stated status
    let check = &record.traceability_analysis.compliance_check;
    let compliance = if !check.non_compliance_issues.is_empty() {
        ComplianceStatus::NonCompliant
    } else {
        check.compliance_status
    };

    TraceabilityScore {
        completeness,
        missing_sections,
        risk_level,
        risk_assessed,
        confidence: record.query_results.result_confidence.min(100),
        compliance,
    }
}

/// A section counts as present only when at least one leaf field or
/// sequence entry is populated; an all-empty section object is absent.
fn component_genealogy_populated(section: &ComponentGenealogy) -> bool {
    let basic = &section.basic_info;
    let design = &section.design_genealogy;
    let mfg = &section.manufacturing_genealogy;

    !basic.part_number.is_empty()
        || !basic.manufacturer.is_empty()
        || !basic.category.is_empty()
        || !basic.description.is_empty()
        || !design.original_designer.is_empty()
        || !design.design_version.is_empty()
        || design.design_date.is_some()
        || !design.design_changes.is_empty()
        || !design.related_components.is_empty()
        || !mfg.manufacturing_site.is_empty()
        || !mfg.production_line.is_empty()
        || !mfg.manufacturing_process.is_empty()
        || !mfg.quality_level.is_empty()
        || mfg.manufacturing_period.start_date.is_some()
}

fn batch_traceability_populated(section: &BatchTraceability) -> bool {
    let info = &section.batch_info;
    !info.batch_number.is_empty()
        || !info.lot_code.is_empty()
        || info.quantity.is_some()
        || info.production_date.is_some()
        || !section.material_traceability.is_empty()
        || !section.production_traceability.is_empty()
        || !section.test_traceability.is_empty()
}

fn quality_history_populated(section: &QualityHistory) -> bool {
    !section.quality_issues.is_empty()
        || !section.quality_improvements.is_empty()
        || !section.certification_history.is_empty()
}

fn supply_chain_populated(section: &SupplyChainTraceability) -> bool {
    let inventory = &section.inventory_traceability;
    !section.supplier_tiers.is_empty()
        || !section.logistics_traceability.is_empty()
        || !inventory.warehouse_location.is_empty()
        || !inventory.movement_history.is_empty()
}

fn application_populated(section: &ApplicationTraceability) -> bool {
    !section.project_applications.is_empty()
        || !section.system_integration.is_empty()
        || !section.maintenance_history.is_empty()
}
