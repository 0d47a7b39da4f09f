//! Traceability chain assembler
//!
//! Flattens a genealogy record into an ordered sequence of life-cycle
//! stages for timeline rendering and audit. Sections are visited in a fixed
//! canonical order and each section's entries keep their stored
//! chronological order. The chain is never re-sorted globally by date:
//! cross-section dates in imported or backfilled records can be mutually
//! inconsistent, and reordering would misrepresent provenance.

use chrono::NaiveDate;
use serde::Serialize;

use crate::trace::record::TraceabilityRecord;

/// Which record section a stage was flattened from, for traceback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSection {
    MaterialReceipt,
    ProductionStep,
    TestExecution,
    SupplierTier,
    LogisticsShipment,
    InventoryMovement,
    ProjectApplication,
    Maintenance,
}

impl std::fmt::Display for SourceSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSection::MaterialReceipt => write!(f, "material_receipt"),
            SourceSection::ProductionStep => write!(f, "production_step"),
            SourceSection::TestExecution => write!(f, "test_execution"),
            SourceSection::SupplierTier => write!(f, "supplier_tier"),
            SourceSection::LogisticsShipment => write!(f, "logistics_shipment"),
            SourceSection::InventoryMovement => write!(f, "inventory_movement"),
            SourceSection::ProjectApplication => write!(f, "project_application"),
            SourceSection::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// One stage in the assembled life-cycle chain
#[derive(Debug, Clone, Serialize)]
pub struct ChainStage {
    pub stage_name: String,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub operator: String,
    pub operation: String,
    pub documents: Vec<String>,
    pub source_section: SourceSection,
}

/// Assemble the ordered life-cycle chain for a record
///
/// Canonical section order: material receipts, production steps, test
/// executions, supplier tiers, logistics shipments, inventory movements,
/// application events. Absent sections contribute no stages. The configured
/// traceability depth truncates supplier tiers only.
pub fn build_chain(record: &TraceabilityRecord) -> Vec<ChainStage> {
    let mut stages = Vec::new();
    let depth = record.query_configuration.effective_depth();

    for receipt in &record.batch_traceability.material_traceability {
        stages.push(ChainStage {
            stage_name: format!("Material receipt: {}", receipt.material_type),
            date: receipt.received_date,
            location: receipt.supplier_name.clone(),
            operator: String::new(),
            operation: format!(
                "Received supplier lot {} ({})",
                receipt.supplier_lot, receipt.inspection_results
            ),
            documents: non_empty(vec![receipt.certificate_number.clone()]),
            source_section: SourceSection::MaterialReceipt,
        });
    }

    for step in &record.batch_traceability.production_traceability {
        stages.push(ChainStage {
            stage_name: format!("Production: {}", step.process_step),
            date: step.process_date,
            location: step.equipment.clone(),
            operator: step.operator.clone(),
            operation: step.process_result.clone(),
            documents: step.quality_check_results.clone(),
            source_section: SourceSection::ProductionStep,
        });
    }

    for test in &record.batch_traceability.test_traceability {
        stages.push(ChainStage {
            stage_name: format!("Test: {}", test.test_type),
            date: test.test_date,
            location: test.test_equipment.clone(),
            operator: test.test_operator.clone(),
            operation: test.test_standard.clone(),
            documents: non_empty(vec![test.test_report.clone()]),
            source_section: SourceSection::TestExecution,
        });
    }

    // The only section subject to depth truncation
    for tier in &record.supply_chain_traceability.supplier_tiers {
        if tier.tier > depth {
            continue;
        }
        stages.push(ChainStage {
            stage_name: format!("Supplier tier {}: {}", tier.tier, tier.supplier_name),
            date: tier.relationship_start,
            location: tier.location.clone(),
            operator: String::new(),
            operation: format!("{} relationship", tier.relationship_status),
            documents: non_empty(vec![tier.certification_level.clone()]),
            source_section: SourceSection::SupplierTier,
        });
    }

    for shipment in &record.supply_chain_traceability.logistics_traceability {
        stages.push(ChainStage {
            stage_name: format!("Shipment {}", shipment.shipment_id),
            date: shipment.shipment_date,
            location: format!("{} → {}", shipment.from_location, shipment.to_location),
            operator: shipment.carrier.clone(),
            operation: shipment.condition.clone(),
            documents: shipment.handling_history.clone(),
            source_section: SourceSection::LogisticsShipment,
        });
    }

    for movement in &record
        .supply_chain_traceability
        .inventory_traceability
        .movement_history
    {
        stages.push(ChainStage {
            stage_name: format!("Inventory: {}", movement.movement_type),
            date: movement.movement_date,
            location: format!("{} → {}", movement.from_location, movement.to_location),
            operator: movement.authorized_by.clone(),
            operation: movement.reason.clone(),
            documents: Vec::new(),
            source_section: SourceSection::InventoryMovement,
        });
    }

    for application in &record.application_traceability.project_applications {
        stages.push(ChainStage {
            stage_name: format!("Application: {}", application.project_name),
            date: application.application_date,
            location: application.application_location.clone(),
            operator: application.responsible_engineer.clone(),
            operation: format!("{} ({})", application.project_id, application.application_status),
            documents: Vec::new(),
            source_section: SourceSection::ProjectApplication,
        });
    }

    for event in &record.application_traceability.maintenance_history {
        stages.push(ChainStage {
            stage_name: format!("Maintenance: {}", event.maintenance_type),
            date: event.maintenance_date,
            location: String::new(),
            operator: event.maintenance_by.clone(),
            operation: event.maintenance_description.clone(),
            documents: Vec::new(),
            source_section: SourceSection::Maintenance,
        });
    }

    stages
}

fn non_empty(documents: Vec<String>) -> Vec<String> {
    documents.into_iter().filter(|d| !d.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::record::{
        InventoryMovement, MaterialReceipt, ProductionStep, QueryTarget, Shipment, SupplierTier,
        TestExecution,
    };

    fn record() -> TraceabilityRecord {
        TraceabilityRecord::new(
            "T-1".to_string(),
            "qa".to_string(),
            QueryTarget::default(),
        )
    }

    fn date(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2023, 6, day)
    }

    #[test]
    fn test_empty_record_yields_empty_chain() {
        let rec = record();
        assert!(build_chain(&rec).is_empty());
    }

    #[test]
    fn test_canonical_section_order_ignores_dates() {
        let mut rec = record();
        // test execution dated BEFORE the material receipt
        rec.batch_traceability.test_traceability.push(TestExecution {
            test_type: "electrical".to_string(),
            test_date: date(1),
            ..Default::default()
        });
        rec.batch_traceability
            .material_traceability
            .push(MaterialReceipt {
                material_type: "wafer".to_string(),
                received_date: date(20),
                ..Default::default()
            });

        let chain = build_chain(&rec);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].source_section, SourceSection::MaterialReceipt);
        assert_eq!(chain[1].source_section, SourceSection::TestExecution);
    }

    #[test]
    fn test_within_section_order_preserved() {
        let mut rec = record();
        for (i, step) in ["diffusion", "metallization", "passivation"].iter().enumerate() {
            rec.batch_traceability
                .production_traceability
                .push(ProductionStep {
                    process_step: step.to_string(),
                    process_date: date(10 - i as u32), // deliberately reversed dates
                    ..Default::default()
                });
        }

        let chain = build_chain(&rec);
        let names: Vec<&str> = chain.iter().map(|s| s.stage_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Production: diffusion",
                "Production: metallization",
                "Production: passivation"
            ]
        );
    }

    #[test]
    fn test_depth_truncates_supplier_tiers_only() {
        let mut rec = record();
        rec.query_configuration.traceability_depth = 2;
        for tier in 1..=3u8 {
            rec.supply_chain_traceability.supplier_tiers.push(SupplierTier {
                tier,
                supplier_name: format!("Tier {} Co", tier),
                ..Default::default()
            });
        }
        rec.supply_chain_traceability
            .logistics_traceability
            .push(Shipment {
                shipment_id: "SHP-1".to_string(),
                ..Default::default()
            });

        let chain = build_chain(&rec);
        let tiers: Vec<&ChainStage> = chain
            .iter()
            .filter(|s| s.source_section == SourceSection::SupplierTier)
            .collect();
        assert_eq!(tiers.len(), 2);
        assert!(tiers.iter().all(|s| !s.stage_name.contains("Tier 3")));
        // shipments are not depth-limited
        assert!(chain
            .iter()
            .any(|s| s.source_section == SourceSection::LogisticsShipment));
    }

    #[test]
    fn test_inventory_movements_flattened_in_order() {
        let mut rec = record();
        for movement in ["inbound", "transfer", "issue"] {
            rec.supply_chain_traceability
                .inventory_traceability
                .movement_history
                .push(InventoryMovement {
                    movement_type: movement.to_string(),
                    ..Default::default()
                });
        }

        let chain = build_chain(&rec);
        let names: Vec<&str> = chain.iter().map(|s| s.stage_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Inventory: inbound",
                "Inventory: transfer",
                "Inventory: issue"
            ]
        );
    }

    #[test]
    fn test_empty_documents_filtered() {
        let mut rec = record();
        rec.batch_traceability
            .material_traceability
            .push(MaterialReceipt {
                material_type: "resin".to_string(),
                ..Default::default()
            });
        let chain = build_chain(&rec);
        assert!(chain[0].documents.is_empty());
    }
}
