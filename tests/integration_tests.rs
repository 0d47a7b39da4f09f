//! Integration tests for the cqt CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a cqt command
fn cqt() -> Command {
    Command::cargo_bin("cqt").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    cqt().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to seed the catalog via CSV import
fn seed_catalog(tmp: &TempDir) {
    let csv = "\
part_number,manufacturer,category,quality_level,lifecycle,reference_price,description
STM32F103C8T6,ST,数字单片集成电路,industrial,producing,12.5,ARM Cortex-M3 MCU
STM32F103,ST,数字单片集成电路,industrial,producing,9.8,ARM Cortex-M3 MCU
ESP32-WROOM-32,Espressif,数字单片集成电路,consumer,producing,18.0,WiFi module
LM324AN,TI,模拟集成电路,military,producing,1.2,Quad op-amp
AD8066ARZ,ADI,模拟集成电路,aerospace,producing,15.0,FastFET op-amp
MAX232CPE,Maxim,接口电路,industrial,discontinued,3.4,RS-232 transceiver
";
    let csv_path = tmp.path().join("parts.csv");
    fs::write(&csv_path, csv).unwrap();

    cqt()
        .current_dir(tmp.path())
        .args(["import", "parts.csv", "--author", "seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported"));
}

/// A record fixture with all genealogy sections populated
fn full_record_yaml() -> &'static str {
    r#"id: TRC-01HQ3K4N5M6P7R8S9T0VWXYZAB
traceability_id: TRACE-2023-001
query_date: 2023-06-01T08:00:00Z
query_by: auditor
query_target:
  target_type: component
  target_value: LM324AN
  description: quad op-amp lot audit
component_genealogy:
  basic_info:
    part_number: LM324AN
    manufacturer: TI
    category: 模拟集成电路
batch_traceability:
  batch_info:
    batch_number: B2023001
    lot_code: L-88
  material_traceability:
    - material_type: wafer
      supplier_name: WaferCo
      supplier_lot: W-17
      received_date: 2023-01-10
      inspection_results: accepted
      certificate_number: CERT-9
  production_traceability:
    - process_step: die attach
      operator: line A
      process_date: 2023-01-15
      process_result: ok
    - process_step: wire bond
      operator: line A
      process_date: 2023-01-16
      process_result: ok
  test_traceability:
    - test_type: electrical
      test_standard: MIL-STD-883
      test_operator: qa-7
      test_date: 2023-01-18
      test_report: RPT-55
quality_history:
  quality_issues:
    - issue_id: QI-1
      severity: minor
      status: closed
supply_chain_traceability:
  supplier_tiers:
    - tier: 1
      supplier_name: Tier One Co
      relationship_status: active
    - tier: 2
      supplier_name: Tier Two Co
      relationship_status: active
    - tier: 3
      supplier_name: Tier Three Co
      relationship_status: inactive
  logistics_traceability:
    - shipment_id: SHP-1
      from_location: fab
      to_location: warehouse
      carrier: ACME Freight
      shipment_date: 2023-02-01
application_traceability:
  project_applications:
    - project_id: SAT-7
      project_name: Satellite bus
      application_status: in_use
traceability_analysis:
  risk_identification:
    identified_risks:
      - risk_type: supply
        risk_description: single-source tier 2
        risk_level: medium
        mitigation: qualify second source
    overall_risk_level: medium
  compliance_check:
    compliance_status: compliant
query_configuration:
  traceability_depth: 2
query_results:
  result_confidence: 85
"#
}

/// A record with only component genealogy populated
fn sparse_record_yaml() -> &'static str {
    r#"id: TRC-01HQ3K4N5M6P7R8S9T0VWXYZAC
traceability_id: TRACE-2023-002
query_date: 2023-06-02T08:00:00Z
query_by: auditor
query_target:
  target_type: component
  target_value: AD8066ARZ
component_genealogy:
  basic_info:
    part_number: AD8066ARZ
    manufacturer: ADI
traceability_analysis:
  compliance_check:
    compliance_status: compliant
    non_compliance_issues:
      - QML certificate lapsed
"#
}

fn seed_record(tmp: &TempDir, yaml: &str, filename: &str) {
    let path = tmp.path().join(filename);
    fs::write(&path, yaml).unwrap();
    cqt()
        .current_dir(tmp.path())
        .args(["trace", "import", filename])
        .assert()
        .success();
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    cqt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("component catalog"));
}

#[test]
fn test_version_displays() {
    cqt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cqt"));
}

#[test]
fn test_unknown_command_fails() {
    cqt()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    cqt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".cqt").exists());
    assert!(tmp.path().join(".cqt/config.yaml").exists());
    assert!(tmp.path().join("catalog/components").is_dir());
    assert!(tmp.path().join("traceability/records").is_dir());
}

#[test]
fn test_init_warns_if_project_exists() {
    let tmp = setup_test_project();

    cqt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_fail_outside_project() {
    let tmp = TempDir::new().unwrap();
    cqt()
        .current_dir(tmp.path())
        .args(["search", "STM32"])
        .assert()
        .failure();
}

// ============================================================================
// Import & Search Tests
// ============================================================================

#[test]
fn test_import_reports_row_counts() {
    let tmp = setup_test_project();
    let csv = "part_number,manufacturer,category\nLM324AN,TI,模拟集成电路\n,,broken\n";
    fs::write(tmp.path().join("parts.csv"), csv).unwrap();

    cqt()
        .current_dir(tmp.path())
        .args(["import", "parts.csv", "--skip-errors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 error(s)"));
}

#[test]
fn test_search_substring_matching() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    // both STM32 parts match; the ESP32 module does not
    cqt()
        .current_dir(tmp.path())
        .args(["search", "STM32"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STM32F103C8T6"))
        .stdout(predicate::str::contains("STM32F103"))
        .stdout(predicate::str::contains("ESP32").not());
}

#[test]
fn test_search_category_filter_and_facets() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    let output = cqt()
        .current_dir(tmp.path())
        .args([
            "search",
            "--category",
            "数字单片集成电路",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["total"], 3);

    // facets reflect only the filtered subset
    let manufacturers: Vec<&str> = json["facets"]["manufacturers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(manufacturers, vec!["Espressif", "ST"]);
}

#[test]
fn test_search_count_only() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    cqt()
        .current_dir(tmp.path())
        .args(["search", "--manufacturer", "ST", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2\n"));
}

#[test]
fn test_search_price_sort_desc_pagination() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    let output = cqt()
        .current_dir(tmp.path())
        .args([
            "search",
            "--sort-by",
            "referencePrice",
            "--sort-order",
            "desc",
            "--limit",
            "2",
            "--page",
            "1",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["total"], 6);
    let first_page: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["part_number"].as_str().unwrap())
        .collect();
    assert_eq!(first_page, vec!["ESP32-WROOM-32", "AD8066ARZ"]);
}

#[test]
fn test_search_invalid_page_clamps() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    // page 0 degrades to page 1 instead of failing
    let output = cqt()
        .current_dir(tmp.path())
        .args(["search", "--page", "0", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["page"], 1);
}

#[test]
fn test_search_suggestions() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    cqt()
        .current_dir(tmp.path())
        .args(["search", "stm", "--suggest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STM32"));
}

// ============================================================================
// Facets / Stats / Export Tests
// ============================================================================

#[test]
fn test_facets_lists_distinct_values() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    cqt()
        .current_dir(tmp.path())
        .args(["facets", "--field", "manufacturer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ADI"))
        .stdout(predicate::str::contains("TI"));
}

#[test]
fn test_stats_groups_by_category() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    cqt()
        .current_dir(tmp.path())
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("模拟集成电路"));
}

#[test]
fn test_export_stable_columns_and_placeholder() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    // a component with no quote gets the -- placeholder
    cqt()
        .current_dir(tmp.path())
        .args([
            "cmp", "new", "-p", "JANTX2N2222A", "-m", "Microsemi", "-c", "分立器件",
        ])
        .assert()
        .success();

    let output = cqt()
        .current_dir(tmp.path())
        .args(["export", "--where", "manufacturer=Microsemi"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert!(lines
        .next()
        .unwrap()
        .starts_with("part_number,manufacturer,primary_category"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("JANTX2N2222A,Microsemi"));
    assert!(row.contains("--"));
}

// ============================================================================
// Component Commands
// ============================================================================

#[test]
fn test_cmp_new_and_show() {
    let tmp = setup_test_project();

    cqt()
        .current_dir(tmp.path())
        .args([
            "cmp",
            "new",
            "-p",
            "LM324AN",
            "-m",
            "TI",
            "-c",
            "模拟集成电路",
            "--quality-level",
            "military",
            "--price",
            "1.2",
            "--param",
            "channels=4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created component"));

    cqt()
        .current_dir(tmp.path())
        .args(["cmp", "show", "LM324AN"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LM324AN"))
        .stdout(predicate::str::contains("channels"));
}

#[test]
fn test_cmp_list_with_category_filter() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    cqt()
        .current_dir(tmp.path())
        .args(["cmp", "list", "-c", "模拟集成电路"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LM324AN"))
        .stdout(predicate::str::contains("AD8066ARZ"))
        .stdout(predicate::str::contains("STM32").not());
}

// ============================================================================
// Traceability Tests
// ============================================================================

#[test]
fn test_trace_import_and_list() {
    let tmp = setup_test_project();
    seed_record(&tmp, full_record_yaml(), "record.yaml");

    cqt()
        .current_dir(tmp.path())
        .args(["trace", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TRACE-2023-001"))
        .stdout(predicate::str::contains("LM324AN"));
}

#[test]
fn test_trace_import_duplicate_conflicts() {
    let tmp = setup_test_project();
    seed_record(&tmp, full_record_yaml(), "record.yaml");

    fs::write(tmp.path().join("dup.yaml"), full_record_yaml()).unwrap();
    cqt()
        .current_dir(tmp.path())
        .args(["trace", "import", "dup.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_trace_unknown_id_is_not_an_error() {
    let tmp = setup_test_project();

    cqt()
        .current_dir(tmp.path())
        .args(["trace", "chain", "TRACE-404"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No traceability record"));
}

#[test]
fn test_trace_chain_depth_truncation_and_order() {
    let tmp = setup_test_project();
    seed_record(&tmp, full_record_yaml(), "record.yaml");

    let output = cqt()
        .current_dir(tmp.path())
        .args(["trace", "chain", "TRACE-2023-001", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let chain: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let stages = chain.as_array().unwrap();

    let sections: Vec<&str> = stages
        .iter()
        .map(|s| s["source_section"].as_str().unwrap())
        .collect();

    // depth 2: tier 3 omitted
    assert_eq!(sections.iter().filter(|s| **s == "supplier_tier").count(), 2);
    assert!(!stages
        .iter()
        .any(|s| s["stage_name"].as_str().unwrap().contains("Tier Three")));

    // canonical section order: material before production before test
    // before supplier tiers before logistics before applications
    let position = |section: &str| sections.iter().position(|s| *s == section).unwrap();
    assert!(position("material_receipt") < position("production_step"));
    assert!(position("production_step") < position("test_execution"));
    assert!(position("test_execution") < position("supplier_tier"));
    assert!(position("supplier_tier") < position("logistics_shipment"));
    assert!(position("logistics_shipment") < position("project_application"));
}

#[test]
fn test_trace_score_full_record() {
    let tmp = setup_test_project();
    seed_record(&tmp, full_record_yaml(), "record.yaml");

    let output = cqt()
        .current_dir(tmp.path())
        .args(["trace", "score", "TRACE-2023-001", "--format", "json"])
        .output()
        .unwrap();
    let score: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(score["completeness"], 100);
    assert_eq!(score["risk_level"], "medium");
    assert_eq!(score["risk_assessed"], true);
    assert_eq!(score["confidence"], 85);
    assert_eq!(score["compliance"], "compliant");
}

#[test]
fn test_trace_score_sparse_record_and_stale_compliance() {
    let tmp = setup_test_project();
    seed_record(&tmp, sparse_record_yaml(), "sparse.yaml");

    let output = cqt()
        .current_dir(tmp.path())
        .args(["trace", "score", "TRACE-2023-002", "--format", "json"])
        .output()
        .unwrap();
    let score: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    // one of five sections populated, risk falls back to the default,
    // and the stale "compliant" status is overridden by the issue list
    assert_eq!(score["completeness"], 20);
    assert_eq!(score["risk_level"], "low");
    assert_eq!(score["risk_assessed"], false);
    assert_eq!(score["compliance"], "non_compliant");
}

#[test]
fn test_trace_chain_empty_for_sparse_record() {
    let tmp = setup_test_project();
    seed_record(&tmp, sparse_record_yaml(), "sparse.yaml");

    let output = cqt()
        .current_dir(tmp.path())
        .args(["trace", "chain", "TRACE-2023-002", "--format", "json"])
        .output()
        .unwrap();
    let chain: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert!(chain.as_array().unwrap().is_empty());
}

// ============================================================================
// Validate & Cache Tests
// ============================================================================

#[test]
fn test_validate_passes_on_seeded_project() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);
    seed_record(&tmp, full_record_yaml(), "record.yaml");

    cqt()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_validate_rejects_bad_file() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("catalog/components/CMP-broken.cqt.yaml"),
        "id: CMP-01HQ3K4N5M6P7R8S9T0VWXYZAB\nmanufacturer: TI\n",
    )
    .unwrap();

    cqt()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed validation"));
}

#[test]
fn test_cache_status_and_clear() {
    let tmp = setup_test_project();
    seed_catalog(&tmp);

    cqt()
        .current_dir(tmp.path())
        .args(["cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Components:"));

    cqt()
        .current_dir(tmp.path())
        .args(["cache", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared"));

    cqt()
        .current_dir(tmp.path())
        .args(["cache", "rebuild"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rebuilt cache"));
}
