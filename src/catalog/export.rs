//! CSV export of query result sets
//!
//! Column order is stable and missing scalars render as the literal `--`
//! placeholder; downstream report tooling depends on both.

use std::io::Write;

use crate::catalog::component::Component;

/// Placeholder for missing scalar values
pub const MISSING: &str = "--";

/// Stable column ordering for exported result sets
pub const COLUMNS: [&str; 9] = [
    "part_number",
    "manufacturer",
    "primary_category",
    "secondary_category",
    "package",
    "quality_level",
    "lifecycle",
    "reference_price",
    "description",
];

/// Write components as CSV with the stable column order
pub fn write_csv<W: Write>(writer: W, items: &[Component]) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;

    for component in items {
        csv_writer.write_record([
            placeholder(&component.part_number),
            placeholder(&component.manufacturer),
            placeholder(&component.primary_category),
            placeholder(&component.secondary_category),
            placeholder(&component.package),
            placeholder(&component.quality_level),
            component.lifecycle.to_string(),
            component
                .quoted_price()
                .map(|p| p.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            placeholder(&component.description),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn placeholder(value: &str) -> String {
    if value.is_empty() {
        MISSING.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_stable_columns_and_placeholders() {
        let mut cmp = Component::new(
            "LM324AN".to_string(),
            "TI".to_string(),
            "模拟集成电路".to_string(),
            "test".to_string(),
        );
        cmp.reference_price = 0.0; // no quote

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[cmp]).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();

        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("LM324AN,TI,"));
        // package, quality level, price, and description are all missing
        assert_eq!(row.matches(MISSING).count(), 5);
    }

    #[test]
    fn test_export_quoted_price_rendered() {
        let mut cmp = Component::new(
            "AD8066ARZ".to_string(),
            "ADI".to_string(),
            "模拟集成电路".to_string(),
            "test".to_string(),
        );
        cmp.reference_price = 15.5;
        cmp.package = "SOIC-8".to_string();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[cmp]).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("15.5"));
        assert!(output.contains("SOIC-8"));
    }
}
