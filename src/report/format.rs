//! Plain-text tables for the CLI.
//!
//! Everything here returns a `String` so output can be asserted in tests and
//! the caller decides where it goes.

use std::path::Path;

use crate::app::pipeline::CurveView;
use crate::domain::FilterSet;
use crate::io::IngestReport;
use crate::units::UnitInfo;

/// Dropped rows listed individually before summarizing.
const MAX_DROPPED_LISTED: usize = 10;

/// Summarize an ingest: rows used and any rows dropped.
pub fn format_ingest_report(source: &Path, report: &IngestReport, curves: usize) -> String {
    let mut out = format!(
        "Loaded {curves} curve(s) from '{}' ({} of {} rows used)\n",
        source.display(),
        report.rows_used,
        report.rows_read
    );
    if report.dropped.is_empty() {
        return out;
    }
    out.push_str(&format!(
        "Dropped {} row(s) with missing or non-numeric values:\n",
        report.dropped.len()
    ));
    for d in report.dropped.iter().take(MAX_DROPPED_LISTED) {
        out.push_str(&format!("  line {:>6}: {}\n", d.line, d.reason));
    }
    if report.dropped.len() > MAX_DROPPED_LISTED {
        out.push_str(&format!(
            "  ... and {} more\n",
            report.dropped.len() - MAX_DROPPED_LISTED
        ));
    }
    out
}

/// Curve titles matching `filters`.
pub fn format_curve_list(titles: &[&str], total: usize, filters: &FilterSet) -> String {
    let mut out = String::new();
    let active: Vec<String> = filters
        .filters
        .iter()
        .filter(|f| f.is_active())
        .map(|f| format!("{}={}", f.attribute, f.value))
        .collect();
    if !active.is_empty() {
        out.push_str(&format!("Filters: {}\n", active.join(", ")));
    }
    if titles.is_empty() {
        out.push_str("No curves match the current filters.\n");
        return out;
    }
    out.push_str(&format!("Curves ({} of {total}):\n", titles.len()));
    for (i, t) in titles.iter().enumerate() {
        out.push_str(&format!("{:>4}) {t}\n", i + 1));
    }
    out
}

/// Unit options for one variable; the stored unit is marked with `*`.
pub fn format_units(variable: &str, info: &UnitInfo) -> String {
    let mut out = format!("Variable: {variable}\n");
    match info {
        UnitInfo::Unknown { .. } => {
            out.push_str(&format!(
                "Category: {} (values are shown without conversion)\n",
                info.category_id()
            ));
        }
        UnitInfo::Known {
            category,
            native_unit,
            units,
        } => {
            out.push_str(&format!("Category: {}\n", category.id));
            out.push_str(&format!("Stored unit: {native_unit}\n"));
            out.push_str("Units:\n");
            for u in units {
                let mark = if u == native_unit { "*" } else { " " };
                let factor = category.conversion_value(u).unwrap_or(f64::NAN);
                out.push_str(&format!(
                    "{mark} {:<20} {:>12} {}\n",
                    u,
                    fmt_value(factor),
                    category.base_unit()
                ));
            }
        }
    }
    out
}

/// Attribute/value table for one curve.
pub fn format_metadata(title: &str, metadata: &[(String, Option<String>)]) -> String {
    let width = metadata
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        .max(9);
    let mut out = format!("Metadata for '{title}':\n");
    out.push_str(format!("{:<width$} {}\n", "attribute", "value").trim_end());
    out.push('\n');
    out.push_str(&format!("{:-<width$} {:-<5}\n", "", ""));
    for (k, v) in metadata {
        out.push_str(format!("{k:<width$} {}\n", v.as_deref().unwrap_or("-")).trim_end());
        out.push('\n');
    }
    out
}

/// Header, notices, raw points and fitted points for a view.
pub fn format_view(view: &CurveView) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Curve: {} ===\n", view.title));
    out.push_str(&format!(
        "Points: n={} | spline degree k={}\n",
        view.n_points, view.degree
    ));
    out.push_str(&format!("X: {}\n", view.x_label()));
    out.push_str(&format!("Y: {}\n", view.y_label()));
    for n in &view.notices {
        out.push_str(&format!("! {n}\n"));
    }

    out.push_str("\nRaw samples:\n");
    out.push_str(&format_points(&view.raw));
    out.push_str(&format!("\nFitted curve ({} points):\n", view.fitted.len()));
    out.push_str(&format_points(&view.fitted));
    out
}

fn format_points(points: &[(f64, f64)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>5} {:>14} {:>14}\n", "i", "x", "y"));
    out.push_str(&format!("{:->5} {:->14} {:->14}\n", "", "", ""));
    for (i, (x, y)) in points.iter().enumerate() {
        out.push_str(&format!("{i:>5} {:>14} {:>14}\n", fmt_value(*x), fmt_value(*y)));
    }
    out
}

/// Fixed notation for ordinary magnitudes, scientific otherwise.
pub fn fmt_value(v: f64) -> String {
    let a = v.abs();
    if v == 0.0 || (1e-3..1e6).contains(&a) {
        format!("{v:.4}")
    } else {
        format!("{v:.4e}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttributeFilter;
    use crate::io::DroppedRow;
    use crate::units::units_for;

    #[test]
    fn value_formatting_switches_to_scientific() {
        assert_eq!(fmt_value(0.0), "0.0000");
        assert_eq!(fmt_value(2.54), "2.5400");
        assert_eq!(fmt_value(28316.8466), "28316.8466");
        assert_eq!(fmt_value(1.5e-5), "1.5000e-5");
        assert_eq!(fmt_value(-3.0e7), "-3.0000e7");
    }

    #[test]
    fn units_listing_marks_the_stored_unit() {
        let out = format_units("Diameter in", &units_for("Diameter in"));
        assert!(out.contains("Category: length"));
        assert!(out.contains("* inches (in)"));
        assert!(out.contains("  centimeters (cm)"));

        let out = format_units("Odd x", &units_for("Odd x"));
        assert!(out.contains("Category: unknown"));
    }

    #[test]
    fn curve_list_shows_filters_and_empty_state() {
        let filters = FilterSet {
            filters: vec![
                AttributeFilter::new("geometry", "sphere"),
                AttributeFilter::new("critmat", "All"),
            ],
        };
        let out = format_curve_list(&["A", "C"], 3, &filters);
        assert_eq!(out, "Filters: geometry=sphere\nCurves (2 of 3):\n   1) A\n   2) C\n");

        let out = format_curve_list(&[], 3, &FilterSet::new());
        assert_eq!(out, "No curves match the current filters.\n");
    }

    #[test]
    fn metadata_shows_missing_values_as_dash() {
        let meta = vec![
            ("title".to_string(), Some("A".to_string())),
            ("reflmat".to_string(), None),
        ];
        let out = format_metadata("A", &meta);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Metadata for 'A':");
        assert_eq!(lines[3], "title     A");
        assert_eq!(lines[4], "reflmat   -");
    }

    #[test]
    fn ingest_report_lists_dropped_rows() {
        let report = IngestReport {
            rows_read: 3,
            rows_used: 2,
            dropped: vec![DroppedRow {
                line: 4,
                reason: "missing or non-numeric `X_Value`".to_string(),
            }],
        };
        let out = format_ingest_report(Path::new("d.csv"), &report, 1);
        assert!(out.starts_with("Loaded 1 curve(s) from 'd.csv' (2 of 3 rows used)\n"));
        assert!(out.contains("line      4: missing or non-numeric `X_Value`"));
    }
}
