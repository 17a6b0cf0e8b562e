//! Plain-text tables for the terminal.

use std::fmt::Write;

use stockwise_ai::{PredictionResult, ReorderRule};
use stockwise_core::ProductRecord;

fn fmt_quantity(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// The raw catalog, before any prediction.
pub fn render_catalog(catalog: &[ProductRecord]) -> String {
    let name_width = catalog.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>8}  {:>12}  {:>9}",
        "Name", "Stock", "Avg/Week", "Lead Time"
    );
    for record in catalog {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>8}  {:>12}  {:>9}",
            record.name,
            fmt_quantity(record.stock()),
            fmt_quantity(record.average_weekly_sales()),
            fmt_quantity(record.lead_time()),
        );
    }
    out
}

/// Recommendation table. Rows the model flags for reorder are marked with `*`
/// and the metric column is titled after the deployment's rule.
pub fn render_results(rule: ReorderRule, results: &[PredictionResult]) -> String {
    let name_width = results.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);
    let metric_label = rule.metric_label();
    let metric_width = metric_label.len().max(8);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<name_width$}  {:>8}  {:>12}  {:>9}  {:>metric_width$}  {:>6}  Decision",
        "Name", "Stock", "Avg/Week", "Lead Time", metric_label, "P"
    );
    for r in results {
        let marker = if r.decision.is_reorder() { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:<name_width$}  {:>8}  {:>12}  {:>9}  {:>metric_width$}  {:>6.3}  {}",
            r.name,
            fmt_quantity(r.stock),
            fmt_quantity(r.average_weekly_sales),
            fmt_quantity(r.lead_time),
            fmt_quantity(r.derived_metric),
            r.probability,
            r.decision,
        );
    }
    out
}
