//! Text rendering of analysis results.

use fbi_core::AnalysisResult;
use fbi_core::catalog::display_name;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Separator line framing each report.
const RULE: &str = "—";

/// Format a result as the plain-text report printed by `fbi run`.
pub fn format_report(result: &AnalysisResult<'_>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, result);
    out
}

fn write_report(out: &mut String, result: &AnalysisResult<'_>) -> std::fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Analyzed {}", result.label)?;
    writeln!(out)?;
    writeln!(out, "Inputs: {}", format_flows(&result.external_inputs))?;
    writeln!(out, "Outputs: {}", format_flows(&result.external_outputs))?;
    writeln!(out)?;

    writeln!(out, "Utilization:")?;
    for group in &result.utilization {
        writeln!(
            out,
            " {} x{}: {:.0}%",
            group.key(),
            group.count,
            group.mean_utilization * 100.0
        )?;
    }

    if !result.problems.is_empty() {
        writeln!(out, "Problems:")?;
        for problem in &result.problems {
            writeln!(out, " {problem}")?;
        }
    }
    write!(out, "{RULE}")
}

/// `Iron Plate (2.00/s), Copper Plate (1.00/s)` or `None`.
fn format_flows(flows: &BTreeMap<String, f64>) -> String {
    if flows.is_empty() {
        return "None".to_string();
    }
    flows
        .iter()
        .map(|(item, rate)| format!("{} ({rate:.2}/s)", display_name(item)))
        .collect::<Vec<_>>()
        .join(", ")
}
