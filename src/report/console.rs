use crate::ai::orchestrator::FallbackOutcome;
use crate::report::report_model::{FillReport, FillSource};

// ============================================================================
// Console reporter
// ============================================================================

/// Format a fill report for terminal output.
///
/// Produces output like:
/// ```text
/// === Filled with profile: Work ===
///
/// ✓ HEUR  Email address <- email (0.90)
/// ✓ AI    field7 <- company
///
/// AI fallback: 1 filled, 0 unmatched
/// === Results: 2 of 3 inputs filled ===
/// ```
pub fn format_console_report(report: &FillReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Filled with profile: {} ===\n\n", report.profile_name));

    for filled in report.filled() {
        let marker = match filled.source {
            FillSource::Heuristic => "\u{2713} HEUR",
            FillSource::Ai => "\u{2713} AI  ",
        };
        out.push_str(&format!("{}  {} <- {}", marker, filled.descriptor, filled.key));
        if let Some(score) = filled.score {
            out.push_str(&format!(" ({:.2})", score));
        }
        out.push('\n');
    }

    if report.filled_count() > 0 {
        out.push('\n');
    }

    match &report.fallback {
        FallbackOutcome::NotNeeded => {}
        FallbackOutcome::Disabled { unresolved } => {
            out.push_str(&format!("AI fallback: disabled ({} unresolved)\n", unresolved));
        }
        FallbackOutcome::Completed {
            filled,
            unmatched,
            stale,
        } => {
            out.push_str(&format!(
                "AI fallback: {} filled, {} unmatched",
                filled.len(),
                unmatched
            ));
            if *stale > 0 {
                out.push_str(&format!(", {} stale identifiers ignored", stale));
            }
            out.push('\n');
        }
        FallbackOutcome::Failed { reason } => {
            out.push_str(&format!("AI fallback: failed ({})\n", reason));
        }
    }

    out.push_str(&format!(
        "=== Results: {} of {} inputs filled ===\n",
        report.filled_count(),
        report.inputs_scanned
    ));

    out
}
