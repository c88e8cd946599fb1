//! User-facing run output

use scenario_sync_core::summary::render_console_report;
use scenario_sync_core::{FileOutcome, SyncOutcome};
use std::path::Path;

/// Lines printed to stdout after a successful run
#[must_use]
pub fn outcome_lines(outcome: &SyncOutcome, feature_dir: &Path) -> Vec<String> {
    if outcome.nothing_scanned() {
        return vec![format!(
            "No feature files found under {}; nothing to do.",
            feature_dir.display()
        )];
    }

    let mut lines = render_console_report(&outcome.results);
    if outcome.in_sync() {
        lines.push("No differences detected. Remote catalog is already in sync.".to_string());
        return lines;
    }

    let Some(execution) = &outcome.execution else {
        return lines;
    };
    let planned: Vec<&Path> = execution
        .outcomes
        .iter()
        .filter(|o| matches!(o, FileOutcome::Planned { .. }))
        .map(FileOutcome::path)
        .collect();
    if !planned.is_empty() {
        lines.push("Dry run: the following files would be imported:".to_string());
        lines.extend(planned.iter().map(|path| format!("  - {}", path.display())));
    }
    for o in &execution.outcomes {
        if let FileOutcome::Imported { path, response } = o {
            lines.push(format!("Imported {}: {response}", path.display()));
        }
    }
    lines
}

/// Comparison results as a pretty-printed JSON array
///
/// # Errors
/// Serialization failure from `serde_json`.
pub fn results_json(outcome: &SyncOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&outcome.results)
}
