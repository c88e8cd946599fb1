//! Comparison reporting
//!
//! Renders results as console lines and as a Markdown table appended to a
//! CI step summary file.

use crate::error::{SyncError, SyncResult};
use crate::types::{ComparisonResult, ComparisonStatus};
use indexmap::IndexMap;
use std::path::Path;
use tokio::io::AsyncWriteExt;

const TABLE_HEADER: &str = "| Issue Key | Scenario | Status | Details | Source File |";
const TABLE_SEPARATOR: &str = "|-----------|----------|--------|---------|-------------|";

/// Escape a value for a Markdown table cell
#[must_use]
pub fn escape_markdown(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Count results per status, in order of first appearance
#[must_use]
pub fn status_counts(results: &[ComparisonResult]) -> IndexMap<ComparisonStatus, usize> {
    let mut counts = IndexMap::new();
    for result in results {
        *counts.entry(result.status).or_insert(0) += 1;
    }
    counts
}

/// Human-readable report lines
#[must_use]
pub fn render_console_report(results: &[ComparisonResult]) -> Vec<String> {
    let mut lines = vec!["Comparison summary:".to_string()];
    lines.extend(
        status_counts(results)
            .into_iter()
            .map(|(status, count)| format!("  - {status}: {count}")),
    );
    lines.extend(results.iter().map(|r| {
        format!(
            "[{}] {} ({}) -> {} [{}]",
            r.status.as_str().to_uppercase(),
            r.issue_key,
            r.name,
            r.explanation,
            r.source_path.display()
        )
    }));
    lines
}

/// Markdown table with one row per result, ending in a blank line
#[must_use]
pub fn render_step_summary(results: &[ComparisonResult]) -> String {
    let mut lines = vec![TABLE_HEADER.to_string(), TABLE_SEPARATOR.to_string()];
    for r in results {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            escape_markdown(r.issue_key.as_str()),
            escape_markdown(&r.name),
            r.status,
            escape_markdown(&r.explanation),
            escape_markdown(&r.source_path.display().to_string()),
        ));
    }
    lines.push(String::new());
    format!("{}\n", lines.join("\n"))
}

/// Append the Markdown table to `path`, creating the file if needed
///
/// # Errors
/// `SyncError::Io` if the file cannot be opened or written.
pub async fn append_step_summary(path: &Path, results: &[ComparisonResult]) -> SyncResult<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| SyncError::io_error(path, e))?;

    file.write_all(render_step_summary(results).as_bytes())
        .await
        .map_err(|e| SyncError::io_error(path, e))?;
    file.flush().await.map_err(|e| SyncError::io_error(path, e))?;

    tracing::debug!(path = %path.display(), rows = results.len(), "appended step summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn result(key: &str, name: &str, status: ComparisonStatus, explanation: &str) -> ComparisonResult {
        ComparisonResult {
            issue_key: key.parse().unwrap(),
            name: name.to_string(),
            source_path: PathBuf::from("features/login.feature"),
            status,
            local_block: String::new(),
            remote_block: String::new(),
            normalized_local: String::new(),
            normalized_remote: String::new(),
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn escapes_table_breaking_characters() {
        assert_eq!(escape_markdown(r"a|b\c"), r"a\|b\\c");
        assert_eq!(escape_markdown("line1\nline2\r\nline3"), "line1<br>line2<br>line3");
    }

    #[test]
    fn renders_one_row_per_result() {
        let results = vec![
            result("ABC-1", "Login | admin", ComparisonStatus::Match, "Scenario is up to date."),
            result("ABC-2", "Logout", ComparisonStatus::Missing, "No remote scenario found for this key."),
        ];
        let table = render_step_summary(&results);
        assert_eq!(
            table,
            "| Issue Key | Scenario | Status | Details | Source File |\n\
             |-----------|----------|--------|---------|-------------|\n\
             | ABC-1 | Login \\| admin | match | Scenario is up to date. | features/login.feature |\n\
             | ABC-2 | Logout | missing | No remote scenario found for this key. | features/login.feature |\n\
             \n"
        );
    }

    #[test]
    fn console_report_counts_then_lists() {
        let results = vec![
            result("ABC-1", "one", ComparisonStatus::Different, "differs"),
            result("ABC-2", "two", ComparisonStatus::Match, "same"),
            result("ABC-3", "three", ComparisonStatus::Different, "differs"),
        ];
        let lines = render_console_report(&results);
        assert_eq!(lines[0], "Comparison summary:");
        assert_eq!(lines[1], "  - different: 2");
        assert_eq!(lines[2], "  - match: 1");
        assert_eq!(lines[3], "[DIFFERENT] ABC-1 (one) -> differs [features/login.feature]");
        assert_eq!(lines.len(), 6);
    }

    #[tokio::test]
    async fn appends_to_existing_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        std::fs::write(&path, "# Previous step\n").unwrap();

        let results = vec![result("ABC-1", "one", ComparisonStatus::Match, "ok")];
        append_step_summary(&path, &results).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Previous step\n| Issue Key |"));
        assert!(contents.ends_with("| ABC-1 | one | match | ok | features/login.feature |\n\n"));
    }
}
