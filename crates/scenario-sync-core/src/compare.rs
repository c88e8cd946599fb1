//! Local/remote scenario comparison
//!
//! Each local scenario is paired with the remote record of the same issue
//! key and classified as `match`, `different`, `missing` or `unsupported`.
//! Remote documents are sliced by the parser's own scan, so both sides are
//! compared like for like.

use crate::catalog::SUPPORTED_TEST_TYPE;
use crate::issue_key::IssueKey;
use crate::normalize::normalize;
use crate::parser::{scan_scenarios, split_lines};
use crate::types::{ComparisonResult, ComparisonStatus, LocalScenario, RemoteScenario};
use std::collections::HashMap;

const MISSING_DETAILS: &str = "No remote scenario found for this key.";
const DIFFERENT_DETAILS: &str = "Content differs between repository and remote catalog.";
const MATCH_DETAILS: &str = "Scenario is up to date.";

/// Compare every local scenario against the remote snapshot, in local order
#[must_use]
pub fn compare_scenarios(
    locals: &[LocalScenario],
    remote: &HashMap<IssueKey, RemoteScenario>,
) -> Vec<ComparisonResult> {
    locals
        .iter()
        .map(|local| compare_scenario(local, remote.get(local.issue_key())))
        .collect()
}

/// Classify one local scenario against its remote record (if any)
#[must_use]
pub fn compare_scenario(local: &LocalScenario, remote: Option<&RemoteScenario>) -> ComparisonResult {
    let result = |status: ComparisonStatus,
                  remote_block: String,
                  normalized_remote: String,
                  explanation: String| {
        ComparisonResult {
            issue_key: local.issue_key().clone(),
            name: local.name().to_string(),
            source_path: local.source_path().to_path_buf(),
            status,
            local_block: local.raw_block().to_string(),
            remote_block,
            normalized_local: local.normalized_block().to_string(),
            normalized_remote,
            explanation,
        }
    };

    let Some(remote) = remote else {
        return result(
            ComparisonStatus::Missing,
            String::new(),
            String::new(),
            MISSING_DETAILS.to_string(),
        );
    };

    if !is_supported_type(&remote.test_type) {
        return result(
            ComparisonStatus::Unsupported,
            remote.gherkin.clone(),
            normalize(&remote.gherkin),
            format!("Remote test type is {}", remote.test_type),
        );
    }

    let candidate = extract_scenario_block(&remote.gherkin, local.name())
        .unwrap_or_else(|| remote.gherkin.clone());
    let normalized_remote = normalize(&candidate);

    if normalized_remote == local.normalized_block() {
        result(
            ComparisonStatus::Match,
            candidate,
            normalized_remote,
            MATCH_DETAILS.to_string(),
        )
    } else {
        result(
            ComparisonStatus::Different,
            candidate,
            normalized_remote,
            DIFFERENT_DETAILS.to_string(),
        )
    }
}

/// Whether a remote test type is the tracked one (case-insensitive)
#[inline]
#[must_use]
pub fn is_supported_type(test_type: &str) -> bool {
    test_type.trim().eq_ignore_ascii_case(SUPPORTED_TEST_TYPE)
}

/// Slice the block of the scenario named `name` out of a remote document
///
/// Blocks are delimited exactly as the parser delimits local files: a block
/// runs from its first pending tag line (or its header) up to the start of
/// the next scenario's block. The first header with a matching name
/// (case-insensitive) wins. Returns `None` when no header matches.
#[must_use]
pub fn extract_scenario_block(document: &str, name: &str) -> Option<String> {
    if document.is_empty() {
        return None;
    }

    let wanted = name.trim().to_lowercase();
    let spans = scan_scenarios(document);
    let index = spans
        .iter()
        .position(|span| span.name.to_lowercase() == wanted)?;

    let lines = split_lines(document);
    let start = spans[index].block_start;
    let end = spans.get(index + 1).map_or(lines.len(), |next| next.block_start);

    Some(lines[start..end].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn local(key: &str, name: &str, block: &str) -> LocalScenario {
        LocalScenario::new(key.parse().unwrap(), name, "login.feature", block)
    }

    fn remote(key: &str, gherkin: &str, test_type: &str) -> RemoteScenario {
        RemoteScenario::new(key.parse().unwrap(), gherkin, test_type)
    }

    const LOCAL_BLOCK: &str = "@ABC-1\nScenario: Valid login\n  When I log in\n  Then I see the dashboard\n";

    #[test]
    fn absent_remote_is_missing() {
        let result = compare_scenario(&local("ABC-1", "Valid login", LOCAL_BLOCK), None);
        assert_eq!(result.status, ComparisonStatus::Missing);
        assert_eq!(result.explanation, MISSING_DETAILS);
        assert!(result.remote_block.is_empty());
        assert_eq!(result.source_path, Path::new("login.feature"));
    }

    #[test]
    fn identical_remote_matches() {
        let result = compare_scenario(
            &local("ABC-1", "Valid login", LOCAL_BLOCK),
            Some(&remote("ABC-1", LOCAL_BLOCK, "Cucumber")),
        );
        assert_eq!(result.status, ComparisonStatus::Match);
        assert_eq!(result.explanation, MATCH_DETAILS);
    }

    #[test]
    fn trailing_whitespace_still_matches() {
        let padded = "@ABC-1  \r\nScenario: Valid login \r\n  When I log in\t\r\n  Then I see the dashboard\r\n\r\n";
        let result = compare_scenario(
            &local("ABC-1", "Valid login", LOCAL_BLOCK),
            Some(&remote("ABC-1", padded, "cucumber")),
        );
        assert_eq!(result.status, ComparisonStatus::Match);
    }

    #[test]
    fn wording_change_is_different() {
        let reworded = LOCAL_BLOCK.replace("dashboard", "home page");
        let result = compare_scenario(
            &local("ABC-1", "Valid login", LOCAL_BLOCK),
            Some(&remote("ABC-1", &reworded, "Cucumber")),
        );
        assert_eq!(result.status, ComparisonStatus::Different);
        assert_eq!(result.explanation, DIFFERENT_DETAILS);
        assert_ne!(result.normalized_local, result.normalized_remote);
    }

    #[test]
    fn other_test_types_are_unsupported_regardless_of_text() {
        let result = compare_scenario(
            &local("ABC-1", "Valid login", LOCAL_BLOCK),
            Some(&remote("ABC-1", LOCAL_BLOCK, "Manual")),
        );
        assert_eq!(result.status, ComparisonStatus::Unsupported);
        assert_eq!(result.explanation, "Remote test type is Manual");
    }

    #[test]
    fn matching_block_is_sliced_from_larger_document() {
        let document = "Feature: Login\n\n  @ABC-0\n  Scenario: Logout\n    When I log out\n\n  @ABC-1\n  Scenario: valid LOGIN\n    When I log in\n\n  @ABC-2\n  Scenario: Other\n    Then x\n";
        let block = extract_scenario_block(document, "Valid login").unwrap();
        assert_eq!(block, "  @ABC-1\n  Scenario: valid LOGIN\n    When I log in\n");
    }

    const COMMENTED_FEATURE: &str = "Feature: Login\n\n  @ABC-1\n  Scenario: Valid login\n    When I log in\n\n  @ABC-2\n  # regression for a reported bug\n\n  Scenario: Invalid login\n    Then I see an error\n";

    #[test]
    fn comments_between_tags_and_header_stay_in_block() {
        let block = extract_scenario_block(COMMENTED_FEATURE, "Invalid login").unwrap();
        assert_eq!(
            block,
            "  @ABC-2\n  # regression for a reported bug\n\n  Scenario: Invalid login\n    Then I see an error\n"
        );

        let block = extract_scenario_block(COMMENTED_FEATURE, "Valid login").unwrap();
        assert_eq!(block, "  @ABC-1\n  Scenario: Valid login\n    When I log in\n");
    }

    #[test]
    fn unchanged_feature_matches_every_parsed_scenario() {
        let locals = crate::parser::parse_feature(Path::new("login.feature"), COMMENTED_FEATURE);
        assert_eq!(locals.len(), 2);

        for scenario in &locals {
            let whole = remote(scenario.issue_key().as_str(), COMMENTED_FEATURE, "Cucumber");
            assert_eq!(compare_scenario(scenario, Some(&whole)).status, ComparisonStatus::Match);

            let own = remote(scenario.issue_key().as_str(), scenario.raw_block(), "Cucumber");
            assert_eq!(compare_scenario(scenario, Some(&own)).status, ComparisonStatus::Match);
        }
    }

    #[test]
    fn last_block_runs_to_end_of_document() {
        let document = "@ABC-1\nScenario: one\n  Given a\n\n@ABC-2\nScenario: two\n  Given b\n";
        let block = extract_scenario_block(document, "two").unwrap();
        assert_eq!(normalize(&block), "@ABC-2\nScenario: two\n  Given b");
    }

    #[test]
    fn first_of_duplicate_names_wins() {
        let document = "Scenario: same\n  Given first\nScenario: same\n  Given second\n";
        let block = extract_scenario_block(document, "same").unwrap();
        assert_eq!(block, "Scenario: same\n  Given first");
    }

    #[test]
    fn unmatched_name_falls_back_to_whole_document() {
        assert!(extract_scenario_block("Scenario: else\n  Given a", "Valid login").is_none());
        assert!(extract_scenario_block("", "Valid login").is_none());

        let result = compare_scenario(
            &local("ABC-1", "Valid login", LOCAL_BLOCK),
            Some(&remote("ABC-1", "Given something else entirely", "Cucumber")),
        );
        assert_eq!(result.status, ComparisonStatus::Different);
        assert_eq!(result.normalized_remote, "Given something else entirely");
    }

    #[test]
    fn compares_in_local_order() {
        let locals = vec![
            local("ABC-2", "two", "@ABC-2\nScenario: two"),
            local("ABC-1", "one", "@ABC-1\nScenario: one"),
        ];
        let mut remote_map = HashMap::new();
        let r = remote("ABC-1", "@ABC-1\nScenario: one", "Cucumber");
        remote_map.insert(r.issue_key.clone(), r);

        let results = compare_scenarios(&locals, &remote_map);
        let statuses: Vec<_> = results.iter().map(|r| (r.issue_key.as_str(), r.status)).collect();
        assert_eq!(
            statuses,
            vec![("ABC-2", ComparisonStatus::Missing), ("ABC-1", ComparisonStatus::Match)]
        );
    }
}
