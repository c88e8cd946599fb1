//! Core records of a sync run
//!
//! - Local scenarios extracted from feature files
//! - Remote scenarios fetched from the catalog
//! - Comparison results pairing the two

use crate::issue_key::IssueKey;
use crate::normalize::normalize;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Scenario extracted from a local feature file
///
/// Immutable once built; the normalized block is derived from the raw block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalScenario {
    issue_key: IssueKey,
    name: String,
    source_path: PathBuf,
    raw_block: String,
    normalized_block: String,
}

impl LocalScenario {
    /// Create a local scenario from its verbatim block
    #[must_use]
    pub fn new(
        issue_key: IssueKey,
        name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        raw_block: impl Into<String>,
    ) -> Self {
        let raw_block = raw_block.into();
        let normalized_block = normalize(&raw_block);
        Self {
            issue_key,
            name: name.into(),
            source_path: source_path.into(),
            raw_block,
            normalized_block,
        }
    }

    /// Sync join key
    #[inline]
    #[must_use]
    pub fn issue_key(&self) -> &IssueKey {
        &self.issue_key
    }

    /// Scenario name from the header line
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature file that defines the scenario
    #[inline]
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Verbatim text from the leading tags to the next scenario
    #[inline]
    #[must_use]
    pub fn raw_block(&self) -> &str {
        &self.raw_block
    }

    /// Canonical form of [`Self::raw_block`]
    #[inline]
    #[must_use]
    pub fn normalized_block(&self) -> &str {
        &self.normalized_block
    }
}

/// Scenario record held by the remote catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteScenario {
    /// Catalog issue key
    pub issue_key: IssueKey,
    /// Full remote Gherkin document (empty when the catalog has none)
    pub gherkin: String,
    /// Remote test classification, e.g. `Cucumber`
    pub test_type: String,
}

impl RemoteScenario {
    /// Create remote scenario record
    #[inline]
    #[must_use]
    pub fn new(issue_key: IssueKey, gherkin: impl Into<String>, test_type: impl Into<String>) -> Self {
        Self {
            issue_key,
            gherkin: gherkin.into(),
            test_type: test_type.into(),
        }
    }
}

/// Outcome of comparing one local scenario with the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    /// Normalized local and remote blocks are identical
    Match,
    /// Remote exists but its content differs
    Different,
    /// No remote record for the key
    Missing,
    /// Remote record is not a tracked test type
    Unsupported,
}

impl ComparisonStatus {
    /// Lowercase label used in reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Different => "different",
            Self::Missing => "missing",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether this status requires pushing the source file
    #[inline]
    #[must_use]
    pub fn requires_push(self) -> bool {
        matches!(self, Self::Missing | Self::Different)
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing one local scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub issue_key: IssueKey,
    pub name: String,
    pub source_path: PathBuf,
    pub status: ComparisonStatus,
    pub local_block: String,
    pub remote_block: String,
    pub normalized_local: String,
    pub normalized_remote: String,
    /// Human-readable reason for the status
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_scenario_normalizes_on_creation() {
        let scenario = LocalScenario::new(
            "ABC-1".parse().unwrap(),
            "Login",
            "features/login.feature",
            "@ABC-1   \r\nScenario: Login  \r\n\r\n",
        );
        assert_eq!(scenario.normalized_block(), "@ABC-1\nScenario: Login");
        assert_eq!(scenario.raw_block(), "@ABC-1   \r\nScenario: Login  \r\n\r\n");
        assert_eq!(scenario.source_path(), Path::new("features/login.feature"));
    }

    #[test]
    fn only_missing_and_different_require_push() {
        assert!(ComparisonStatus::Missing.requires_push());
        assert!(ComparisonStatus::Different.requires_push());
        assert!(!ComparisonStatus::Match.requires_push());
        assert!(!ComparisonStatus::Unsupported.requires_push());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ComparisonStatus::Unsupported).unwrap();
        assert_eq!(json, "\"unsupported\"");
        assert_eq!(ComparisonStatus::Different.to_string(), "different");
    }
}
