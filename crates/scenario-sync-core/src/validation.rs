//! Issue key uniqueness across the local scenario set
//!
//! Sync joins local and remote records by issue key, so one key defined in
//! two files would make the pushed definition arbitrary. Any such key fails
//! the run before the catalog is contacted.

use crate::issue_key::IssueKey;
use crate::types::LocalScenario;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::path::PathBuf;

/// Issue key defined by more than one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub issue_key: IssueKey,
    /// Defining files, in first-seen order
    pub files: Vec<PathBuf>,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files: Vec<String> = self.files.iter().map(|p| p.display().to_string()).collect();
        write!(f, "{} ({})", self.issue_key, files.join(", "))
    }
}

/// Every duplicated key of a run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicated issue keys detected in feature files:{}", bullet_list(.duplicates))]
pub struct DuplicateKeyError {
    pub duplicates: Vec<DuplicateKey>,
}

fn bullet_list(duplicates: &[DuplicateKey]) -> String {
    duplicates.iter().map(|d| format!("\n  - {d}")).collect()
}

/// Find keys defined in more than one file
///
/// Repeats of a key inside a single file collapse into one path.
#[must_use]
pub fn find_duplicate_keys(scenarios: &[LocalScenario]) -> Vec<DuplicateKey> {
    let mut by_key: IndexMap<&IssueKey, IndexSet<PathBuf>> = IndexMap::new();
    for scenario in scenarios {
        by_key
            .entry(scenario.issue_key())
            .or_default()
            .insert(scenario.source_path().to_path_buf());
    }

    by_key
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(issue_key, files)| DuplicateKey {
            issue_key: issue_key.clone(),
            files: files.into_iter().collect(),
        })
        .collect()
}

/// Fail if any issue key is defined in more than one file
///
/// # Errors
/// `DuplicateKeyError` listing every offending key and its files.
pub fn ensure_unique_keys(scenarios: &[LocalScenario]) -> Result<(), DuplicateKeyError> {
    let duplicates = find_duplicate_keys(scenarios);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(DuplicateKeyError { duplicates })
    }
}
