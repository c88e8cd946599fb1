//! Testing utilities for the scenario sync workspace
//!
//! Shared test helpers, fixtures, and an in-memory catalog.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use scenario_sync_core::{
    AccessToken, Credentials, IssueKey, RemoteError, RemoteScenario, ScenarioCatalog,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEST_TOKEN: &str = "test-token";

/// One recorded import call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCall {
    pub path: PathBuf,
    pub project_key: Option<String>,
    pub contents: Vec<u8>,
}

#[derive(Debug, Default)]
struct CallLog {
    auth_calls: usize,
    batches: Vec<Vec<IssueKey>>,
    imports: Vec<ImportCall>,
}

/// In-memory catalog that records every call made against it
#[derive(Debug, Default)]
pub struct RecordingCatalog {
    remote: HashMap<IssueKey, RemoteScenario>,
    fail_auth: bool,
    fail_batch: Option<usize>,
    fail_import: Option<String>,
    calls: Mutex<CallLog>,
}

impl RecordingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a remote record
    pub fn with_scenario(mut self, key: &str, gherkin: &str, test_type: &str) -> Self {
        let key = issue_key(key);
        self.remote
            .insert(key.clone(), RemoteScenario::new(key, gherkin, test_type));
        self
    }

    /// Add a Cucumber remote record
    pub fn with_cucumber(self, key: &str, gherkin: &str) -> Self {
        self.with_scenario(key, gherkin, "Cucumber")
    }

    /// Reject authentication with a 401
    pub fn failing_auth(mut self) -> Self {
        self.fail_auth = true;
        self
    }

    /// Fail the `n`th fetch batch (1-based)
    pub fn failing_batch(mut self, n: usize) -> Self {
        self.fail_batch = Some(n);
        self
    }

    /// Fail imports of files with this name
    pub fn failing_import(mut self, file_name: &str) -> Self {
        self.fail_import = Some(file_name.to_string());
        self
    }

    pub fn auth_calls(&self) -> usize {
        self.calls.lock().auth_calls
    }

    pub fn batches(&self) -> Vec<Vec<IssueKey>> {
        self.calls.lock().batches.clone()
    }

    pub fn imports(&self) -> Vec<ImportCall> {
        self.calls.lock().imports.clone()
    }

    /// File names of imported paths, in call order
    pub fn imported_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .imports
            .iter()
            .map(|call| file_name(&call.path))
            .collect()
    }
}

#[async_trait]
impl ScenarioCatalog for RecordingCatalog {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<AccessToken, RemoteError> {
        self.calls.lock().auth_calls += 1;
        if self.fail_auth {
            return Err(RemoteError::AuthenticationFailed {
                status: 401,
                body: "invalid client credentials".to_string(),
            });
        }
        Ok(AccessToken::new(TEST_TOKEN))
    }

    async fn fetch_batch(
        &self,
        _token: &AccessToken,
        keys: &[IssueKey],
    ) -> Result<Vec<RemoteScenario>, RemoteError> {
        let batch_number = {
            let mut calls = self.calls.lock();
            calls.batches.push(keys.to_vec());
            calls.batches.len()
        };
        if self.fail_batch == Some(batch_number) {
            return Err(RemoteError::QueryFailed {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(keys
            .iter()
            .filter_map(|key| self.remote.get(key).cloned())
            .collect())
    }

    async fn import_feature(
        &self,
        _token: &AccessToken,
        path: &Path,
        contents: Vec<u8>,
        project_key: Option<&str>,
    ) -> Result<String, RemoteError> {
        self.calls.lock().imports.push(ImportCall {
            path: path.to_path_buf(),
            project_key: project_key.map(str::to_string),
            contents,
        });
        if self.fail_import.as_deref() == Some(file_name(path).as_str()) {
            return Err(RemoteError::ImportFailed {
                path: path.to_path_buf(),
                status: 400,
                body: "malformed feature".to_string(),
            });
        }
        Ok(format!("{{\"imported\":\"{}\"}}", file_name(path)))
    }
}

/// Temporary feature tree
#[derive(Debug)]
pub struct FeatureTree {
    dir: TempDir,
}

impl FeatureTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Default for FeatureTree {
    fn default() -> Self {
        Self::new()
    }
}

pub fn issue_key(raw: &str) -> IssueKey {
    raw.parse().unwrap()
}

/// Scenario block tagged with `key`
pub fn tagged_scenario(key: &str, name: &str, steps: &[&str]) -> String {
    let mut block = format!("  @{key}\n  Scenario: {name}\n");
    for step in steps {
        block.push_str("    ");
        block.push_str(step);
        block.push('\n');
    }
    block
}

/// Feature file text with a title and the given scenario blocks
pub fn feature_file(title: &str, scenarios: &[String]) -> String {
    let mut text = format!("Feature: {title}\n\n");
    text.push_str(&scenarios.join("\n"));
    text
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
