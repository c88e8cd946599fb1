//! Update planning and execution
//!
//! The plan is the set of feature files whose push would bring the catalog
//! in sync. Execution either reports the plan (dry run) or imports each file
//! in order, stopping at the first failure.

use crate::catalog::{AccessToken, ScenarioCatalog};
use crate::error::{SyncError, SyncResult};
use crate::types::{ComparisonResult, ComparisonStatus};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Feature files that need pushing, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    files: IndexSet<PathBuf>,
}

impl UpdatePlan {
    /// Derive the plan from comparison results
    ///
    /// A file is planned when one of its scenarios is `missing` or
    /// `different`. A file holding any `unsupported` scenario is never
    /// planned: importing it would overwrite a remote item of another type.
    #[must_use]
    pub fn from_results(results: &[ComparisonResult]) -> Self {
        let blocked: HashSet<&Path> = results
            .iter()
            .filter(|r| r.status == ComparisonStatus::Unsupported)
            .map(|r| r.source_path.as_path())
            .collect();

        let files = results
            .iter()
            .filter(|r| r.status.requires_push())
            .map(|r| r.source_path.as_path())
            .filter(|path| !blocked.contains(path))
            .map(Path::to_path_buf)
            .collect();

        Self { files }
    }

    /// Planned files
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Whether `path` is planned
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Number of planned files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing needs pushing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// How a plan is carried out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Only report planned files
    DryRun,
    /// Import every planned file
    Live {
        /// Optional project scope for imports
        project_key: Option<String>,
    },
}

impl ExecutionMode {
    /// Check if no mutating call will be made
    #[inline]
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// What happened to one planned file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Reported only (dry run)
    Planned { path: PathBuf },
    /// Imported; carries the catalog response body
    Imported { path: PathBuf, response: String },
}

impl FileOutcome {
    /// File this outcome is about
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Planned { path } | Self::Imported { path, .. } => path,
        }
    }
}

/// Outcome of executing a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub outcomes: Vec<FileOutcome>,
}

impl ExecutionReport {
    /// Number of files actually imported
    #[must_use]
    pub fn imported_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Imported { .. }))
            .count()
    }
}

/// Carry out `plan` against `catalog`
///
/// Files are processed one at a time in plan order. In live mode the first
/// failing read or import aborts execution; later files are not attempted.
///
/// # Errors
/// `SyncError::Io` if a planned file cannot be read, `SyncError::Remote`
/// if the catalog rejects an import.
pub async fn execute_plan<C>(
    catalog: &C,
    token: &AccessToken,
    plan: &UpdatePlan,
    mode: &ExecutionMode,
) -> SyncResult<ExecutionReport>
where
    C: ScenarioCatalog + ?Sized,
{
    let mut report = ExecutionReport::default();

    for path in plan.files() {
        match mode {
            ExecutionMode::DryRun => {
                tracing::info!(path = %path.display(), "dry run: file requires update");
                report.outcomes.push(FileOutcome::Planned {
                    path: path.to_path_buf(),
                });
            }
            ExecutionMode::Live { project_key } => {
                let contents = tokio::fs::read(path)
                    .await
                    .map_err(|e| SyncError::io_error(path, e))?;

                tracing::info!(path = %path.display(), bytes = contents.len(), "importing feature file");
                let response = catalog
                    .import_feature(token, path, contents, project_key.as_deref())
                    .await?;
                tracing::info!(path = %path.display(), response = %response, "import accepted");

                report.outcomes.push(FileOutcome::Imported {
                    path: path.to_path_buf(),
                    response,
                });
            }
        }
    }

    Ok(report)
}
