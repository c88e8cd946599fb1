//! Sync run orchestration
//!
//! One run walks a fixed sequence of stages:
//!
//! ```text
//! Scanning → Parsing → Validating → Authenticating → Fetching → Comparing
//!          → Planning → (Reporting | Executing) → Done
//! ```
//!
//! Any failure moves the run to `Aborted`. There is no retry or resume: every
//! run starts from a clean scan, and I/O is awaited one operation at a time.

use crate::catalog::{fetch_by_keys, ScenarioCatalog};
use crate::compare::compare_scenarios;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::issue_key::IssueKey;
use crate::parser::FeatureParser;
use crate::plan::{execute_plan, ExecutionMode, ExecutionReport, UpdatePlan};
use crate::scanner::scan_feature_files;
use crate::summary::append_step_summary;
use crate::types::{ComparisonResult, LocalScenario};
use crate::validation::ensure_unique_keys;
use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::Instrument;
use uuid::Uuid;

/// Stage of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Scanning,
    Parsing,
    Validating,
    Authenticating,
    Fetching,
    Comparing,
    Planning,
    Reporting,
    Executing,
    Done,
    Aborted,
}

impl RunStage {
    /// Stages reachable from `self`
    #[must_use]
    pub fn allowed_transitions(self) -> Vec<RunStage> {
        use RunStage::*;
        match self {
            Scanning => vec![Parsing, Done, Aborted],
            Parsing => vec![Validating, Aborted],
            Validating => vec![Authenticating, Aborted],
            Authenticating => vec![Fetching, Aborted],
            Fetching => vec![Comparing, Aborted],
            Comparing => vec![Planning, Aborted],
            Planning => vec![Reporting, Executing, Done, Aborted],
            Reporting | Executing => vec![Done, Aborted],
            Done | Aborted => vec![],
        }
    }

    /// Check whether `self → to` is a legal transition
    #[inline]
    #[must_use]
    pub fn can_transition_to(self, to: RunStage) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Whether the run has finished
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scanning => "scanning",
            Self::Parsing => "parsing",
            Self::Validating => "validating",
            Self::Authenticating => "authenticating",
            Self::Fetching => "fetching",
            Self::Comparing => "comparing",
            Self::Planning => "planning",
            Self::Reporting => "reporting",
            Self::Executing => "executing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

/// A run that aborted, with the stage it failed in
#[derive(Debug, thiserror::Error)]
#[error("sync aborted while {stage}: {error}")]
pub struct SyncFailure {
    pub stage: RunStage,
    #[source]
    pub error: SyncError,
}

/// Everything a completed run produced
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// Feature files found by the scan
    pub scanned_files: Vec<PathBuf>,
    /// Number of key-tagged scenarios parsed
    pub scenario_count: usize,
    /// One result per local scenario, in local order
    pub results: Vec<ComparisonResult>,
    /// Files that need pushing
    pub plan: UpdatePlan,
    /// Present when the plan was reported or executed
    pub execution: Option<ExecutionReport>,
    /// Stages visited, ending in `Done`
    pub stages: Vec<RunStage>,
}

impl SyncOutcome {
    /// Whether the scan found nothing to compare
    #[inline]
    #[must_use]
    pub fn nothing_scanned(&self) -> bool {
        self.scanned_files.is_empty()
    }

    /// Whether the catalog was already in sync
    #[inline]
    #[must_use]
    pub fn in_sync(&self) -> bool {
        self.plan.is_empty()
    }
}

/// Drives one sync run against a catalog
#[derive(Debug)]
pub struct SyncPipeline<'a, C: ?Sized> {
    config: &'a SyncConfig,
    catalog: &'a C,
    parser: FeatureParser,
    stage: RunStage,
    history: Vec<RunStage>,
}

impl<'a, C> SyncPipeline<'a, C>
where
    C: ScenarioCatalog + ?Sized,
{
    /// Create a pipeline in the `Scanning` stage
    #[must_use]
    pub fn new(config: &'a SyncConfig, catalog: &'a C) -> Self {
        Self {
            config,
            catalog,
            parser: FeatureParser::new(),
            stage: RunStage::Scanning,
            history: vec![RunStage::Scanning],
        }
    }

    /// Run every stage to completion
    ///
    /// # Errors
    /// `SyncFailure` naming the stage that failed.
    pub async fn run(mut self) -> Result<SyncOutcome, SyncFailure> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_run", %run_id, dry_run = self.config.dry_run);

        async move {
            match self.run_stages().await {
                Ok(outcome) => Ok(outcome),
                Err(error) => {
                    let stage = self.stage;
                    tracing::error!(%stage, error = %error, "sync aborted");
                    self.advance(RunStage::Aborted);
                    Err(SyncFailure { stage, error })
                }
            }
        }
        .instrument(span)
        .await
    }

    fn advance(&mut self, next: RunStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal stage transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
        self.history.push(next);
    }

    fn finish(
        &mut self,
        scanned_files: Vec<PathBuf>,
        scenario_count: usize,
        results: Vec<ComparisonResult>,
        plan: UpdatePlan,
        execution: Option<ExecutionReport>,
    ) -> SyncOutcome {
        self.advance(RunStage::Done);
        SyncOutcome {
            scanned_files,
            scenario_count,
            results,
            plan,
            execution,
            stages: self.history.clone(),
        }
    }

    async fn run_stages(&mut self) -> SyncResult<SyncOutcome> {
        let config = self.config;

        let files = scan_feature_files(&config.feature_dir).await?;
        if files.is_empty() {
            tracing::warn!(dir = %config.feature_dir.display(), "no feature files found");
            return Ok(self.finish(files, 0, Vec::new(), UpdatePlan::default(), None));
        }
        tracing::info!(count = files.len(), "found feature files");

        self.advance(RunStage::Parsing);
        let scenarios = self.read_scenarios(&files).await?;
        tracing::info!(count = scenarios.len(), "parsed key-tagged scenarios");

        self.advance(RunStage::Validating);
        ensure_unique_keys(&scenarios)?;

        self.advance(RunStage::Authenticating);
        let token = self.catalog.authenticate(&config.credentials).await?;
        tracing::info!("authenticated with remote catalog");

        self.advance(RunStage::Fetching);
        let keys: IndexSet<IssueKey> = scenarios.iter().map(|s| s.issue_key().clone()).collect();
        let keys: Vec<IssueKey> = keys.into_iter().collect();
        let remote = fetch_by_keys(self.catalog, &token, &keys).await?;
        tracing::info!(requested = keys.len(), found = remote.len(), "fetched remote scenarios");

        self.advance(RunStage::Comparing);
        let results = compare_scenarios(&scenarios, &remote);
        for r in &results {
            tracing::info!(
                status = %r.status,
                issue_key = %r.issue_key,
                scenario = %r.name,
                path = %r.source_path.display(),
                "{}",
                r.explanation
            );
        }
        if let Some(summary) = &config.step_summary {
            append_step_summary(summary, &results).await?;
        }

        self.advance(RunStage::Planning);
        let plan = UpdatePlan::from_results(&results);
        if plan.is_empty() {
            tracing::info!("no differences detected, remote catalog is already in sync");
            return Ok(self.finish(files, scenarios.len(), results, plan, None));
        }

        let mode = if config.dry_run {
            self.advance(RunStage::Reporting);
            ExecutionMode::DryRun
        } else {
            self.advance(RunStage::Executing);
            ExecutionMode::Live {
                project_key: config.project_key.clone(),
            }
        };
        tracing::info!(files = plan.len(), dry_run = mode.is_dry_run(), "executing update plan");
        let execution = execute_plan(self.catalog, &token, &plan, &mode).await?;

        Ok(self.finish(files, scenarios.len(), results, plan, Some(execution)))
    }

    async fn read_scenarios(&self, files: &[PathBuf]) -> SyncResult<Vec<LocalScenario>> {
        let mut scenarios = Vec::new();
        for path in files {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SyncError::io_error(path, e))?;
            scenarios.extend(self.parser.parse(path, &content));
        }
        Ok(scenarios)
    }
}

/// Run a full sync with `config` against `catalog`
///
/// # Errors
/// `SyncFailure` naming the stage that failed.
pub async fn run_sync<C>(config: &SyncConfig, catalog: &C) -> Result<SyncOutcome, SyncFailure>
where
    C: ScenarioCatalog + ?Sized,
{
    SyncPipeline::new(config, catalog).run().await
}
