//! Scenario Sync Core - scenario reconciliation engine
//!
//! Keeps a remote test-management catalog in sync with the Gherkin
//! scenarios of a repository:
//! - Scans a feature tree and parses key-tagged scenario blocks
//! - Rejects issue keys defined in more than one file
//! - Fetches the remote records in bounded batches
//! - Classifies each scenario as match / different / missing / unsupported
//! - Plans and performs the minimal set of file imports (or reports them)
//!
//! # Architecture
//!
//! ```text
//! Scanner → Parser(+Normalizer) → Key Validator → ScenarioCatalog → Comparator → UpdatePlan → Executor
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use scenario_sync_core::{run_sync, SyncConfig};
//!
//! # async fn example(catalog: &impl scenario_sync_core::ScenarioCatalog) -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::from_env()?.with_dry_run(true);
//! let outcome = run_sync(&config, catalog).await?;
//!
//! for path in outcome.plan.files() {
//!     println!("needs update: {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod issue_key;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod plan;
pub mod scanner;
pub mod summary;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use catalog::{fetch_by_keys, AccessToken, ScenarioCatalog, FETCH_BATCH_SIZE, SUPPORTED_TEST_TYPE};
pub use compare::{compare_scenario, compare_scenarios, extract_scenario_block};
pub use config::{Credentials, SyncConfig};
pub use error::{ConfigError, ErrorKind, RemoteError, ScanError, SyncError, SyncResult};
pub use issue_key::{InvalidIssueKey, IssueKey};
pub use normalize::normalize;
pub use parser::{parse_feature, FeatureParser};
pub use pipeline::{run_sync, RunStage, SyncFailure, SyncOutcome, SyncPipeline};
pub use plan::{execute_plan, ExecutionMode, ExecutionReport, FileOutcome, UpdatePlan};
pub use scanner::scan_feature_files;
pub use types::{ComparisonResult, ComparisonStatus, LocalScenario, RemoteScenario};
pub use validation::{ensure_unique_keys, find_duplicate_keys, DuplicateKey, DuplicateKeyError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
