//! Scenario Sync CLI
//!
//! Argument parsing and output rendering for the `scenario-sync` binary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod report;

pub use cli::{command, parse_args, CliOptions, ParseOutcome};
pub use report::{outcome_lines, results_json};
