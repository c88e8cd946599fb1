//! Command-line arguments

use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, Command};
use std::ffi::OsString;
use std::path::PathBuf;

/// Options accepted on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Overrides the configured feature directory
    pub feature_dir: Option<PathBuf>,
    /// Report planned imports without performing them
    pub dry_run: bool,
    /// Also print comparison results as JSON
    pub json: bool,
}

/// Result of parsing the command line
#[derive(Debug)]
pub enum ParseOutcome {
    /// Proceed with a sync run
    Run(CliOptions),
    /// Print `message` and exit with `code` without running
    Exit { code: u8, message: String },
}

/// The `scenario-sync` command definition
#[must_use]
pub fn command() -> Command {
    Command::new("scenario-sync")
        .version(scenario_sync_core::VERSION)
        .about("Reconcile tagged Gherkin scenarios with the remote test catalog")
        .after_help(
            "Environment:\n  \
             CLIENT_ID, CLIENT_SECRET  catalog credentials (required)\n  \
             PROJECT_KEY               project scope for imports\n  \
             API_BASE_URL              catalog API root\n  \
             GITHUB_STEP_SUMMARY       Markdown summary file to append to\n  \
             RUST_LOG                  log filter (default: info)",
        )
        .arg(
            Arg::new("feature-dir")
                .long("feature-dir")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Directory containing .feature files"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report files that need updating without importing them"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print comparison results as JSON"),
        )
}

/// Parse `args` (including the program name)
///
/// Help and version requests exit 0; any other parse error exits 1.
pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match command().try_get_matches_from(args) {
        Ok(matches) => ParseOutcome::Run(CliOptions {
            feature_dir: matches.get_one::<PathBuf>("feature-dir").cloned(),
            dry_run: matches.get_flag("dry-run"),
            json: matches.get_flag("json"),
        }),
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            ParseOutcome::Exit {
                code,
                message: err.render().to_string(),
            }
        }
    }
}
