use scenario_sync_cli::{outcome_lines, parse_args, results_json, CliOptions, ParseOutcome};
use scenario_sync_core::{run_sync, SyncConfig};
use scenario_sync_remote::XrayClient;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let options = match parse_args(std::env::args_os()) {
        ParseOutcome::Run(options) => options,
        ParseOutcome::Exit { code, message } => {
            if code == 0 {
                print!("{message}");
            } else {
                eprint!("{message}");
            }
            return ExitCode::from(code);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?options, "parsed command line");

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: CliOptions) -> anyhow::Result<()> {
    let mut config = SyncConfig::from_env()?.with_dry_run(options.dry_run);
    if let Some(dir) = options.feature_dir {
        config = config.with_feature_dir(dir);
    }

    let client = XrayClient::new(&config.api_base_url)?;
    let outcome = run_sync(&config, &client).await?;

    for line in outcome_lines(&outcome, &config.feature_dir) {
        println!("{line}");
    }
    if options.json {
        println!("{}", results_json(&outcome)?);
    }
    Ok(())
}
