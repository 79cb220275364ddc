//! Implementation of the `mathspeak check` command.

use std::path::PathBuf;

use mathspeak::RuleStore;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;

use crate::output::load_error_report;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Rule files to check (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Serialize)]
struct FileResult {
    file: String,
    rules: Option<usize>,
    error: Option<String>,
}

/// Run the check command.
///
/// Every file is loaded into its own empty store, so ids only need to be
/// unique within a file.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let mut results = Vec::with_capacity(args.files.len());
    let mut failed = false;

    for path in &args.files {
        match RuleStore::new().load_file(path) {
            Ok(count) => {
                debug!(path = %path.display(), count, "rule file is valid");
                if !args.json {
                    println!("{} {} ({count} rules)", "ok".green(), path.display());
                }
                results.push(FileResult {
                    file: path.display().to_string(),
                    rules: Some(count),
                    error: None,
                });
            }
            Err(e) => {
                failed = true;
                if !args.json {
                    eprintln!("{:?}", load_error_report(Some(path.as_path()), &e));
                }
                results.push(FileResult {
                    file: path.display().to_string(),
                    rules: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).expect("JSON serialization should not fail")
        );
    }

    Ok(if failed { exitcode::DATAERR } else { exitcode::OK })
}
