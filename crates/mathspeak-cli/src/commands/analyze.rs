//! Implementation of the `mathspeak analyze` command.

use mathspeak::analyzer::{domain_scores, tokenize};
use mathspeak::{Domain, Engine, RuleStore, SpeechRequest};
use owo_colors::OwoColorize;

use super::speak::{exit_code_for, report_error};
use crate::output::table::format_metrics_table;

/// Arguments for the analyze command.
#[derive(Debug, clap::Args)]
pub struct AnalyzeArgs {
    /// Expression to analyze
    pub expression: String,

    /// Skip domain detection and use this domain
    #[arg(long)]
    pub domain: Option<Domain>,

    /// Also list the score of every domain
    #[arg(long)]
    pub scores: bool,

    /// Output the analyzed record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the analyze command.
///
/// Analysis needs no rules, so the engine is built over an empty store.
pub fn run_analyze(args: AnalyzeArgs) -> miette::Result<i32> {
    let engine = Engine::builder().store(RuleStore::new()).build();
    let request = SpeechRequest::builder()
        .expression(args.expression.as_str())
        .maybe_domain_hint(args.domain)
        .build();

    let record = match engine.analyze(&request) {
        Ok(record) => record,
        Err(e) => {
            report_error(&e, args.json);
            return Ok(exit_code_for(&e));
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).expect("JSON serialization should not fail")
        );
        return Ok(exitcode::OK);
    }

    println!("{} {}", "domain:".bold(), record.domain);
    println!("{} {}", "category:".bold(), record.category);
    println!("{}", format_metrics_table(&record.complexity));

    if args.scores {
        let tokens = tokenize(&record.raw);
        for (domain, score) in domain_scores(&record.raw, &tokens) {
            println!("  {domain:<16} {score}");
        }
    }

    for warning in record.warnings() {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
    Ok(exitcode::OK)
}
