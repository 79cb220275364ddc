//! Implementation of the `mathspeak rules` command.

use mathspeak::{Domain, MatchKind, RuleFilter};
use serde::Serialize;

use super::StoreArgs;
use crate::output::table::{format_rules_table, format_statistics_table};

/// Arguments for the rules command.
#[derive(Debug, clap::Args)]
pub struct RulesArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only list rules in this domain
    #[arg(long)]
    pub domain: Option<Domain>,

    /// Only list rules allowed in this context
    #[arg(long)]
    pub context: Option<String>,

    /// List individual rules instead of counts
    #[arg(long)]
    pub list: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one listed rule.
#[derive(Serialize)]
struct RuleSummary {
    id: String,
    priority: u16,
    domain: Domain,
    match_kind: MatchKind,
    pattern: String,
    output_template: String,
    active: bool,
}

/// Run the rules command.
pub fn run_rules(args: RulesArgs) -> miette::Result<i32> {
    let store = args.store.build_store()?;

    if !args.list {
        let stats = store.get_statistics();
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).expect("JSON serialization should not fail")
            );
        } else {
            println!("{}", format_statistics_table(&stats));
        }
        return Ok(exitcode::OK);
    }

    let filter = RuleFilter::builder()
        .maybe_domain(args.domain)
        .maybe_context(args.context)
        .build();
    let rules = store.find_by_filters(&filter);

    if args.json {
        let summaries: Vec<RuleSummary> = rules
            .iter()
            .map(|rule| RuleSummary {
                id: rule.id().to_string(),
                priority: rule.priority(),
                domain: rule.domain(),
                match_kind: rule.pattern().kind(),
                pattern: rule.pattern().source().to_string(),
                output_template: rule.template_source().to_string(),
                active: rule.is_active(),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).expect("JSON serialization should not fail")
        );
    } else {
        println!("{}", format_rules_table(&rules));
    }
    Ok(exitcode::OK)
}
