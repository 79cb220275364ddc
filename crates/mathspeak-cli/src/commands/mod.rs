//! CLI command implementations.

mod analyze;
mod check;
mod rules;
mod speak;

use std::path::PathBuf;

use clap::Args;
use mathspeak::RuleStore;
use tracing::debug;

use crate::output::load_error_report;

pub use analyze::{AnalyzeArgs, run_analyze};
pub use check::{CheckArgs, run_check};
pub use rules::{RulesArgs, run_rules};
pub use speak::{SpeakArgs, run_speak};

/// Where rules come from. Shared by every command that needs a store.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Extra rule file to load (repeatable). Loaded after the defaults.
    #[arg(long = "rules", value_name = "FILE", env = "MATHSPEAK_RULES", value_delimiter = ',')]
    pub rules: Vec<PathBuf>,

    /// Start from an empty rule set instead of the bundled defaults
    #[arg(long)]
    pub no_default_rules: bool,
}

impl StoreArgs {
    /// Build the rule store described by these arguments.
    pub fn build_store(&self) -> miette::Result<RuleStore> {
        let store = if self.no_default_rules {
            RuleStore::new()
        } else {
            RuleStore::with_default_rules().map_err(|e| load_error_report(None, &e))?
        };
        for path in &self.rules {
            let count = store
                .load_file(path)
                .map_err(|e| load_error_report(Some(path.as_path()), &e))?;
            debug!(path = %path.display(), count, "loaded extra rules");
        }
        debug!(total = store.count(), "rule store ready");
        Ok(store)
    }
}
