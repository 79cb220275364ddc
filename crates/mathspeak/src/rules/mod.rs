//! Rule records, validation, loading and the rule store.

mod error;
mod loader;
mod record;
mod store;

pub use error::{LoadError, RuleError, compute_suggestions};
pub use loader::{load_rules_file, load_rules_str, parse_rule_records};
pub use record::RuleRecord;
pub use store::{RuleFilter, RuleStatistics, RuleStore, application_order};
