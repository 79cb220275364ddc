//! Table formatting utilities for CLI output.

use std::sync::Arc;

use comfy_table::{presets, ContentArrangement, Table};
use mathspeak::types::ComplexityMetrics;
use mathspeak::{Rule, RuleStatistics};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Format complexity metrics as a two-column table.
pub fn format_metrics_table(metrics: &ComplexityMetrics) -> Table {
    let mut table = new_table(vec!["Metric", "Value"]);
    let rows = [
        ("nesting depth", metrics.nesting_depth.to_string()),
        ("commands", metrics.command_count.to_string()),
        ("variables", metrics.variable_count.to_string()),
        ("operators", metrics.operator_count.to_string()),
        ("special functions", metrics.special_function_count.to_string()),
        ("length", metrics.length.to_string()),
        ("overall score", format!("{:.2}", metrics.overall_score)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    table
}

/// Format rule counts per domain, followed by totals.
pub fn format_statistics_table(stats: &RuleStatistics) -> Table {
    let mut table = new_table(vec!["Domain", "Rules"]);
    for (domain, count) in &stats.by_domain {
        table.add_row(vec![domain.to_string(), count.to_string()]);
    }
    table.add_row(vec!["total".to_string(), stats.total.to_string()]);
    table.add_row(vec!["active".to_string(), stats.active.to_string()]);
    table
}

/// Format one row per rule, in application order.
pub fn format_rules_table(rules: &[Arc<Rule>]) -> Table {
    let mut table = new_table(vec!["Id", "Priority", "Domain", "Kind", "Output"]);
    for rule in rules {
        let id = if rule.is_active() {
            rule.id().to_string()
        } else {
            format!("{} (inactive)", rule.id())
        };
        table.add_row(vec![
            id,
            rule.priority().to_string(),
            rule.domain().to_string(),
            rule.pattern().kind().to_string(),
            rule.template_source().to_string(),
        ]);
    }
    table
}
