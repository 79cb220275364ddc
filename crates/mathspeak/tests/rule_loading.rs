//! Tests for loading rule records from JSON.

use std::io::Write;

use mathspeak::rules::{load_rules_file, load_rules_str, parse_rule_records};
use mathspeak::{Domain, LoadError, MatchKind, RuleContexts, RuleError, RuleStore};
use tempfile::NamedTempFile;

const TWO_RULES: &str = r#"[
  {
    "id": "half",
    "pattern": "\\frac{1}{2}",
    "match_kind": "literal",
    "output_template": "one half",
    "priority": 1900,
    "domain": "general",
    "contexts": ["any"]
  },
  {
    "id": "derivative",
    "pattern": "\\\\frac\\{d\\}\\{d([a-z])\\}",
    "output_template": "the derivative with respect to {1} of",
    "priority": 1690,
    "domain": "calculus",
    "contexts": ["display", "inline"],
    "conditions": [{ "kind": "followed_by", "text": "(" }],
    "pronunciation_hints": { "emphasis": "moderate", "pause_after_ms": 120 }
  }
]"#;

// =========================================================================
// Parsing records
// =========================================================================

#[test]
fn list_and_object_forms_are_equivalent() {
    let list = parse_rule_records(TWO_RULES).unwrap();
    let object = parse_rule_records(&format!(r#"{{ "rules": {TWO_RULES} }}"#)).unwrap();
    assert_eq!(list, object);
    assert_eq!(list.len(), 2);
}

#[test]
fn records_validate_into_rules() {
    let rules = load_rules_str(TWO_RULES).unwrap();
    let half = &rules[0];
    assert_eq!(half.pattern().kind(), MatchKind::Literal);
    assert_eq!(half.contexts(), &RuleContexts::Any);

    let derivative = &rules[1];
    assert_eq!(derivative.domain(), Domain::Calculus);
    assert!(derivative.contexts().allows("inline"));
    assert!(!derivative.contexts().allows("general"));
    assert_eq!(derivative.conditions().len(), 1);
    let hints = derivative.pronunciation_hints().unwrap();
    assert_eq!(hints.pause_after_ms, Some(120));
    assert_eq!(hints.emphasis.as_deref(), Some("moderate"));
}

#[test]
fn active_flag_defaults_to_true() {
    let rules = load_rules_str(TWO_RULES).unwrap();
    assert!(rules.iter().all(|r| r.is_active()));
}

// =========================================================================
// Validation failures
// =========================================================================

fn rule_error(json: &str) -> (usize, RuleError) {
    match load_rules_str(json) {
        Err(LoadError::Rule { index, source, .. }) => (index, source),
        other => panic!("expected rule error, got {other:?}"),
    }
}

#[test]
fn missing_field_names_rule_and_field() {
    let json = r#"[{ "id": "r", "pattern": "x", "output_template": "x", "priority": 1, "domain": "general" }]"#;
    assert_eq!(
        rule_error(json),
        (
            0,
            RuleError::MissingField {
                id: "r".to_string(),
                field: "contexts",
            }
        )
    );
}

#[test]
fn missing_id_is_reported() {
    let json = r#"[{ "pattern": "x" }]"#;
    let (_, error) = rule_error(json);
    assert!(matches!(error, RuleError::MissingField { field: "id", .. }));
}

#[test]
fn negative_priority_is_out_of_range() {
    let json = r#"[
      { "id": "ok", "pattern": "x", "output_template": "x", "priority": 1, "domain": "general", "contexts": ["any"] },
      { "id": "low", "pattern": "x", "output_template": "x", "priority": -5, "domain": "general", "contexts": ["any"] }
    ]"#;
    assert_eq!(
        rule_error(json),
        (
            1,
            RuleError::PriorityOutOfRange {
                id: "low".to_string(),
                priority: -5,
            }
        )
    );
}

#[test]
fn unknown_domain_is_a_parse_error() {
    let json = r#"[{ "id": "r", "domain": "astrology" }]"#;
    let Err(LoadError::Parse { line, .. }) = load_rules_str(json) else {
        panic!("expected parse error");
    };
    assert_eq!(line, 1);
}

#[test]
fn malformed_json_reports_line_and_column() {
    let json = "[\n  { \"id\": \"r\",\n    \"pattern\" \"x\" }\n]";
    match load_rules_str(json) {
        Err(LoadError::Parse { line, column, .. }) => {
            assert_eq!(line, 3);
            assert!(column > 1);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

// =========================================================================
// Files and stores
// =========================================================================

#[test]
fn load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{TWO_RULES}").unwrap();
    file.flush().unwrap();

    let rules = load_rules_file(file.path()).unwrap();
    assert_eq!(rules.len(), 2);

    let store = RuleStore::new();
    assert_eq!(store.load_file(file.path()).unwrap(), 2);
    assert!(store.get_by_id("derivative").is_some());
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load_rules_file("/nonexistent/rules.json");
    assert!(matches!(result, Err(LoadError::Io { .. })));
}

#[test]
fn file_errors_carry_the_path() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[{{ \"id\": 1 }}]").unwrap();
    file.flush().unwrap();

    let error = load_rules_file(file.path()).unwrap_err();
    let message = error.to_string();
    assert!(message.starts_with(&file.path().display().to_string()));
}

#[test]
fn store_load_is_all_or_nothing() {
    let store = RuleStore::new();
    store.load_str(TWO_RULES).unwrap();

    let clash = r#"[
      { "id": "fresh", "pattern": "y", "output_template": "why", "priority": 1, "domain": "general", "contexts": ["any"] },
      { "id": "half", "pattern": "x", "output_template": "x", "priority": 1, "domain": "general", "contexts": ["any"] }
    ]"#;
    let error = store.load_str(clash).unwrap_err();
    assert!(matches!(
        error,
        LoadError::Rule {
            index: 1,
            source: RuleError::DuplicateRule { .. },
            ..
        }
    ));
    assert_eq!(store.count(), 2);
    assert!(store.get_by_id("fresh").is_none());
}

#[test]
fn default_rules_load() {
    let store = RuleStore::with_default_rules().unwrap();
    let stats = store.get_statistics();
    assert!(stats.total > 50);
    assert_eq!(stats.total, stats.active);
    assert!(stats.literal_rules > 0);
    assert!(stats.max_priority.unwrap() <= 2000);
    for domain in [Domain::Calculus, Domain::Trigonometry, Domain::SetTheory] {
        assert!(
            !store.candidates(domain, "general").is_empty(),
            "{domain}"
        );
    }
}
