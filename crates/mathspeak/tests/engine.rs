//! End-to-end tests for the speech engine.

use std::time::Duration;

use mathspeak::engine::ComplexityLimit;
use mathspeak::{
    AudienceLevel, Domain, Engine, EngineConfig, ErrorKind, ExpressionCategory, RuleStore,
    SpeechError, SpeechRequest, SpeechWarning, TimeoutReason,
};

fn engine() -> Engine {
    Engine::with_default_rules().unwrap()
}

fn engine_with(config: EngineConfig) -> Engine {
    Engine::builder()
        .store(RuleStore::with_default_rules().unwrap())
        .config(config)
        .build()
}

fn speak(engine: &Engine, expression: &str) -> String {
    engine.speak(&SpeechRequest::new(expression)).unwrap().text
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn simple_fraction() {
    let speech = engine().speak(&SpeechRequest::new(r"\frac{1}{2}")).unwrap();
    assert_eq!(speech.text, "one half");
    assert_eq!(speech.metadata.rules_applied, ["fraction-half"]);
    assert_eq!(speech.metadata.category, ExpressionCategory::Fraction);
    assert!(!speech.metadata.cache_hit);
}

#[test]
fn leibniz_derivative() {
    let speech = engine()
        .speak(&SpeechRequest::new(r"\frac{d}{dx} f(x)"))
        .unwrap();
    assert!(speech.text.contains("the derivative"), "{}", speech.text);
    assert!(speech.text.contains("with respect to x"), "{}", speech.text);
    assert_eq!(speech.metadata.domain, Domain::Calculus);
    assert_eq!(speech.metadata.category, ExpressionCategory::Derivative);
}

#[test]
fn definite_integral() {
    let text = speak(&engine(), r"\int_0^1 x^2 dx");
    assert!(text.contains("the integral from 0 to 1"), "{text}");
    assert!(text.contains("with respect to x"), "{text}");
    insta::assert_snapshot!(text, @"the integral from 0 to 1 of x squared with respect to x");
}

#[test]
fn identical_request_hits_the_cache() {
    let engine = engine();
    let request = SpeechRequest::new(r"\frac{d}{dx} f(x)");
    let first = engine.speak(&request).unwrap();
    let second = engine.speak(&request).unwrap();

    assert!(!first.metadata.cache_hit);
    assert!(second.metadata.cache_hit);
    assert_eq!(first.text, second.text);
    assert_eq!(first.hints, second.hints);
    assert_eq!(first.metadata.rules_applied, second.metadata.rules_applied);
    assert_eq!(first.metadata.fingerprint, second.metadata.fingerprint);

    let stats = engine.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.size, 1);
}

#[test]
fn whitespace_variants_hit_the_cache_with_the_fresh_result() {
    let cases = [
        ("\\int_0^1 x\n+ y dx", r"\int_0^1 x + y dx"),
        ("x  +\t 1}", "x + 1}"),
    ];
    for (first, second) in cases {
        let shared = engine();
        shared.speak(&SpeechRequest::new(first)).unwrap();
        let cached = shared.speak(&SpeechRequest::new(second)).unwrap();
        let fresh = engine().speak(&SpeechRequest::new(second)).unwrap();

        assert!(cached.metadata.cache_hit, "{second:?}");
        assert_eq!(cached.text, fresh.text);
        assert_eq!(cached.metadata.rules_applied, fresh.metadata.rules_applied);
        assert_eq!(cached.metadata.warnings, fresh.metadata.warnings);
    }

    let fresh = engine()
        .speak(&SpeechRequest::new("\\int_0^1 x\n+ y dx"))
        .unwrap();
    assert_eq!(
        fresh.text,
        "the integral from 0 to 1 of x plus y with respect to x"
    );
}

#[test]
fn nesting_beyond_the_ceiling_is_refused() {
    let raw = format!("{}x{}", "{".repeat(13), "}".repeat(13));
    let error = engine().speak(&SpeechRequest::new(raw)).unwrap_err();
    assert_eq!(
        error,
        SpeechError::ComplexityExceeded {
            metric: ComplexityLimit::NestingDepth,
            value: 13.0,
            limit: 12.0,
        }
    );
    assert_eq!(error.kind(), ErrorKind::Complexity);
}

#[test]
fn unsupported_notation_passes_through() {
    let speech = engine().speak(&SpeechRequest::new(r"\aleph")).unwrap();
    assert_eq!(speech.text, r"\aleph");
    assert_eq!(speech.metadata.warnings, [SpeechWarning::NoRuleMatched]);
    assert!(speech.metadata.rules_applied.is_empty());
}

// =========================================================================
// Rendering
// =========================================================================

#[test]
fn flagged_numerals_become_words() {
    assert_eq!(speak(&engine(), r"\sqrt[3]{x}"), "the third root of x");
    assert_eq!(
        speak(&engine(), r"\frac{d^2}{dx^2} y"),
        "the second derivative with respect to x of y"
    );
}

#[test]
fn nested_structures_resolve_over_passes() {
    let engine = engine();
    assert_eq!(speak(&engine, r"\frac{a+b}{c}"), "the fraction a plus b over c");
    assert_eq!(
        speak(&engine, r"\sum_{i=1}^{n} i^2"),
        "the sum from i equals 1 to n of i squared"
    );
}

#[test]
fn bounds_directly_after_a_command_are_read() {
    let engine = engine();
    assert_eq!(speak(&engine, r"\int_0^1 f"), "the integral from 0 to 1 of f");
    assert_eq!(speak(&engine, r"\int_{a}^{b} f"), "the integral from a to b of f");
    assert_eq!(speak(&engine, r"\sum_0^n k"), "the sum from 0 to n of k");
}

#[test]
fn greek_letters_stay_separate_words() {
    let engine = engine();
    assert_eq!(
        speak(&engine, r"e^{i\pi} + 1 = 0"),
        "e to the power of i pi plus 1 equals 0"
    );
    assert_eq!(speak(&engine, r"2\pi r"), "2 pi r");
    assert_eq!(speak(&engine, r"\alpha\beta"), "alpha beta");
}

#[test]
fn repeated_variables_are_not_collapsed() {
    let engine = engine();
    assert_eq!(speak(&engine, "x = a a"), "x equals a a");
    assert_eq!(speak(&engine, "a a"), "a a");
}

#[test]
fn hints_follow_applied_rules() {
    let speech = engine()
        .speak(&SpeechRequest::new(r"\frac{d}{dx} f(x)"))
        .unwrap();
    assert_eq!(speech.hints.len(), 1);
    assert_eq!(speech.hints[0].rule_id, "derivative");
    assert_eq!(speech.hints[0].hints.pause_after_ms, Some(120));
}

#[test]
fn unbalanced_input_still_speaks_with_warnings() {
    let speech = engine().speak(&SpeechRequest::new("x + 1}")).unwrap();
    assert_eq!(speech.text, "x plus 1}");
    assert_eq!(
        speech.metadata.warnings,
        [SpeechWarning::UnbalancedBraces { position: 5 }]
    );
}

#[test]
fn output_is_deterministic_across_engines() {
    let expressions = [
        r"\lim_{x \to 0} \frac{\sin x}{x}",
        r"\forall x \in \mathbb{R}, x^2 \geq 0",
        r"E = mc^2",
    ];
    for expression in expressions {
        assert_eq!(
            speak(&engine(), expression),
            speak(&engine(), expression),
            "{expression}"
        );
    }
}

// =========================================================================
// Validation and limits
// =========================================================================

#[test]
fn empty_input_is_rejected() {
    let error = engine().speak(&SpeechRequest::new("  \n")).unwrap_err();
    assert_eq!(error, SpeechError::EmptyInput);
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[test]
fn long_input_is_rejected() {
    let engine = engine_with(EngineConfig::builder().max_input_length(10).build());
    let error = engine.speak(&SpeechRequest::new("x".repeat(11))).unwrap_err();
    assert_eq!(
        error,
        SpeechError::InputTooLong {
            length: 11,
            max: 10
        }
    );
}

#[test]
fn control_characters_are_rejected() {
    let error = engine().speak(&SpeechRequest::new("x\u{7}")).unwrap_err();
    assert_eq!(
        error,
        SpeechError::InvalidCharacter {
            character: '\u{7}',
            position: 1
        }
    );
}

#[test]
fn tabs_and_newlines_are_accepted() {
    assert_eq!(speak(&engine(), "x\t+\ny"), "x plus y");
}

#[test]
fn score_ceiling_gates_transformation() {
    let strict = engine_with(EngineConfig::builder().max_complexity_score(0.5).build());
    let error = strict
        .speak(&SpeechRequest::new(r"\frac{a+b}{c}"))
        .unwrap_err();
    assert!(matches!(
        error,
        SpeechError::ComplexityExceeded {
            metric: ComplexityLimit::OverallScore,
            ..
        }
    ));

    let lenient = engine_with(EngineConfig::builder().max_complexity_score(10.0).build());
    assert!(lenient.speak(&SpeechRequest::new(r"\frac{a+b}{c}")).is_ok());
}

#[test]
fn lowering_nesting_ceiling_gates_more() {
    let engine = engine_with(EngineConfig::builder().max_nesting_depth(2).build());
    assert!(engine.speak(&SpeechRequest::new(r"\frac{\frac{1}{x}}{2}")).is_ok());
    assert!(engine.speak(&SpeechRequest::new("{{{x}}}")).is_err());
}

#[test]
fn exhausted_budget_times_out_and_is_not_cached() {
    let engine = engine_with(EngineConfig::builder().timeout(Duration::ZERO).build());
    let request = SpeechRequest::new(r"\frac{1}{2}");
    for _ in 0..2 {
        let error = engine.speak(&request).unwrap_err();
        assert!(matches!(
            error,
            SpeechError::Timeout {
                reason: TimeoutReason::Deadline { .. }
            }
        ));
        assert_eq!(error.kind(), ErrorKind::Timeout);
    }
    assert_eq!(engine.cache_stats().size, 0);
}

// =========================================================================
// Cache behavior through the engine
// =========================================================================

#[test]
fn request_fields_separate_cache_entries() {
    let engine = engine();
    let expression = r"\frac{1}{2}";
    engine.speak(&SpeechRequest::new(expression)).unwrap();

    let inline = SpeechRequest::builder()
        .expression(expression)
        .context("inline")
        .build();
    assert!(!engine.speak(&inline).unwrap().metadata.cache_hit);

    let research = SpeechRequest::builder()
        .expression(expression)
        .audience(AudienceLevel::Research)
        .build();
    assert!(!engine.speak(&research).unwrap().metadata.cache_hit);

    let hinted = SpeechRequest::builder()
        .expression(expression)
        .domain_hint(Domain::Algebra)
        .build();
    assert!(!engine.speak(&hinted).unwrap().metadata.cache_hit);

    assert_eq!(engine.cache_stats().size, 4);
}

#[test]
fn disabled_cache_never_hits() {
    let engine = engine_with(EngineConfig::builder().cache_enabled(false).build());
    let request = SpeechRequest::new("x + 1");
    engine.speak(&request).unwrap();
    assert!(!engine.speak(&request).unwrap().metadata.cache_hit);
    assert_eq!(engine.cache_stats().size, 0);
}

#[test]
fn clearing_the_cache_forces_recomputation() {
    let engine = engine();
    let request = SpeechRequest::new("x + 1");
    engine.speak(&request).unwrap();
    engine.clear_cache();
    assert!(!engine.speak(&request).unwrap().metadata.cache_hit);
}

#[test]
fn analyze_validates_without_transforming() {
    let engine = engine();
    let record = engine
        .analyze(&SpeechRequest::new(r"\int_0^1 x^2 dx"))
        .unwrap();
    assert_eq!(record.category, ExpressionCategory::Integral);
    assert!(record.processing.rules_applied.is_empty());
    assert!(engine.analyze(&SpeechRequest::new("")).is_err());
}
