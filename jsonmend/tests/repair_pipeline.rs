//! End-to-end behavior of the repair cascade against realistic LLM output.

use pretty_assertions::assert_eq;

use jsonmend::{repair, repair_with, RepairLevel, RepairOptions};

fn compact(level: RepairLevel) -> RepairOptions {
    RepairOptions {
        level,
        pretty: false,
        ..RepairOptions::default()
    }
}

// ============================================================================
// Already-valid JSON passes through the strict strategy
// ============================================================================

#[test]
fn test_valid_json_round_trips() {
    let encoded = serde_json::to_string(&serde_json::json!({
        "name": "Alice",
        "scores": [1, 2, 3],
        "active": true
    }))
    .unwrap();

    let out = repair_with(&encoded, &compact(RepairLevel::Standard));
    assert!(out.success);
    assert_eq!(out.text, encoded);

    let decoded: serde_json::Value = serde_json::from_str(&out.text).unwrap();
    assert_eq!(decoded["scores"][2], 3);
}

#[test]
fn test_repair_is_idempotent() {
    let first = repair("{'a': [1, 2,], b: 'x'} // note");
    assert!(first.success);

    let second = repair(&first.text);
    assert!(second.success);
    assert_eq!(second.text, first.text);
}

// ============================================================================
// Trailing commas and comments (level >= 1)
// ============================================================================

#[test]
fn test_trailing_comma_and_comment_at_basic_level() {
    let out = repair_with("{\"a\":1,}  // note", &compact(RepairLevel::Basic));
    assert!(out.success);
    assert_eq!(out.text, "{\"a\":1}");
}

#[test]
fn test_block_comment_between_members() {
    let out = repair_with(
        "{\"a\": 1, /* explanation */ \"b\": 2}",
        &compact(RepairLevel::Standard),
    );
    assert!(out.success);
    assert_eq!(out.text, "{\"a\":1,\"b\":2}");
}

// ============================================================================
// Bracket balancing (normalizer level 3, reachable from any cascade level)
// ============================================================================

#[test]
fn test_missing_closing_brace() {
    let out = repair_with("{\"a\":1", &compact(RepairLevel::Advanced));
    assert!(out.success);
    assert_eq!(out.text, "{\"a\":1}");
}

#[test]
fn test_truncated_nested_structure() {
    let out = repair_with("{\"a\": {\"b\": [1, 2", &compact(RepairLevel::Advanced));
    assert!(out.success);
    assert_eq!(out.text, "{\"a\":{\"b\":[1,2]}}");
}

// ============================================================================
// Prose and markdown wrappers
// ============================================================================

#[test]
fn test_json_buried_in_prose() {
    let response = r#"
    Sure! Here's the user data: {"name": "Alice", "age": 30}
    Hope that helps!
    "#;

    let out = repair_with(response, &compact(RepairLevel::Standard));
    assert!(out.success);
    assert_eq!(out.text, r#"{"name":"Alice","age":30}"#);
}

#[test]
fn test_markdown_code_fence() {
    let response = "Here's the config:\n```json\n{\"debug\": true,}\n```\nLet me know!";

    let out = repair_with(response, &compact(RepairLevel::Standard));
    assert!(out.success);
    assert_eq!(out.text, r#"{"debug":true}"#);
}

// ============================================================================
// Messy quoting and keys
// ============================================================================

#[test]
fn test_single_quotes_and_unquoted_keys() {
    let out = repair_with(
        "{name: 'Alice', 'role': 'admin', level: 3}",
        &compact(RepairLevel::Standard),
    );
    assert!(out.success);

    let value: serde_json::Value = serde_json::from_str(&out.text).unwrap();
    assert_eq!(value["name"], "Alice");
    assert_eq!(value["role"], "admin");
    assert_eq!(value["level"], 3);
}

#[test]
fn test_nonstandard_literals_become_strings() {
    let out = repair_with(
        "{\"ratio\": Infinity, \"mask\": 0xFF}",
        &compact(RepairLevel::Standard),
    );
    assert!(out.success);

    let value: serde_json::Value = serde_json::from_str(&out.text).unwrap();
    assert_eq!(value["ratio"], "Infinity");
    assert_eq!(value["mask"], "0xFF");
}

#[test]
fn test_bare_word_values_need_advanced_level() {
    let input = "{status: pending, retries: 3}";

    let standard = repair_with(input, &compact(RepairLevel::Standard));
    assert!(!standard.success);

    let advanced = repair_with(input, &compact(RepairLevel::Advanced));
    assert!(advanced.success);
    let value: serde_json::Value = serde_json::from_str(&advanced.text).unwrap();
    assert_eq!(value["status"], "pending");
    assert_eq!(value["retries"], 3);
}

// ============================================================================
// Failure behavior
// ============================================================================

#[test]
fn test_total_failure_preserves_input() {
    let input = "not json at all {{{";
    let out = repair_with(input, &compact(RepairLevel::Advanced));

    assert!(!out.success);
    assert_eq!(out.text, input);
    assert!(out.trace.error.is_some());
}

#[test]
fn test_empty_input_is_an_explicit_error() {
    let out = repair("");
    assert!(!out.success);
    assert_eq!(out.trace.error.as_deref(), Some("empty input"));
    assert!(out.trace.methods.is_empty());
}

// ============================================================================
// Trace contents and output formatting
// ============================================================================

#[test]
fn test_trace_records_attempted_strategies() {
    let out = repair_with("{'a': 1}", &compact(RepairLevel::Standard));
    assert!(out.success);
    assert_eq!(out.trace.methods, vec!["strict", "normalize"]);
    assert_eq!(out.trace.success, true);
    assert!(out.trace.final_length > 0);
}

#[test]
fn test_trace_explanation_json() {
    let out = repair_with("{'a': 1}", &compact(RepairLevel::Standard));
    let explanation = out.trace.explanation_json();
    assert_eq!(explanation["success"], true);
    assert_eq!(explanation["methods"][1], "normalize");
}

#[test]
fn test_pretty_printing_with_sorted_keys() {
    let options = RepairOptions {
        sort_keys: true,
        ..RepairOptions::default()
    };
    let out = repair_with("{\"b\": 1, \"a\": 2}", &options);
    assert!(out.success);
    assert_eq!(out.text, "{\n  \"a\": 2,\n  \"b\": 1\n}");
}

#[test]
fn test_indent_zero_means_compact() {
    let options = RepairOptions {
        indent: 0,
        ..RepairOptions::default()
    };
    let out = repair_with("{\"a\": 1}", &options);
    assert_eq!(out.text, "{\"a\":1}");
}
