//! Integration tests for tool-call evaluation

use openclaw_snitch::{evaluate, MatchedIn, MatcherSet, Verdict, DEFAULT_BLOCKLIST};
use serde_json::{json, Value};

fn defaults() -> MatcherSet {
    MatcherSet::compile(DEFAULT_BLOCKLIST)
}

fn check(tool: &str, params: Value) -> Verdict {
    evaluate(tool, &params, &defaults())
}

fn blocked_in(matched_in: MatchedIn) -> Verdict {
    Verdict::Blocked { matched_in }
}

// ============================================================================
// Tool name matching
// ============================================================================

#[test]
fn test_exact_tool_name_blocked() {
    assert_eq!(check("clawhub", json!({})), blocked_in(MatchedIn::Identifier));
    assert_eq!(check("ClawdHub", json!({})), blocked_in(MatchedIn::Identifier));
}

#[test]
fn test_clean_tool_name_allowed() {
    assert_eq!(check("read_file", json!({})), Verdict::Allowed);
}

#[test]
fn test_underscore_adjacent_tool_names_blocked() {
    assert_eq!(check("clawhub_install", json!({})), blocked_in(MatchedIn::Identifier));
    assert_eq!(check("_clawhub", json!({})), blocked_in(MatchedIn::Identifier));
    assert_eq!(check("_clawhub_", json!({})), blocked_in(MatchedIn::Identifier));
    assert_eq!(check("skill:clawhub.install", json!({})), blocked_in(MatchedIn::Identifier));
}

#[test]
fn test_embedded_tool_names_allowed() {
    assert_eq!(check("myclawhubstuff", json!({})), Verdict::Allowed);
    assert_eq!(check("clawhubbing", json!({})), Verdict::Allowed);
}

// ============================================================================
// Params matching
// ============================================================================

#[test]
fn test_path_param_blocked() {
    assert_eq!(
        check("read_file", json!({"path": "/tmp/clawhub-test.txt"})),
        blocked_in(MatchedIn::Payload)
    );
}

#[test]
fn test_nested_dir_param_blocked() {
    assert_eq!(
        check("write_file", json!({"path": "/home/user/clawdhub/config"})),
        blocked_in(MatchedIn::Payload)
    );
}

#[test]
fn test_clean_params_allowed() {
    assert_eq!(
        check("read_file", json!({"path": "/home/openclaw/.env"})),
        Verdict::Allowed
    );
}

#[test]
fn test_mid_word_params_allowed() {
    assert_eq!(
        check("read_file", json!({"path": "/tmp/clawhubbing.txt"})),
        Verdict::Allowed
    );
}

#[test]
fn test_params_in_arrays_and_numbers() {
    assert_eq!(
        check("exec", json!({"argv": ["npx", "clawhub", "install"], "n": 3.5})),
        blocked_in(MatchedIn::Payload)
    );
    assert_eq!(check("exec", json!([1, 2, null, false])), Verdict::Allowed);
}

#[test]
fn test_quoted_string_boundary() {
    // Serialized quotes act as separators
    assert_eq!(check("exec", json!({"cmd": "clawhub"})), blocked_in(MatchedIn::Payload));
}

// ============================================================================
// Custom blocklists
// ============================================================================

#[test]
fn test_custom_blocklist_with_special_chars() {
    let set = MatcherSet::compile([".env", "secrets"]);
    assert_eq!(
        evaluate("read_file", &json!({"path": "/home/user/.env"}), &set),
        blocked_in(MatchedIn::Payload)
    );
    assert_eq!(
        evaluate("read_file", &json!({"path": "/home/user/xenv"}), &set),
        Verdict::Allowed
    );
}

#[test]
fn test_empty_blocklist_never_blocks() {
    let set = MatcherSet::compile(Vec::<String>::new());
    for tool in ["clawhub", "", "anything"] {
        assert_eq!(evaluate(tool, &json!({"x": "clawhub"}), &set), Verdict::Allowed);
    }
}

#[test]
fn test_verdict_json_shape() {
    let verdict = check("clawhub", json!({}));
    assert_eq!(
        serde_json::to_value(verdict).unwrap(),
        json!({"blocked": true, "matchedIn": "identifier"})
    );
}
