//! Property tests for boundary-aware matching

use openclaw_snitch::{evaluate, MatchedIn, MatcherSet, Verdict};
use proptest::prelude::*;
use serde_json::json;

/// Terms made of letters/digits plus a few literal metacharacters
fn term() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.+*?]{0,10}[a-z0-9]"
}

/// Separator runs that are never ASCII alphanumeric
fn separator() -> impl Strategy<Value = String> {
    "[ _\\-/.:,;()\\[\\]{}\"']{1,3}"
}

fn alnum_run() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,5}"
}

fn random_case(s: &str, mask: u64) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << (i % 64)) != 0 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn test_bounded_term_always_matches(
        t in term(),
        left in separator(),
        right in separator(),
        mask in any::<u64>(),
        at_start in any::<bool>(),
        at_end in any::<bool>(),
    ) {
        let set = MatcherSet::compile([t.as_str()]);
        let prefix = if at_start { String::new() } else { left };
        let suffix = if at_end { String::new() } else { right };
        let text = format!("{}{}{}", prefix, random_case(&t, mask), suffix);
        prop_assert!(set.is_match(&text), "{:?} should match {:?}", t, text);
    }

    #[test]
    fn test_inner_substring_never_matches(
        t in "[a-z]{3,8}",
        left in alnum_run(),
        right in alnum_run(),
    ) {
        let set = MatcherSet::compile([t.as_str()]);
        // All-alphanumeric text: the only boundaries are the string edges
        let text = format!("{}{}{}", left, t, right);
        prop_assert!(!set.is_match(&text), "{:?} should not match {:?}", t, text);
    }

    #[test]
    fn test_empty_set_never_blocks(tool in "\\PC*", value in "\\PC*") {
        let set = MatcherSet::compile(Vec::<String>::new());
        prop_assert_eq!(evaluate(&tool, &json!({"v": value}), &set), Verdict::Allowed);
    }

    #[test]
    fn test_evaluate_is_deterministic(tool in "[a-z_]{0,12}", value in "\\PC{0,40}") {
        let set = MatcherSet::compile(["clawhub", "clawdhub"]);
        let payload = json!({"v": value, "n": [1, {"k": null}]});
        prop_assert_eq!(evaluate(&tool, &payload, &set), evaluate(&tool, &payload, &set));
    }

    #[test]
    fn test_identifier_match_wins(tool_sep in separator(), value in "\\PC{0,20}") {
        let set = MatcherSet::compile(["clawhub"]);
        let tool = format!("clawhub{}", tool_sep);
        let verdict = evaluate(&tool, &json!({"v": value, "w": "clawhub"}), &set);
        prop_assert_eq!(verdict, Verdict::Blocked { matched_in: MatchedIn::Identifier });
    }
}
