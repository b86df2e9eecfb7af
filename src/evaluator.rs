//! Tool-call evaluation
//!
//! Pure decision function: checks the tool name, then the serialized
//! parameters, against a compiled matcher set.

use serde::Serialize;
use serde_json::Value;

use crate::matcher::MatcherSet;

/// Which part of the call triggered a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedIn {
    /// The tool name itself
    Identifier,

    /// The serialized parameter payload
    Payload,
}

impl MatchedIn {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedIn::Identifier => "identifier",
            MatchedIn::Payload => "payload",
        }
    }
}

impl std::fmt::Display for MatchedIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow/block decision for one tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Blocked { matched_in: MatchedIn },
}

impl Verdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Blocked { .. })
    }

    pub fn matched_in(&self) -> Option<MatchedIn> {
        match self {
            Verdict::Allowed => None,
            Verdict::Blocked { matched_in } => Some(*matched_in),
        }
    }
}

/// Serializes as `{"blocked":false}` or `{"blocked":true,"matchedIn":"..."}`
impl Serialize for Verdict {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire {
            blocked: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            matched_in: Option<MatchedIn>,
        }

        Wire {
            blocked: self.is_blocked(),
            matched_in: self.matched_in(),
        }
        .serialize(serializer)
    }
}

/// Canonical text form of a parameter payload (compact JSON)
///
/// Goes through `Display`, which cannot fail for any `Value`.
pub fn canonicalize(payload: &Value) -> String {
    payload.to_string()
}

/// Evaluate a tool call against the matcher set.
///
/// The identifier is checked first and short-circuits, so a call that
/// matches in both places reports `Identifier`.
pub fn evaluate(identifier: &str, payload: &Value, matchers: &MatcherSet) -> Verdict {
    if matchers.is_match(identifier) {
        return Verdict::Blocked {
            matched_in: MatchedIn::Identifier,
        };
    }

    if matchers.is_match(&canonicalize(payload)) {
        return Verdict::Blocked {
            matched_in: MatchedIn::Payload,
        };
    }

    Verdict::Allowed
}
