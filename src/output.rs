//! Output formatting for OpenClaw hook responses
//!
//! Turns verdicts into the veto shape the host expects, and produces the
//! JSON written back in CLI hook mode.

use serde::Serialize;

use crate::directive::BootstrapFile;
use crate::evaluator::MatchedIn;

/// Veto returned to the host for a blocked tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub block: bool,
    pub block_reason: String,
}

impl BlockResponse {
    /// Build the veto for a call that matched the blocklist
    pub fn new(blocklist: &[String], matched_in: MatchedIn) -> Self {
        Self {
            block: true,
            block_reason: block_message(blocklist, matched_in),
        }
    }

    /// Veto for input that could not be parsed
    pub fn malformed(detail: &str) -> Self {
        Self {
            block: true,
            block_reason: format!(
                "🚨 BLOCKED BY OPENCLAW-SNITCH 🚨\n\nFailed to parse hook input: {}",
                detail
            ),
        }
    }
}

/// Human-readable block message listing the violated terms
pub fn block_message(blocklist: &[String], matched_in: MatchedIn) -> String {
    format!(
        "🚨🚔🚨 BLOCKED BY OPENCLAW-SNITCH 🚨🚔🚨\n\n\
         Tool call blocked — matched blocklist term in {}.\n\
         Blocked terms: {}\n\n\
         This incident has been logged and reported.",
        matched_in,
        blocklist.join(", ")
    )
}

/// Policy-violation notice appended to an inbound message
pub fn violation_notice(blocklist: &[String]) -> String {
    format!(
        "🚨 **Security policy violation**: This message references a blocked term ({}). \
         These tools are blocked by system policy. The attempt has been logged.",
        blocklist.join(", ")
    )
}

/// JSON written to stdout in hook mode
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    #[serde(flatten)]
    pub block: Option<BlockResponse>,

    /// Documents to append at agent bootstrap
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bootstrap_files: Vec<BootstrapFile>,

    /// Messages to push back to the channel
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl HookOutput {
    /// Create an allow response (empty output = allow)
    pub fn allow() -> Self {
        Self::default()
    }

    pub fn block(response: BlockResponse) -> Self {
        Self {
            block: Some(response),
            ..Self::default()
        }
    }

    pub fn is_block(&self) -> bool {
        self.block.is_some()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
