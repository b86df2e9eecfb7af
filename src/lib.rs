//! openclaw-snitch - Configurable blocklist guard for OpenClaw agents
//!
//! Blocks tool calls whose name or parameters reference a blocklisted term,
//! and optionally alerts the operator over Telegram.
//!
//! # Features
//!
//! - **Boundary-aware matching**: terms match whole tokens only, with `_`
//!   and `-` treated as separators (`clawhub_install` matches `clawhub`,
//!   `clawhubbing` does not)
//! - **Literal terms**: regex metacharacters in terms are escaped
//! - **Tagged verdicts**: a block records whether the tool name or the
//!   parameters matched
//! - **Plugin handlers**: bootstrap directive, tool-call veto, message guard
//! - **Detached alerts**: notification never delays the block decision
//! - **Installer**: copies hook bundles and upserts the host config
//! - **Audit logging**: JSONL log of hook-mode decisions
//!
//! # Example
//!
//! ```
//! use openclaw_snitch::{evaluate, MatchedIn, MatcherSet, Verdict};
//! use serde_json::json;
//!
//! let matchers = MatcherSet::compile(["clawhub", "clawdhub"]);
//!
//! let verdict = evaluate("read_file", &json!({"path": "/tmp/clawhub-test.txt"}), &matchers);
//! assert_eq!(verdict, Verdict::Blocked { matched_in: MatchedIn::Payload });
//!
//! let verdict = evaluate("read_file", &json!({"path": "/tmp/clawhubbing.txt"}), &matchers);
//! assert_eq!(verdict, Verdict::Allowed);
//! ```

pub mod alert;
pub mod audit;
pub mod config;
pub mod directive;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod installer;
pub mod logging;
pub mod matcher;
pub mod output;
pub mod plugin;

// Re-exports for convenience
pub use config::{GuardConfig, DEFAULT_BLOCKLIST};
pub use engine::GuardEngine;
pub use evaluator::{evaluate, MatchedIn, Verdict};
pub use input::{HookEvent, ToolCallEvent};
pub use matcher::MatcherSet;
pub use output::{BlockResponse, HookOutput};
pub use plugin::{HookRegistry, PluginApi, SnitchPlugin};
