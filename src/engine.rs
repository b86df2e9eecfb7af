//! Guard engine for openclaw-snitch
//!
//! Owns one resolved configuration and the matcher set compiled from it.

use crate::config::GuardConfig;
use crate::evaluator::{self, Verdict};
use crate::input::{MessageEvent, ToolCallEvent};
use crate::matcher::MatcherSet;

/// Compiled guard: configuration plus its immutable matcher set
#[derive(Debug, Clone)]
pub struct GuardEngine {
    config: GuardConfig,
    matchers: MatcherSet,
}

impl GuardEngine {
    /// Create a new engine, compiling the blocklist once
    pub fn new(config: GuardConfig) -> Self {
        let matchers = MatcherSet::compile(&config.blocklist);
        Self { config, matchers }
    }

    /// Evaluate a pending tool call
    pub fn check_tool_call(&self, call: &ToolCallEvent) -> Verdict {
        evaluator::evaluate(&call.tool_name, &call.params, &self.matchers)
    }

    /// Whether an inbound message references a blocked term
    pub fn check_message(&self, message: &MessageEvent) -> bool {
        self.matchers.is_match(&message.content)
    }

    /// Terms that matched a tool call, for audit records
    pub fn matched_terms(&self, call: &ToolCallEvent) -> Vec<String> {
        let mut terms: Vec<String> = self
            .matchers
            .matching_terms(&call.tool_name)
            .into_iter()
            .map(String::from)
            .collect();

        for term in self.matchers.matching_terms(&evaluator::canonicalize(&call.params)) {
            if !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }
        terms
    }

    pub fn blocklist(&self) -> &[String] {
        &self.config.blocklist
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn matchers(&self) -> &MatcherSet {
        &self.matchers
    }
}
