//! Outbound block alerts
//!
//! Recipients come from the host's Telegram account config. Delivery runs as
//! a detached task so the block decision never waits on the network, and a
//! failure for one recipient or account is logged and skipped.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::AlertError;

/// Host-provided send-message capability
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Send `text` to `recipient`, optionally through a specific account
    async fn send_message(
        &self,
        recipient: &str,
        text: &str,
        account_id: Option<&str>,
    ) -> Result<(), AlertError>;
}

/// What gets reported about a blocked call
#[derive(Debug, Clone, Default)]
pub struct AlertContext {
    pub tool_name: String,
    pub session_key: Option<String>,
    pub agent_id: Option<String>,
    pub blocklist: Vec<String>,
}

/// Outcome of one broadcast, for logging and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients reached, with the account that worked
    pub delivered: Vec<(String, Option<String>)>,

    /// Recipients no account could reach
    pub undelivered: Vec<String>,

    /// Individual send failures
    pub failures: usize,
}

fn telegram_accounts(host: &Value) -> Option<&serde_json::Map<String, Value>> {
    host.get("channels")?
        .get("telegram")?
        .get("accounts")?
        .as_object()
}

/// Unique `allowFrom` ids across all Telegram accounts, first-seen order
pub fn resolve_recipient_ids(host: &Value) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    let Some(accounts) = telegram_accounts(host) else {
        return ids;
    };

    for account in accounts.values() {
        let Some(allow_from) = account.get("allowFrom").and_then(Value::as_array) else {
            continue;
        };
        for id in allow_from {
            let id = match id {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    ids
}

/// Account ids to try per recipient; `[None]` means the default account
pub fn resolve_account_ids(host: &Value) -> Vec<Option<String>> {
    match telegram_accounts(host) {
        Some(accounts) => accounts.keys().cloned().map(Some).collect(),
        None => vec![None],
    }
}

pub fn build_alert_text(ctx: &AlertContext) -> String {
    let mut text = format!(
        "🚨🚔🚨 SNITCH ALERT 🚨🚔🚨\n\n\
         A blocked tool invocation was detected and stopped.\n\
         Blocked terms: {}\n\n\
         tool: `{}`",
        ctx.blocklist.join(", "),
        ctx.tool_name
    );
    if let Some(session) = &ctx.session_key {
        text.push_str(&format!("\nsession: `{}`", session));
    }
    if let Some(agent) = &ctx.agent_id {
        text.push_str(&format!("\nagent: `{}`", agent));
    }
    text
}

/// Send the alert to every recipient, trying accounts in order.
///
/// The first account that succeeds ends the loop for that recipient. Errors
/// are logged and never returned.
pub async fn broadcast_alert(
    channel: &dyn AlertChannel,
    host: &Value,
    ctx: &AlertContext,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();

    let recipients = resolve_recipient_ids(host);
    if recipients.is_empty() {
        warn!("no Telegram allowFrom IDs found, skipping broadcast");
        return report;
    }

    let text = build_alert_text(ctx);
    let accounts = resolve_account_ids(host);

    for recipient in recipients {
        let mut sent = false;
        for account in &accounts {
            match channel
                .send_message(&recipient, &text, account.as_deref())
                .await
            {
                Ok(()) => {
                    info!(
                        recipient = %recipient,
                        account = account.as_deref().unwrap_or("default"),
                        "alert sent"
                    );
                    report.delivered.push((recipient.clone(), account.clone()));
                    sent = true;
                    break;
                }
                Err(e) => {
                    warn!(
                        recipient = %recipient,
                        account = account.as_deref().unwrap_or("default"),
                        error = %e,
                        "alert failed"
                    );
                    report.failures += 1;
                }
            }
        }
        if !sent {
            report.undelivered.push(recipient);
        }
    }

    report
}

/// Runs broadcasts as detached tasks on a tokio runtime
#[derive(Clone)]
pub struct AlertDispatcher {
    channel: Arc<dyn AlertChannel>,
    host_config: Arc<Value>,
    runtime: Handle,
}

impl AlertDispatcher {
    pub fn new(channel: Arc<dyn AlertChannel>, host_config: Value, runtime: Handle) -> Self {
        Self {
            channel,
            host_config: Arc::new(host_config),
            runtime,
        }
    }

    /// Use the runtime of the calling context, if there is one
    pub fn from_current(channel: Arc<dyn AlertChannel>, host_config: Value) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|runtime| Self::new(channel, host_config, runtime))
    }

    /// Spawn the broadcast and return immediately.
    ///
    /// Callers on the decision path drop the handle; it is returned so tests
    /// can observe the outcome.
    pub fn dispatch(&self, ctx: AlertContext) -> JoinHandle<BroadcastReport> {
        let channel = Arc::clone(&self.channel);
        let host = Arc::clone(&self.host_config);

        self.runtime.spawn(async move {
            let report = broadcast_alert(channel.as_ref(), &host, &ctx).await;
            if !report.undelivered.is_empty() {
                warn!(
                    undelivered = report.undelivered.len(),
                    "broadcast incomplete"
                );
            }
            report
        })
    }
}
