//! Host plugin registration
//!
//! The host hands the plugin a [`PluginApi`] at startup. The plugin registers
//! explicit handlers per event kind on its [`HookRegistry`]; the host later
//! dispatches events through the registry.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::alert::{AlertContext, AlertDispatcher};
use crate::config::{self, GuardConfig, PLUGIN_ID};
use crate::directive::BootstrapFile;
use crate::engine::GuardEngine;
use crate::evaluator::Verdict;
use crate::input::{BootstrapContext, HookEvent, MessageEvent, ToolCallEvent};
use crate::output::{violation_notice, BlockResponse, HookOutput};

type BootstrapHandler = Box<dyn Fn(&mut BootstrapContext) + Send + Sync>;
type ToolCallHandler = Box<dyn Fn(&ToolCallEvent) -> Option<BlockResponse> + Send + Sync>;
type MessageHandler = Box<dyn Fn(&MessageEvent) -> Option<String> + Send + Sync>;

/// Event kinds a plugin can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    AgentBootstrap,
    BeforeToolCall,
    MessageReceived,
}

/// Handlers registered per event kind
#[derive(Default)]
pub struct HookRegistry {
    bootstrap: Vec<BootstrapHandler>,
    before_tool_call: Vec<ToolCallHandler>,
    message_received: Vec<MessageHandler>,
}

impl HookRegistry {
    pub fn on_bootstrap<F>(&mut self, handler: F)
    where
        F: Fn(&mut BootstrapContext) + Send + Sync + 'static,
    {
        self.bootstrap.push(Box::new(handler));
    }

    pub fn on_before_tool_call<F>(&mut self, handler: F)
    where
        F: Fn(&ToolCallEvent) -> Option<BlockResponse> + Send + Sync + 'static,
    {
        self.before_tool_call.push(Box::new(handler));
    }

    /// Message handlers return a notice to push back, or `None`
    pub fn on_message_received<F>(&mut self, handler: F)
    where
        F: Fn(&MessageEvent) -> Option<String> + Send + Sync + 'static,
    {
        self.message_received.push(Box::new(handler));
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::AgentBootstrap => self.bootstrap.len(),
            EventKind::BeforeToolCall => self.before_tool_call.len(),
            EventKind::MessageReceived => self.message_received.len(),
        }
    }

    pub fn dispatch_bootstrap(&self, ctx: &mut BootstrapContext) {
        for handler in &self.bootstrap {
            handler(ctx);
        }
    }

    /// Run tool-call handlers in order; the first veto wins
    pub fn dispatch_before_tool_call(&self, call: &ToolCallEvent) -> Option<BlockResponse> {
        self.before_tool_call.iter().find_map(|handler| handler(call))
    }

    pub fn dispatch_message_received(&self, message: &MessageEvent) -> Vec<String> {
        self.message_received
            .iter()
            .filter_map(|handler| handler(message))
            .collect()
    }

    /// Dispatch any event and collect the response for the host
    pub fn dispatch(&self, event: HookEvent) -> HookOutput {
        match event {
            HookEvent::BeforeToolCall(call) => match self.dispatch_before_tool_call(&call) {
                Some(response) => HookOutput::block(response),
                None => HookOutput::allow(),
            },
            HookEvent::AgentBootstrap(mut ev) => {
                let before = ev.context.bootstrap_files.as_ref().map_or(0, Vec::len);
                self.dispatch_bootstrap(&mut ev.context);
                HookOutput {
                    bootstrap_files: ev
                        .context
                        .bootstrap_files
                        .map(|files| {
                            files
                                .into_iter()
                                .skip(before)
                                .filter_map(|file| serde_json::from_value(file).ok())
                                .collect()
                        })
                        .unwrap_or_default(),
                    ..HookOutput::default()
                }
            }
            HookEvent::MessageReceived(message) => HookOutput {
                messages: self.dispatch_message_received(&message),
                ..HookOutput::default()
            },
        }
    }
}

/// Capabilities the host passes to a plugin at startup
pub struct PluginApi {
    /// Full host configuration (`openclaw.json`)
    pub host_config: Value,

    /// This plugin's own config section, if any
    pub plugin_config: Option<Value>,

    pub hooks: HookRegistry,

    /// Alert delivery, when the host offers a channel
    pub alerts: Option<AlertDispatcher>,
}

impl PluginApi {
    /// API whose plugin config is taken from `plugins.config.openclaw-snitch`
    pub fn from_host_config(host_config: Value) -> Self {
        let plugin_config = config::host_plugin_config(&host_config).cloned();
        Self {
            host_config,
            plugin_config,
            hooks: HookRegistry::default(),
            alerts: None,
        }
    }

    pub fn with_alerts(mut self, alerts: AlertDispatcher) -> Self {
        self.alerts = Some(alerts);
        self
    }
}

/// The blocklist guard plugin
pub struct SnitchPlugin;

impl SnitchPlugin {
    pub const ID: &'static str = PLUGIN_ID;
    pub const NAME: &'static str = "OpenClaw Snitch";
    pub const DESCRIPTION: &'static str = "Configurable blocklist guard with Telegram alerts";

    /// Resolve config from the API and register all handlers
    pub fn register(api: &mut PluginApi) -> Arc<GuardEngine> {
        let config = GuardConfig::resolve(api.plugin_config.as_ref());
        Self::register_with(api, config)
    }

    /// Register handlers for an already-resolved config
    pub fn register_with(api: &mut PluginApi, config: GuardConfig) -> Arc<GuardEngine> {
        let engine = Arc::new(GuardEngine::new(config));
        let cfg = engine.config();

        if cfg.bootstrap_directive {
            let directive = BootstrapFile::directive(&cfg.blocklist).to_value();
            api.hooks.on_bootstrap(move |ctx| {
                if let Some(files) = ctx.bootstrap_files.as_mut() {
                    files.push(directive.clone());
                }
            });
        }

        let alerts = match (&api.alerts, cfg.alert_telegram) {
            (Some(dispatcher), true) => Some(dispatcher.clone()),
            (None, true) => {
                warn!("alerts enabled but no alert channel available");
                None
            }
            (_, false) => None,
        };

        let tool_engine = Arc::clone(&engine);
        api.hooks.on_before_tool_call(move |call| {
            let Verdict::Blocked { matched_in } = tool_engine.check_tool_call(call) else {
                debug!(tool = %call.tool_name, "allowed");
                return None;
            };

            error!(
                tool = %call.tool_name,
                session = call.session_key.as_deref().unwrap_or("?"),
                agent = call.agent_id.as_deref().unwrap_or("?"),
                matched_in = %matched_in,
                "🚨 BLOCKED"
            );

            if let Some(dispatcher) = &alerts {
                // Detached; the veto below does not wait for delivery
                dispatcher.dispatch(AlertContext {
                    tool_name: call.tool_name.clone(),
                    session_key: call.session_key.clone(),
                    agent_id: call.agent_id.clone(),
                    blocklist: tool_engine.blocklist().to_vec(),
                });
            }

            Some(BlockResponse::new(tool_engine.blocklist(), matched_in))
        });

        let message_engine = Arc::clone(&engine);
        api.hooks.on_message_received(move |message| {
            // System events carry no channel id; answering them would loop
            let channel = message.channel_id.as_deref().filter(|c| !c.is_empty())?;
            if !message_engine.check_message(message) {
                return None;
            }

            warn!(
                from = message.from.as_deref().unwrap_or("unknown"),
                channel,
                "policy violation: blocked term in message"
            );
            Some(violation_notice(message_engine.blocklist()))
        });

        engine
    }
}
