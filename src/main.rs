//! openclaw-snitch - Configurable blocklist guard for OpenClaw agents
//!
//! # Usage
//!
//! ```bash
//! # Test the matcher against a tool call
//! openclaw-snitch check read_file '{"path":"/tmp/clawhub-test.txt"}'
//! openclaw-snitch check --blocklist ".env,secrets" read_file '{"path":"/home/user/.env"}'
//!
//! # As a hook (reads an event from stdin, writes JSON to stdout)
//! echo '{"event":"before_tool_call","toolName":"clawhub_install"}' | openclaw-snitch hook
//!
//! # Install hook bundles into $OPENCLAW_CONFIG_DIR
//! openclaw-snitch install
//! ```

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::warn;

use openclaw_snitch::{
    audit::{AuditEntry, AuditLogger},
    config::{self, Config, GuardConfig},
    directive::build_directive,
    evaluate,
    installer::{self, HOST_CONFIG_FILE},
    logging,
    output::{BlockResponse, HookOutput},
    HookEvent, MatcherSet, PluginApi, SnitchPlugin, Verdict,
};

const EXIT_ALLOWED: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_BLOCKED: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "openclaw-snitch",
    version,
    about = "Configurable blocklist guard for OpenClaw agents"
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one tool call; exits 0 if allowed, 2 if blocked, 1 on error
    Check {
        /// Comma-separated blocklist overriding the defaults
        #[arg(long, value_name = "TERMS")]
        blocklist: Option<String>,

        /// Tool name to evaluate
        tool_name: String,

        /// Tool parameters as JSON
        params: Option<String>,
    },

    /// Handle one host event from stdin and write the response to stdout
    Hook {
        /// Path to config file (overrides default search)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Copy hook bundles into the host config dir and enable them
    Install {
        /// Host config directory (defaults to $OPENCLAW_CONFIG_DIR)
        #[arg(long)]
        config_dir: Option<PathBuf>,

        /// Directory containing the hook bundles to copy
        #[arg(long)]
        hooks_src: Option<PathBuf>,
    },

    /// Print the bootstrap policy directive
    Directive {
        /// Comma-separated blocklist overriding the defaults
        #[arg(long, value_name = "TERMS")]
        blocklist: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not usage errors
            let code = if e.use_stderr() { EXIT_ERROR } else { EXIT_ALLOWED };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    logging::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check {
            blocklist,
            tool_name,
            params,
        } => run_check(blocklist.as_deref(), &tool_name, params.as_deref()),
        Commands::Hook { config } => run_hook(config.as_deref()),
        Commands::Install {
            config_dir,
            hooks_src,
        } => run_install(config_dir, hooks_src),
        Commands::Directive { blocklist } => {
            let terms = match blocklist {
                Some(csv) => config::parse_term_list(&csv),
                None => GuardConfig::default().blocklist,
            };
            println!("{}", build_directive(&terms));
            ExitCode::from(EXIT_ALLOWED)
        }
    }
}

fn run_check(blocklist: Option<&str>, tool_name: &str, params_raw: Option<&str>) -> ExitCode {
    let custom;
    let matchers = match blocklist {
        Some(csv) => {
            custom = MatcherSet::compile(config::parse_term_list(csv));
            &custom
        }
        None => MatcherSet::defaults(),
    };

    let params: Value = match params_raw {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("Invalid JSON for params: {} ({})", raw, e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
        None => json!({}),
    };

    let verdict = evaluate(tool_name, &params, matchers);

    println!(
        "Blocklist : {}",
        matchers.terms().collect::<Vec<_>>().join(", ")
    );
    println!("Tool name : {}", tool_name);
    println!("Params    : {}", params);
    println!();

    match verdict {
        Verdict::Blocked { matched_in } => {
            println!("🚨 BLOCKED — matched in: {}", matched_in);
            ExitCode::from(EXIT_BLOCKED)
        }
        Verdict::Allowed => {
            println!("✅ ALLOWED — no match");
            ExitCode::from(EXIT_ALLOWED)
        }
    }
}

/// Host config from `$OPENCLAW_CONFIG_DIR/openclaw.json`, or `{}`
fn load_host_config() -> Value {
    let Ok(dir) = installer::resolve_config_dir(None) else {
        return json!({});
    };
    let path = dir.join(HOST_CONFIG_FILE);
    if !path.exists() {
        return json!({});
    }

    match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable host config");
            json!({})
        }
    }
}

fn run_hook(config_path: Option<&Path>) -> ExitCode {
    let config = match config_path {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default config");
            Config::default()
        }),
        None => Config::load(),
    };

    // Layering: [guard] table, else the host's plugin section, then env
    let host_config = load_host_config();
    let layered = if config.guard.is_empty() {
        GuardConfig::resolve(config::host_plugin_config(&host_config))
    } else {
        config.guard()
    };
    let mut guard = layered.with_env_override();

    // Alert delivery belongs to the host runtime; a one-shot hook has no channel
    guard.alert_telegram = false;

    let mut api = PluginApi::from_host_config(host_config);
    let engine = SnitchPlugin::register_with(&mut api, guard);

    let mut logger = AuditLogger::new(config.audit_path().as_deref());

    let mut input_json = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input_json) {
        warn!(error = %e, "failed to read stdin");
    }

    // No input = nothing to check, allow
    if input_json.trim().is_empty() {
        return emit(&HookOutput::allow());
    }

    let event = match HookEvent::from_json(&input_json) {
        Ok(event) => event,
        Err(e) => {
            if let Err(log_err) = logger.log(&AuditEntry::parse_error(&input_json, &e.to_string())) {
                warn!(error = %log_err, "failed to write audit log");
            }
            // Fail closed only where a veto means something: a malformed
            // tool call could be an evasion attempt
            if HookEvent::may_be_tool_call(&input_json) {
                warn!(error = %e, "failed to parse tool call, denying");
                return emit(&HookOutput::block(BlockResponse::malformed(&e.to_string())));
            }
            warn!(error = %e, "failed to parse hook event, ignoring");
            return emit(&HookOutput::allow());
        }
    };

    let output = api.hooks.dispatch(event.clone());

    let matched_terms = match &event {
        HookEvent::BeforeToolCall(call) if output.is_block() => engine.matched_terms(call),
        _ => Vec::new(),
    };
    if let Err(e) = logger.log_decision(&event, &output, matched_terms) {
        warn!(error = %e, "failed to write audit log");
    }

    emit(&output)
}

fn emit(output: &HookOutput) -> ExitCode {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", output.to_json());
    let _ = handle.flush();
    ExitCode::from(EXIT_ALLOWED)
}

/// Bundles next to the installed binary, else the source tree's `hooks/`
fn default_hooks_src() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(|p| p.join("hooks")))
        .filter(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("hooks"))
}

fn run_install(config_dir: Option<PathBuf>, hooks_src: Option<PathBuf>) -> ExitCode {
    let openclaw_dir = match installer::resolve_config_dir(config_dir) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{} — cannot install hooks.", e);
            eprintln!("Set it to your OpenClaw config directory (e.g. ~/.openclaw).");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let src_hooks = hooks_src.unwrap_or_else(default_hooks_src);
    let target_hooks = openclaw_dir.join("hooks");

    println!("Installing snitch hooks into {} ...", target_hooks.display());
    let result = installer::install_hooks(&src_hooks, &target_hooks);
    if !result.success {
        eprintln!(
            "Install failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        return ExitCode::from(EXIT_ERROR);
    }
    for name in &result.installed {
        println!("  ✓ {}", name);
    }

    let config_path = openclaw_dir.join(HOST_CONFIG_FILE);
    println!("Enabling hooks in {} ...", config_path.display());
    if let Err(e) = installer::update_host_config(&config_path) {
        eprintln!("Config update failed: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("  ✓ hooks.internal.entries updated");

    println!(
        r#"
openclaw-snitch installed.

  Hooks copied to:  {}
  Config updated:   {}

  Next steps:

  1. Lock down the plugin so the agent can't self-modify:

     chmod -R a-w {}/extensions/openclaw-snitch

  2. (Optional) Customize the blocklist in openclaw.json:

     {{
       "plugins": {{
         "config": {{
           "openclaw-snitch": {{
             "blocklist": ["clawhub", "clawdhub", "your-term-here"]
           }}
         }}
       }}
     }}
"#,
        target_hooks.display(),
        config_path.display(),
        openclaw_dir.display()
    );

    ExitCode::from(EXIT_ALLOWED)
}
