//! Hook bundle installation
//!
//! Copies the shipped hook bundles into the host's hooks directory and
//! enables them in the host config. The host config is upserted in place:
//! only `hooks.internal` is touched, and the `plugins` section is owned by
//! the host's own plugin installer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::InstallError;

/// Hook bundles shipped under `hooks/`
pub const HOOK_DIRS: &[&str] = &["snitch-bootstrap", "snitch-message-guard"];

/// Host config file name inside the config dir
pub const HOST_CONFIG_FILE: &str = "openclaw.json";

/// Outcome of copying hook bundles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallResult {
    pub success: bool,
    pub installed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstallResult {
    fn failed(error: String, installed: Vec<String>) -> Self {
        Self {
            success: false,
            installed,
            error: Some(error),
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> InstallError + '_ {
    move |source| InstallError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Copy every known hook bundle from `src_hooks_dir` into `target_hooks_dir`.
///
/// A missing source directory is reported in the result rather than as an
/// error; bundles missing from the source are skipped. Existing bundles in
/// the target are overwritten.
pub fn install_hooks(src_hooks_dir: &Path, target_hooks_dir: &Path) -> InstallResult {
    let mut installed = Vec::new();

    if !src_hooks_dir.is_dir() {
        return InstallResult::failed(
            format!("Source hooks dir not found: {}", src_hooks_dir.display()),
            installed,
        );
    }

    if let Err(e) = fs::create_dir_all(target_hooks_dir) {
        return InstallResult::failed(
            format!("Cannot create {}: {}", target_hooks_dir.display(), e),
            installed,
        );
    }

    for hook_name in HOOK_DIRS {
        let src = src_hooks_dir.join(hook_name);
        if !src.is_dir() {
            tracing::debug!(hook = hook_name, "bundle not present in source, skipping");
            continue;
        }

        let dest = target_hooks_dir.join(hook_name);
        if let Err(e) = copy_dir_recursive(&src, &dest) {
            return InstallResult::failed(e.to_string(), installed);
        }
        installed.push(hook_name.to_string());
    }

    InstallResult {
        success: true,
        installed,
        error: None,
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dest).map_err(io_err(dest))?;

    for entry in fs::read_dir(src).map_err(io_err(src))? {
        let entry = entry.map_err(io_err(src))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());

        if from.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(io_err(&from))?;
        }
    }
    Ok(())
}

/// Get `obj[key]` as an object, replacing it with `{}` if absent or not an object
fn object_entry<'a>(obj: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = obj.entry(key).or_insert_with(|| json!({}));
    if !slot.is_object() {
        *slot = json!({});
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just set to an object"),
    }
}

/// Upsert `hooks.internal.{enabled, entries.<hook>.enabled}` into a host config.
///
/// Idempotent. Unrelated keys keep their values and their order.
pub fn merge_hook_entries(config: &mut Value) {
    if !config.is_object() {
        *config = json!({});
    }
    let Value::Object(root) = config else {
        return;
    };

    let internal = object_entry(object_entry(root, "hooks"), "internal");
    internal.insert("enabled".to_string(), Value::Bool(true));

    let entries = object_entry(internal, "entries");
    for hook_name in HOOK_DIRS {
        entries.insert(hook_name.to_string(), json!({ "enabled": true }));
    }
}

/// Enable the hook bundles in the host config file at `config_path`.
///
/// Starts from `{}` if the file does not exist. Invalid JSON is an error;
/// the file is never overwritten blindly.
pub fn update_host_config(config_path: &Path) -> Result<(), InstallError> {
    let mut config = if config_path.exists() {
        let content = fs::read_to_string(config_path).map_err(io_err(config_path))?;
        serde_json::from_str(&content).map_err(|source| InstallError::InvalidHostConfig {
            path: config_path.to_path_buf(),
            source,
        })?
    } else {
        json!({})
    };

    merge_hook_entries(&mut config);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let mut formatted = serde_json::to_string_pretty(&config).map_err(|source| {
        InstallError::InvalidHostConfig {
            path: config_path.to_path_buf(),
            source,
        }
    })?;
    formatted.push('\n');

    fs::write(config_path, formatted).map_err(io_err(config_path))
}

/// Resolve the host config directory from an explicit path or the environment
pub fn resolve_config_dir(explicit: Option<PathBuf>) -> Result<PathBuf, InstallError> {
    explicit
        .or_else(|| std::env::var_os(crate::config::CONFIG_DIR_ENV).map(PathBuf::from))
        .ok_or(InstallError::MissingConfigDir)
}
