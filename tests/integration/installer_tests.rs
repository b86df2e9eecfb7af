//! Integration tests for hook installation and host config upsert

use std::fs;
use std::path::Path;

use openclaw_snitch::installer::{install_hooks, update_host_config, HOOK_DIRS};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn source_tree() -> TempDir {
    let src = TempDir::new().unwrap();
    write(&src.path().join("snitch-bootstrap/HOOK.md"), "bootstrap");
    write(
        &src.path().join("snitch-message-guard/HOOK.md"),
        "guard",
    );
    write(
        &src.path().join("snitch-message-guard/lib/extra.txt"),
        "nested",
    );
    write(&src.path().join("unrelated/HOOK.md"), "not ours");
    src
}

// ============================================================================
// install_hooks
// ============================================================================

#[test]
fn test_install_copies_known_bundles() {
    let src = source_tree();
    let target = TempDir::new().unwrap();
    let hooks = target.path().join("hooks");

    let result = install_hooks(src.path(), &hooks);
    assert!(result.success);
    assert_eq!(result.installed, HOOK_DIRS);

    assert_eq!(
        fs::read_to_string(hooks.join("snitch-bootstrap/HOOK.md")).unwrap(),
        "bootstrap"
    );
    assert_eq!(
        fs::read_to_string(hooks.join("snitch-message-guard/lib/extra.txt")).unwrap(),
        "nested"
    );
    assert!(!hooks.join("unrelated").exists());
}

#[test]
fn test_install_overwrites_existing() {
    let src = source_tree();
    let target = TempDir::new().unwrap();
    write(&target.path().join("snitch-bootstrap/HOOK.md"), "stale");

    let result = install_hooks(src.path(), target.path());
    assert!(result.success);
    assert_eq!(
        fs::read_to_string(target.path().join("snitch-bootstrap/HOOK.md")).unwrap(),
        "bootstrap"
    );
}

#[test]
fn test_install_skips_missing_bundle() {
    let src = TempDir::new().unwrap();
    write(&src.path().join("snitch-bootstrap/HOOK.md"), "bootstrap");
    let target = TempDir::new().unwrap();

    let result = install_hooks(src.path(), target.path());
    assert!(result.success);
    assert_eq!(result.installed, vec!["snitch-bootstrap"]);
}

#[test]
fn test_install_missing_source_is_structured_failure() {
    let target = TempDir::new().unwrap();
    let missing = target.path().join("does-not-exist");

    let result = install_hooks(&missing, &target.path().join("hooks"));
    assert!(!result.success);
    assert!(result.installed.is_empty());
    assert!(result.error.unwrap().contains("Source hooks dir not found"));
}

#[test]
fn test_shipped_bundles_install() {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("hooks");
    let target = TempDir::new().unwrap();

    let result = install_hooks(&src, target.path());
    assert!(result.success);
    assert_eq!(result.installed, HOOK_DIRS);
}

// ============================================================================
// update_host_config
// ============================================================================

#[test]
fn test_update_creates_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/openclaw.json");

    update_host_config(&path).unwrap();

    let config = read_json(&path);
    assert_eq!(config["hooks"]["internal"]["enabled"], true);
    for name in HOOK_DIRS {
        assert_eq!(config["hooks"]["internal"]["entries"][name]["enabled"], true);
    }
    assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));
}

#[test]
fn test_update_preserves_plugins_and_unrelated_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("openclaw.json");
    let original = json!({
        "agents": {"default": {"model": "x"}},
        "plugins": {
            "installed": ["openclaw-snitch"],
            "config": {"openclaw-snitch": {"blocklist": ["custom"]}}
        },
        "hooks": {"internal": {"enabled": false, "entries": {"mine": {"enabled": true}}}}
    });
    fs::write(&path, serde_json::to_string_pretty(&original).unwrap()).unwrap();

    update_host_config(&path).unwrap();

    let config = read_json(&path);
    assert_eq!(config["agents"], original["agents"]);
    assert_eq!(config["plugins"], original["plugins"]);
    assert_eq!(config["hooks"]["internal"]["enabled"], true);
    assert_eq!(config["hooks"]["internal"]["entries"]["mine"], json!({"enabled": true}));

    // Top-level key order survives the rewrite
    let keys: Vec<_> = config.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["agents", "plugins", "hooks"]);
}

#[test]
fn test_update_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("openclaw.json");
    fs::write(&path, r#"{"plugins":{"a":1},"z":true}"#).unwrap();

    update_host_config(&path).unwrap();
    let first = fs::read_to_string(&path).unwrap();
    update_host_config(&path).unwrap();
    let second = fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_update_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("openclaw.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(update_host_config(&path).is_err());
    // Left untouched
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}
