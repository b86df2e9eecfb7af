//! Error types for openclaw-snitch
//!
//! Matching and evaluation have no error paths; these cover the glue around
//! them (config files, installer, alert delivery).

use std::path::PathBuf;

/// Errors loading the tool's own configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Errors writing hook bundles or the host config.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Host config at {path} is not valid JSON: {source}")]
    InvalidHostConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("OPENCLAW_CONFIG_DIR is not set and no --config-dir was given")]
    MissingConfigDir,
}

/// Errors delivering one alert message.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("send to {recipient} failed: {message}")]
    SendFailed { recipient: String, message: String },

    #[error("channel unavailable: {0}")]
    Unavailable(String),
}
