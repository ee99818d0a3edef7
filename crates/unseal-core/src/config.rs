use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dotted path of the protected master key inside a Chromium `Local State` file
pub const DEFAULT_KEY_FIELD: &str = "os_crypt.encrypted_key";

/// Top-level configuration (loaded from unseal.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsealConfig {
    pub master_key: MasterKeyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterKeyConfig {
    /// JSON configuration store holding the protected key (e.g. `Local State`)
    pub local_state: Option<PathBuf>,
    /// Dotted lookup path of the base64 key field
    pub key_field: String,
}

impl MasterKeyConfig {
    /// Configured store path with a leading `~/` expanded against `$HOME`.
    pub fn local_state_path(&self) -> Option<PathBuf> {
        self.local_state.as_deref().map(expand_tilde)
    }
}

impl Default for MasterKeyConfig {
    fn default() -> Self {
        Self {
            local_state: None,
            key_field: DEFAULT_KEY_FIELD.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (default: info). `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Read and parse a TOML config file. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<UnsealConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))
    } else {
        tracing::warn!("config file not found: {}  (using defaults)", path.display());
        Ok(UnsealConfig::default())
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        return home_dir().join(rest);
    }
    path.to_path_buf()
}
