//! Audit configuration loader.
//!
//! Looks for `codex.toml` in a fixed order and deserializes the first file
//! found into [`AuditConfig`]:
//!
//! 1. `--config FILE` (explicit; read and parse errors are fatal)
//! 2. `{root}/codex.toml`
//! 3. `$CODEX_AUDIT_CONFIG`
//! 4. `~/.codex-audit/config.toml`
//!
//! When none exists the defaults are used. A malformed implicit file logs a
//! warning and also falls back to the defaults.

use std::path::{Path, PathBuf};

use codex_types::config::AuditConfig;
use codex_types::error::ConfigError;

/// File name looked up in the codex root.
pub const CONFIG_FILE_NAME: &str = "codex.toml";

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "CODEX_AUDIT_CONFIG";

/// The effective configuration and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: AuditConfig,
    /// `None` when the defaults are in effect.
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    fn defaults() -> Self {
        Self {
            config: AuditConfig::default(),
            source: None,
        }
    }
}

/// Per-user config path: `~/.codex-audit/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".codex-audit").join("config.toml"))
}

/// Implicit candidates in lookup order.
fn implicit_candidates(root: &Path, env_path: Option<PathBuf>, user_path: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates = vec![root.join(CONFIG_FILE_NAME)];
    candidates.extend(env_path);
    candidates.extend(user_path);
    candidates
}

/// Load the audit configuration for a codex rooted at `root`.
///
/// An explicit path must exist, parse and validate. The first implicit file
/// found is used if it is valid; otherwise defaults apply with a warning.
pub async fn load_audit_config(explicit: Option<&Path>, root: &Path) -> Result<LoadedConfig, ConfigError> {
    let env_path = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    load_audit_config_from(explicit, root, env_path, user_config_path()).await
}

/// [`load_audit_config`] with the environment and home lookups supplied.
pub async fn load_audit_config_from(
    explicit: Option<&Path>,
    root: &Path,
    env_path: Option<PathBuf>,
    user_path: Option<PathBuf>,
) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let config = parse_config(path, &content)?;
        validate_config(&config)?;
        tracing::debug!(path = %path.display(), "Loaded explicit config");
        return Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
        });
    }

    for path in implicit_candidates(root, env_path, user_path) {
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!(path = %path.display(), "No config file");
                continue;
            }
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
                return Ok(LoadedConfig::defaults());
            }
        };

        let parsed = parse_config(&path, &content)
            .and_then(|config| validate_config(&config).map(|()| config));
        return match parsed {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Ok(LoadedConfig {
                    config,
                    source: Some(path),
                })
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "{err}, using defaults");
                Ok(LoadedConfig::defaults())
            }
        };
    }

    tracing::debug!("No config file found, using defaults");
    Ok(LoadedConfig::defaults())
}

fn parse_config(path: &Path, content: &str) -> Result<AuditConfig, ConfigError> {
    toml::from_str::<AuditConfig>(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reject values no audit can run with.
///
/// Technology patterns are checked when the scanner compiles them.
pub fn validate_config(config: &AuditConfig) -> Result<(), ConfigError> {
    if config.base_threshold_months == 0 {
        return Err(ConfigError::ZeroThreshold);
    }
    if let Some(rule) = config.technology.iter().find(|r| r.token.trim().is_empty()) {
        return Err(ConfigError::InvalidRule {
            token: rule.token.clone(),
            message: "token must not be empty".to_string(),
        });
    }
    Ok(())
}
