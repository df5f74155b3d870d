//! Client configuration module.
//!
//! Handles loading, validating, and merging `recipe-box.toml`. Stock defaults
//! are the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_url = "http://127.0.0.1:5000"  # Backend origin, no trailing path
//!
//! [http]
//! # timeout_secs = 30                # Unset = requests never time out
//! user_agent = "recipe-box/0.4.0"
//!
//! [timing]
//! logout_delay_ms = 2000             # Pause before /logout after account deletion
//! banner_dismiss_ms = 5000           # How long the test-run banner stays up
//!
//! [test_runner]
//! endpoint = "/run-tests"            # Or the legacy "/run-test"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "recipe-box.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Client configuration loaded from `recipe-box.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Backend origin every request path is appended to.
    pub base_url: String,
    pub http: HttpConfig,
    pub timing: TimingConfig,
    pub test_runner: TestRunnerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            http: HttpConfig::default(),
            timing: TimingConfig::default(),
            test_runner: TestRunnerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be positive (omit it to disable timeouts)".into(),
            ));
        }
        if !self.test_runner.endpoint.starts_with('/') {
            return Err(ConfigError::Validation(
                "test_runner.endpoint must be an absolute path".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: format!("recipe-box/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fixed delays used by action submitters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Delay between the account-deleted message and navigating to `/logout`.
    pub logout_delay_ms: u64,
    /// How long the test-run banner stays visible.
    pub banner_dismiss_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            logout_delay_ms: 2000,
            banner_dismiss_ms: 5000,
        }
    }
}

impl TimingConfig {
    pub fn logout_delay(&self) -> Duration {
        Duration::from_millis(self.logout_delay_ms)
    }

    pub fn banner_dismiss(&self) -> Duration {
        Duration::from_millis(self.banner_dismiss_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestRunnerConfig {
    pub endpoint: String,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        Self {
            endpoint: "/run-tests".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ClientConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` when the file is absent.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, deserialize, validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ClientConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ClientConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to defaults when it is missing.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `recipe-box.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Recipe Box client configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Backend origin. Request paths such as /api/recipes are appended to it.
base_url = "http://127.0.0.1:5000"

# ---------------------------------------------------------------------------
# HTTP
# ---------------------------------------------------------------------------
[http]
# Whole-request timeout in seconds. Leave unset to wait indefinitely,
# which is what the browser pages do.
# timeout_secs = 30

# ---------------------------------------------------------------------------
# Timing of follow-up page effects
# ---------------------------------------------------------------------------
[timing]
# Pause between "account deleted" and navigating to /logout.
logout_delay_ms = 2000

# How long the test-run banner stays on screen.
banner_dismiss_ms = 5000

# ---------------------------------------------------------------------------
# Remote test runner
# ---------------------------------------------------------------------------
[test_runner]
# "/run-tests" replies with {passed, output, exit_code}.
# "/run-test" is the older {message, output|error} variant.
endpoint = "/run-tests"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.http.timeout_secs, None);
        assert_eq!(config.timing.logout_delay_ms, 2000);
        assert_eq!(config.timing.banner_dismiss_ms, 5000);
        assert_eq!(config.test_runner.endpoint, "/run-tests");
    }

    #[test]
    fn default_user_agent_carries_version() {
        let config = ClientConfig::default();
        assert!(config.http.user_agent.starts_with("recipe-box/"));
    }

    #[test]
    fn timing_durations() {
        let timing = TimingConfig::default();
        assert_eq!(timing.logout_delay(), Duration::from_secs(2));
        assert_eq!(timing.banner_dismiss(), Duration::from_secs(5));
    }

    #[test]
    fn parse_partial_config() {
        let config: ClientConfig = toml::from_str(
            r#"
[timing]
logout_delay_ms = 500
"#,
        )
        .unwrap();
        assert_eq!(config.timing.logout_delay_ms, 500);
        assert_eq!(config.timing.banner_dismiss_ms, 5000);
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"base_url = "http://a""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"base_url = "http://b""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["base_url"].as_str(), Some("http://b"));
    }

    #[test]
    fn merge_toml_preserves_sibling_keys() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r#"
[timing]
banner_dismiss_ms = 100
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["timing"]["banner_dismiss_ms"].as_integer(), Some(100));
        assert_eq!(merged["timing"]["logout_delay_ms"].as_integer(), Some(2000));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ClientConfig, _> = toml::from_str("base_uri = \"http://x\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let overlay: toml::Value = toml::from_str(
            r#"
[timing]
logout_dalay_ms = 1
"#,
        )
        .unwrap();
        assert!(resolve_config(Some(overlay)).is_err());
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = ClientConfig::default();
        config.base_url = "localhost:5000".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = ClientConfig::default();
        config.http.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_test_endpoint() {
        let mut config = ClientConfig::default();
        config.test_runner.endpoint = "run-tests".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn load_config_reads_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
base_url = "https://recipes.example.org"

[http]
timeout_secs = 15

[test_runner]
endpoint = "/run-test"
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.base_url, "https://recipes.example.org");
        assert_eq!(config.http.timeout_secs, Some(15));
        assert_eq!(config.test_runner.endpoint, "/run-test");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "base_url = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "base_url = \"ftp://nope\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        let defaults = ClientConfig::default();
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.timing.logout_delay_ms, defaults.timing.logout_delay_ms);
        assert_eq!(config.timing.banner_dismiss_ms, defaults.timing.banner_dismiss_ms);
        assert_eq!(config.test_runner.endpoint, defaults.test_runner.endpoint);
    }
}
