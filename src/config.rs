//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::{QueryOptions, UnauthorizedBehavior};
use crate::providers::{ToastSettings, TooltipSettings};

/// Upper bound for every configured delay (one week)
pub const MAX_DELAY_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub toast: ToastConfig,

    #[serde(default)]
    pub tooltip: TooltipConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Prefix for API requests; empty means same origin
    #[serde(default)]
    pub base_url: String,
}

/// Query cache defaults
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryConfig {
    /// Freshness window; absent keeps results fresh until invalidated
    #[serde(default)]
    pub stale_time_ms: Option<u64>,

    #[serde(default = "default_gc_time")]
    pub gc_time_ms: u64,

    #[serde(default)]
    pub retry: u32,

    #[serde(default)]
    pub on_unauthorized: UnauthorizedBehavior,
}

fn default_gc_time() -> u64 {
    5 * 60 * 1000 // 5 minutes
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: None,
            gc_time_ms: default_gc_time(),
            retry: 0,
            on_unauthorized: UnauthorizedBehavior::Throw,
        }
    }
}

/// Notification surface settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToastConfig {
    #[serde(default = "default_toast_limit")]
    pub limit: usize,

    #[serde(default = "default_remove_delay")]
    pub remove_delay_ms: u64,
}

fn default_toast_limit() -> usize {
    1
}

fn default_remove_delay() -> u64 {
    1_000_000
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            limit: default_toast_limit(),
            remove_delay_ms: default_remove_delay(),
        }
    }
}

/// Tooltip timing
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TooltipConfig {
    #[serde(default = "default_tooltip_delay")]
    pub delay_duration_ms: u64,

    #[serde(default = "default_skip_delay")]
    pub skip_delay_duration_ms: u64,
}

fn default_tooltip_delay() -> u64 {
    700
}

fn default_skip_delay() -> u64 {
    300
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            delay_duration_ms: default_tooltip_delay(),
            skip_delay_duration_ms: default_skip_delay(),
        }
    }
}

/// Router settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RouterConfig {
    /// Path prefix the app is served under, e.g. `/portal`
    #[serde(default)]
    pub base: String,
}

impl RouterConfig {
    /// In-app link for an app path, prefixed with the base
    pub fn href(&self, path: &str) -> String {
        let base = self.base.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Global animation settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnimationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Skip animations when the user prefers reduced motion
    #[serde(default = "default_true")]
    pub respect_reduced_motion: bool,

    /// Class added to `[data-animate]` elements as they scroll into view
    #[serde(default = "default_reveal_class")]
    pub reveal_class: String,

    /// Visible fraction that triggers the reveal
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_true() -> bool {
    true
}

fn default_reveal_class() -> String {
    "animate-in".to_string()
}

fn default_threshold() -> f64 {
    0.1
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            respect_reduced_motion: true,
            reveal_class: default_reveal_class(),
            threshold: default_threshold(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            error: e.to_string(),
        })
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("resume-portal").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `RESUME_PORTAL_*` overrides from any variable source
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("RESUME_PORTAL_API_URL") {
            self.api.base_url = url;
        }
        if let Some(base) = lookup("RESUME_PORTAL_ROUTER_BASE") {
            self.router.base = base;
        }
        if let Some(retry) = lookup("RESUME_PORTAL_QUERY_RETRY").and_then(|v| v.parse().ok()) {
            self.query.retry = retry;
        }
        if let Some(stale) = lookup("RESUME_PORTAL_STALE_TIME_MS").and_then(|v| v.parse().ok()) {
            self.query.stale_time_ms = Some(stale);
        }
        if let Some(limit) = lookup("RESUME_PORTAL_TOAST_LIMIT").and_then(|v| v.parse().ok()) {
            self.toast.limit = limit;
        }
        if let Some(enabled) = lookup("RESUME_PORTAL_ANIMATIONS").and_then(|v| v.parse().ok()) {
            self.animation.enabled = enabled;
        }
        if let Some(level) = lookup("RESUME_PORTAL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("RESUME_PORTAL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Reject values the providers cannot work with.
    ///
    /// The `[query]` section is checked by the query client itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toast.limit == 0 {
            return Err(ConfigError::Invalid("toast.limit must be > 0".to_string()));
        }
        let delays = [
            ("toast.remove_delay_ms", self.toast.remove_delay_ms),
            ("tooltip.delay_duration_ms", self.tooltip.delay_duration_ms),
            ("tooltip.skip_delay_duration_ms", self.tooltip.skip_delay_duration_ms),
        ];
        for (name, value) in delays {
            if value > MAX_DELAY_MS {
                return Err(ConfigError::Invalid(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_DELAY_MS, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.animation.threshold) {
            return Err(ConfigError::Invalid(
                "animation.threshold must be within 0.0..=1.0".to_string(),
            ));
        }
        if !self.router.base.is_empty() && !self.router.base.starts_with('/') {
            return Err(ConfigError::Invalid(
                "router.base must start with '/'".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            stale_time_ms: self.query.stale_time_ms,
            gc_time_ms: self.query.gc_time_ms,
            retry: self.query.retry,
            on_unauthorized: self.query.on_unauthorized,
        }
    }

    pub fn toast_settings(&self) -> ToastSettings {
        ToastSettings {
            limit: self.toast.limit,
            remove_delay_ms: self.toast.remove_delay_ms,
        }
    }

    pub fn tooltip_settings(&self) -> TooltipSettings {
        TooltipSettings {
            delay_duration_ms: self.tooltip.delay_duration_ms,
            skip_delay_duration_ms: self.tooltip.skip_delay_duration_ms,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config {path:?}: {error}")]
    Parse { path: Option<PathBuf>, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Resume Portal Configuration
#
# Environment variables override these settings:
# - RESUME_PORTAL_API_URL
# - RESUME_PORTAL_ROUTER_BASE
# - RESUME_PORTAL_QUERY_RETRY
# - RESUME_PORTAL_STALE_TIME_MS
# - RESUME_PORTAL_TOAST_LIMIT
# - RESUME_PORTAL_ANIMATIONS
# - RESUME_PORTAL_LOG_LEVEL
# - RESUME_PORTAL_LOG_FORMAT

[api]
# Prefix for API requests (empty = same origin)
base_url = ""

[query]
# Freshness window in ms; leave unset to keep results until invalidated
# stale_time_ms = 60000

# Age after which unused results are garbage collected (ms)
gc_time_ms = 300000

# Extra attempts after a failed request
retry = 0

# Behavior on 401 responses: "throw" or "return_null"
on_unauthorized = "throw"

[toast]
# Toasts visible at once
limit = 1

# Delay between dismissing a toast and removing it (ms)
remove_delay_ms = 1000000

[tooltip]
# Hover delay before a tooltip opens (ms)
delay_duration_ms = 700

# Window after a tooltip closes in which the next one opens instantly (ms)
skip_delay_duration_ms = 300

[router]
# Path prefix the app is served under
base = ""

[animation]
enabled = true
respect_reduced_motion = true
reveal_class = "animate-in"
threshold = 0.1

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_generated_config_matches_defaults() {
        let parsed = AppConfig::parse(&generate_default_config()).unwrap();
        assert_eq!(parsed, AppConfig::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query]\nretry = 2\non_unauthorized = \"return_null\"").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.query.retry, 2);
        assert_eq!(config.query.on_unauthorized, UnauthorizedBehavior::ReturnNull);
        assert_eq!(config.toast.limit, 1);
        assert_eq!(config.tooltip.delay_duration_ms, 700);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[query\nretry = ").unwrap();
        assert!(matches!(
            AppConfig::load(&bad),
            Err(ConfigError::Parse { path: Some(_), .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RESUME_PORTAL_API_URL", "https://api.example.com"),
            ("RESUME_PORTAL_QUERY_RETRY", "3"),
            ("RESUME_PORTAL_TOAST_LIMIT", "not-a-number"),
            ("RESUME_PORTAL_ANIMATIONS", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.query.retry, 3);
        assert_eq!(config.toast.limit, 1);
        assert!(!config.animation.enabled);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.toast.limit = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.router.base = "portal".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.animation.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delay_bounds() {
        let mut config = AppConfig::default();
        config.toast.remove_delay_ms = MAX_DELAY_MS;
        config.tooltip.delay_duration_ms = MAX_DELAY_MS;
        config.tooltip.skip_delay_duration_ms = MAX_DELAY_MS;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.tooltip.delay_duration_ms = 100_000_000_000_000_000;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.tooltip.skip_delay_duration_ms = MAX_DELAY_MS + 1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.toast.remove_delay_ms = u64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_router_href() {
        let mut router = RouterConfig::default();
        assert_eq!(router.href("/upload"), "/upload");
        assert_eq!(router.href("/"), "/");

        router.base = "/portal/".to_string();
        assert_eq!(router.href("/upload"), "/portal/upload");
        assert_eq!(router.href("sign-in"), "/portal/sign-in");
        assert_eq!(router.href("/"), "/portal/");
    }

    #[test]
    fn test_settings_conversions() {
        let config = AppConfig::default();
        assert_eq!(config.query_options(), QueryOptions::default());
        assert_eq!(config.toast_settings(), ToastSettings::default());
        assert_eq!(config.tooltip_settings(), TooltipSettings::default());
    }
}
