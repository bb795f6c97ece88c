//! Configuration structures.

use analytics_cache::{FetchFailureMode, FreshnessPolicy};
use analytics_source::{CallClassifier, ZendeskConfig};
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for either freshness window, one leap year.
pub const MAX_FRESHNESS_WINDOW_SECS: u64 = 366 * 24 * 60 * 60;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub zendesk: ZendeskSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

impl AppConfig {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cache = &self.cache;
        if cache.staleness_threshold_secs == 0 || cache.today_window_secs == 0 {
            return Err(ConfigError::Message(
                "cache freshness windows must be greater than zero".into(),
            ));
        }
        if cache.staleness_threshold_secs > MAX_FRESHNESS_WINDOW_SECS
            || cache.today_window_secs > MAX_FRESHNESS_WINDOW_SECS
        {
            return Err(ConfigError::Message(format!(
                "cache freshness windows must not exceed {} seconds",
                MAX_FRESHNESS_WINDOW_SECS
            )));
        }
        if cache.today_window_secs > cache.staleness_threshold_secs {
            return Err(ConfigError::Message(format!(
                "cache.today_window_secs ({}) must not exceed cache.staleness_threshold_secs ({})",
                cache.today_window_secs, cache.staleness_threshold_secs
            )));
        }
        if cache.ticket_file.trim().is_empty() || cache.call_file.trim().is_empty() {
            return Err(ConfigError::Message("cache file names must not be empty".into()));
        }
        if cache.ticket_file == cache.call_file {
            return Err(ConfigError::Message(
                "ticket and call caches must use different files".into(),
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "support-analytics".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Zendesk API settings.
///
/// The token itself never lives in the file; `api_token_env` names the
/// environment variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZendeskSettings {
    pub subdomain: String,
    pub email: String,
    pub api_token_env: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// How Talk calls are split into answered and unanswered
    pub call_classifier: CallClassifier,
}

impl Default for ZendeskSettings {
    fn default() -> Self {
        Self {
            subdomain: String::new(),
            email: String::new(),
            api_token_env: "ZENDESK_API_TOKEN".to_string(),
            timeout_secs: 30,
            base_url: None,
            call_classifier: CallClassifier::default(),
        }
    }
}

impl ZendeskSettings {
    /// Client configuration with an explicitly supplied token.
    pub fn client_config(&self, api_token: String) -> ZendeskConfig {
        let config = ZendeskConfig::new(self.subdomain.clone(), self.email.clone(), api_token)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Analytics cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub directory: PathBuf,
    pub ticket_file: String,
    pub call_file: String,
    /// Max age of a past day's entry
    pub staleness_threshold_secs: u64,
    /// Max age of today's entry
    pub today_window_secs: u64,
    /// Pause between upstream fetches in a window
    pub fetch_delay_ms: u64,
    pub on_fetch_error: FetchFailureMode,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("cache"),
            ticket_file: "ticket-analytics-cache.json".to_string(),
            call_file: "call-analytics-cache.json".to_string(),
            staleness_threshold_secs: 24 * 60 * 60,
            today_window_secs: 15 * 60,
            fetch_delay_ms: 250,
            on_fetch_error: FetchFailureMode::Substitute,
        }
    }
}

impl CacheSettings {
    pub fn ticket_path(&self) -> PathBuf {
        self.directory.join(&self.ticket_file)
    }

    pub fn call_path(&self) -> PathBuf {
        self.directory.join(&self.call_file)
    }

    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(
            chrono::Duration::seconds(self.staleness_threshold_secs as i64),
            chrono::Duration::seconds(self.today_window_secs as i64),
        )
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_windows() {
        let policy = CacheSettings::default().freshness_policy();
        assert_eq!(policy, FreshnessPolicy::default());
    }

    #[test]
    fn test_cache_paths() {
        let settings = CacheSettings {
            directory: PathBuf::from("/var/cache/analytics"),
            ..Default::default()
        };
        assert_eq!(
            settings.call_path(),
            PathBuf::from("/var/cache/analytics/call-analytics-cache.json")
        );
    }

    #[test]
    fn test_validate_rejects_shared_file() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.cache.call_file = config.cache.ticket_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_windows() {
        let mut config = AppConfig::default();
        config.cache.staleness_threshold_secs = MAX_FRESHNESS_WINDOW_SECS;
        assert!(config.validate().is_ok());

        config.cache.staleness_threshold_secs = u64::MAX;
        assert!(config.validate().is_err());

        config.cache.staleness_threshold_secs = MAX_FRESHNESS_WINDOW_SECS + 1;
        config.cache.today_window_secs = 900;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_config_uses_base_url() {
        let settings = ZendeskSettings {
            subdomain: "acme".into(),
            base_url: Some("http://localhost:9000".into()),
            ..Default::default()
        };
        let config = settings.client_config("token".into());
        assert_eq!(config.base_url(), "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
