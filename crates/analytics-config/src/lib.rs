//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, CacheSettings, LoggingConfig, ZendeskSettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment prefix for overrides, e.g. `ANALYTICS__CACHE__FETCH_DELAY_MS`.
pub const ENV_PREFIX: &str = "ANALYTICS";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, true)
}

/// Like [`load_config`], but a missing file falls back to defaults.
pub fn load_config_optional(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, false)
}

fn build(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Render the default configuration as TOML.
pub fn default_config_toml() -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics_source::CallClassifier;
    use std::io::Write;

    fn write_toml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let file = write_toml(
            r#"
            [zendesk]
            subdomain = "acme"
            email = "ops@acme.test"

            [cache]
            today_window_secs = 600
            on_fetch_error = "abort"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.zendesk.subdomain, "acme");
        assert_eq!(config.zendesk.api_token_env, "ZENDESK_API_TOKEN");
        assert_eq!(config.cache.today_window_secs, 600);
        assert_eq!(config.cache.staleness_threshold_secs, 86_400);
        assert_eq!(
            config.cache.on_fetch_error,
            analytics_cache::FetchFailureMode::Abort
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/analytics.toml");
        assert!(load_config(path).is_err());

        let config = load_config_optional(path).unwrap();
        assert_eq!(config.cache.fetch_delay_ms, 250);
    }

    #[test]
    fn test_invalid_windows_are_rejected() {
        let file = write_toml(
            r#"
            [cache]
            staleness_threshold_secs = 60
            today_window_secs = 900
            "#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_default_toml_loads_back() {
        let rendered = default_config_toml().unwrap();
        assert!(rendered.contains("[cache]"));

        let file = write_toml(&rendered);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.cache.call_file, "call-analytics-cache.json");
        assert_eq!(config.zendesk.call_classifier, CallClassifier::CompletionStatus);
    }

    #[test]
    fn test_selects_call_classifier() {
        let file = write_toml(
            r#"
            [zendesk.call_classifier]
            kind = "talk_time"
            min_answered_secs = 20
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config.zendesk.call_classifier,
            CallClassifier::TalkTime { min_answered_secs: 20 }
        );
    }
}
