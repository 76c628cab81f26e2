use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::{Config, TransportKind};

/// Default project configuration file
pub const DEFAULT_CONFIG_PATH: &str = ".graph-bridge/config.yaml";

/// Optional local overrides, merged on top of the project file
pub const LOCAL_CONFIG_PATH: &str = ".graph-bridge/local.yaml";

/// Prefix of environment overrides; nested keys are split on `__`
pub const ENV_PREFIX: &str = "GRAPH_BRIDGE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid default_temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("Socket transport requires both transport.host and transport.port")]
    MissingSocketAddress,

    #[error("provider.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the default locations
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .graph-bridge/config.yaml
    /// 3. .graph-bridge/local.yaml (optional)
    /// 4. Environment variables (GRAPH_BRIDGE_* prefix)
    pub fn load() -> Result<Config> {
        Self::load_with(None)
    }

    /// Same hierarchy as [`ConfigLoader::load`], with `path` standing in for the
    /// project file when given.
    pub fn load_with(path: Option<&Path>) -> Result<Config> {
        let project = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(project))
            .merge(Yaml::file(LOCAL_CONFIG_PATH))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.agent.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(config.agent.max_iterations));
        }

        let temperature = config.agent.default_temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }

        if config.transport.kind == TransportKind::Socket
            && (config.transport.host.as_deref().is_none_or(str::is_empty)
                || config.transport.port.is_none())
        {
            return Err(ConfigError::MissingSocketAddress);
        }

        if config.provider.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EarlyStopping, LogFormat};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_KEYS: [&str; 3] = [
        "GRAPH_BRIDGE_AGENT__MAX_ITERATIONS",
        "GRAPH_BRIDGE_CHANNEL__STRICT_FRAMING",
        "GRAPH_BRIDGE_TRANSPORT__KIND",
    ];

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cleared_env() -> Vec<(&'static str, Option<&'static str>)> {
        ENV_KEYS.iter().map(|key| (*key, None)).collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.agent.max_iterations, 20);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        temp_env::with_vars(cleared_env(), || {
            let missing = Path::new("/nonexistent/graph-bridge.yaml");
            let config = ConfigLoader::load_with(Some(missing)).unwrap();
            assert_eq!(config.agent.max_iterations, 20);
            assert_eq!(config.transport.kind, TransportKind::Stdio);
        });
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let file = yaml_file(
            r"
agent:
  max_iterations: 7
  early_stopping: generate
logging:
  level: debug
  format: pretty
",
        );

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.agent.max_iterations, 7);
        assert_eq!(config.agent.early_stopping, EarlyStopping::Generate);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.channel.receive_timeout_secs, 300);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = yaml_file("agent:\n  max_iterations: 7\n");

        temp_env::with_vars(
            [
                ("GRAPH_BRIDGE_AGENT__MAX_ITERATIONS", Some("3")),
                ("GRAPH_BRIDGE_CHANNEL__STRICT_FRAMING", Some("true")),
                ("GRAPH_BRIDGE_TRANSPORT__KIND", None),
            ],
            || {
                let config = ConfigLoader::load_with(Some(file.path())).unwrap();
                assert_eq!(config.agent.max_iterations, 3);
                assert!(config.channel.strict_framing);
            },
        );
    }

    #[test]
    fn test_env_socket_without_address_is_rejected() {
        temp_env::with_vars(
            [
                ("GRAPH_BRIDGE_AGENT__MAX_ITERATIONS", None),
                ("GRAPH_BRIDGE_CHANNEL__STRICT_FRAMING", None),
                ("GRAPH_BRIDGE_TRANSPORT__KIND", Some("socket")),
            ],
            || {
                let missing = Path::new("/nonexistent/graph-bridge.yaml");
                let err = ConfigLoader::load_with(Some(missing)).unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<ConfigError>(),
                    Some(ConfigError::MissingSocketAddress)
                ));
            },
        );
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let file = yaml_file("agent: [not, a, map");
        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        let mut config = Config::default();
        config.agent.max_iterations = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxIterations(0))
        ));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.agent.default_temperature = 2.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_validate_socket_with_address() {
        let mut config = Config::default();
        config.transport.kind = TransportKind::Socket;
        config.transport.host = Some("127.0.0.1".to_string());
        config.transport.port = Some(7000);
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_invalid_backoff() {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 5000;
        config.retry.max_backoff_ms = 1000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(5000, 1000))
        ));
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.provider.base_url = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyBaseUrl)
        ));
    }
}
