use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the bridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Channel to the host
    #[serde(default)]
    pub transport: TransportConfig,

    /// Framing and receive behaviour
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Chat-completion provider endpoint
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Retry policy for provider calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which transport variant the process uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Stdio,
    Socket,
}

/// Transport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransportConfig {
    #[serde(default)]
    pub kind: TransportKind,

    /// Socket host (socket transport only)
    #[serde(default)]
    pub host: Option<String>,

    /// Socket port (socket transport only)
    #[serde(default)]
    pub port: Option<u16>,
}

/// Framing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChannelConfig {
    /// Seconds to wait for a complete frame; 0 waits forever
    #[serde(default = "default_receive_timeout_secs")]
    pub receive_timeout_secs: u64,

    /// Fail with `IncompleteFrame` instead of returning a partial payload on EOF
    #[serde(default)]
    pub strict_framing: bool,
}

const fn default_receive_timeout_secs() -> u64 {
    300
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            receive_timeout_secs: default_receive_timeout_secs(),
            strict_framing: false,
        }
    }
}

/// What the loop returns once the iteration cap is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarlyStopping {
    /// Return a fixed summary
    #[default]
    Force,
    /// Ask the engine once more, without tools, for a final summary
    Generate,
}

/// Kind of terminal envelope written after a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    #[default]
    Response,
    Exit,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentConfig {
    /// Maximum reasoning/tool iterations per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    #[serde(default)]
    pub early_stopping: EarlyStopping,

    /// Model used when the request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Temperature used when the request does not set one
    #[serde(default)]
    pub default_temperature: f32,

    /// Completion token limit per engine call
    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub reply_kind: ReplyKind,
}

const fn default_max_iterations() -> u32 {
    20
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            early_stopping: EarlyStopping::default(),
            default_model: default_model(),
            default_temperature: 0.0,
            max_tokens: None,
            reply_kind: ReplyKind::default(),
        }
    }
}

/// Provider endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

const fn default_provider_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console format (console output always goes to stderr)
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling JSON log files; none disables file output
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
