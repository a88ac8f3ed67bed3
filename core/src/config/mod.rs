//! TOML Configuration File Support
//!
//! Client configuration lives at `~/.config/pongterm/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables (`PONGTERM_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! api_url = "https://pong.example.org/api/"
//! ws_url = "wss://pong.example.org/ws"
//!
//! [transport]
//! timeout_ms = 5000
//! max_payload_bytes = 30000
//!
//! [display]
//! cell_aspect_ratio = 0.5
//!
//! [logging]
//! file = "/tmp/pongterm.log"
//! filter = "pongterm=debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default REST base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/";
/// Default socket URL
pub const DEFAULT_WS_URL: &str = "ws://localhost:3000/ws";
/// Default bound on a single socket read/write or HTTP call
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
/// Default largest accepted payload
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 30_000;

const API_URL_MIN_LEN: usize = 5;
const API_URL_MAX_LEN: usize = 500;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Where the highest-priority value of a configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    Cli,
    Env,
    File,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[server]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerToml {
    /// REST base URL
    pub api_url: Option<String>,
    /// Socket URL (`ws://` or `wss://`)
    pub ws_url: Option<String>,
}

/// `[transport]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportToml {
    /// Bound on each request and each socket read/write, in milliseconds
    pub timeout_ms: Option<u64>,
    /// Largest response or socket message accepted
    pub max_payload_bytes: Option<usize>,
}

/// `[display]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Cell width divided by cell height; measured from the terminal when unset
    pub cell_aspect_ratio: Option<f32>,
}

/// `[logging]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingToml {
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: Option<String>,
}

/// Root of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientToml {
    pub server: ServerToml,
    pub transport: TransportToml,
    pub display: DisplayToml,
    pub logging: LoggingToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Endpoints of the game service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Always ends with `/`
    pub api_url: String,
    pub ws_url: String,
}

/// Limits shared by the HTTP and socket transports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportSettings {
    pub timeout: Duration,
    pub max_payload_bytes: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

/// Fully resolved client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub transport: TransportSettings,
    pub cell_aspect_ratio: Option<f32>,
    pub log_file: Option<PathBuf>,
    pub log_filter: Option<String>,
    /// File the configuration was read from, if any
    pub config_file_path: Option<PathBuf>,
    /// `PONGTERM_*` variables that were set but could not be parsed, as
    /// name and raw value
    pub ignored_env: Vec<(&'static str, String)>,
    source: ConfigSource,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                api_url: DEFAULT_API_URL.to_string(),
                ws_url: DEFAULT_WS_URL.to_string(),
            },
            transport: TransportSettings::default(),
            cell_aspect_ratio: None,
            log_file: None,
            log_filter: None,
            config_file_path: None,
            ignored_env: Vec::new(),
            source: ConfigSource::Default,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Log file path, falling back to the platform data directory
    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(default_log_path)
    }

    /// Check and normalise the resolved values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an API URL outside
    /// 5–500 characters, a socket URL without a `ws`/`wss` scheme, or zero
    /// limits.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let api_len = self.server.api_url.len();
        if !(API_URL_MIN_LEN..=API_URL_MAX_LEN).contains(&api_len) {
            return Err(ConfigError::ValidationError(format!(
                "api_url must be {API_URL_MIN_LEN}-{API_URL_MAX_LEN} characters, got {api_len}"
            )));
        }
        if !self.server.api_url.ends_with('/') {
            self.server.api_url.push('/');
        }
        if !(self.server.ws_url.starts_with("ws://") || self.server.ws_url.starts_with("wss://")) {
            return Err(ConfigError::ValidationError(format!(
                "ws_url must start with ws:// or wss://, got {:?}",
                self.server.ws_url
            )));
        }
        if self.transport.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.transport.max_payload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "max_payload_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(ratio) = self.cell_aspect_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "cell_aspect_ratio must be a positive number, got {ratio}"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// `$XDG_CONFIG_HOME/pongterm/config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pongterm").join("config.toml"))
}

/// `$XDG_DATA_HOME/pongterm/pongterm.log`
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("pongterm").join("pongterm.log"))
}

/// Load configuration from a specific path and the process environment
///
/// A missing file is not an error; defaults are used. Nothing is logged
/// here since the caller usually installs its subscriber from the result.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_config = read_config_file(config_path)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ClientToml, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&content)?)
}

fn apply_toml_config(config: &mut ClientConfig, toml: &ClientToml) {
    if let Some(ref url) = toml.server.api_url {
        config.server.api_url = url.clone();
    }
    if let Some(ref url) = toml.server.ws_url {
        config.server.ws_url = url.clone();
    }
    if let Some(ms) = toml.transport.timeout_ms {
        config.transport.timeout = Duration::from_millis(ms);
    }
    if let Some(bytes) = toml.transport.max_payload_bytes {
        config.transport.max_payload_bytes = bytes;
    }
    if let Some(ratio) = toml.display.cell_aspect_ratio {
        config.cell_aspect_ratio = Some(ratio);
    }
    if let Some(ref file) = toml.logging.file {
        config.log_file = Some(file.clone());
    }
    if let Some(ref filter) = toml.logging.filter {
        config.log_filter = Some(filter.clone());
    }
}

/// Apply `PONGTERM_*` overrides read through `lookup`.
///
/// Unparsable numbers are skipped and recorded in
/// [`ClientConfig::ignored_env`] for the caller to report.
pub fn apply_env_config(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("PONGTERM_API_URL") {
        config.server.api_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(url) = lookup("PONGTERM_WS_URL") {
        config.server.ws_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(value) = lookup("PONGTERM_TIMEOUT_MS") {
        match value.parse::<u64>() {
            Ok(ms) => {
                config.transport.timeout = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => config.ignored_env.push(("PONGTERM_TIMEOUT_MS", value)),
        }
    }
    if let Some(value) = lookup("PONGTERM_MAX_PAYLOAD_BYTES") {
        match value.parse::<usize>() {
            Ok(bytes) => {
                config.transport.max_payload_bytes = bytes;
                config.source = ConfigSource::Env;
            }
            Err(_) => config.ignored_env.push(("PONGTERM_MAX_PAYLOAD_BYTES", value)),
        }
    }
    if let Some(value) = lookup("PONGTERM_CELL_ASPECT") {
        match value.parse::<f32>() {
            Ok(ratio) => {
                config.cell_aspect_ratio = Some(ratio);
                config.source = ConfigSource::Env;
            }
            Err(_) => config.ignored_env.push(("PONGTERM_CELL_ASPECT", value)),
        }
    }
    if let Some(path) = lookup("PONGTERM_LOG_FILE") {
        config.log_file = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values given on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub ws_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl ConfigOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = Some(url);
        self
    }

    #[must_use]
    pub fn with_ws_url(mut self, url: String) -> Self {
        self.ws_url = Some(url);
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut ClientConfig) {
        if self.api_url.is_some() || self.ws_url.is_some() || self.timeout_ms.is_some() {
            config.source = ConfigSource::Cli;
        }
        if let Some(ref url) = self.api_url {
            config.server.api_url = url.clone();
        }
        if let Some(ref url) = self.ws_url {
            config.server.ws_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.transport.timeout = Duration::from_millis(ms);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
