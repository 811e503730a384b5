//! Configuration management for mcp-gateway.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ServerConfig;
use crate::cli::Args;
use crate::dispatch::DispatcherConfig;
use crate::provider::{GitHubConfig, DEFAULT_API_BASE_URL};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Upstream provider configuration.
    pub provider: ProviderSection,
    /// Session lifetime configuration.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable graceful shutdown.
    pub graceful_shutdown: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown: true,
        }
    }
}

/// Provider configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// GitHub REST API base URL.
    pub api_base_url: String,
    /// Timeout for each provider call, in seconds.
    pub timeout_secs: u64,
    /// User-Agent sent to GitHub.
    pub user_agent: String,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!("mcp-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Session configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Idle lifetime in seconds; 0 keeps sessions until disconnect.
    pub idle_timeout_secs: u64,
    /// How often idle sessions are swept, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("MCP_GATEWAY_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("MCP_GATEWAY_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.parse().ok())
        {
            self.server.port = port;
        }

        if let Some(url) = lookup("MCP_GATEWAY_GITHUB_API_URL") {
            self.provider.api_base_url = url;
        }

        if let Some(secs) = lookup("MCP_GATEWAY_PROVIDER_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.provider.timeout_secs = secs;
        }

        if let Some(secs) = lookup("MCP_GATEWAY_SESSION_TTL").and_then(|s| s.parse().ok()) {
            self.session.idle_timeout_secs = secs;
        }

        if let Some(level) = lookup("MCP_GATEWAY_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref url) = args.github_api_url {
            self.provider.api_base_url = url.clone();
        }
        if let Some(secs) = args.provider_timeout {
            self.provider.timeout_secs = secs;
        }
        if let Some(secs) = args.session_ttl {
            self.session.idle_timeout_secs = secs;
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Check values that have no meaningful zero or empty form.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "provider.timeout_secs",
                "must be greater than zero".into(),
            ));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "session.sweep_interval_secs",
                "must be greater than zero".into(),
            ));
        }
        let url = &self.provider.api_base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "provider.api_base_url",
                format!("not an http(s) URL: {}", url),
            ));
        }
        Ok(())
    }

    /// Convert to ServerConfig for the API server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        let server_config = ServerConfig::new(host.to_string(), self.server.port);
        Ok(if self.server.graceful_shutdown {
            server_config
        } else {
            server_config.without_graceful_shutdown()
        })
    }

    /// Settings for the command dispatcher.
    pub fn to_dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            provider_timeout: self.provider_timeout(),
        }
    }

    /// Settings for the GitHub REST client.
    pub fn github_config(&self) -> GitHubConfig {
        GitHubConfig {
            user_agent: self.provider.user_agent.clone(),
            ..GitHubConfig::default()
        }
        .with_base_url(self.provider.api_base_url.trim_end_matches('/'))
        .with_timeout(self.provider_timeout())
    }

    /// Idle session lifetime, or `None` when expiry is disabled.
    pub fn session_ttl(&self) -> Option<Duration> {
        match self.session.idle_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session.sweep_interval_secs)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }

    fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid host address.
    InvalidHost(String),
    /// Out-of-range or malformed setting.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: {}", host),
            Self::InvalidValue(key, reason) => write!(f, "invalid {}: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}
