// Configuration module for the Simtr gateway

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that points at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "SIMTR_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ai: ProviderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Largest JSON body accepted by the task endpoints, in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            body_limit: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    51763
}

fn default_cors_origins() -> Vec<String> {
    [
        "http://localhost:59771",
        "http://localhost:5173",
        "http://localhost:3000",
        "http://127.0.0.1:59771",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:3000",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

/// Process-wide provider settings. Read-only once the server is up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_supported_providers")]
    pub supported_providers: Vec<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            supported_providers: default_supported_providers(),
            request_timeout_secs: default_request_timeout_secs(),
            base_url: default_base_url(),
        }
    }
}

impl ProviderConfig {
    /// Exact, case-sensitive membership in the supported-provider set.
    pub fn is_supported(&self, provider: &str) -> bool {
        self.supported_providers.iter().any(|p| p == provider)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_supported_providers() -> Vec<String> {
    vec!["Gemini".to_string()]
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for session log files. Defaults to `logs/` next to the executable.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Parse a YAML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config at `path`, writing the defaults there first if it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let default_config = AppConfig::default();
        let content = serde_yaml::to_string(&default_config)?;
        std::fs::write(path, content)?;

        tracing::info!("Wrote default config to {:?}", path);
        Ok(default_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.ai.supported_providers.is_empty() {
            bail!("ai.supported-providers must list at least one provider");
        }
        if self.ai.request_timeout_secs == 0 {
            bail!("ai.request-timeout-secs must be greater than zero");
        }
        for origin in &self.server.cors_origins {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{}'", origin))?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `$SIMTR_CONFIG` if set, otherwise `<config dir>/simtr/config.yaml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simtr")
        .join("config.yaml")
}
