use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub extraction: ExtractionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let cors_origins = env::var("APP_CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let upload_limit_bytes = match env::var("APP_UPLOAD_LIMIT_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber("APP_UPLOAD_LIMIT_BYTES"))?,
            Err(_) => DEFAULT_UPLOAD_LIMIT_BYTES,
        };

        let index_html = PathBuf::from(
            env::var("APP_INDEX_HTML").unwrap_or_else(|_| "index.html".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let timeout_secs = match env::var("OPENAI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber("OPENAI_TIMEOUT_SECS"))?,
            Err(_) => 120,
        };
        let max_tokens = match env::var("OPENAI_MAX_TOKENS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidNumber("OPENAI_MAX_TOKENS"))?,
            Err(_) => 4000,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origins,
                upload_limit_bytes,
                index_html,
            },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            extraction: ExtractionConfig {
                api_key,
                base_url,
                model,
                timeout: Duration::from_secs(timeout_secs),
                max_tokens,
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub upload_limit_bytes: usize,
    pub index_html: PathBuf,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Connection settings for the hosted vision model.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl ExtractionConfig {
    /// The key is optional for offline commands but mandatory once the server starts.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber(&'static str),
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber(name) => {
                write!(f, "{name} must be a non-negative integer")
            }
            ConfigError::MissingApiKey => {
                write!(f, "OPENAI_API_KEY environment variable not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber(_)
            | ConfigError::MissingApiKey => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "APP_CORS_ORIGINS",
            "APP_UPLOAD_LIMIT_BYTES",
            "APP_INDEX_HTML",
            "OPENAI_API_KEY",
            "OPENAI_BASE_URL",
            "OPENAI_MODEL",
            "OPENAI_TIMEOUT_SECS",
            "OPENAI_MAX_TOKENS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.server.upload_limit_bytes, 10 * 1024 * 1024);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.extraction.model, "gpt-4o");
        assert_eq!(config.extraction.max_tokens, 4000);
        assert_eq!(config.extraction.timeout, Duration::from_secs(120));
        assert!(matches!(
            config.extraction.require_api_key(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8000));
        reset_env();
    }

    #[test]
    fn parses_origin_list_and_api_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "APP_CORS_ORIGINS",
            "https://rates.example.com, ,http://localhost:5173",
        );
        env::set_var("OPENAI_API_KEY", "sk-test");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.server.cors_origins,
            vec![
                "https://rates.example.com".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
        assert_eq!(config.extraction.require_api_key().expect("key"), "sk-test");
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_limits() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_UPLOAD_LIMIT_BYTES", "ten megabytes");
        let error = AppConfig::load().expect_err("limit must be numeric");
        assert!(matches!(
            error,
            ConfigError::InvalidNumber("APP_UPLOAD_LIMIT_BYTES")
        ));
        reset_env();
    }
}
