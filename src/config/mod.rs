use crate::playbook::{OutcomeRule, ReportOptions, WeekStart, DEFAULT_TOP_N};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub playbook: PlaybookConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            playbook: PlaybookConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied to every playbook report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybookConfig {
    pub top_n: usize,
    pub week_start: WeekStart,
    pub outcome_rule: OutcomeRule,
}

impl Default for PlaybookConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            week_start: WeekStart::default(),
            outcome_rule: OutcomeRule::default(),
        }
    }
}

impl PlaybookConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("PLAYBOOK_TOP_N") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|top_n| *top_n > 0);
            config.top_n = parsed.ok_or(ConfigError::InvalidTopN { value })?;
        }

        if let Ok(value) = env::var("PLAYBOOK_WEEK_START") {
            config.week_start = value
                .parse()
                .map_err(|reason| ConfigError::InvalidWeekStart { reason })?;
        }

        if let Ok(value) = env::var("PLAYBOOK_OUTCOME_RULE") {
            config.outcome_rule = value
                .parse()
                .map_err(|reason| ConfigError::InvalidOutcomeRule { reason })?;
        }

        Ok(config)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_n: self.top_n,
            week_start: self.week_start,
            outcome_rule: self.outcome_rule,
            ..ReportOptions::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTopN { value: String },
    InvalidWeekStart { reason: String },
    InvalidOutcomeRule { reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTopN { value } => {
                write!(f, "PLAYBOOK_TOP_N must be a positive integer (found '{value}')")
            }
            ConfigError::InvalidWeekStart { reason } => {
                write!(f, "PLAYBOOK_WEEK_START is invalid: {reason}")
            }
            ConfigError::InvalidOutcomeRule { reason } => {
                write!(f, "PLAYBOOK_OUTCOME_RULE is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTopN { .. }
            | ConfigError::InvalidWeekStart { .. }
            | ConfigError::InvalidOutcomeRule { .. } => None,
        }
    }
}

/// Serializes tests that read or mutate process environment variables.
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}
