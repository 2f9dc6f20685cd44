use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::transport::authorization::QuotaConfig;

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
    pub quota: QuotaSettings,
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

        let quota = QuotaSettings::load()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            quota,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Environment overrides for the quota classification dials.
#[derive(Debug, Clone)]
pub struct QuotaSettings {
    pub unlimited_trip_threshold: u32,
    pub low_remaining_threshold: f64,
}

impl QuotaSettings {
    fn load() -> Result<Self, ConfigError> {
        let defaults = QuotaConfig::default();

        let unlimited_trip_threshold = match env::var("QUOTA_UNLIMITED_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidUnlimitedThreshold)?,
            Err(_) => defaults.unlimited_trip_threshold,
        };

        let low_remaining_threshold = match env::var("QUOTA_LOW_REMAINING") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or(ConfigError::InvalidLowRemaining)?,
            Err(_) => defaults.low_remaining_threshold,
        };

        Ok(Self {
            unlimited_trip_threshold,
            low_remaining_threshold,
        })
    }

    pub fn quota_config(&self) -> QuotaConfig {
        QuotaConfig {
            unlimited_trip_threshold: self.unlimited_trip_threshold,
            low_remaining_threshold: self.low_remaining_threshold,
            ..QuotaConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUnlimitedThreshold,
    InvalidLowRemaining,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUnlimitedThreshold => {
                write!(f, "QUOTA_UNLIMITED_THRESHOLD must be a positive integer")
            }
            ConfigError::InvalidLowRemaining => {
                write!(f, "QUOTA_LOW_REMAINING must be a non-negative number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
