//! Application configuration
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;
use uuid::Uuid;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Console server host address
    pub host: String,
    /// Console server port
    pub port: u16,
    /// Base URL of the hosted backend (e.g. https://project.example.co)
    pub backend_url: String,
    /// Public API key sent as the `apikey` header
    pub backend_anon_key: String,
    /// Access token of the acting admin
    pub admin_access_token: String,
    /// User id of the acting admin
    pub admin_id: Uuid,
    /// Interval between statistics/complaint refreshes
    pub refresh_interval: Duration,
    /// Number of recent complaints shown on the dashboard
    pub recent_complaints_limit: usize,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Token protecting the console API; generated at startup when unset
    pub console_token: Option<String>,
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
    /// Environment (development/production)
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let backend_url = required("BACKEND_URL")?.trim_end_matches('/').to_string();
        if !backend_url.starts_with("https://") && !backend_url.starts_with("http://") {
            return Err(ConfigError::Invalid(format!(
                "BACKEND_URL must be an http(s) URL, got {}",
                backend_url
            )));
        }

        let admin_id = required("ADMIN_ID")?
            .parse::<Uuid>()
            .map_err(|e| ConfigError::Invalid(format!("ADMIN_ID is not a UUID: {}", e)))?;

        let refresh_secs = parse_or("REFRESH_INTERVAL_SECS", 30u64)?;
        if refresh_secs == 0 {
            return Err(ConfigError::Invalid(
                "REFRESH_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080u16)?,
            backend_url,
            backend_anon_key: required("BACKEND_ANON_KEY")?,
            admin_access_token: required("ADMIN_ACCESS_TOKEN")?,
            admin_id,
            refresh_interval: Duration::from_secs(refresh_secs),
            recent_complaints_limit: parse_or("RECENT_COMPLAINTS_LIMIT", 5usize)?,
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 10u64)?),
            console_token: env::var("CONSOLE_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| vec!["http://localhost:8080".to_string()]),
            environment,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(format!("{} is required", name)))
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
