//! Configuration module for Truckshift
//!
//! Everything is read from environment variables, the way the hosting
//! platform supplies them. `from_lookup` takes any getter so tests never
//! touch the process environment.

use email_address::EmailAddress;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use super::errors::{AppError, AppResult};
use crate::utils::constants::*;

/// Deployment mode (FLASK_ENV / APP_ENV)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    fn parse(raw: &str) -> AppResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" | "local" => Ok(Self::Development),
            other => Err(AppError::invalid_config(
                ENV_FLASK_ENV,
                format!("unknown mode '{}' (expected production or development)", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

/// Outbound mail settings
#[derive(Debug, Clone, Default)]
pub struct SmtpConfig {
    pub server: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: Option<String>,
}

impl SmtpConfig {
    /// Names of the mail settings that are still unset
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.server.is_none() {
            missing.push(ENV_SMTP_SERVER);
        }
        if self.username.is_none() {
            missing.push(ENV_SMTP_USERNAME);
        }
        if self.password.is_none() {
            missing.push(ENV_SMTP_PASSWORD);
        }
        if self.from_email.is_none() {
            missing.push(ENV_FROM_EMAIL);
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// Never logged
    pub secret_key: String,
    pub smtp: SmtpConfig,
    pub admin_emails: Vec<String>,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub truck_name: String,
    pub truck_location: String,
    pub rate_limit_per_minute: u32,
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable getter
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset; dashboards often save blanks
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get(ENV_APP_ENV).or_else(|| get(ENV_FLASK_ENV)) {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::Development,
        };

        let secret_key = match get(ENV_SECRET_KEY) {
            Some(key) => {
                if environment == Environment::Production && key.len() < MIN_SECRET_KEY_LEN {
                    return Err(AppError::invalid_config(
                        ENV_SECRET_KEY,
                        format!("must be at least {} characters", MIN_SECRET_KEY_LEN),
                    ));
                }
                key
            }
            None if environment == Environment::Production => {
                return Err(AppError::missing_env(ENV_SECRET_KEY));
            }
            None => DEV_SECRET_KEY.to_string(),
        };

        let smtp = SmtpConfig {
            server: get(ENV_SMTP_SERVER),
            port: parse_or(get(ENV_SMTP_PORT), ENV_SMTP_PORT, DEFAULT_SMTP_PORT)?,
            username: get(ENV_SMTP_USERNAME),
            password: get(ENV_SMTP_PASSWORD),
            from_email: get(ENV_FROM_EMAIL),
        };
        if let Some(from) = &smtp.from_email {
            validate_email(ENV_FROM_EMAIL, from)?;
        }

        let admin_emails = match get(ENV_ADMIN_EMAILS) {
            Some(raw) => parse_admin_emails(&raw)?,
            None => Vec::new(),
        };

        // The platform's PORT always wins over the local override
        let port = match get(ENV_PORT) {
            Some(raw) => parse_or(Some(raw), ENV_PORT, DEFAULT_PORT)?,
            None => parse_or(get(ENV_LOCAL_PORT), ENV_LOCAL_PORT, DEFAULT_PORT)?,
        };

        let rate_limit_per_minute =
            parse_or(get(ENV_RATE_LIMIT), ENV_RATE_LIMIT, DEFAULT_RATE_LIMIT_PER_MINUTE)?;
        if rate_limit_per_minute == 0 {
            return Err(AppError::invalid_config(ENV_RATE_LIMIT, "must be greater than 0"));
        }

        Ok(Self {
            environment,
            secret_key,
            smtp,
            admin_emails,
            host: get(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: get(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            truck_name: get(ENV_TRUCK_NAME).unwrap_or_else(|| DEFAULT_TRUCK_NAME.to_string()),
            truck_location: get(ENV_TRUCK_LOCATION)
                .unwrap_or_else(|| DEFAULT_TRUCK_LOCATION.to_string()),
            rate_limit_per_minute,
        })
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::invalid_config(ENV_HOST, e))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Log the effective settings without secrets
    pub fn log_summary(&self) {
        info!(
            mode = self.environment.as_str(),
            data_dir = %self.data_dir.display(),
            port = self.port,
            rate_limit = self.rate_limit_per_minute,
            "Configuration loaded"
        );
        info!(
            smtp_configured = self.smtp.is_configured(),
            admin_count = self.admin_emails.len(),
            "🔑 SECRET_KEY configured (value hidden)"
        );
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, name: &str, default: T) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e| AppError::invalid_config(name, format!("'{}': {}", value, e))),
        None => Ok(default),
    }
}

fn validate_email(name: &str, value: &str) -> AppResult<()> {
    EmailAddress::from_str(value)
        .map(|_| ())
        .map_err(|e| AppError::invalid_config(name, format!("'{}': {}", value, e)))
}

/// Split a comma-separated admin list, trimming entries and dropping blanks
pub fn parse_admin_emails(raw: &str) -> AppResult<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|email| {
            validate_email(ENV_ADMIN_EMAILS, email)?;
            Ok(email.to_string())
        })
        .collect()
}
