//! Environment configuration

use std::env;
use std::net::SocketAddr;

use rust_decimal::Decimal;

use crate::pricing::steps::DEFAULT_TAX_RATE;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("PRICING_TAX_RATE must be a decimal between 0 and 1, got '{0}'")]
    InvalidTaxRate(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Flat tax rate applied by item quotes
    pub tax_rate: Decimal,
}

impl AppConfig {
    /// Load from `.env` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };

        let log_level = lookup("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let tax_rate = match lookup("PRICING_TAX_RATE") {
            Some(raw) => {
                let rate = raw
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|_| ConfigError::InvalidTaxRate(raw.clone()))?;
                if rate < Decimal::ZERO || rate > Decimal::ONE {
                    return Err(ConfigError::InvalidTaxRate(raw));
                }
                rate
            }
            None => DEFAULT_TAX_RATE,
        };

        Ok(Self {
            host,
            port,
            log_level,
            tax_rate,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = if self.host.eq_ignore_ascii_case("localhost") {
            "127.0.0.1"
        } else {
            self.host.as_str()
        };

        format!("{}:{}", host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}
