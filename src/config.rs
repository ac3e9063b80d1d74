use std::time::Duration;

use crate::error::IngestError;
use crate::rate::is_currency_code;

pub const DEFAULT_API_URL: &str = "https://v6.exchangerate-api.com";
pub const DEFAULT_BASE_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_key: String,
    pub base_currency: String,
    pub api_base_url: String,
    pub http_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database.name)
            .field("host", &self.database.host)
            .field("port", &self.database.port)
            .field("base_currency", &self.base_currency)
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout", &self.http_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, IngestError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, IngestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("APIKEY").ok_or_else(|| config_error("APIKEY must be set"))?;
        let port = parse_var(var("PORT"), "PORT", 3336)?;
        let timeout_secs = parse_var(var("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", 30u64)?;
        if timeout_secs == 0 {
            return Err(config_error("HTTP_TIMEOUT_SECS must be greater than zero"));
        }

        let base_currency = var("BASE_CURRENCY")
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string())
            .to_ascii_uppercase();
        if !is_currency_code(&base_currency) {
            return Err(config_error(&format!(
                "BASE_CURRENCY '{base_currency}' is not a three letter currency code"
            )));
        }

        Ok(Self {
            database: DatabaseConfig {
                name: var("DBNAME").unwrap_or_else(|| "database".to_string()),
                host: var("HOST").unwrap_or_else(|| "localhost".to_string()),
                port,
                user: var("USER"),
                password: var("PASSWORD"),
            },
            api_key,
            base_currency,
            api_base_url: var("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
    default: T,
) -> Result<T, IngestError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| config_error(&format!("{key} has invalid value '{v}'"))),
        None => Ok(default),
    }
}

fn config_error(msg: &str) -> IngestError {
    IngestError::Config(msg.to_string())
}
