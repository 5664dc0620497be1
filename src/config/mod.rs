use std::env;
use std::str::FromStr;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/tickethub";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_JWT_EXPIRATION_SECS: i64 = 86_400;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_secs: i64,
    pub cors_allowed_origins: String,
    /// `RUST_ENV=production`; turns on HSTS.
    pub production: bool,
    pub allow_admin_registration: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            port: parsed("PORT", DEFAULT_PORT)?,
            jwt_secret,
            jwt_expiration_secs: parsed("JWT_EXPIRATION_SECS", DEFAULT_JWT_EXPIRATION_SECS)?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            production: env::var("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
            allow_admin_registration: flag("ALLOW_ADMIN_REGISTRATION")?,
        })
    }

    /// Development settings with the given signing secret; used by tests.
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            port: DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            jwt_expiration_secs: DEFAULT_JWT_EXPIRATION_SECS,
            cors_allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            production: false,
            allow_admin_registration: false,
        }
    }
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}

fn flag(key: &'static str) -> Result<bool, ConfigError> {
    match env::var(key).map(|v| v.trim().to_lowercase()) {
        Ok(value) => match value.as_str() {
            "" | "false" | "0" | "no" => Ok(false),
            "true" | "1" | "yes" => Ok(true),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = Config::for_secret("secret");
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.jwt_expiration_secs, 86_400);
        assert!(!config.production);
        assert!(!config.allow_admin_registration);
    }

    #[test]
    fn test_unset_values_fall_back() {
        assert_eq!(parsed("TICKETHUB_TEST_UNSET_NUMBER", 7u32).unwrap(), 7);
        assert!(!flag("TICKETHUB_TEST_UNSET_FLAG").unwrap());
    }
}
