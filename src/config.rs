use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgConnectOptions;
use std::time::Duration;

// ============================================================================
// Configuration - loaded from the process environment
// ============================================================================
//
// Required: DB_USER, DB_PASS, INSTANCE_HOST, DB_PORT, DB_NAME
// Optional: DB_MAX_CONNECTIONS (10), SERVER_HOST (0.0.0.0),
//           SERVER_PORT (3000), REQUEST_TIMEOUT_SECS (5),
//           MAX_BODY_BYTES (4194304)
//
// A .env file in the working directory is read first if present.
//
// ============================================================================

pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection options for sqlx. Credentials are passed as fields, never spliced into a URL.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    /// Largest request body accepted; bigger bodies are answered with 413
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Read `.env` (if any) and then the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Ignoring unreadable .env file");
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let name = required("DB_NAME")?;
        validate_database_name(&name)?;

        let database = DatabaseConfig {
            user: required("DB_USER")?,
            password: Secret::new(required("DB_PASS")?),
            host: required("INSTANCE_HOST")?,
            port: parse("DB_PORT", &required("DB_PORT")?)?,
            name,
            max_connections: get("DB_MAX_CONNECTIONS")
                .map(|v| parse("DB_MAX_CONNECTIONS", &v))
                .transpose()?
                .unwrap_or(10),
        };

        let server = ServerConfig {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("SERVER_PORT")
                .map(|v| parse("SERVER_PORT", &v))
                .transpose()?
                .unwrap_or(3000),
            request_timeout: Duration::from_secs(
                get("REQUEST_TIMEOUT_SECS")
                    .map(|v| parse("REQUEST_TIMEOUT_SECS", &v))
                    .transpose()?
                    .unwrap_or(5),
            ),
            max_body_bytes: get("MAX_BODY_BYTES")
                .map(|v| parse("MAX_BODY_BYTES", &v))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        };

        if server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_BODY_BYTES",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self { database, server })
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

fn validate_database_name(name: &str) -> Result<(), ConfigError> {
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            var: "DB_NAME",
            reason: format!("{name:?} is not a plain database identifier"),
        })
    }
}
