// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`Config`] loaded once at startup. A `.env` file in the working directory
//! is read first by `main` when present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret for all tokens | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `DATA_DIR` | Root directory for the document store | `./data` |
//! | `APP_ENV` | `production` turns on `Secure` cookies | `development` |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime | `60` |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh token and cookie lifetime | `2592000` (30 days) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use crate::auth::JwtSecret;
use crate::storage::paths::DATA_ROOT;
use crate::telemetry::LogFormat;

/// Environment variable holding the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable for the document store root.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable naming the deployment environment.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// Environment variable for the access token lifetime in seconds.
pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";

/// Environment variable for the refresh token lifetime in seconds.
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Access tokens are meant to be short-lived; one minute by default.
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60);

/// Refresh tokens (and the cookie carrying them) last 30 days by default.
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Configuration errors reported at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse `APP_ENV`. Anything other than `production` is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub environment: Environment,
    pub jwt_secret: JwtSecret,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Fails if `JWT_SECRET` is missing or empty, or if a numeric variable
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = match lookup(JWT_SECRET_ENV) {
            Some(secret) => JwtSecret::new(secret)?,
            None => return Err(ConfigError::Missing(JWT_SECRET_ENV)),
        };

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: lookup(DATA_DIR_ENV).unwrap_or_else(|| DATA_ROOT.to_string()),
            environment: lookup(APP_ENV_ENV)
                .map(|value| Environment::parse(&value))
                .unwrap_or_default(),
            jwt_secret,
            access_token_ttl: parse_ttl(&lookup, ACCESS_TOKEN_TTL_ENV, DEFAULT_ACCESS_TOKEN_TTL)?,
            refresh_token_ttl: parse_ttl(
                &lookup,
                REFRESH_TOKEN_TTL_ENV,
                DEFAULT_REFRESH_TOKEN_TTL,
            )?,
            log_format: lookup(LOG_FORMAT_ENV)
                .map(|value| LogFormat::parse(&value))
                .unwrap_or_default(),
        })
    }

    /// Socket address string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_ttl(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_secret_fails_fast() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing(JWT_SECRET_ENV));
    }

    #[test]
    fn empty_secret_fails_fast() {
        let result = Config::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "   ")]));
        assert_eq!(result.unwrap_err(), ConfigError::Empty(JWT_SECRET_ENV));
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "s3cret")])).unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_dir, DATA_ROOT);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.access_token_ttl, Duration::from_secs(60));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(2_592_000));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s3cret"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (DATA_DIR_ENV, "/var/lib/ideas"),
            (APP_ENV_ENV, "Production"),
            (ACCESS_TOKEN_TTL_ENV, "300"),
            (REFRESH_TOKEN_TTL_ENV, "604800"),
            (LOG_FORMAT_ENV, "json"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.data_dir, "/var/lib/ideas");
        assert!(config.environment.is_production());
        assert_eq!(config.access_token_ttl, Duration::from_secs(300));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s3cret"),
            (PORT_ENV, "eighty"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { var: PORT_ENV, .. })));

        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s3cret"),
            (ACCESS_TOKEN_TTL_ENV, "0"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { var: ACCESS_TOKEN_TTL_ENV, .. })
        ));
    }

    #[test]
    fn unknown_environment_is_development() {
        assert_eq!(Environment::parse("staging"), Environment::Development);
        assert_eq!(Environment::parse("production"), Environment::Production);
    }
}
