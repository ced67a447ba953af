// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! All process-wide settings are read once at startup into a [`Config`] and
//! shared behind an `Arc`. Nothing else in the crate reads the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DEV` | `1` enables development mode | production |
//! | `SIGNING_KEY` | HMAC key for relay assertions | Required for production |
//! | `SECRET_TOKEN` | Session cookie signing secret | Required for production |
//! | `DATA_PATH` | Record store file | `labdb.redb` |
//! | `HOST` | Server bind address | `127.0.0.1` (dev), `0.0.0.0` (prod) |
//! | `PORT` | Server bind port | `3000` |
//! | `PROXY_TARGET` | Downstream origin override (dev only) | `localhost:3001` |
//! | `PUBLIC_SUFFIX` | Public host suffix replaced when forwarding | `.labdb.io` |
//! | `BACKEND_SUFFIX` | Internal host suffix used when forwarding | `-backend.labdb.io` |
//! | `GOOGLE_CLIENT_ID` | Client id the token audience must contain | registered app id |
//! | `IDENTITY_VERIFY_URL` | Token verification endpoint | Google tokeninfo |
//! | `SESSION_TTL_SECS` | Session lifetime in seconds | `1209600` (14 days) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=info` |

use std::net::SocketAddr;
use std::time::Duration;

pub const DEV_ENV: &str = "DEV";
pub const SIGNING_KEY_ENV: &str = "SIGNING_KEY";
pub const SECRET_TOKEN_ENV: &str = "SECRET_TOKEN";
pub const DATA_PATH_ENV: &str = "DATA_PATH";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PROXY_TARGET_ENV: &str = "PROXY_TARGET";
pub const PUBLIC_SUFFIX_ENV: &str = "PUBLIC_SUFFIX";
pub const BACKEND_SUFFIX_ENV: &str = "BACKEND_SUFFIX";
pub const CLIENT_ID_ENV: &str = "GOOGLE_CLIENT_ID";
pub const VERIFY_URL_ENV: &str = "IDENTITY_VERIFY_URL";
pub const SESSION_TTL_ENV: &str = "SESSION_TTL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEV_SIGNING_KEY: &str = "development-key";
const DEV_SECRET_TOKEN: &str = "development-token-00000000000000000000000000000000000000000000000";
const DEFAULT_DATA_PATH: &str = "labdb.redb";
const DEFAULT_PORT: u16 = 3000;
const DEV_PROXY_TARGET: &str = "localhost:3001";
const DEFAULT_PUBLIC_SUFFIX: &str = ".labdb.io";
const DEFAULT_BACKEND_SUFFIX: &str = "-backend.labdb.io";
const DEFAULT_CLIENT_ID: &str =
    "146923434465-alq7iagpanjvoag20smuirj0ivdtfldk.apps.googleusercontent.com";
const DEFAULT_VERIFY_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 14);

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dev,
    Prod,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    MissingSecret(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub signing_key: String,
    pub session_secret: String,
    pub data_path: String,
    pub listen_addr: SocketAddr,
    /// Downstream origin (`host[:port]`) used instead of host substitution in dev.
    pub proxy_target: String,
    pub public_suffix: String,
    pub backend_suffix: String,
    pub client_id: String,
    pub verify_url: String,
    pub session_ttl: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let mode = if var(DEV_ENV).as_deref() == Some("1") {
            Mode::Dev
        } else {
            Mode::Prod
        };

        let secret = |name: &'static str, dev_default: &str| match mode {
            Mode::Dev => Ok(var(name).unwrap_or_else(|| dev_default.to_string())),
            Mode::Prod => var(name).ok_or(ConfigError::MissingSecret(name)),
        };
        let signing_key = secret(SIGNING_KEY_ENV, DEV_SIGNING_KEY)?;
        let session_secret = secret(SECRET_TOKEN_ENV, DEV_SECRET_TOKEN)?;

        let host = var(HOST_ENV).unwrap_or_else(|| match mode {
            Mode::Dev => "127.0.0.1".to_string(),
            Mode::Prod => "0.0.0.0".to_string(),
        });
        let port = match var(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let listen_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: host,
            })?;

        let session_ttl = match var(SESSION_TTL_ENV) {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| ConfigError::Invalid {
                name: SESSION_TTL_ENV,
                value: raw,
            })?),
            None => DEFAULT_SESSION_TTL,
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            mode,
            signing_key,
            session_secret,
            data_path: var(DATA_PATH_ENV).unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
            listen_addr,
            proxy_target: var(PROXY_TARGET_ENV).unwrap_or_else(|| DEV_PROXY_TARGET.to_string()),
            public_suffix: var(PUBLIC_SUFFIX_ENV)
                .unwrap_or_else(|| DEFAULT_PUBLIC_SUFFIX.to_string()),
            backend_suffix: var(BACKEND_SUFFIX_ENV)
                .unwrap_or_else(|| DEFAULT_BACKEND_SUFFIX.to_string()),
            client_id: var(CLIENT_ID_ENV).unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            verify_url: var(VERIFY_URL_ENV).unwrap_or_else(|| DEFAULT_VERIFY_URL.to_string()),
            session_ttl,
            log_format,
        })
    }

    /// Development configuration with all defaults applied.
    pub fn development() -> Self {
        Self::from_lookup(|name| (name == DEV_ENV).then(|| "1".to_string()))
            .expect("development defaults are valid")
    }

    pub fn is_prod(&self) -> bool {
        self.mode == Mode::Prod
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn development_uses_built_in_secrets() {
        let config = Config::development();
        assert_eq!(config.mode, Mode::Dev);
        assert_eq!(config.signing_key, DEV_SIGNING_KEY);
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
        assert_eq!(config.proxy_target, DEV_PROXY_TARGET);
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);
    }

    #[test]
    fn production_requires_signing_key() {
        let err = Config::from_lookup(lookup(&[(SECRET_TOKEN_ENV, "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(SIGNING_KEY_ENV)));
    }

    #[test]
    fn production_requires_session_secret() {
        let err = Config::from_lookup(lookup(&[(SIGNING_KEY_ENV, "k")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(SECRET_TOKEN_ENV)));
    }

    #[test]
    fn production_reads_all_values() {
        let config = Config::from_lookup(lookup(&[
            (SIGNING_KEY_ENV, "k"),
            (SECRET_TOKEN_ENV, "s"),
            (PORT_ENV, "8081"),
            (LOG_FORMAT_ENV, "json"),
            (SESSION_TTL_ENV, "60"),
        ]))
        .unwrap();
        assert!(config.is_prod());
        assert_eq!(config.signing_key, "k");
        assert_eq!(config.listen_addr, "0.0.0.0:8081".parse().unwrap());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.session_ttl, Duration::from_secs(60));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[(DEV_ENV, "1"), (PORT_ENV, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: PORT_ENV, .. }));
    }
}
