// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment exactly once at startup and
//! turned into typed structs. Any invalid value is fatal: the process must
//! refuse to start rather than run with an undefined or weak signing key.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret (raw UTF-8 or `base64:<data>`) | Required |
//! | `JWT_EXPIRATION_SECS` | Token lifetime in seconds | Required |
//! | `USERS_FILE` | Path to the JSON user list | None (empty store) |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine};
use ring::rand::{SecureRandom, SystemRandom};

/// Environment variable holding the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable holding the token lifetime in seconds.
pub const JWT_EXPIRATION_ENV: &str = "JWT_EXPIRATION_SECS";

/// Environment variable pointing at the JSON user list.
pub const USERS_FILE_ENV: &str = "USERS_FILE";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Minimum HS256 key length in bytes (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Prefix marking a base64-encoded secret in `JWT_SECRET`.
const BASE64_PREFIX: &str = "base64:";

/// Startup configuration errors. All of them abort the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("signing secret is {len} bytes, at least 32 bytes are required for HS256")]
    SecretTooShort { len: usize },

    #[error("signing secret is not valid base64: {0}")]
    InvalidSecretEncoding(String),

    #[error("token lifetime must be a positive number of seconds, got {0:?}")]
    InvalidLifetime(String),

    #[error("could not generate a random signing secret")]
    KeyGeneration,

    #[error("failed to read users file {path}: {source}")]
    UsersFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("users file is not valid: {0}")]
    UsersFormat(String),

    #[error("user {0:?} is defined more than once")]
    DuplicateUser(String),

    #[error("invalid bind address: {0}")]
    InvalidBind(String),
}

// =============================================================================
// Signing Secret
// =============================================================================

/// Symmetric HS256 signing key.
///
/// Length is checked on construction, so a `SigningSecret` that exists is
/// always long enough. The bytes never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw key bytes, rejecting keys shorter than 256 bits.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    /// Parse the `JWT_SECRET` value.
    ///
    /// A `base64:` prefix selects standard base64 decoding; anything else is
    /// taken as the UTF-8 bytes of the string itself.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.strip_prefix(BASE64_PREFIX) {
            Some(encoded) => {
                let bytes = STANDARD
                    .decode(encoded.trim())
                    .map_err(|e| ConfigError::InvalidSecretEncoding(e.to_string()))?;
                Self::new(bytes)
            }
            None => Self::new(raw.as_bytes()),
        }
    }

    /// Generate a fresh random 256-bit secret from the OS RNG.
    pub fn generate() -> Result<Self, ConfigError> {
        let mut bytes = [0u8; MIN_SECRET_BYTES];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| ConfigError::KeyGeneration)?;
        Self::new(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render in the form accepted by [`SigningSecret::parse`].
    pub fn to_env_value(&self) -> String {
        format!("{BASE64_PREFIX}{}", STANDARD.encode(&self.0))
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

// =============================================================================
// Typed Configuration
// =============================================================================

/// Token issuance settings consumed by the token service.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: SigningSecret,
    pub lifetime_secs: u64,
}

impl TokenConfig {
    pub fn new(secret: SigningSecret, lifetime_secs: u64) -> Result<Self, ConfigError> {
        if lifetime_secs == 0 || i64::try_from(lifetime_secs).is_err() {
            return Err(ConfigError::InvalidLifetime(lifetime_secs.to_string()));
        }
        Ok(Self {
            secret,
            lifetime_secs,
        })
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidBind(format!("host {:?}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Read `LOG_FORMAT` on its own, so logging can start before the rest
    /// of the configuration is validated.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: TokenConfig,
    pub server: ServerConfig,
    pub users_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let secret = SigningSecret::parse(&secret)?;

        let lifetime = lookup(JWT_EXPIRATION_ENV).ok_or(ConfigError::Missing(JWT_EXPIRATION_ENV))?;
        let lifetime_secs = lifetime
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidLifetime(lifetime.clone()))?;
        let token = TokenConfig::new(secret, lifetime_secs)?;

        let mut server = ServerConfig::default();
        if let Some(host) = lookup(HOST_ENV) {
            server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBind(format!("port {port:?}")))?;
        }
        server.socket_addr()?;

        Ok(Self {
            token,
            server,
            users_file: lookup(USERS_FILE_ENV).map(PathBuf::from),
            log_format: lookup(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        })
    }
}
