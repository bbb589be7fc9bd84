// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for SIIG.
//!
//! # Schema Structure
//!
//! ```text
//! SiigConfig
//! ├── server: ServerConfig
//! ├── security: SecurityConfig
//! │   └── token: TokenSettings
//! └── directory: DirectoryConfig
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use siig_api::auth::TokenConfig;
use siig_api::{ApiConfig, CorsConfig};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Default API port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default session token lifetime in seconds (7 days).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for SIIG.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiigConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Security configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Directory configuration.
    #[serde(default)]
    pub directory: DirectoryConfig,
}

impl SiigConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.security.validate()?;
        Ok(())
    }

    /// Builds the API server configuration.
    pub fn to_api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.server.host,
            port: self.server.port,
            cors: CorsConfig::for_origins(self.server.cors_origins.clone()),
            public_paths: self.server.public_paths.clone(),
            token: self.security.token.to_token_config(),
            request_timeout: self.server.request_timeout(),
        }
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins. `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Paths served without authentication.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_public_paths() -> Vec<String> {
    siig_api::config::DEFAULT_PUBLIC_PATHS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "cannot be zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "cannot be zero",
            ));
        }
        if let Some(path) = self.public_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::validation(
                "server.public_paths",
                format!("'{}' must start with '/'", path),
            ));
        }
        Ok(())
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_origins: default_cors_origins(),
            public_paths: default_public_paths(),
        }
    }
}

// =============================================================================
// Security Configuration
// =============================================================================

/// Security configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Session token settings.
    #[serde(default)]
    pub token: TokenSettings,
}

impl SecurityConfig {
    /// Validates the security configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.token.validate()
    }
}

/// Session token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSettings {
    /// Signing secret. Usually supplied as `${SIIG_TOKEN_SECRET}`.
    #[serde(default, skip_serializing)]
    pub secret: Option<SecretValue>,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub ttl_secs: u64,
}

fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl TokenSettings {
    /// Validates the signing key and lifetime.
    pub fn validate(&self) -> ConfigResult<()> {
        let Some(secret) = &self.secret else {
            return Err(ConfigError::missing_field("security.token.secret"));
        };
        if secret.expose().trim_start().starts_with("${") {
            return Err(ConfigError::validation(
                "security.token.secret",
                "unresolved environment placeholder",
            ));
        }
        if self.ttl_secs == 0 {
            return Err(ConfigError::validation(
                "security.token.ttl_secs",
                "cannot be zero",
            ));
        }
        self.to_token_config()
            .validate()
            .map_err(|e| ConfigError::validation("security.token.secret", e.to_string()))
    }

    /// Returns `true` if a secret is configured.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Returns the token lifetime as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Builds the codec configuration.
    pub fn to_token_config(&self) -> TokenConfig {
        let secret = self
            .secret
            .as_ref()
            .map(|s| s.expose().to_string())
            .unwrap_or_default();
        TokenConfig::new(secret).with_ttl(self.ttl())
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

// =============================================================================
// Directory Configuration
// =============================================================================

/// Directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Seed file loaded into the in-memory directory at startup.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string that never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

// =============================================================================
// Tests
// =============================================================================
