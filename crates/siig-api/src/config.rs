// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Runtime settings for the HTTP surface.
//!
//! Deployments build this from `SiigConfig::to_api_config`; tests usually
//! start from [`ApiConfig::for_token`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::TokenConfig;

/// Paths served without a credential.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/api/health"];

/// Settings for the listener, middleware stack and token codec.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
    /// Cross-origin policy.
    pub cors: CorsConfig,
    /// Exact paths, or prefixes ending in `*`, that skip authentication.
    pub public_paths: Vec<String>,
    /// Signing key and default lifetime.
    pub token: TokenConfig,
    /// Requests running longer get a 408.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            cors: CorsConfig::default(),
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
            token: TokenConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Defaults everywhere except the signing key.
    pub fn for_token(token: TokenConfig) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Returns a copy listening on `port`.
    pub fn with_port(self, port: u16) -> Self {
        Self { port, ..self }
    }

    /// Where the listener binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Allowed browser origins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins such as `https://campus.edu`; `*` means any.
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime in seconds.
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::for_origins(vec!["*".to_string()])
    }
}

impl CorsConfig {
    /// Allows exactly `origins`.
    pub fn for_origins(origins: Vec<String>) -> Self {
        Self {
            allowed_origins: origins,
            max_age: 3600,
        }
    }

    /// True when `*` is listed.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Origins usable as header values. Values that are not valid header
    /// text are logged and skipped.
    pub fn origin_headers(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Skipping unusable CORS origin");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::for_token(TokenConfig::new("cfg-test-secret-0123456789abcdef01"));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.with_port(9000).port, 9000);
        assert_eq!(ApiConfig::default().public_paths, ["/api/health"]);
    }

    #[test]
    fn test_cors_origins() {
        assert!(CorsConfig::default().allows_any_origin());

        let cors = CorsConfig::for_origins(vec![
            "https://campus.edu".to_string(),
            "bad\norigin".to_string(),
        ]);
        assert!(!cors.allows_any_origin());
        assert_eq!(cors.origin_headers(), [HeaderValue::from_static("https://campus.edu")]);
    }
}
