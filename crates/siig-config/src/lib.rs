// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # siig-config
//!
//! Configuration management for the SIIG API.
//!
//! ## Features
//!
//! - **Schema Definition**: server, token and directory sections with validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `SIIG_*` variables and `${VAR:default}` placeholders
//! - **Directory Seeds**: account and directory rows loaded at startup
//!
//! ## Quick Start
//!
//! ```no_run
//! use siig_config::loader::load_config;
//!
//! let config = load_config("siig.yaml").unwrap();
//! println!("Listening on {}", config.server.socket_addr());
//! ```
//!
//! ## Configuration Schema
//!
//! - `server` - bind address, timeouts, CORS and public paths
//! - `security.token` - signing secret and token lifetime
//! - `directory` - optional seed file

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, load_directory_seed, ConfigFormat, ConfigLoader};
pub use schema::{
    DirectoryConfig, SecretValue, SecurityConfig, ServerConfig, SiigConfig, TokenSettings,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
