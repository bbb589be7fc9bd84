// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # siig-api
//!
//! Authentication and authorization core of the SIIG academic records API,
//! plus the HTTP edge that applies it.
//!
//! The core is [`auth`]: a signed token codec, an identity resolver that links
//! accounts to directory rows by email, and the policy engine that decides
//! every request. The rest of the crate wires it into an axum server.
//!
//! # Example
//!
//! ```rust,ignore
//! use siig_api::{ApiConfig, ApiServer, AppState};
//!
//! let state = AppState::builder().config(config).directory(directory).build()?;
//! ApiServer::new(state).run_with_shutdown(shutdown).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
