// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # siig-bin
//!
//! CLI binary for the SIIG academic records API.
//!
//! - CLI argument parsing with clap
//! - Server runtime orchestration and graceful shutdown
//! - Logging initialization
//! - Command implementations (run, validate, token, version)
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! siig -c /etc/siig/siig.yaml
//!
//! # Validate configuration and directory seed
//! siig validate --strict
//!
//! # Issue a session token for account 1
//! siig token --account 1
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{RuntimeBuilder, ServerRuntime};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
