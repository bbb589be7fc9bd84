// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Failures of the `siig` binary and the exit codes they map to.
//!
//! Exit codes follow `sysexits.h` so service managers can tell a bad
//! deployment (config, key, seed) from a crash.

use siig_api::auth::TokenConfigError;
use siig_api::ApiError;
use siig_config::ConfigError;
use siig_core::DirectoryError;
use thiserror::Error;

/// Result type alias for siig-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Command line usage error (`EX_USAGE`).
pub const EXIT_USAGE: i32 = 64;
/// Bad input data (`EX_DATAERR`).
pub const EXIT_DATA: i32 = 65;
/// Service unavailable (`EX_UNAVAILABLE`).
pub const EXIT_UNAVAILABLE: i32 = 69;
/// Internal software error (`EX_SOFTWARE`).
pub const EXIT_SOFTWARE: i32 = 70;
/// I/O error (`EX_IOERR`).
pub const EXIT_IO: i32 = 74;
/// Configuration error (`EX_CONFIG`).
pub const EXIT_CONFIG: i32 = 78;

/// Why a command failed.
#[derive(Debug, Error)]
pub enum BinError {
    /// The configuration file could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured signing key cannot sign credentials.
    #[error("Signing key rejected: {0}")]
    SigningKey(#[from] TokenConfigError),

    /// The directory seed or store failed.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The HTTP server could not start or stopped with an error.
    #[error("Server error: {0}")]
    Server(#[from] ApiError),

    /// The command cannot act on what it was given.
    #[error("{0}")]
    Rejected(String),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// An error annotated with what was being attempted.
    #[error("{context}: {source}")]
    WithContext {
        /// What was being attempted.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a rejection for input the command cannot use.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::SigningKey(_) | Self::Server(ApiError::SigningKey(_)) => {
                EXIT_CONFIG
            }
            Self::Directory(DirectoryError::Unavailable { .. }) => EXIT_UNAVAILABLE,
            Self::Directory(_) => EXIT_DATA,
            Self::Server(_) => EXIT_UNAVAILABLE,
            Self::Rejected(_) => EXIT_USAGE,
            Self::Io(_) => EXIT_IO,
            Self::Other(_) => EXIT_SOFTWARE,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Prints an error and its cause chain to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Prints an error and exits with its code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}
