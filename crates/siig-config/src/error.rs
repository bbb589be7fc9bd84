// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while loading deployment configuration and directory seeds.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A Result type with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a configuration or seed file was rejected.
///
/// File-level variants carry the offending path; field-level variants carry
/// the dotted key (`security.token.secret`) so operators can find the line.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("{} does not exist", .path.display())]
    NotFound {
        /// Path as given.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// Path as given.
        path: PathBuf,
        /// OS error.
        #[source]
        source: std::io::Error,
    },

    /// Extension is not one of `yaml`, `yml`, `toml` or `json`.
    #[error(
        "{} has unsupported extension '{}' (use .yaml, .toml or .json)",
        .path.display(),
        .extension.as_deref().unwrap_or("")
    )]
    UnsupportedFormat {
        /// Path as given.
        path: PathBuf,
        /// Extension found, `None` when the name has none.
        extension: Option<String>,
    },

    /// The document is malformed or has unknown keys.
    #[error("{} is malformed: {message}", .path.display())]
    Parse {
        /// Path as given, or `<inline>` for in-memory documents.
        path: PathBuf,
        /// Deserializer message, usually with line and column.
        message: String,
    },

    /// A `SIIG_*` override could not be parsed.
    #[error("environment variable {name}: {expected}")]
    Env {
        /// Full variable name including the prefix.
        name: String,
        /// What the value should look like.
        expected: String,
    },

    /// A required key is absent.
    #[error("{field} must be set")]
    MissingField {
        /// Dotted key.
        field: String,
    },

    /// A key is present but unusable.
    #[error("{field}: {message}")]
    Validation {
        /// Dotted key.
        field: String,
        /// What is wrong with the value.
        message: String,
    },

    /// The seed parsed but its records are inconsistent.
    #[error("directory seed {} rejected: {message}", .path.display())]
    InvalidSeed {
        /// Seed file path.
        path: PathBuf,
        /// First inconsistency found.
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unsupported_format(path: &Path) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string),
        }
    }

    /// Creates a parse error for `path`.
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn env(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Env {
            name: name.into(),
            expected: expected.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_seed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::InvalidSeed {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// The file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::Read { path, .. }
            | Self::UnsupportedFormat { path, .. }
            | Self::Parse { path, .. }
            | Self::InvalidSeed { path, .. } => Some(path),
            Self::Env { .. } | Self::MissingField { .. } | Self::Validation { .. } => None,
        }
    }

    /// The dotted configuration key this error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } | Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
