// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Directory store errors.

use thiserror::Error;

/// Result type alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors raised by a directory store.
///
/// These describe a failing backend, never an absent row: a lookup that finds
/// nothing returns `Ok(None)` or [`EmailMatch::None`](crate::EmailMatch::None).
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The backing store could not be reached or queried.
    #[error("Directory store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// A stored row could not be decoded.
    #[error("Corrupt directory row in '{table}': {message}")]
    Corrupt {
        /// Table or collection name.
        table: String,
        /// Error message.
        message: String,
    },

    /// A seed document was rejected.
    #[error("Invalid directory seed: {message}")]
    InvalidSeed {
        /// Error message.
        message: String,
    },
}

impl DirectoryError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a corrupt row error.
    pub fn corrupt(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid seed error.
    pub fn invalid_seed(message: impl Into<String>) -> Self {
        Self::InvalidSeed {
            message: message.into(),
        }
    }
}
