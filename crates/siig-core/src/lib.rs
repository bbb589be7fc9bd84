// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # siig-core
//!
//! Shared record types and the read-only directory store for the SIIG
//! academic records API.
//!
//! - [`types`]: account and directory row types with typed identifiers
//! - [`directory`]: the [`DirectoryStore`] lookup trait and an in-memory store
//! - [`error`]: directory errors

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod directory;
pub mod error;
pub mod types;

pub use directory::{DirectorySeed, DirectoryStore, EmailMatch, MemoryDirectory};
pub use error::{DirectoryError, DirectoryResult};
pub use types::{
    normalize_email, Account, AccountId, InstructorId, InstructorRecord, StudentId, StudentRecord,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
