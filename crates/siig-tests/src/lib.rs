// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # SIIG Integration Tests
//!
//! Shared fixtures and helpers for the workspace integration suites.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: a seeded campus directory with every linking case
//!   - `builders`: builders for identities and row access fields
//!   - `harness`: an in-process HTTP client over the API router
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p siig-tests
//! cargo test -p siig-tests --test integration_policy
//! ```
//!
//! ## Test Categories
//!
//! - `integration_token.rs`: token issue, verify and tamper cases
//! - `integration_identity.rs`: account resolution and email linking
//! - `integration_policy.rs`: decision tables and scope agreement
//! - `integration_api.rs`: HTTP edge behavior
//! - `integration_config.rs`: configuration files and seeds
//!
//! ## Using Fixtures
//!
//! ```rust,ignore
//! use siig_tests::prelude::*;
//!
//! let campus = CampusFixtures::new();
//! let ada = campus.identity(Accounts::ADA);
//! assert_eq!(ada.instructor_id(), Some(Instructors::ADA));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
