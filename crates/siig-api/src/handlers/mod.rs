// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers.
//!
//! - [`health`]: liveness check
//! - [`current_identity`]: the caller's resolved identity
//! - [`check_access`], [`access_scope`]: policy introspection for the caller

mod access;
mod health;
mod identity;

pub use access::*;
pub use health::*;
pub use identity::*;
