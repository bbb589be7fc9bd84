// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Signed session tokens ([`TokenCodec`])
//! - Identity resolution against the directory ([`IdentityResolver`])
//! - The authorization policy ([`PolicyEngine`]) and list scoping ([`ScopeFilter`])

mod claims;
mod codec;
mod identity;
mod policy;
pub mod resource;
mod role;
mod scope;

pub use claims::TokenPayload;
pub use codec::{
    TokenCodec, TokenConfig, TokenConfigError, TokenError, DEFAULT_TOKEN_TTL, MIN_SECRET_LEN,
};
pub use identity::{
    bearer_token, IdentityResolver, LinkedEntity, ResolveError, ResolvedIdentity,
    UnauthenticatedReason,
};
pub use policy::{Decision, DenyReason, PolicyEngine};
pub use resource::{AccessRow, Action, Resource, ResourceFamily, RowAccess};
pub use role::{registration_role, Role};
pub use scope::{ScopeColumns, ScopeFilter, SqlPredicate};
