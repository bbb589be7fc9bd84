// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential payload.

use serde::{Deserialize, Serialize};
use siig_core::AccountId;

use super::role::Role;

/// The signed body of a credential.
///
/// `role` records the role at issue time. Authorization always uses the role
/// stored on the account, so a stale value here grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject: the account id.
    pub sub: AccountId,

    /// Canonical role label at issue time.
    pub role: String,

    /// Issued at (Unix seconds).
    pub iat: i64,

    /// Expiry (Unix seconds).
    pub exp: i64,
}

impl TokenPayload {
    /// Creates a payload issued at `issued_at` and valid for `ttl_secs`.
    pub fn new(subject: AccountId, role: Role, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            sub: subject,
            role: role.as_str().to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        }
    }

    /// Returns the subject.
    pub fn subject(&self) -> AccountId {
        self.sub
    }

    /// Returns `true` if the payload is expired at `now` (Unix seconds).
    ///
    /// A credential is still valid during the second it expires.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}
