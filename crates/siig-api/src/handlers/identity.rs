// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Current identity handler.

use std::collections::BTreeMap;

use axum::{response::IntoResponse, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{LinkedEntity, Role};
use crate::extractors::{Auth, RequestId};
use siig_core::AccountId;

/// Summary of the caller's identity.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    /// Account id.
    pub account_id: AccountId,
    /// Account email.
    pub email: String,
    /// Normalized role.
    pub role: Role,
    /// Linked directory row, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked: Option<LinkedEntity>,
    /// Link attributes (instructor specialty).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<&'static str, String>,
    /// Request id.
    pub request_id: Uuid,
}

/// GET /api/me
pub async fn current_identity(
    Auth(identity): Auth,
    RequestId(request_id): RequestId,
) -> impl IntoResponse {
    let attributes = identity.linked_attributes();

    Json(IdentityResponse {
        account_id: identity.account_id,
        email: identity.email,
        role: identity.role,
        linked: identity.linked,
        attributes,
        request_id,
    })
}
