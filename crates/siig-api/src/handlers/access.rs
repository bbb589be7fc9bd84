// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Policy introspection handlers.
//!
//! These let a client ask what the caller may do before issuing the real
//! request. They run the same [`PolicyEngine`](crate::auth::PolicyEngine)
//! calls the resource handlers make.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{
    Action, Resource, ResourceFamily, RowAccess, ScopeColumns, ScopeFilter, SqlPredicate,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, ValidatedJson};
use crate::state::AppState;

// =============================================================================
// Access Check
// =============================================================================

/// Access check request body.
#[derive(Debug, Deserialize)]
pub struct AccessCheckRequest {
    /// Target resource (table name).
    pub resource: Resource,
    /// Requested action.
    pub action: Action,
    /// Candidate row access fields.
    #[serde(default)]
    pub row: Option<RowAccess>,
}

/// Access check response body. Only sent when allowed.
#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    /// Always `true`; denials are 403 errors.
    pub allowed: bool,
    /// Target resource.
    pub resource: Resource,
    /// Requested action.
    pub action: Action,
}

/// POST /api/access/check
///
/// Returns 200 when allowed and 403 with the deny reason otherwise.
pub async fn check_access(
    State(state): State<AppState>,
    Auth(identity): Auth,
    ValidatedJson(request): ValidatedJson<AccessCheckRequest>,
) -> ApiResult<impl IntoResponse> {
    state.authorize(
        &identity,
        request.resource,
        request.action,
        request.row.as_ref(),
    )?;

    Ok(Json(AccessCheckResponse {
        allowed: true,
        resource: request.resource,
        action: request.action,
    }))
}

// =============================================================================
// Access Scope
// =============================================================================

/// Scope response body.
#[derive(Debug, Serialize)]
pub struct AccessScopeResponse {
    /// Target resource.
    pub resource: Resource,
    /// Decision table governing the resource.
    pub family: ResourceFamily,
    /// Rows the caller may read.
    pub scope: ScopeFilter,
    /// The scope as a SQL predicate, for row-scoped resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<SqlPredicate>,
}

/// GET /api/access/scope/{resource}
pub async fn access_scope(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(resource): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let resource = Resource::parse(&resource).ok_or_else(|| ApiError::not_found(resource.clone()))?;
    let scope = state.scope(&identity, resource);
    let predicate = ScopeColumns::for_resource(resource).map(|columns| scope.to_sql(&columns));

    Ok(Json(AccessScopeResponse {
        resource,
        family: resource.family(),
        scope,
        predicate,
    }))
}
