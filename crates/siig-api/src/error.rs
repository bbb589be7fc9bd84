// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request failures and their HTTP rendering.
//!
//! Bodies have the shape `{"error": {"code", "message", "details"}}`. The
//! message is always a fixed public string; the variant payload goes to the
//! log only, so a 401 never reveals which check failed.

use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use siig_core::DirectoryError;
use thiserror::Error;

use crate::auth::{DenyReason, ResolveError, TokenConfigError, UnauthenticatedReason};

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a request (or the server itself) failed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable credential (401).
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] UnauthenticatedReason),

    /// The policy engine refused (403). The reason is echoed in `details`.
    #[error("denied: {0}")]
    Denied(#[from] DenyReason),

    /// Unknown path parameter such as a resource name (404).
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed request body (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The directory store could not be queried (503).
    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// The signing key is unusable; raised while building state.
    #[error("signing key: {0}")]
    SigningKey(#[from] TokenConfigError),

    /// Binding or serving the listener failed.
    #[error("listener {addr}: {source}")]
    Listener {
        /// Address the server tried to use.
        addr: SocketAddr,
        /// Socket error.
        #[source]
        source: std::io::Error,
    },

    /// Anything else on the server side (500).
    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    /// Creates a not found error for `what`.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Denied(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::DirectoryUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            Self::SigningKey(_) | Self::Listener { .. } | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        self.classify().1
    }

    /// The message returned to clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthenticated(_) => "Authentication required".to_string(),
            Self::Denied(_) => "Access denied".to_string(),
            Self::NotFound(what) => format!("{} not found", what),
            Self::BadRequest(message) => message.clone(),
            Self::DirectoryUnavailable(_) => "Service temporarily unavailable".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Policy deny reason, for 403s.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Denied(reason) => Some(*reason),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: Body<'a>,
}

#[derive(Serialize)]
struct Body<'a> {
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        if status.is_server_error() {
            tracing::error!(error = %self, code, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, code, status = status.as_u16(), "Request rejected");
        }

        let body = Envelope {
            error: Body {
                code,
                message: self.public_message(),
                details: self
                    .deny_reason()
                    .map(|reason| serde_json::json!({ "reason": reason.code() })),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Unauthenticated(reason) => Self::Unauthenticated(reason),
            ResolveError::Directory(err) => err.into(),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Unavailable { message } => Self::DirectoryUnavailable(message),
            other => Self::Internal(other.to_string()),
        }
    }
}
