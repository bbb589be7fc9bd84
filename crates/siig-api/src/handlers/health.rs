// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handler.

use axum::{response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true` while the process serves requests.
    pub ok: bool,
    /// Server time.
    pub time: DateTime<Utc>,
    /// Server version.
    pub version: String,
}

/// GET /api/health
///
/// Public liveness check.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        time: Utc::now(),
        version: crate::VERSION.to_string(),
    })
}
