// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Router assembly and the serve loop.
//!
//! Layers run outermost first: trace, timeout, CORS, then authentication,
//! so preflight requests never need a credential and every rejection is
//! traced.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::CorsConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::AuthLayer;
use crate::state::AppState;

/// Serves one [`AppState`].
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Wraps the state; nothing binds until [`run_with_shutdown`](Self::run_with_shutdown).
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Listen address from the state's configuration.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }

    /// All routes behind the middleware stack.
    pub fn router(&self) -> Router {
        let config = &self.state.config;
        let layers = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.request_timeout,
            ))
            .layer(cors_layer(&config.cors))
            .layer(
                AuthLayer::new(self.state.resolver.clone())
                    .with_public_paths(config.public_paths.clone()),
            );

        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/me", get(handlers::current_identity))
            .route("/api/access/check", post(handlers::check_access))
            .route("/api/access/scope/{resource}", get(handlers::access_scope))
            .layer(layers)
            .with_state(self.state.clone())
    }

    /// Binds and serves until `shutdown` completes, then drains in-flight
    /// requests.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.addr();
        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiError::Listener { addr, source })?;
        info!(%addr, "Listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiError::Listener { addr, source })?;

        info!(%addr, "Listener closed");
        Ok(())
    }
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(cors.max_age));

    if cors.allows_any_origin() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(cors.origin_headers()))
    }
}
