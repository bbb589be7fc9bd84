// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::IdentityResolver;
use crate::error::ApiError;
use crate::extractors::RequestId;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// Resolves the `Authorization` header into a
/// [`ResolvedIdentity`](crate::auth::ResolvedIdentity) and stores it in the
/// request extensions. Requests that fail resolution never reach the inner
/// service.
#[derive(Clone)]
pub struct AuthLayer {
    resolver: Arc<IdentityResolver>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(resolver: Arc<IdentityResolver>) -> Self {
        Self {
            resolver,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets paths that don't require authentication.
    ///
    /// A trailing `*` matches any suffix.
    pub fn with_public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = Arc::new(paths.into_iter().collect());
        self
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            resolver: self.resolver.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    resolver: Arc<IdentityResolver>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    fn is_public_path(&self, path: &str) -> bool {
        if self.public_paths.contains(path) {
            return true;
        }

        self.public_paths.iter().any(|public_path| {
            public_path
                .strip_suffix('*')
                .is_some_and(|prefix| path.starts_with(prefix))
        })
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let resolver = self.resolver.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = Uuid::now_v7();
            req.extensions_mut().insert(RequestId(request_id));

            if is_public {
                return inner.call(req).await;
            }

            let header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            let identity = match resolver.resolve_bearer(header) {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::debug!(
                        request_id = %request_id,
                        path = %req.uri().path(),
                        error = %e,
                        "Request authentication failed"
                    );
                    return Ok(ApiError::from(e).into_response());
                }
            };

            tracing::trace!(
                request_id = %request_id,
                account_id = %identity.account_id,
                role = %identity.role,
                linked = identity.is_linked(),
                "Request authenticated"
            );

            req.extensions_mut().insert(identity);

            inner.call(req).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
