// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Drives the API router in process, without binding a socket.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use siig_api::{ApiServer, AppState};
use tower::ServiceExt;

/// A response status with its decoded JSON body.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,
    /// JSON body, or `Value::Null` when the body is empty or not JSON.
    pub body: Value,
}

impl TestResponse {
    /// Returns the `error.code` field of an error body.
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }

    /// Returns the deny reason of a 403 body.
    pub fn deny_reason(&self) -> Option<&str> {
        self.body["error"]["details"]["reason"].as_str()
    }
}

/// An in-process client over the full middleware stack.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Builds the router for `state`.
    pub fn new(state: AppState) -> Self {
        Self {
            router: ApiServer::new(state).router(),
        }
    }

    /// Sends a GET request.
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, token, None).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post_json(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, path, token, Some(body.to_string())).await
    }

    /// Sends a POST request with a raw body.
    pub async fn post_raw(&self, path: &str, token: Option<&str>, body: &str) -> TestResponse {
        self.send(Method::POST, path, token, Some(body.to_string())).await
    }

    /// Sends a request with a literal `Authorization` header value.
    pub async fn get_with_authorization(&self, path: &str, authorization: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .expect("request must build");
        self.dispatch(request).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("request must build");

        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let (method, uri) = (request.method().clone(), request.uri().clone());
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body must be readable")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        tracing::debug!(%method, %uri, status = status.as_u16(), %body, "Test request");

        TestResponse { status, body }
    }
}
