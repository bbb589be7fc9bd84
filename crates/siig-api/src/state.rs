// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use siig_core::{DirectoryStore, MemoryDirectory};

use crate::auth::{
    Action, IdentityResolver, PolicyEngine, Resource, ResolvedIdentity, RowAccess, ScopeFilter,
    TokenCodec,
};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Identity resolver used by the auth middleware.
    pub resolver: Arc<IdentityResolver>,
    /// Authorization policy.
    pub policy: PolicyEngine,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the identity resolver.
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &TokenCodec {
        self.resolver.codec()
    }

    /// Returns the policy engine.
    pub fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    /// Checks `action` on `resource`, turning a deny into a 403.
    pub fn authorize(
        &self,
        identity: &ResolvedIdentity,
        resource: Resource,
        action: Action,
        row: Option<&RowAccess>,
    ) -> ApiResult<()> {
        self.policy
            .authorize(identity, resource, action, row)
            .into_result()
            .map_err(ApiError::from)
    }

    /// Returns the list scope for `resource`.
    pub fn scope(&self, identity: &ResolvedIdentity, resource: Resource) -> ScopeFilter {
        self.policy.scope_filter(identity, resource)
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    directory: Option<Arc<dyn DirectoryStore>>,
    policy: Option<PolicyEngine>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            directory: None,
            policy: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the directory store.
    pub fn directory(mut self, directory: Arc<dyn DirectoryStore>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Sets the policy engine.
    pub fn policy(mut self, policy: PolicyEngine) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails if the signing key in the configuration is unusable.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let codec = TokenCodec::new(&config.token)?;

        let directory = self
            .directory
            .unwrap_or_else(|| Arc::new(MemoryDirectory::new()));

        Ok(AppState {
            config: Arc::new(config),
            resolver: Arc::new(IdentityResolver::new(codec, directory)),
            policy: self.policy.unwrap_or_default(),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<IdentityResolver> {
    fn from_ref(state: &AppState) -> Self {
        state.resolver.clone()
    }
}

impl axum::extract::FromRef<AppState> for PolicyEngine {
    fn from_ref(state: &AppState) -> Self {
        state.policy
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
