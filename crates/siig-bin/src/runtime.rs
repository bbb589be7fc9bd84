// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Loads configuration and the directory seed, builds the shared
//! [`AppState`], and serves the API until a shutdown signal arrives.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use siig_api::{ApiServer, AppState};
use siig_config::{load_config, load_directory_seed, SiigConfig};
use siig_core::{DirectoryStore, MemoryDirectory};
use tracing::{info, warn};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServerRuntime
// =============================================================================

/// The assembled server, ready to run.
pub struct ServerRuntime {
    config: SiigConfig,
    state: AppState,
    shutdown: ShutdownCoordinator,
}

impl ServerRuntime {
    /// Returns the effective configuration.
    pub fn config(&self) -> &SiigConfig {
        &self.config
    }

    /// Returns the shared application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Runs the server until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        let accounts = self.state.resolver().directory().account_count()?;
        info!(
            addr = %self.config.server.socket_addr(),
            accounts,
            token_ttl_secs = self.config.security.token.ttl_secs,
            "SIIG API starting"
        );

        let watcher = self.shutdown.clone();
        tokio::spawn(async move { watcher.listen_for_signals().await });

        ApiServer::new(self.state)
            .run_with_shutdown(self.shutdown.shutdown_signal().wait())
            .await?;

        info!("SIIG API shutdown complete");
        Ok(())
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the server runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<SiigConfig>,
    host: Option<IpAddr>,
    port: Option<u16>,
    seed_path: Option<PathBuf>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: SiigConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides `server.host` when `Some`.
    pub fn host(mut self, host: Option<IpAddr>) -> Self {
        self.host = host;
        self
    }

    /// Overrides `server.port` when `Some`.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Overrides `directory.seed_path` when `Some`.
    pub fn seed_path(mut self, path: Option<PathBuf>) -> Self {
        self.seed_path = path;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<ServerRuntime> {
        let mut config = match self.config {
            Some(cfg) => cfg,
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::rejected("No configuration provided"))?;
                load_config(&path).map_err(|e| {
                    BinError::from(e).with_context(format!("Failed to load {}", path.display()))
                })?
            }
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(seed) = self.seed_path {
            config.directory.seed_path = Some(seed);
        }
        config.validate()?;

        let directory = load_directory(&config)?;
        let state = AppState::builder()
            .config(config.to_api_config())
            .directory(directory)
            .build()?;

        Ok(ServerRuntime {
            config,
            state,
            shutdown: ShutdownCoordinator::new(),
        })
    }
}

/// Builds the directory store from the configured seed, if any.
pub fn load_directory(config: &SiigConfig) -> BinResult<Arc<dyn DirectoryStore>> {
    let directory = match &config.directory.seed_path {
        Some(path) => MemoryDirectory::from_seed(load_directory_seed(path)?)?,
        None => {
            warn!("No directory seed configured; every token will resolve to an unknown account");
            MemoryDirectory::new()
        }
    };
    Ok(Arc::new(directory))
}

// =============================================================================
// Tests
// =============================================================================
