// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Graceful shutdown on SIGTERM/SIGINT.
//!
//! A single `watch` flag flips to `true` once; every [`ShutdownSignal`]
//! handed out before or after that resolves.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

/// Owns the shutdown flag.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    flag: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    /// Creates a coordinator in the running state.
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// A future-like handle that completes once shutdown is triggered.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            flag: self.flag.subscribe(),
        }
    }

    /// Flips the flag. Later calls are no-ops.
    pub fn trigger(&self, cause: &str) {
        let first = self.flag.send_if_modified(|stopped| !std::mem::replace(stopped, true));
        if first {
            info!(cause, "Shutdown triggered");
        }
    }

    /// Whether [`trigger`](Self::trigger) has run.
    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }

    /// Triggers shutdown on the first OS signal. Returns early if something
    /// else triggers it first.
    pub async fn listen_for_signals(&self) {
        tokio::select! {
            cause = os_signal() => self.trigger(cause),
            _ = self.shutdown_signal().wait() => {}
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves when shutdown is triggered.
pub struct ShutdownSignal {
    flag: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Waits for the flag. Also completes if the coordinator is dropped.
    pub async fn wait(mut self) {
        let _ = self.flag.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(unix)]
async fn os_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut term), Ok(mut int)) => tokio::select! {
            _ = term.recv() => "SIGTERM",
            _ = int.recv() => "SIGINT",
        },
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Cannot install SIGTERM/SIGINT handlers, falling back to Ctrl+C");
            ctrl_c().await
        }
    }
}

#[cfg(not(unix))]
async fn os_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(
            error = %e,
            "Cannot listen for Ctrl+C; only an explicit trigger will stop the server"
        );
        std::future::pending::<()>().await;
    }
    "Ctrl+C"
}
