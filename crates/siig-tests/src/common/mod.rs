// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared test support: a seeded campus, row builders and an in-process
//! HTTP client.

pub mod builders;
pub mod fixtures;
pub mod harness;

pub use builders::*;
pub use fixtures::*;
pub use harness::*;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

/// Routes `tracing` output through the test harness's captured stdout.
///
/// `RUST_LOG` wins over the default of debug for the workspace crates.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("warn,siig_api=debug,siig_config=debug,siig_tests=debug")
        });
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// A scratch directory removed when dropped.
pub fn temp_test_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temp directory")
}
