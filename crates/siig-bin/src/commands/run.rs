// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use tracing::debug;

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::runtime::RuntimeBuilder;

/// `siig run`: serves until SIGINT or SIGTERM.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    debug!(config = %cli.config.display(), ?args, "Assembling runtime");

    RuntimeBuilder::new()
        .config_path(&cli.config)
        .host(args.host)
        .port(args.port)
        .seed_path(args.seed)
        .build()?
        .run()
        .await
}
