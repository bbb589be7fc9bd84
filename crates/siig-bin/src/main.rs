// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `siig` entry point.

use clap::Parser;
use siig_bin::cli::Cli;
use siig_bin::error::report_error_and_exit;
use siig_bin::{commands, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_filter(), cli.log_format);

    if let Err(error) = commands::execute(cli).await {
        report_error_and_exit(error);
    }
}
