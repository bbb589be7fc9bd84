// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! One module per subcommand.

mod run;
mod token;
mod validate;
mod version;

pub use token::{issue_token, IssuedToken};
pub use validate::{config_warnings, seed_warnings};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Dispatches to the selected subcommand.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.resolved_command() {
        Commands::Run(args) => run::run(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Token(args) => token::token(&cli, args),
        Commands::Version(args) => version::version(args),
    }
}
