// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Command line interface.
//!
//! Global flags can also come from `SIIG_CONFIG`, `SIIG_LOG_LEVEL` and
//! `SIIG_LOG_FORMAT`. With no subcommand the server starts.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Academic records API with tenant-scoped authorization.
#[derive(Parser, Debug)]
#[command(name = "siig", version = siig_core::VERSION, propagate_version = true)]
pub struct Cli {
    /// Deployment configuration (.yaml, .toml or .json)
    #[arg(short, long, env = "SIIG_CONFIG", default_value = "siig.yaml", global = true)]
    pub config: PathBuf,

    /// Tracing filter, e.g. `info` or `siig_api=debug,info`
    #[arg(short, long, env = "SIIG_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Log line format
    #[arg(long, env = "SIIG_LOG_FORMAT", value_enum, default_value_t, global = true)]
    pub log_format: LogFormat,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do; `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the API (default)
    Run(RunArgs),

    /// Check the configuration and directory seed without binding a socket
    Validate(ValidateArgs),

    /// Sign a session token for an account in the directory seed
    Token(TokenArgs),

    /// Print component versions
    Version(VersionArgs),
}

/// `siig run`
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Listen address, overriding `server.host`
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Listen port, overriding `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory seed, overriding `directory.seed_path`
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

/// `siig validate`
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Fail when any warning is reported
    #[arg(long)]
    pub strict: bool,
}

/// `siig token`
#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Subject account id
    #[arg(short, long)]
    pub account: i64,

    /// Lifetime in seconds; defaults to `security.token.ttl_secs`
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub ttl_secs: Option<u64>,

    /// `text` prints the bare token; `json` adds subject, role and expiry
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// `siig version`
#[derive(Args, Debug, Default, Clone)]
pub struct VersionArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line human readable
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Single-line human readable
    Compact,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Cli {
    /// The subcommand to execute; `run` with no overrides when omitted.
    pub fn resolved_command(&self) -> Commands {
        match &self.command {
            Some(command) => command.clone(),
            None => Commands::Run(RunArgs::default()),
        }
    }

    /// Filter passed to the tracing subscriber after `-q`/`-v`.
    pub fn log_filter(&self) -> &str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (_, true) => "debug",
            _ => &self.log_level,
        }
    }
}
