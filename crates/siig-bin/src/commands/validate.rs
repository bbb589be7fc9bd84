// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use std::collections::HashMap;

use siig_api::auth::Role;
use siig_config::{load_config, load_directory_seed, SiigConfig};
use siig_core::{normalize_email, DirectorySeed};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Token lifetimes above this draw a warning.
const LONG_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    let config = load_config(config_path).map_err(|e| {
        BinError::from(e).with_context(format!("{} is not valid", config_path.display()))
    })?;

    let seed = match &config.directory.seed_path {
        Some(path) => Some(load_directory_seed(path)?),
        None => None,
    };

    let mut warnings = config_warnings(&config);
    if let Some(seed) = &seed {
        warnings.extend(seed_warnings(seed));
    }

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  API: {}", config.server.socket_addr());
            println!("  Token TTL: {}s", config.security.token.ttl_secs);
            println!("  Public paths: {}", config.server.public_paths.join(", "));
            match &seed {
                Some(seed) => println!(
                    "  Directory: {} accounts, {} instructors, {} students",
                    seed.accounts.len(),
                    seed.instructors.len(),
                    seed.students.len()
                ),
                None => println!("  Directory: (empty)"),
            }

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "addr": config.server.socket_addr().to_string(),
                    "token_ttl_secs": config.security.token.ttl_secs,
                    "public_paths": config.server.public_paths,
                    "accounts": seed.as_ref().map(|s| s.accounts.len()),
                    "instructors": seed.as_ref().map(|s| s.instructors.len()),
                    "students": seed.as_ref().map(|s| s.students.len()),
                },
                "warnings": warnings,
            });
            let rendered = serde_json::to_string_pretty(&output)
                .map_err(anyhow::Error::from)?;
            println!("{}", rendered);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::rejected(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Collects non-fatal configuration issues.
pub fn config_warnings(config: &SiigConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.directory.seed_path.is_none() {
        warnings.push("No directory seed configured".to_string());
    }
    if config.server.cors_origins.iter().any(|o| o == "*") {
        warnings.push("CORS allows any origin".to_string());
    }
    if config.security.token.ttl_secs > LONG_TTL_SECS {
        warnings.push(format!(
            "Token TTL of {}s exceeds 30 days",
            config.security.token.ttl_secs
        ));
    }

    warnings
}

/// Collects seed rows that will never authenticate or link.
pub fn seed_warnings(seed: &DirectorySeed) -> Vec<String> {
    let mut warnings = Vec::new();

    for account in &seed.accounts {
        if Role::parse(&account.role).is_none() {
            warnings.push(format!(
                "Account {} has unrecognized role '{}' and cannot authenticate",
                account.id, account.role
            ));
        }
    }

    let instructor_emails = seed.instructors.iter().map(|r| r.email.as_str());
    for email in duplicate_emails(instructor_emails) {
        warnings.push(format!("Instructor email '{}' is shared and will not link", email));
    }

    let student_emails = seed.students.iter().map(|r| r.email.as_str());
    for email in duplicate_emails(student_emails) {
        warnings.push(format!("Student email '{}' is shared and will not link", email));
    }

    warnings
}

fn duplicate_emails<'a>(emails: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for email in emails {
        *counts.entry(normalize_email(email)).or_default() += 1;
    }
    let mut duplicates: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(email, _)| email)
        .collect();
    duplicates.sort();
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use siig_core::{Account, InstructorRecord, StudentRecord};

    #[test]
    fn test_seed_warnings() {
        let seed = DirectorySeed {
            accounts: vec![
                Account::new(1, "root@campus.edu", "admin"),
                Account::new(2, "ghost@campus.edu", "janitor"),
            ],
            instructors: vec![
                InstructorRecord::new(7, "dup@campus.edu"),
                InstructorRecord::new(8, " DUP@campus.edu"),
            ],
            students: vec![StudentRecord::new(30, "sam@campus.edu")],
        };

        let warnings = seed_warnings(&seed);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("janitor"));
        assert!(warnings[1].contains("dup@campus.edu"));
    }

    #[test]
    fn test_config_warnings() {
        let config = SiigConfig::default();
        let warnings = config_warnings(&config);
        assert!(warnings.iter().any(|w| w.contains("seed")));
        assert!(warnings.iter().any(|w| w.contains("CORS")));
    }
}
