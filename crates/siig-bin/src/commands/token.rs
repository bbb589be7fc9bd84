// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `token` command.

use std::time::Duration;

use chrono::{DateTime, Utc};
use siig_api::auth::{Role, TokenCodec};
use siig_config::{load_config, SiigConfig};
use siig_core::{AccountId, DirectoryError, DirectoryStore};
use tracing::info;

use crate::cli::{Cli, OutputFormat, TokenArgs};
use crate::error::{BinError, BinResult};
use crate::runtime::load_directory;

/// A signed session token and its metadata.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The compact token.
    pub token: String,
    /// Subject account.
    pub account_id: AccountId,
    /// Canonical role at issue time.
    pub role: Role,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
}

/// Executes the `token` command.
pub fn token(cli: &Cli, args: TokenArgs) -> BinResult<()> {
    let config = load_config(&cli.config)?;
    let ttl = args.ttl_secs.map(Duration::from_secs);
    let issued = issue_token(&config, AccountId::new(args.account), ttl)?;

    match args.format {
        OutputFormat::Text => println!("{}", issued.token),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "token": issued.token,
                "account_id": issued.account_id,
                "role": issued.role,
                "expires_at": issued.expires_at.to_rfc3339(),
            });
            println!("{}", output);
        }
    }

    Ok(())
}

/// Signs a token for an account in the configured directory.
///
/// The role is taken from the stored account, so the token carries the same
/// label the resolver will report.
pub fn issue_token(
    config: &SiigConfig,
    account_id: AccountId,
    ttl: Option<Duration>,
) -> BinResult<IssuedToken> {
    let directory = load_directory(config)?;
    let account = directory
        .find_account_by_id(account_id)?
        .ok_or_else(|| {
            BinError::rejected(format!("Account {} not found in directory", account_id))
        })?;

    let role = Role::parse(&account.role).ok_or_else(|| {
        BinError::from(DirectoryError::corrupt(
            "accounts",
            format!("account {} has unrecognized role '{}'", account_id, account.role),
        ))
    })?;

    let codec = TokenCodec::new(&config.security.token.to_token_config())?;
    let ttl = ttl.unwrap_or_else(|| codec.ttl());
    if ttl.is_zero() {
        return Err(BinError::rejected("Token TTL cannot be zero"));
    }

    let issued_at = Utc::now();
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|delta| issued_at.checked_add_signed(delta))
        .ok_or_else(|| BinError::rejected("Token TTL out of range"))?;
    let token = codec.issue_at(account_id, role, issued_at.timestamp(), ttl);

    info!(account_id = %account_id, role = %role, "Issued session token");

    Ok(IssuedToken {
        token,
        account_id,
        role,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use siig_config::SecretValue;

    fn config_with_seed() -> (tempfile::TempDir, SiigConfig) {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("directory.json");
        std::fs::write(
            &seed,
            r#"{"accounts": [
                {"id": 1, "email": "root@campus.edu", "role": "admin"},
                {"id": 2, "email": "ghost@campus.edu", "role": "janitor"}
            ]}"#,
        )
        .unwrap();

        let mut config = SiigConfig::default();
        config.security.token.secret = Some(SecretValue::new("token-cmd-secret-0123456789abcdef"));
        config.directory.seed_path = Some(seed);
        (dir, config)
    }

    #[test]
    fn test_issue_token_verifies() {
        let (_dir, config) = config_with_seed();
        let ttl = Some(Duration::from_secs(60));
        let issued = issue_token(&config, AccountId::new(1), ttl).unwrap();
        assert_eq!(issued.role, Role::Administrator);

        let codec = TokenCodec::new(&config.security.token.to_token_config()).unwrap();
        let payload = codec.verify(&issued.token).unwrap();
        assert_eq!(payload.sub, AccountId::new(1));
        assert_eq!(payload.role, "administrator");
        assert_eq!(payload.exp - payload.iat, 60);
    }

    #[test]
    fn test_issue_token_rejects_unknown_account_and_role() {
        let (_dir, config) = config_with_seed();
        assert!(issue_token(&config, AccountId::new(99), None).is_err());
        assert!(issue_token(&config, AccountId::new(2), None).is_err());
        assert!(issue_token(&config, AccountId::new(1), Some(Duration::ZERO)).is_err());
    }

    #[test]
    fn test_issue_token_rejects_ttl_past_calendar_range() {
        let (_dir, config) = config_with_seed();
        let ttl = Some(Duration::from_secs(10_000_000_000_000));
        let err = issue_token(&config, AccountId::new(1), ttl).unwrap_err();
        assert!(matches!(err, BinError::Rejected(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);

        let err = issue_token(&config, AccountId::new(1), Some(Duration::from_secs(u64::MAX)))
            .unwrap_err();
        assert!(matches!(err, BinError::Rejected(_)));
    }
}
