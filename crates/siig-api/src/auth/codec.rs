// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed credential encoding and verification.
//!
//! A credential is three base64url segments (padding stripped) joined by `.`:
//!
//! ```text
//! base64url(header) . base64url(payload) . base64url(HMAC-SHA256(key, header_b64 "." payload_b64))
//! ```
//!
//! The header is written for interoperability and never read back. Verification
//! always re-derives the signature with the configured key and algorithm, so an
//! `alg` field inside a presented token has no effect.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use siig_core::AccountId;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::claims::TokenPayload;
use super::role::Role;

type HmacSha256 = Hmac<Sha256>;

/// Fixed header written into every credential.
const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Default validity window: seven days.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Minimum accepted signing key length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Values shipped in sample configs that must never sign real credentials.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "change-me-in-env", "changeme", "secret"];

// =============================================================================
// Errors
// =============================================================================

/// Reasons a presented credential is rejected.
///
/// Kinds differ for diagnostics only. The HTTP edge maps all of them to the
/// same 401 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong segment count, bad base64, or a payload that is not a record.
    #[error("Malformed token: {0}")]
    MalformedToken(&'static str),

    /// The signature does not match the header and payload.
    #[error("Token signature mismatch")]
    BadSignature,

    /// The credential is past its expiry.
    #[error("Token expired at {expired_at}")]
    Expired {
        /// Expiry (Unix seconds).
        expired_at: i64,
    },
}

/// Signing key configuration problems. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenConfigError {
    /// No key configured.
    #[error("Token signing secret is not configured")]
    MissingSecret,

    /// Key shorter than [`MIN_SECRET_LEN`].
    #[error("Token signing secret is too short ({len} bytes, minimum {min})")]
    ShortSecret {
        /// Actual length.
        len: usize,
        /// Required length.
        min: usize,
    },

    /// Key is a known sample value.
    #[error("Token signing secret is a placeholder value")]
    PlaceholderSecret,

    /// Zero validity window.
    #[error("Token TTL must be greater than zero")]
    InvalidTtl,

    /// The MAC rejected the key.
    #[error("Token signing key rejected: {0}")]
    InvalidKey(String),
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Signing configuration, loaded once at process start.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Symmetric signing secret.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Validity window for session credentials.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the operator
            ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

impl TokenConfig {
    /// Creates a configuration with the given secret and the default TTL.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TokenConfigError> {
        let secret = self.secret.trim();
        if secret.is_empty() {
            return Err(TokenConfigError::MissingSecret);
        }
        if PLACEHOLDER_SECRETS
            .iter()
            .any(|p| secret.eq_ignore_ascii_case(p))
        {
            return Err(TokenConfigError::PlaceholderSecret);
        }
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(TokenConfigError::ShortSecret {
                len: self.secret.len(),
                min: MIN_SECRET_LEN,
            });
        }
        if self.ttl.is_zero() {
            return Err(TokenConfigError::InvalidTtl);
        }
        Ok(())
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

// =============================================================================
// SigningKey
// =============================================================================

/// A MAC already keyed with the signing secret.
///
/// The raw secret is not retained; each signature clones the keyed state.
#[derive(Clone)]
struct SigningKey(HmacSha256);

impl SigningKey {
    fn new(secret: &[u8]) -> Result<Self, TokenConfigError> {
        HmacSha256::new_from_slice(secret)
            .map(Self)
            .map_err(|e| TokenConfigError::InvalidKey(e.to_string()))
    }

    fn sign(&self, signing_input: &[u8]) -> String {
        let mut mac = self.0.clone();
        mac.update(signing_input);
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Issues and verifies credentials.
///
/// Cheap to clone; holds only immutable key material. Safe to share across
/// any number of concurrent requests.
#[derive(Clone)]
pub struct TokenCodec {
    key: Arc<SigningKey>,
    ttl: Duration,
}

impl TokenCodec {
    /// Builds a codec from validated configuration.
    pub fn new(config: &TokenConfig) -> Result<Self, TokenConfigError> {
        config.validate()?;

        Ok(Self {
            key: Arc::new(SigningKey::new(config.secret.as_bytes())?),
            ttl: config.ttl,
        })
    }

    /// Returns the session TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a credential valid for `ttl` from now.
    pub fn issue(&self, subject: AccountId, role: Role, ttl: Duration) -> String {
        self.issue_at(subject, role, Utc::now().timestamp(), ttl)
    }

    /// Issues a credential with the configured session TTL.
    pub fn issue_session(&self, subject: AccountId, role: Role) -> String {
        self.issue(subject, role, self.ttl)
    }

    /// Issues a credential as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject: AccountId,
        role: Role,
        issued_at: i64,
        ttl: Duration,
    ) -> String {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let payload = TokenPayload::new(subject, role, issued_at, ttl_secs);

        let header_b64 = URL_SAFE_NO_PAD.encode(TOKEN_HEADER);
        let payload_b64 = URL_SAFE_NO_PAD.encode(encode_payload(&payload));
        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature = self.key.sign(signing_input.as_bytes());

        format!("{signing_input}.{signature}")
    }

    /// Verifies a credential against the current time.
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verifies a credential as if the current time were `now`.
    ///
    /// Checks run in a fixed order: segment count, signature, payload
    /// decoding, expiry. Nothing from the payload is read before the
    /// signature has matched.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<TokenPayload, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::MalformedToken("expected three segments"));
        };

        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
        let expected = self.key.sign(signing_input.as_bytes());
        if !bool::from(expected.as_bytes().ct_eq(signature_b64.as_bytes())) {
            return Err(TokenError::BadSignature);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::MalformedToken("payload is not base64url"))?;
        let payload: TokenPayload = serde_json::from_slice(&payload_bytes)
            .map_err(|_| TokenError::MalformedToken("payload is not a credential record"))?;

        if payload.is_expired_at(now) {
            return Err(TokenError::Expired {
                expired_at: payload.exp,
            });
        }

        Ok(payload)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn encode_payload(payload: &TokenPayload) -> String {
    serde_json::json!({
        "sub": payload.sub.get(),
        "role": payload.role,
        "iat": payload.iat,
        "exp": payload.exp,
    })
    .to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-signing-secret-0123456789abcdef";

    fn codec() -> TokenCodec {
        TokenCodec::new(&TokenConfig::new(SECRET)).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            TokenConfig::new("").validate(),
            Err(TokenConfigError::MissingSecret)
        );
        assert_eq!(
            TokenConfig::new("   ").validate(),
            Err(TokenConfigError::MissingSecret)
        );
        assert_eq!(
            TokenConfig::new("change-me-in-env").validate(),
            Err(TokenConfigError::PlaceholderSecret)
        );
        assert!(matches!(
            TokenConfig::new("short").validate(),
            Err(TokenConfigError::ShortSecret { len: 5, min: 32 })
        ));
        assert_eq!(
            TokenConfig::new(SECRET).with_ttl(Duration::ZERO).validate(),
            Err(TokenConfigError::InvalidTtl)
        );
        assert!(TokenConfig::new(SECRET).validate().is_ok());
    }

    #[test]
    fn test_default_ttl_is_seven_days() {
        assert_eq!(TokenConfig::default().ttl, Duration::from_secs(604_800));
        assert_eq!(codec().ttl(), DEFAULT_TOKEN_TTL);
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let codec = codec();
        let token =
            codec.issue_at(AccountId::new(11), Role::Instructor, 1_000, Duration::from_secs(60));
        assert_eq!(token.split('.').count(), 3);
        assert!(!token.contains('='));

        let payload = codec.verify_at(&token, 1_030).unwrap();
        assert_eq!(payload.sub, AccountId::new(11));
        assert_eq!(payload.role, "instructor");
        assert_eq!(payload.iat, 1_000);
        assert_eq!(payload.exp, 1_060);
    }

    #[test]
    fn test_expiry_is_strictly_after() {
        let codec = codec();
        let token =
            codec.issue_at(AccountId::new(1), Role::Student, 1_000, Duration::from_secs(60));
        assert!(codec.verify_at(&token, 1_060).is_ok());
        assert_eq!(
            codec.verify_at(&token, 1_061),
            Err(TokenError::Expired { expired_at: 1_060 })
        );
    }

    #[test]
    fn test_wrong_segment_count() {
        let codec = codec();
        assert!(matches!(codec.verify("abc"), Err(TokenError::MalformedToken(_))));
        assert!(matches!(codec.verify("a.b"), Err(TokenError::MalformedToken(_))));
        assert!(matches!(codec.verify("a.b.c.d"), Err(TokenError::MalformedToken(_))));
        assert!(matches!(codec.verify(""), Err(TokenError::MalformedToken(_))));
    }

    #[test]
    fn test_signature_checked_before_payload() {
        let codec = codec();
        // Garbage payload with a wrong signature reports the signature.
        assert_eq!(codec.verify("x.y.z"), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_signed_garbage_payload_is_malformed() {
        let codec = codec();
        let header = URL_SAFE_NO_PAD.encode(TOKEN_HEADER);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"not-a-number"}"#);
        let input = format!("{header}.{payload}");
        let token = format!("{input}.{}", codec.key.sign(input.as_bytes()));
        assert!(matches!(codec.verify(&token), Err(TokenError::MalformedToken(_))));

        let input = format!("{header}.%%%");
        let token = format!("{input}.{}", codec.key.sign(input.as_bytes()));
        assert!(matches!(codec.verify(&token), Err(TokenError::MalformedToken(_))));
    }

    #[test]
    fn test_header_algorithm_is_ignored() {
        let codec = codec();
        let token = codec.issue(AccountId::new(1), Role::Administrator, Duration::from_secs(60));
        let parts: Vec<&str> = token.split('.').collect();

        // Unsigned token claiming alg=none.
        let none_header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let stripped = format!("{}.{}.", none_header, parts[1]);
        assert_eq!(codec.verify(&stripped), Err(TokenError::BadSignature));

        // Valid signature moved under a different header.
        let swapped = format!("{}.{}.{}", none_header, parts[1], parts[2]);
        assert_eq!(codec.verify(&swapped), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_different_key_rejects() {
        let token = codec().issue(AccountId::new(1), Role::Student, Duration::from_secs(60));
        let other =
            TokenCodec::new(&TokenConfig::new("another-signing-secret-0123456789abcdef")).unwrap();
        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = TokenConfig::new(SECRET);
        assert!(!format!("{:?}", config).contains(SECRET));
        assert!(!format!("{:?}", codec()).contains(SECRET));
    }
}
