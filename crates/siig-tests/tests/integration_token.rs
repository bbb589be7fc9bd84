// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Token Integration Tests
//!
//! - `test_token_*`: issue and verify
//! - `test_tamper_*`: altered credentials
//! - `test_expiry_*`: validity window boundaries

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use siig_api::auth::{Role, TokenCodec, TokenConfig, TokenError};
use siig_core::AccountId;
use siig_tests::prelude::*;

const NOW: i64 = 1_750_000_000;

fn codec() -> TokenCodec {
    CampusFixtures::codec()
}

fn b64(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

// =============================================================================
// Issue and Verify
// =============================================================================

#[test]
fn test_token_round_trip_preserves_claims() {
    let codec = codec();
    let token = codec.issue_at(AccountId::new(42), Role::Instructor, NOW, Duration::from_secs(600));

    let payload = codec.verify_at(&token, NOW + 1).unwrap();
    assert_eq!(payload.sub, AccountId::new(42));
    assert_eq!(payload.role, "instructor");
    assert_eq!(payload.iat, NOW);
    assert_eq!(payload.exp, NOW + 600);
}

#[test]
fn test_token_has_three_segments() {
    let token = codec().issue_session(AccountId::new(1), Role::Administrator);
    assert_eq!(token.split('.').count(), 3);
    assert!(!token.contains('='));
}

#[test]
fn test_token_session_uses_configured_ttl() {
    let codec = codec();
    let token = codec.issue_session(AccountId::new(1), Role::Student);
    let payload = codec.verify(&token).unwrap();
    assert_eq!(payload.exp - payload.iat, 3600);
}

#[test]
fn test_token_from_other_secret_rejected() {
    let other =
        TokenCodec::new(&TokenConfig::new("another-secret-for-integration-tests-xyz")).unwrap();
    let token =
        other.issue_at(AccountId::new(1), Role::Administrator, NOW, Duration::from_secs(60));

    assert_eq!(codec().verify_at(&token, NOW), Err(TokenError::BadSignature));
}

// =============================================================================
// Tampering
// =============================================================================

#[test]
fn test_tamper_payload_swap_rejected() {
    let codec = codec();
    let student = codec.issue_at(AccountId::new(6), Role::Student, NOW, Duration::from_secs(60));
    let admin =
        codec.issue_at(AccountId::new(1), Role::Administrator, NOW, Duration::from_secs(60));

    let s: Vec<&str> = student.split('.').collect();
    let a: Vec<&str> = admin.split('.').collect();
    let forged = format!("{}.{}.{}", s[0], a[1], s[2]);

    assert_eq!(codec.verify_at(&forged, NOW), Err(TokenError::BadSignature));
}

#[test]
fn test_tamper_forged_payload_rejected() {
    let codec = codec();
    let token = codec.issue_at(AccountId::new(6), Role::Student, NOW, Duration::from_secs(60));
    let parts: Vec<&str> = token.split('.').collect();

    let forged_payload = b64(br#"{"sub":1,"role":"administrator","iat":0,"exp":9999999999}"#);
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_eq!(codec.verify_at(&forged, NOW), Err(TokenError::BadSignature));
}

#[test]
fn test_tamper_header_algorithm_ignored() {
    let codec = codec();
    let token = codec.issue_at(AccountId::new(6), Role::Student, NOW, Duration::from_secs(60));
    let parts: Vec<&str> = token.split('.').collect();

    // An attacker-chosen header breaks the signature; "none" never disables it.
    let none_header = b64(br#"{"alg":"none","typ":"JWT"}"#);
    let relabeled = format!("{}.{}.{}", none_header, parts[1], parts[2]);
    assert_eq!(codec.verify_at(&relabeled, NOW), Err(TokenError::BadSignature));

    let unsigned = format!("{}.{}.", none_header, parts[1]);
    assert_eq!(codec.verify_at(&unsigned, NOW), Err(TokenError::BadSignature));
}

#[test]
fn test_tamper_every_signature_byte() {
    let codec = codec();
    let token = codec.issue_at(AccountId::new(6), Role::Student, NOW, Duration::from_secs(60));
    let split = token.rfind('.').unwrap() + 1;

    for i in split..token.len() {
        let mut bytes = token.clone().into_bytes();
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let flipped = String::from_utf8(bytes).unwrap();
        assert_eq!(codec.verify_at(&flipped, NOW), Err(TokenError::BadSignature), "byte {}", i);
    }
}

#[test]
fn test_tamper_truncated_signature_rejected() {
    let codec = codec();
    let token = codec.issue_at(AccountId::new(6), Role::Student, NOW, Duration::from_secs(60));
    let truncated = &token[..token.len() - 1];

    assert_eq!(codec.verify_at(truncated, NOW), Err(TokenError::BadSignature));
}

#[test]
fn test_tamper_segment_count_malformed() {
    let codec = codec();
    for token in ["", "abc", "a.b", "a.b.c.d", "...."] {
        assert!(
            matches!(codec.verify_at(token, NOW), Err(TokenError::MalformedToken(_))),
            "{:?}",
            token
        );
    }
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn test_expiry_boundary() {
    let codec = codec();
    let token =
        codec.issue_at(AccountId::new(1), Role::Administrator, NOW, Duration::from_secs(60));

    assert!(codec.verify_at(&token, NOW + 60).is_ok());
    assert_eq!(
        codec.verify_at(&token, NOW + 61),
        Err(TokenError::Expired { expired_at: NOW + 60 })
    );
}

#[test]
fn test_expiry_checked_after_signature() {
    let other =
        TokenCodec::new(&TokenConfig::new("another-secret-for-integration-tests-xyz")).unwrap();
    let token = other.issue_at(AccountId::new(1), Role::Administrator, 0, Duration::from_secs(1));

    assert_eq!(codec().verify_at(&token, NOW), Err(TokenError::BadSignature));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_token_config_rejects_weak_keys() {
    for secret in ["", "   ", "change-me", "CHANGEME", "secret", "too-short"] {
        assert!(TokenCodec::new(&TokenConfig::new(secret)).is_err(), "{:?}", secret);
    }
    assert!(TokenCodec::new(&TokenConfig::new(TEST_SECRET)).is_ok());
}

#[test]
fn test_token_codec_debug_hides_secret() {
    let debug = format!("{:?} {:?}", codec(), CampusFixtures::token_config());
    assert!(!debug.contains(TEST_SECRET));
}
