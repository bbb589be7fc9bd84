// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binding a verified credential to an account and a directory row.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use siig_core::{
    Account, AccountId, DirectoryError, DirectoryStore, EmailMatch, InstructorId, StudentId,
};
use thiserror::Error;
use tracing::{debug, warn};

use super::codec::{TokenCodec, TokenError};
use super::role::Role;

// =============================================================================
// ResolvedIdentity
// =============================================================================

/// The directory row an instructor or student account is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LinkedEntity {
    /// Linked instructor row.
    Instructor {
        /// Instructor id.
        id: InstructorId,
        /// Teaching specialty, if recorded.
        #[serde(skip_serializing_if = "Option::is_none")]
        specialty: Option<String>,
    },
    /// Linked student row.
    Student {
        /// Student id.
        id: StudentId,
    },
}

impl LinkedEntity {
    /// Returns the raw id of the linked row.
    pub fn id(&self) -> i64 {
        match self {
            LinkedEntity::Instructor { id, .. } => id.get(),
            LinkedEntity::Student { id } => id.get(),
        }
    }
}

/// Who is making the request. Built fresh per request, never persisted.
///
/// `linked` is present only when the account email matched exactly one
/// directory row. An unlinked instructor or student still authenticates but
/// owns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentity {
    /// Account id.
    pub account_id: AccountId,
    /// Account email.
    pub email: String,
    /// Canonical role.
    pub role: Role,
    /// Linked directory row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked: Option<LinkedEntity>,
}

impl ResolvedIdentity {
    /// Creates an unlinked identity.
    pub fn new(account_id: AccountId, email: impl Into<String>, role: Role) -> Self {
        Self {
            account_id,
            email: email.into(),
            role,
            linked: None,
        }
    }

    /// Attaches a directory link.
    pub fn with_link(mut self, linked: LinkedEntity) -> Self {
        self.linked = Some(linked);
        self
    }

    /// Returns the linked instructor id, if this identity is a linked instructor.
    pub fn instructor_id(&self) -> Option<InstructorId> {
        match (&self.role, &self.linked) {
            (Role::Instructor, Some(LinkedEntity::Instructor { id, .. })) => Some(*id),
            _ => None,
        }
    }

    /// Returns the linked student id, if this identity is a linked student.
    pub fn student_id(&self) -> Option<StudentId> {
        match (&self.role, &self.linked) {
            (Role::Student, Some(LinkedEntity::Student { id })) => Some(*id),
            _ => None,
        }
    }

    /// Returns the raw linked row id.
    pub fn linked_entity_id(&self) -> Option<i64> {
        self.linked.as_ref().map(LinkedEntity::id)
    }

    /// Returns role-specific attributes of the linked row.
    pub fn linked_attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attributes = BTreeMap::new();
        if let Some(LinkedEntity::Instructor {
            specialty: Some(specialty),
            ..
        }) = &self.linked
        {
            attributes.insert("specialty", specialty.clone());
        }
        attributes
    }

    /// Returns `true` if a directory row is linked.
    pub fn is_linked(&self) -> bool {
        self.linked.is_some()
    }

    /// Returns `true` for administrators.
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why a request could not be authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnauthenticatedReason {
    /// No bearer credential was presented.
    #[error("no bearer credential")]
    MissingCredential,
    /// The credential failed verification.
    #[error("{0}")]
    Token(#[from] TokenError),
    /// The subject account no longer exists.
    #[error("account not found")]
    AccountNotFound,
    /// The stored role label is not one of the known roles.
    #[error("unrecognized role")]
    UnrecognizedRole,
}

/// Identity resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The caller is not authenticated (HTTP 401).
    #[error("Unauthenticated: {0}")]
    Unauthenticated(UnauthenticatedReason),

    /// The directory store failed (HTTP 503 or 500). The request is still denied.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl ResolveError {
    /// Returns the unauthenticated reason, if that is what this is.
    pub fn unauthenticated_reason(&self) -> Option<&UnauthenticatedReason> {
        match self {
            ResolveError::Unauthenticated(reason) => Some(reason),
            ResolveError::Directory(_) => None,
        }
    }
}

impl From<UnauthenticatedReason> for ResolveError {
    fn from(reason: UnauthenticatedReason) -> Self {
        ResolveError::Unauthenticated(reason)
    }
}

impl From<TokenError> for ResolveError {
    fn from(err: TokenError) -> Self {
        ResolveError::Unauthenticated(UnauthenticatedReason::Token(err))
    }
}

// =============================================================================
// IdentityResolver
// =============================================================================

/// Turns a bearer credential into a [`ResolvedIdentity`].
///
/// Pure over its inputs: the credential and a read-only directory snapshot.
#[derive(Clone)]
pub struct IdentityResolver {
    codec: TokenCodec,
    directory: Arc<dyn DirectoryStore>,
}

impl IdentityResolver {
    /// Creates a resolver.
    pub fn new(codec: TokenCodec, directory: Arc<dyn DirectoryStore>) -> Self {
        Self { codec, directory }
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Returns the directory store.
    pub fn directory(&self) -> &Arc<dyn DirectoryStore> {
        &self.directory
    }

    /// Resolves a credential against the current time.
    pub fn resolve(&self, token: &str) -> Result<ResolvedIdentity, ResolveError> {
        self.resolve_at(token, Utc::now().timestamp())
    }

    /// Resolves a credential as if the current time were `now`.
    pub fn resolve_at(&self, token: &str, now: i64) -> Result<ResolvedIdentity, ResolveError> {
        let payload = self.codec.verify_at(token, now).map_err(|e| {
            debug!(error = %e, "Credential rejected");
            ResolveError::from(e)
        })?;

        let account = self
            .directory
            .find_account_by_id(payload.subject())?
            .ok_or_else(|| {
                debug!(account_id = %payload.subject(), "Credential subject has no account");
                ResolveError::from(UnauthenticatedReason::AccountNotFound)
            })?;

        self.identity_for_account(&account)
    }

    /// Resolves the value of an `Authorization` header.
    pub fn resolve_bearer(&self, header: Option<&str>) -> Result<ResolvedIdentity, ResolveError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(ResolveError::Unauthenticated(UnauthenticatedReason::MissingCredential))?;
        self.resolve(token)
    }

    /// Builds the identity for an already-loaded account.
    ///
    /// Login flows call this right after checking the password.
    pub fn identity_for_account(
        &self,
        account: &Account,
    ) -> Result<ResolvedIdentity, ResolveError> {
        let role = Role::parse(&account.role).ok_or_else(|| {
            warn!(account_id = %account.id, "Account has an unrecognized role label");
            ResolveError::from(UnauthenticatedReason::UnrecognizedRole)
        })?;

        let identity = ResolvedIdentity::new(account.id, account.email.clone(), role);
        let linked = self.link(account, role)?;

        Ok(match linked {
            Some(linked) => identity.with_link(linked),
            None => identity,
        })
    }

    fn link(&self, account: &Account, role: Role) -> Result<Option<LinkedEntity>, DirectoryError> {
        let email = account.normalized_email();
        if email.is_empty() || !role.links_directory() {
            return Ok(None);
        }

        let linked = match role {
            Role::Instructor => match self.directory.find_instructor_by_email(&email)? {
                EmailMatch::Unique(row) => Some(LinkedEntity::Instructor {
                    id: row.id,
                    specialty: row.specialty,
                }),
                EmailMatch::Ambiguous(count) => {
                    warn!(
                        account_id = %account.id,
                        count,
                        "Instructor email matches several rows, not linking"
                    );
                    None
                }
                EmailMatch::None => None,
            },
            Role::Student => match self.directory.find_student_by_email(&email)? {
                EmailMatch::Unique(row) => Some(LinkedEntity::Student { id: row.id }),
                EmailMatch::Ambiguous(count) => {
                    warn!(
                        account_id = %account.id,
                        count,
                        "Student email matches several rows, not linking"
                    );
                    None
                }
                EmailMatch::None => None,
            },
            Role::Administrator => None,
        };

        if linked.is_none() {
            debug!(account_id = %account.id, role = %role, "Identity has no linked directory row");
        }

        Ok(linked)
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the credential from an `Authorization` header value.
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::TokenConfig;
    use siig_core::{InstructorRecord, MemoryDirectory, StudentRecord};
    use std::time::Duration;

    fn resolver() -> (IdentityResolver, Arc<MemoryDirectory>) {
        let directory = Arc::new(MemoryDirectory::new());
        directory.insert_account(Account::new(1, "root@campus.edu", "admin"));
        directory.insert_account(Account::new(2, " Ada@Campus.edu ", "teacher"));
        directory.insert_account(Account::new(3, "sam@campus.edu", "etudiant"));
        directory.insert_account(Account::new(4, "ghost@campus.edu", "prof"));
        directory.insert_account(Account::new(5, "weird@campus.edu", "janitor"));
        let ada = InstructorRecord::new(7, "ada@campus.edu").with_specialty("Algebra");
        directory.insert_instructor(ada);
        directory.insert_student(StudentRecord::new(30, "SAM@campus.edu"));

        let codec =
            TokenCodec::new(&TokenConfig::new("identity-test-secret-0123456789abcdef")).unwrap();
        (IdentityResolver::new(codec, directory.clone()), directory)
    }

    fn token(resolver: &IdentityResolver, id: i64) -> String {
        resolver
            .codec()
            .issue(AccountId::new(id), Role::Student, Duration::from_secs(300))
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc  "), Some("abc"));
        assert_eq!(bearer_token("  BEARER\tabc"), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_resolve_instructor_links_unique_email() {
        let (resolver, _) = resolver();
        let identity = resolver.resolve(&token(&resolver, 2)).unwrap();
        assert_eq!(identity.role, Role::Instructor);
        assert_eq!(identity.instructor_id(), Some(InstructorId::new(7)));
        assert_eq!(identity.linked_entity_id(), Some(7));
        assert_eq!(
            identity.linked_attributes().get("specialty").map(String::as_str),
            Some("Algebra")
        );
    }

    #[test]
    fn test_account_role_wins_over_token_role() {
        let (resolver, _) = resolver();
        // Token claims student, account says teacher.
        let identity = resolver.resolve(&token(&resolver, 2)).unwrap();
        assert_eq!(identity.role, Role::Instructor);
    }

    #[test]
    fn test_resolve_student_links() {
        let (resolver, _) = resolver();
        let identity = resolver.resolve(&token(&resolver, 3)).unwrap();
        assert_eq!(identity.role, Role::Student);
        assert_eq!(identity.student_id(), Some(StudentId::new(30)));
    }

    #[test]
    fn test_resolve_admin_never_links() {
        let (resolver, _) = resolver();
        let identity = resolver.resolve(&token(&resolver, 1)).unwrap();
        assert!(identity.is_administrator());
        assert!(!identity.is_linked());
    }

    #[test]
    fn test_unmatched_instructor_is_unlinked() {
        let (resolver, _) = resolver();
        let identity = resolver.resolve(&token(&resolver, 4)).unwrap();
        assert_eq!(identity.role, Role::Instructor);
        assert_eq!(identity.instructor_id(), None);
        assert!(identity.linked_attributes().is_empty());
    }

    #[test]
    fn test_ambiguous_email_is_unlinked() {
        let (resolver, directory) = resolver();
        directory.insert_instructor(InstructorRecord::new(8, "ADA@campus.edu"));
        let identity = resolver.resolve(&token(&resolver, 2)).unwrap();
        assert!(!identity.is_linked());
    }

    #[test]
    fn test_deleted_account_is_unauthenticated() {
        let (resolver, directory) = resolver();
        let credential = token(&resolver, 3);
        directory.remove_account(AccountId::new(3));
        let err = resolver.resolve(&credential).unwrap_err();
        assert_eq!(
            err.unauthenticated_reason(),
            Some(&UnauthenticatedReason::AccountNotFound)
        );
    }

    #[test]
    fn test_unknown_role_is_unauthenticated() {
        let (resolver, _) = resolver();
        let err = resolver.resolve(&token(&resolver, 5)).unwrap_err();
        assert_eq!(
            err.unauthenticated_reason(),
            Some(&UnauthenticatedReason::UnrecognizedRole)
        );
    }

    #[test]
    fn test_codec_failure_is_unauthenticated() {
        let (resolver, _) = resolver();
        let err = resolver.resolve("not-a-token").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Unauthenticated(UnauthenticatedReason::Token(
                TokenError::MalformedToken(_)
            ))
        ));
    }

    #[test]
    fn test_resolve_bearer_missing() {
        let (resolver, _) = resolver();
        let err = resolver.resolve_bearer(None).unwrap_err();
        assert_eq!(
            err.unauthenticated_reason(),
            Some(&UnauthenticatedReason::MissingCredential)
        );
        let header = format!("Bearer {}", token(&resolver, 1));
        assert!(resolver.resolve_bearer(Some(&header)).is_ok());
    }

    #[test]
    fn test_identity_serializes_link() {
        let identity = ResolvedIdentity::new(AccountId::new(2), "ada@campus.edu", Role::Instructor)
            .with_link(LinkedEntity::Instructor {
                id: InstructorId::new(7),
                specialty: None,
            });
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["role"], "instructor");
        assert_eq!(json["linked"]["kind"], "instructor");
        assert_eq!(json["linked"]["id"], 7);
    }
}
