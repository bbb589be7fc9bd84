// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core record types shared by the directory store and the auth layer.
//!
//! These are the rows the authorization core reads. They carry no behaviour
//! beyond identity and email normalization; persistence lives elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier.
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw integer value.
            #[inline]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

record_id!(
    /// Primary key of a login account.
    ///
    /// ```
    /// use siig_core::types::AccountId;
    ///
    /// let id = AccountId::new(42);
    /// assert_eq!(id.get(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    AccountId
);

record_id!(
    /// Primary key of an instructor directory row.
    InstructorId
);

record_id!(
    /// Primary key of a student directory row.
    StudentId
);

// =============================================================================
// Email
// =============================================================================

/// Normalizes an email address for directory matching.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// ```
/// use siig_core::types::normalize_email;
///
/// assert_eq!(normalize_email("  Ada.Lovelace@Campus.EDU "), "ada.lovelace@campus.edu");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// Account
// =============================================================================

/// A login account.
///
/// `role` is kept exactly as stored. Legacy deployments wrote several
/// synonyms there, so it is only interpreted by the identity resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account id, the subject of every credential.
    pub id: AccountId,
    /// Login email.
    pub email: String,
    /// Password hash. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    /// Stored role label.
    pub role: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates an account with the given id, email and stored role label.
    pub fn new(
        id: impl Into<AccountId>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            password_hash: String::new(),
            role: role.into(),
            name: None,
            created_at: None,
        }
    }

    /// Sets the password hash.
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the creation time.
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Returns the normalized email used for directory matching.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

// =============================================================================
// Directory Records
// =============================================================================

/// An instructor directory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorRecord {
    /// Instructor id, the owner key on assessments and timetable entries.
    pub id: InstructorId,
    /// Contact email, matched against account emails.
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Teaching specialty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl InstructorRecord {
    /// Creates an instructor row.
    pub fn new(id: impl Into<InstructorId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            specialty: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the specialty.
    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }
}

/// A student directory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Student id, the key grades are attached to.
    pub id: StudentId,
    /// Contact email, matched against account emails.
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
}

impl StudentRecord {
    /// Creates a student row.
    pub fn new(id: impl Into<StudentId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            registration_number: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the registration number.
    pub fn with_registration_number(mut self, number: impl Into<String>) -> Self {
        self.registration_number = Some(number.into());
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display_and_conversion() {
        let id = InstructorId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(i64::from(id), 7);
        assert_eq!(InstructorId::from(7), id);
    }

    #[test]
    fn test_record_id_serde_transparent() {
        let json = serde_json::to_string(&StudentId::new(12)).unwrap();
        assert_eq!(json, "12");
        let back: StudentId = serde_json::from_str("12").unwrap();
        assert_eq!(back.get(), 12);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("A@B.C"), "a@b.c");
        assert_eq!(normalize_email("\t x@y.z \n"), "x@y.z");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn test_account_password_hash_not_serialized() {
        let account =
            Account::new(1, "admin@campus.edu", "admin").with_password_hash("$2y$10$secret");
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
