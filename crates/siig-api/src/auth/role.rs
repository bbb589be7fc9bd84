// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Canonical roles.

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// The three roles the policy engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unrestricted access to every resource.
    Administrator,
    /// Manages reference data and owns assessments and timetable entries.
    Instructor,
    /// Reads published assessments and their own grades.
    Student,
}

impl Role {
    /// Returns the canonical role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }

    /// Parses a stored role label, collapsing legacy synonyms.
    ///
    /// Unknown labels return `None`; callers must treat that as unauthenticated.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "administrator" | "admin" => Some(Role::Administrator),
            "instructor" | "teacher" | "prof" => Some(Role::Instructor),
            "student" | "etudiant" => Some(Role::Student),
            _ => None,
        }
    }

    /// Returns `true` for roles that link to a directory row.
    pub fn links_directory(&self) -> bool {
        matches!(self, Role::Instructor | Role::Student)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Chooses the role for a self-registered account.
///
/// The first account ever created becomes the administrator. After that a
/// caller may ask for instructor or student; anything else, administrator
/// included, falls back to student.
pub fn registration_role(existing_accounts: usize, requested: Option<&str>) -> Role {
    if existing_accounts == 0 {
        return Role::Administrator;
    }

    match requested.and_then(Role::parse) {
        Some(Role::Instructor) => Role::Instructor,
        _ => Role::Student,
    }
}

// =============================================================================
// Tests
// =============================================================================
