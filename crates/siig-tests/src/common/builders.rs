// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builders for identities and row access fields that do not need a
//! directory behind them.

use siig_api::auth::{LinkedEntity, ResolvedIdentity, Role, RowAccess};
use siig_core::{AccountId, InstructorId, StudentId};

// =============================================================================
// IdentityBuilder
// =============================================================================

/// Builder for [`ResolvedIdentity`].
///
/// # Example
///
/// ```rust,ignore
/// let identity = IdentityBuilder::instructor().linked_instructor(7).build();
/// assert_eq!(identity.instructor_id(), Some(InstructorId::new(7)));
/// ```
#[derive(Debug, Clone)]
pub struct IdentityBuilder {
    account_id: AccountId,
    email: String,
    role: Role,
    linked: Option<LinkedEntity>,
}

impl IdentityBuilder {
    /// Creates a builder for the given role.
    pub fn new(role: Role) -> Self {
        Self {
            account_id: AccountId::new(100),
            email: format!("{}@campus.edu", role.as_str()),
            role,
            linked: None,
        }
    }

    /// An administrator.
    pub fn administrator() -> Self {
        Self::new(Role::Administrator)
    }

    /// An unlinked instructor.
    pub fn instructor() -> Self {
        Self::new(Role::Instructor)
    }

    /// An unlinked student.
    pub fn student() -> Self {
        Self::new(Role::Student)
    }

    /// Sets the account id.
    pub fn account_id(mut self, id: i64) -> Self {
        self.account_id = AccountId::new(id);
        self
    }

    /// Sets the email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Links an instructor row.
    pub fn linked_instructor(mut self, id: i64) -> Self {
        self.linked = Some(LinkedEntity::Instructor {
            id: InstructorId::new(id),
            specialty: None,
        });
        self
    }

    /// Links a student row.
    pub fn linked_student(mut self, id: i64) -> Self {
        self.linked = Some(LinkedEntity::Student {
            id: StudentId::new(id),
        });
        self
    }

    /// Builds the identity.
    pub fn build(self) -> ResolvedIdentity {
        let identity = ResolvedIdentity::new(self.account_id, self.email, self.role);
        match self.linked {
            Some(linked) => identity.with_link(linked),
            None => identity,
        }
    }
}

// =============================================================================
// RowBuilder
// =============================================================================

/// Builder for [`RowAccess`].
#[derive(Debug, Clone, Default)]
pub struct RowBuilder {
    row: RowAccess,
}

impl RowBuilder {
    /// Creates a builder with every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owning instructor.
    pub fn owner(mut self, id: i64) -> Self {
        self.row.owner_instructor_id = Some(InstructorId::new(id));
        self
    }

    /// Sets the visibility flag.
    pub fn visible(mut self, visible: bool) -> Self {
        self.row.visible_to_students = Some(visible);
        self
    }

    /// Sets the student.
    pub fn student(mut self, id: i64) -> Self {
        self.row.student_id = Some(StudentId::new(id));
        self
    }

    /// Builds the row.
    pub fn build(self) -> RowAccess {
        self.row
    }
}
