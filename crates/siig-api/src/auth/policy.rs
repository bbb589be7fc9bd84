// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization decisions.
//!
//! One decision table per [`ResourceFamily`]:
//!
//! | family    | administrator | instructor                          | student                                  |
//! |-----------|---------------|-------------------------------------|------------------------------------------|
//! | Reference | all           | all                                 | none                                     |
//! | Catalog   | all           | all                                 | list, read                               |
//! | Ownable   | all           | read owned or visible, mutate owned | read visible                             |
//! | Derived   | all           | read owned or visible, mutate owned | read visible rows belonging to them      |
//!
//! An instructor or student with no linked directory row owns nothing and is
//! never a row's student, so every row-level check fails for them.

use serde::Serialize;
use siig_core::InstructorId;
use thiserror::Error;
use tracing::debug;

use super::identity::ResolvedIdentity;
use super::resource::{Action, Resource, ResourceFamily, RowAccess};
use super::role::Role;
use super::scope::ScopeFilter;

// =============================================================================
// Decision
// =============================================================================

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The role may never perform this action on this resource.
    #[error("insufficient role")]
    InsufficientRole,
    /// The row is not owned by the caller, or the caller has no linked row.
    #[error("not owner")]
    NotOwner,
    /// The row is not visible to students.
    #[error("not visible")]
    NotVisible,
}

impl DenyReason {
    /// Returns a stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::InsufficientRole => "insufficient_role",
            DenyReason::NotOwner => "not_owner",
            DenyReason::NotVisible => "not_visible",
        }
    }
}

/// Outcome of an authorization check. A deny is final for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// The action is refused.
    Deny(DenyReason),
}

impl Decision {
    /// Returns `true` if allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Returns the deny reason, if denied.
    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }

    /// Converts into a `Result` for use with `?`.
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

// =============================================================================
// PolicyEngine
// =============================================================================

/// The single place access rules live.
///
/// Stateless: every call depends only on its arguments, so one engine can
/// serve any number of concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEngine;

impl PolicyEngine {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Decides whether `identity` may perform `action` on `resource`.
    ///
    /// `row` carries the candidate row's access fields. For row-scoped
    /// resources it is required for every action except `List`; a missing
    /// row is denied. `List` without a row asks whether the caller may list
    /// at all. The rows they get are then narrowed by [`Self::scope_filter`].
    pub fn authorize(
        &self,
        identity: &ResolvedIdentity,
        resource: Resource,
        action: Action,
        row: Option<&RowAccess>,
    ) -> Decision {
        let decision = decide(identity, resource, action, row);

        if let Decision::Deny(reason) = decision {
            debug!(
                account_id = %identity.account_id,
                role = %identity.role,
                resource = %resource,
                action = %action,
                reason = reason.code(),
                "Authorization denied"
            );
        }

        decision
    }

    /// Returns the predicate list reads of `resource` must be filtered by.
    ///
    /// For every row, `scope_filter(..).matches(row)` agrees with
    /// `authorize(.., Action::Read, Some(row))`.
    pub fn scope_filter(&self, identity: &ResolvedIdentity, resource: Resource) -> ScopeFilter {
        match (identity.role, resource.family()) {
            (Role::Administrator, _) => ScopeFilter::All,
            (_, ResourceFamily::Catalog) => ScopeFilter::All,
            (Role::Instructor, ResourceFamily::Reference) => ScopeFilter::All,
            (Role::Student, ResourceFamily::Reference) => ScopeFilter::Nothing,

            (Role::Instructor, ResourceFamily::Ownable | ResourceFamily::Derived) => {
                match identity.instructor_id() {
                    Some(id) if resource.carries_visibility() => ScopeFilter::OwnedByOrVisible(id),
                    Some(id) => ScopeFilter::OwnedBy(id),
                    None => ScopeFilter::Nothing,
                }
            }

            (Role::Student, ResourceFamily::Ownable) => {
                if resource.carries_visibility() {
                    ScopeFilter::Visible
                } else {
                    ScopeFilter::Nothing
                }
            }

            (Role::Student, ResourceFamily::Derived) => match identity.student_id() {
                Some(id) if resource.carries_visibility() => ScopeFilter::VisibleToStudent(id),
                _ => ScopeFilter::Nothing,
            },
        }
    }

    /// Returns the owner a created or updated row must carry.
    ///
    /// Administrators keep whatever owner they asked for. A linked instructor
    /// always owns what they write, whatever they asked for.
    pub fn effective_owner(
        &self,
        identity: &ResolvedIdentity,
        requested: Option<InstructorId>,
    ) -> Result<Option<InstructorId>, DenyReason> {
        match identity.role {
            Role::Administrator => Ok(requested),
            Role::Instructor => identity.instructor_id().map(Some).ok_or(DenyReason::NotOwner),
            Role::Student => Err(DenyReason::InsufficientRole),
        }
    }

    /// Decides an update that may move a row to a different owner or parent.
    ///
    /// The caller must be allowed to update both the existing row and the row
    /// as it will be stored.
    pub fn authorize_replacement(
        &self,
        identity: &ResolvedIdentity,
        resource: Resource,
        existing: &RowAccess,
        proposed: &RowAccess,
    ) -> Decision {
        match self.authorize(identity, resource, Action::Update, Some(existing)) {
            Decision::Allow => self.authorize(identity, resource, Action::Update, Some(proposed)),
            deny => deny,
        }
    }
}

// =============================================================================
// Decision Tables
// =============================================================================

fn decide(
    identity: &ResolvedIdentity,
    resource: Resource,
    action: Action,
    row: Option<&RowAccess>,
) -> Decision {
    if identity.role == Role::Administrator {
        return Decision::Allow;
    }

    match resource.family() {
        ResourceFamily::Reference => match identity.role {
            Role::Instructor => Decision::Allow,
            _ => Decision::Deny(DenyReason::InsufficientRole),
        },
        ResourceFamily::Catalog => match identity.role {
            Role::Instructor => Decision::Allow,
            _ if action.is_read() => Decision::Allow,
            _ => Decision::Deny(DenyReason::InsufficientRole),
        },
        ResourceFamily::Ownable | ResourceFamily::Derived => match identity.role {
            Role::Instructor => decide_instructor_row(identity, resource, action, row),
            _ => decide_student_row(identity, resource, action, row),
        },
    }
}

fn decide_instructor_row(
    identity: &ResolvedIdentity,
    resource: Resource,
    action: Action,
    row: Option<&RowAccess>,
) -> Decision {
    let row = match (action, row) {
        (_, Some(row)) => row,
        (Action::List, None) => return Decision::Allow,
        (_, None) => return Decision::Deny(DenyReason::NotOwner),
    };

    let Some(instructor) = identity.instructor_id() else {
        return Decision::Deny(DenyReason::NotOwner);
    };

    if row.is_owned_by(instructor) {
        return Decision::Allow;
    }

    if action.is_read() && resource.carries_visibility() && row.is_visible() {
        return Decision::Allow;
    }

    Decision::Deny(DenyReason::NotOwner)
}

fn decide_student_row(
    identity: &ResolvedIdentity,
    resource: Resource,
    action: Action,
    row: Option<&RowAccess>,
) -> Decision {
    if action.is_mutation() {
        return Decision::Deny(DenyReason::InsufficientRole);
    }

    let row = match (action, row) {
        (_, Some(row)) => row,
        (Action::List, None) => return Decision::Allow,
        (_, None) => return Decision::Deny(DenyReason::NotVisible),
    };

    if !(resource.carries_visibility() && row.is_visible()) {
        return Decision::Deny(DenyReason::NotVisible);
    }

    if resource.family() == ResourceFamily::Derived {
        let owns = identity.student_id().is_some_and(|id| row.belongs_to(id));
        if !owns {
            return Decision::Deny(DenyReason::NotOwner);
        }
    }

    Decision::Allow
}

// =============================================================================
// Tests
// =============================================================================
