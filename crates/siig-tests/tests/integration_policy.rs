// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Policy Integration Tests
//!
//! Decision tables evaluated against identities resolved from the campus
//! directory, and agreement between `authorize` and `scope_filter`.
//!
//! - `test_policy_*`: single decisions
//! - `test_scope_*`: list filtering
//! - `test_concurrent_*`: parallel evaluation

use std::sync::Arc;

use siig_api::auth::{
    Action, Decision, DenyReason, PolicyEngine, ResolvedIdentity, Resource, RowAccess,
    ScopeFilter,
};
use siig_core::AccountId;
use siig_tests::prelude::*;

fn engine() -> PolicyEngine {
    PolicyEngine::new()
}

fn everyone(campus: &CampusFixtures) -> Vec<ResolvedIdentity> {
    [
        Accounts::ROOT,
        Accounts::ADA,
        Accounts::GRACE,
        Accounts::ORPHAN,
        Accounts::SHARED,
        Accounts::SAM,
        Accounts::LEE,
        Accounts::DRIFTER,
    ]
    .into_iter()
    .map(|account| campus.identity(account))
    .collect()
}

// =============================================================================
// Single Decisions
// =============================================================================

#[test]
fn test_policy_private_assessment() {
    let campus = CampusFixtures::new();
    let row = RowFixtures::ada_private();
    let policy = engine();

    let ada = campus.identity(Accounts::ADA);
    let grace = campus.identity(Accounts::GRACE);
    let sam = campus.identity(Accounts::SAM);
    let root = campus.identity(Accounts::ROOT);

    assert!(policy.authorize(&ada, Resource::Assessments, Action::Update, Some(&row)).is_allowed());
    assert_eq!(
        policy.authorize(&grace, Resource::Assessments, Action::Update, Some(&row)),
        Decision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        policy.authorize(&sam, Resource::Assessments, Action::Read, Some(&row)),
        Decision::Deny(DenyReason::NotVisible)
    );
    assert!(policy.authorize(&root, Resource::Assessments, Action::Read, Some(&row)).is_allowed());
    assert!(policy
        .authorize(&root, Resource::Assessments, Action::Update, Some(&row))
        .is_allowed());
}

#[test]
fn test_policy_public_assessment() {
    let campus = CampusFixtures::new();
    let row = RowFixtures::ada_public();
    let policy = engine();

    let grace = campus.identity(Accounts::GRACE);
    assert!(policy.authorize(&grace, Resource::Assessments, Action::Read, Some(&row)).is_allowed());
    for action in [Action::Update, Action::Delete] {
        assert_eq!(
            policy.authorize(&grace, Resource::Assessments, action, Some(&row)),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    let sam = campus.identity(Accounts::SAM);
    assert!(policy.authorize(&sam, Resource::Assessments, Action::Read, Some(&row)).is_allowed());
    assert_eq!(
        policy.authorize(&sam, Resource::Assessments, Action::Update, Some(&row)),
        Decision::Deny(DenyReason::InsufficientRole)
    );
}

#[test]
fn test_policy_unlinked_instructor_owns_nothing() {
    let campus = CampusFixtures::new();
    let policy = engine();

    for account in [Accounts::ORPHAN, Accounts::SHARED] {
        let identity = campus.identity(account);
        for row in RowFixtures::assessments() {
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert_eq!(
                    policy.authorize(&identity, Resource::Assessments, action, Some(&row)),
                    Decision::Deny(DenyReason::NotOwner)
                );
            }
        }
        assert_eq!(
            policy.scope_filter(&identity, Resource::Assessments),
            ScopeFilter::Nothing
        );
        assert_eq!(
            policy.effective_owner(&identity, Some(Instructors::ADA)),
            Err(DenyReason::NotOwner)
        );
    }
}

#[test]
fn test_policy_reference_tables() {
    let campus = CampusFixtures::new();
    let policy = engine();
    let ada = campus.identity(Accounts::ADA);
    let orphan = campus.identity(Accounts::ORPHAN);
    let sam = campus.identity(Accounts::SAM);

    for resource in Resource::ALL.into_iter().filter(|r| !r.is_row_scoped()) {
        for action in Action::ALL {
            assert!(policy.authorize(&ada, resource, action, None).is_allowed());
            assert!(policy.authorize(&orphan, resource, action, None).is_allowed());

            let expected = if resource == Resource::Courses && action.is_read() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::InsufficientRole)
            };
            assert_eq!(
                policy.authorize(&sam, resource, action, None),
                expected,
                "{} {}",
                resource,
                action
            );
        }
    }
}

#[test]
fn test_policy_timetable_entries() {
    let campus = CampusFixtures::new();
    let policy = engine();
    let ada = campus.identity(Accounts::ADA);
    let sam = campus.identity(Accounts::SAM);

    let own = RowAccess::timetable_entry(Some(Instructors::ADA));
    let other = RowAccess::timetable_entry(Some(Instructors::GRACE));

    assert!(policy
        .authorize(&ada, Resource::TimetableEntries, Action::Delete, Some(&own))
        .is_allowed());
    assert_eq!(
        policy.authorize(&ada, Resource::TimetableEntries, Action::Read, Some(&other)),
        Decision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        policy.authorize(&sam, Resource::TimetableEntries, Action::Read, Some(&own)),
        Decision::Deny(DenyReason::NotVisible)
    );
}

#[test]
fn test_policy_grades_follow_parent() {
    let campus = CampusFixtures::new();
    let policy = engine();
    let sam = campus.identity(Accounts::SAM);
    let lee = campus.identity(Accounts::LEE);
    let drifter = campus.identity(Accounts::DRIFTER);

    let sams_public = RowAccess::grade(&RowFixtures::ada_public(), Students::SAM);
    let sams_private = RowAccess::grade(&RowFixtures::ada_private(), Students::SAM);

    assert!(policy
        .authorize(&sam, Resource::Grades, Action::Read, Some(&sams_public))
        .is_allowed());
    assert_eq!(
        policy.authorize(&sam, Resource::Grades, Action::Read, Some(&sams_private)),
        Decision::Deny(DenyReason::NotVisible)
    );
    assert_eq!(
        policy.authorize(&lee, Resource::Grades, Action::Read, Some(&sams_public)),
        Decision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        policy.authorize(&drifter, Resource::Grades, Action::Read, Some(&sams_public)),
        Decision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        policy.scope_filter(&drifter, Resource::Grades),
        ScopeFilter::Nothing
    );
}

#[test]
fn test_policy_row_required_outside_list() {
    let campus = CampusFixtures::new();
    let policy = engine();
    let ada = campus.identity(Accounts::ADA);
    let sam = campus.identity(Accounts::SAM);

    assert!(policy.authorize(&ada, Resource::Assessments, Action::List, None).is_allowed());
    assert_eq!(
        policy.authorize(&ada, Resource::Assessments, Action::Read, None),
        Decision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        policy.authorize(&sam, Resource::Grades, Action::Read, None),
        Decision::Deny(DenyReason::NotVisible)
    );
}

#[test]
fn test_policy_reassignment_requires_both_sides() {
    let campus = CampusFixtures::new();
    let policy = engine();
    let ada = campus.identity(Accounts::ADA);
    let root = campus.identity(Accounts::ROOT);

    let mine = RowFixtures::ada_private();
    let theirs = RowFixtures::grace_private();

    assert_eq!(
        policy.authorize_replacement(&ada, Resource::Assessments, &mine, &theirs),
        Decision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        policy.authorize_replacement(&ada, Resource::Assessments, &theirs, &mine),
        Decision::Deny(DenyReason::NotOwner)
    );
    assert!(policy
        .authorize_replacement(&root, Resource::Assessments, &mine, &theirs)
        .is_allowed());
    assert_eq!(
        policy.effective_owner(&ada, Some(Instructors::GRACE)),
        Ok(Some(Instructors::ADA))
    );
}

// =============================================================================
// Scope Filtering
// =============================================================================

#[test]
fn test_scope_agrees_with_read_for_every_row() {
    let campus = CampusFixtures::new();
    let policy = engine();

    for identity in everyone(&campus) {
        for resource in Resource::ALL {
            let scope = policy.scope_filter(&identity, resource);
            for row in RowFixtures::all_shapes() {
                let allowed = policy
                    .authorize(&identity, resource, Action::Read, Some(&row))
                    .is_allowed();
                assert_eq!(
                    scope.matches(&row),
                    allowed,
                    "account {} resource {} row {:?}",
                    identity.account_id,
                    resource,
                    row
                );
            }
        }
    }
}

#[test]
fn test_scope_lists_differ_per_caller() {
    let campus = CampusFixtures::new();
    let policy = engine();
    let rows = RowFixtures::assessments();

    let list = |account: AccountId| {
        policy
            .scope_filter(&campus.identity(account), Resource::Assessments)
            .apply(rows.clone())
    };

    assert_eq!(list(Accounts::ROOT), rows);
    assert_eq!(
        list(Accounts::ADA),
        vec![
            RowFixtures::ada_private(),
            RowFixtures::ada_public(),
            RowFixtures::grace_public(),
            RowFixtures::unowned_public(),
        ]
    );
    assert_eq!(
        list(Accounts::GRACE),
        vec![
            RowFixtures::ada_public(),
            RowFixtures::grace_private(),
            RowFixtures::grace_public(),
            RowFixtures::unowned_public(),
        ]
    );
    assert_eq!(
        list(Accounts::SAM),
        vec![
            RowFixtures::ada_public(),
            RowFixtures::grace_public(),
            RowFixtures::unowned_public(),
        ]
    );
    assert!(list(Accounts::ORPHAN).is_empty());
}

#[test]
fn test_scope_student_grades_are_own_and_visible() {
    let campus = CampusFixtures::new();
    let policy = engine();

    let sam = campus.identity(Accounts::SAM);
    let visible = policy
        .scope_filter(&sam, Resource::Grades)
        .apply(RowFixtures::grades());

    assert_eq!(visible.len(), 3);
    assert!(visible.iter().all(|g| g.is_visible() && g.belongs_to(Students::SAM)));
}

#[test]
fn test_scope_renders_sql() {
    use siig_api::auth::ScopeColumns;

    let campus = CampusFixtures::new();
    let policy = engine();
    let ada = campus.identity(Accounts::ADA);

    let columns = ScopeColumns::for_resource(Resource::Assessments).unwrap();
    let predicate = policy.scope_filter(&ada, Resource::Assessments).to_sql(&columns);
    assert_eq!(predicate.binds, vec![Instructors::ADA.get()]);
    assert!(predicate.clause.contains('?'));

    assert!(ScopeColumns::for_resource(Resource::Subjects).is_none());
}

// =============================================================================
// Concurrency
// =============================================================================

fn evaluate(
    policy: &PolicyEngine,
    identities: &[ResolvedIdentity],
    rows: &[RowAccess],
) -> Vec<Decision> {
    let mut out = Vec::new();
    for identity in identities {
        for resource in Resource::ALL {
            for action in Action::ALL {
                for row in rows {
                    out.push(policy.authorize(identity, resource, action, Some(row)));
                }
            }
        }
    }
    out
}

#[test]
fn test_concurrent_matches_sequential() {
    let campus = CampusFixtures::new();
    let identities = Arc::new(everyone(&campus));
    let rows = Arc::new(RowFixtures::all_shapes());

    let sequential = evaluate(&engine(), &identities, &rows);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let identities = identities.clone();
            let rows = rows.clone();
            std::thread::spawn(move || evaluate(&PolicyEngine::new(), &identities, &rows))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), sequential);
    }
}
