// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! A small campus whose directory covers every linking outcome: a linked
//! instructor with a specialty, a linked instructor without one, an
//! instructor with no directory row, an instructor whose email is shared,
//! linked and unlinked students, and an account with an unknown role.

use std::sync::Arc;
use std::time::Duration;

use siig_api::auth::{
    IdentityResolver, ResolvedIdentity, Role, RowAccess, TokenCodec, TokenConfig,
};
use siig_api::{ApiConfig, AppState};
use siig_core::{
    Account, AccountId, DirectorySeed, DirectoryStore, InstructorId, InstructorRecord,
    MemoryDirectory, StudentId, StudentRecord,
};

/// Signing secret shared by every fixture.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

// =============================================================================
// Identifiers
// =============================================================================

/// Account ids in the campus directory.
pub struct Accounts;

impl Accounts {
    /// `root@campus.edu`, stored as `admin`.
    pub const ROOT: AccountId = AccountId::new(1);
    /// `ada@campus.edu`, stored as `teacher`, linked to instructor 7.
    pub const ADA: AccountId = AccountId::new(2);
    /// `grace@campus.edu`, stored as `instructor`, linked to instructor 9.
    pub const GRACE: AccountId = AccountId::new(3);
    /// `orphan@campus.edu`, stored as `prof`, no instructor row.
    pub const ORPHAN: AccountId = AccountId::new(4);
    /// `shared@campus.edu`, stored as `teacher`, two instructor rows.
    pub const SHARED: AccountId = AccountId::new(5);
    /// `sam@campus.edu`, stored as `student`, linked to student 30.
    pub const SAM: AccountId = AccountId::new(6);
    /// `lee@campus.edu`, stored as `etudiant`, linked to student 31.
    pub const LEE: AccountId = AccountId::new(7);
    /// `drifter@campus.edu`, stored as `student`, no student row.
    pub const DRIFTER: AccountId = AccountId::new(8);
    /// `janitor@campus.edu`, stored with an unknown role.
    pub const JANITOR: AccountId = AccountId::new(9);
    /// Not present in the directory.
    pub const MISSING: AccountId = AccountId::new(404);
}

/// Instructor directory ids.
pub struct Instructors;

impl Instructors {
    /// Ada, specialty Algebra.
    pub const ADA: InstructorId = InstructorId::new(7);
    /// Grace, no specialty.
    pub const GRACE: InstructorId = InstructorId::new(9);
}

/// Student directory ids.
pub struct Students;

impl Students {
    /// Sam.
    pub const SAM: StudentId = StudentId::new(30);
    /// Lee.
    pub const LEE: StudentId = StudentId::new(31);
}

// =============================================================================
// Campus Directory
// =============================================================================

/// The seeded campus with a resolver and codec over it.
pub struct CampusFixtures {
    directory: Arc<MemoryDirectory>,
    resolver: IdentityResolver,
}

impl CampusFixtures {
    /// Builds the campus directory.
    pub fn new() -> Self {
        let directory = Arc::new(
            MemoryDirectory::from_seed(Self::seed()).expect("campus seed must be valid"),
        );
        let resolver = IdentityResolver::new(Self::codec(), directory.clone());
        Self {
            directory,
            resolver,
        }
    }

    /// The directory rows.
    pub fn seed() -> DirectorySeed {
        DirectorySeed {
            accounts: vec![
                Account::new(Accounts::ROOT, "root@campus.edu", "admin").with_name("Root"),
                Account::new(Accounts::ADA, "ada@campus.edu", "teacher"),
                Account::new(Accounts::GRACE, "grace@campus.edu", "instructor"),
                Account::new(Accounts::ORPHAN, "orphan@campus.edu", "prof"),
                Account::new(Accounts::SHARED, "shared@campus.edu", "teacher"),
                Account::new(Accounts::SAM, "sam@campus.edu", "student"),
                Account::new(Accounts::LEE, "lee@campus.edu", "etudiant"),
                Account::new(Accounts::DRIFTER, "drifter@campus.edu", "student"),
                Account::new(Accounts::JANITOR, "janitor@campus.edu", "janitor"),
            ],
            instructors: vec![
                InstructorRecord::new(Instructors::ADA, " Ada@Campus.EDU ")
                    .with_name("Ada", "Lovelace")
                    .with_specialty("Algebra"),
                InstructorRecord::new(Instructors::GRACE, "grace@campus.edu")
                    .with_name("Grace", "Hopper"),
                InstructorRecord::new(InstructorId::new(11), "shared@campus.edu"),
                InstructorRecord::new(InstructorId::new(12), "SHARED@campus.edu"),
            ],
            students: vec![
                StudentRecord::new(Students::SAM, "sam@campus.edu").with_name("Sam", "Diallo"),
                StudentRecord::new(Students::LEE, "Lee@campus.edu").with_name("Lee", "Kim"),
            ],
        }
    }

    /// The token configuration every fixture signs with.
    pub fn token_config() -> TokenConfig {
        TokenConfig::new(TEST_SECRET).with_ttl(Duration::from_secs(3600))
    }

    /// A codec over [`Self::token_config`].
    pub fn codec() -> TokenCodec {
        TokenCodec::new(&Self::token_config()).expect("fixture token config must be valid")
    }

    /// The API configuration for the campus.
    pub fn api_config() -> ApiConfig {
        ApiConfig::for_token(Self::token_config())
    }

    /// Application state over the campus directory.
    pub fn app_state(&self) -> AppState {
        AppState::builder()
            .config(Self::api_config())
            .directory(self.directory.clone())
            .build()
            .expect("fixture app state must build")
    }

    /// The directory store.
    pub fn directory(&self) -> &Arc<MemoryDirectory> {
        &self.directory
    }

    /// The identity resolver.
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Issues a session token for an account, using the stored role.
    pub fn token(&self, account: AccountId) -> String {
        let stored = self
            .directory
            .find_account_by_id(account)
            .expect("directory lookup")
            .expect("fixture account must exist");
        let role = Role::parse(&stored.role).unwrap_or(Role::Student);
        self.token_as(account, role)
    }

    /// Issues a session token with an explicit role claim.
    pub fn token_as(&self, account: AccountId, role: Role) -> String {
        self.resolver.codec().issue_session(account, role)
    }

    /// Resolves an account through a freshly issued token.
    pub fn identity(&self, account: AccountId) -> ResolvedIdentity {
        self.resolver
            .resolve(&self.token(account))
            .expect("fixture identity must resolve")
    }
}

impl Default for CampusFixtures {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Row Fixtures
// =============================================================================

/// Access fields of representative rows.
pub struct RowFixtures;

impl RowFixtures {
    /// Ada's unpublished assessment.
    pub fn ada_private() -> RowAccess {
        RowAccess::assessment(Some(Instructors::ADA), false)
    }

    /// Ada's published assessment.
    pub fn ada_public() -> RowAccess {
        RowAccess::assessment(Some(Instructors::ADA), true)
    }

    /// Grace's unpublished assessment.
    pub fn grace_private() -> RowAccess {
        RowAccess::assessment(Some(Instructors::GRACE), false)
    }

    /// Grace's published assessment.
    pub fn grace_public() -> RowAccess {
        RowAccess::assessment(Some(Instructors::GRACE), true)
    }

    /// A published assessment with no owner.
    pub fn unowned_public() -> RowAccess {
        RowAccess::assessment(None, true)
    }

    /// Every assessment fixture.
    pub fn assessments() -> Vec<RowAccess> {
        vec![
            Self::ada_private(),
            Self::ada_public(),
            Self::grace_private(),
            Self::grace_public(),
            Self::unowned_public(),
        ]
    }

    /// Grades for Sam and Lee under every assessment fixture.
    pub fn grades() -> Vec<RowAccess> {
        Self::assessments()
            .iter()
            .flat_map(|parent| {
                [
                    RowAccess::grade(parent, Students::SAM),
                    RowAccess::grade(parent, Students::LEE),
                ]
            })
            .collect()
    }

    /// Timetable entries for Ada, Grace and nobody.
    pub fn timetable_entries() -> Vec<RowAccess> {
        vec![
            RowAccess::timetable_entry(Some(Instructors::ADA)),
            RowAccess::timetable_entry(Some(Instructors::GRACE)),
            RowAccess::timetable_entry(None),
        ]
    }

    /// Arbitrary combinations of access fields, including malformed ones.
    pub fn all_shapes() -> Vec<RowAccess> {
        let owners = [None, Some(Instructors::ADA), Some(Instructors::GRACE)];
        let visibility = [None, Some(false), Some(true)];
        let students = [None, Some(Students::SAM), Some(Students::LEE)];

        let mut rows = Vec::new();
        for owner in owners {
            for visible in visibility {
                for student in students {
                    rows.push(RowAccess {
                        owner_instructor_id: owner,
                        visible_to_students: visible,
                        student_id: student,
                    });
                }
            }
        }
        rows
    }
}
