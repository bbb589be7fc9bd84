// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Read-only account and directory lookups.
//!
//! The auth core never writes to storage. It needs exactly three reads:
//!
//! - an account by id (the credential subject)
//! - an instructor row by email
//! - a student row by email
//!
//! [`DirectoryStore`] is the seam a relational backend implements.
//! [`MemoryDirectory`] is the in-process implementation used by the binary
//! when a seed file is configured, and by tests.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DirectoryError, DirectoryResult};
use crate::types::{
    normalize_email, Account, AccountId, InstructorId, InstructorRecord, StudentId, StudentRecord,
};

// =============================================================================
// EmailMatch
// =============================================================================

/// Outcome of an email lookup against a directory table.
///
/// Only [`EmailMatch::Unique`] may be used to link an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailMatch<T> {
    /// No row carries the email.
    None,
    /// Exactly one row carries the email.
    Unique(T),
    /// Several rows carry the email.
    Ambiguous(usize),
}

impl<T> EmailMatch<T> {
    /// Builds a match from every candidate row found.
    pub fn from_candidates(mut rows: Vec<T>) -> Self {
        match rows.len() {
            0 => EmailMatch::None,
            1 => match rows.pop() {
                Some(row) => EmailMatch::Unique(row),
                None => EmailMatch::None,
            },
            n => EmailMatch::Ambiguous(n),
        }
    }

    /// Returns `true` if exactly one row matched.
    pub fn is_unique(&self) -> bool {
        matches!(self, EmailMatch::Unique(_))
    }
}

// =============================================================================
// DirectoryStore
// =============================================================================

/// Read interface over accounts and the instructor/student directories.
///
/// Implementations must match emails case-insensitively after trimming.
/// Every method is a pure read.
pub trait DirectoryStore: Send + Sync {
    /// Loads an account by id.
    fn find_account_by_id(&self, id: AccountId) -> DirectoryResult<Option<Account>>;

    /// Looks up instructor rows by email.
    fn find_instructor_by_email(
        &self,
        email: &str,
    ) -> DirectoryResult<EmailMatch<InstructorRecord>>;

    /// Looks up student rows by email.
    fn find_student_by_email(&self, email: &str) -> DirectoryResult<EmailMatch<StudentRecord>>;

    /// Returns the number of existing accounts.
    fn account_count(&self) -> DirectoryResult<usize>;
}

// =============================================================================
// DirectorySeed
// =============================================================================

/// Serializable snapshot used to populate a [`MemoryDirectory`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySeed {
    /// Login accounts.
    pub accounts: Vec<Account>,
    /// Instructor directory rows.
    pub instructors: Vec<InstructorRecord>,
    /// Student directory rows.
    pub students: Vec<StudentRecord>,
}

impl DirectorySeed {
    /// Checks the seed for duplicate primary keys.
    ///
    /// Duplicate emails are allowed; they resolve as ambiguous matches.
    pub fn validate(&self) -> DirectoryResult<()> {
        let mut accounts = std::collections::HashSet::new();
        for account in &self.accounts {
            if !accounts.insert(account.id) {
                return Err(DirectoryError::invalid_seed(format!(
                    "duplicate account id {}",
                    account.id
                )));
            }
        }

        let mut instructors = std::collections::HashSet::new();
        for row in &self.instructors {
            if !instructors.insert(row.id) {
                return Err(DirectoryError::invalid_seed(format!(
                    "duplicate instructor id {}",
                    row.id
                )));
            }
        }

        let mut students = std::collections::HashSet::new();
        for row in &self.students {
            if !students.insert(row.id) {
                return Err(DirectoryError::invalid_seed(format!(
                    "duplicate student id {}",
                    row.id
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// MemoryDirectory
// =============================================================================

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    instructors: BTreeMap<InstructorId, InstructorRecord>,
    students: BTreeMap<StudentId, StudentRecord>,
}

/// In-memory [`DirectoryStore`].
///
/// Lookups clone rows out of a read lock, so resolvers always work against a
/// consistent snapshot while administrative writes proceed.
///
/// # Examples
///
/// ```
/// use siig_core::{Account, DirectoryStore, InstructorRecord, MemoryDirectory};
///
/// let directory = MemoryDirectory::new();
/// directory.insert_account(Account::new(1, "prof@campus.edu", "teacher"));
/// directory.insert_instructor(InstructorRecord::new(7, "Prof@Campus.edu"));
///
/// let found = directory.find_instructor_by_email(" prof@campus.edu ").unwrap();
/// assert!(found.is_unique());
/// ```
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    tables: RwLock<Tables>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory from a seed document.
    pub fn from_seed(seed: DirectorySeed) -> DirectoryResult<Self> {
        seed.validate()?;

        let directory = Self::new();
        {
            let mut tables = directory.tables.write();
            tables.accounts = seed.accounts.into_iter().map(|a| (a.id, a)).collect();
            tables.instructors = seed.instructors.into_iter().map(|r| (r.id, r)).collect();
            tables.students = seed.students.into_iter().map(|r| (r.id, r)).collect();

            debug!(
                accounts = tables.accounts.len(),
                instructors = tables.instructors.len(),
                students = tables.students.len(),
                "Directory seeded"
            );
        }

        Ok(directory)
    }

    /// Inserts or replaces an account.
    pub fn insert_account(&self, account: Account) -> Option<Account> {
        self.tables.write().accounts.insert(account.id, account)
    }

    /// Removes an account.
    pub fn remove_account(&self, id: AccountId) -> Option<Account> {
        self.tables.write().accounts.remove(&id)
    }

    /// Inserts or replaces an instructor row.
    pub fn insert_instructor(&self, row: InstructorRecord) -> Option<InstructorRecord> {
        self.tables.write().instructors.insert(row.id, row)
    }

    /// Inserts or replaces a student row.
    pub fn insert_student(&self, row: StudentRecord) -> Option<StudentRecord> {
        self.tables.write().students.insert(row.id, row)
    }

    /// Removes a student row.
    pub fn remove_student(&self, id: StudentId) -> Option<StudentRecord> {
        self.tables.write().students.remove(&id)
    }

    /// Returns the number of instructor rows.
    pub fn instructor_count(&self) -> usize {
        self.tables.read().instructors.len()
    }

    /// Returns the number of student rows.
    pub fn student_count(&self) -> usize {
        self.tables.read().students.len()
    }
}

impl DirectoryStore for MemoryDirectory {
    fn find_account_by_id(&self, id: AccountId) -> DirectoryResult<Option<Account>> {
        Ok(self.tables.read().accounts.get(&id).cloned())
    }

    fn find_instructor_by_email(
        &self,
        email: &str,
    ) -> DirectoryResult<EmailMatch<InstructorRecord>> {
        let needle = normalize_email(email);
        let rows = self
            .tables
            .read()
            .instructors
            .values()
            .filter(|row| normalize_email(&row.email) == needle)
            .cloned()
            .collect();
        Ok(EmailMatch::from_candidates(rows))
    }

    fn find_student_by_email(&self, email: &str) -> DirectoryResult<EmailMatch<StudentRecord>> {
        let needle = normalize_email(email);
        let rows = self
            .tables
            .read()
            .students
            .values()
            .filter(|row| normalize_email(&row.email) == needle)
            .cloned()
            .collect();
        Ok(EmailMatch::from_candidates(rows))
    }

    fn account_count(&self) -> DirectoryResult<usize> {
        Ok(self.tables.read().accounts.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
