// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! List-read predicates.
//!
//! A [`ScopeFilter`] is the list form of the read rule. It can be evaluated
//! in process against [`RowAccess`] values, or rendered into a parameterized
//! SQL predicate so the query layer never fetches rows the caller may not see.

use serde::Serialize;
use siig_core::{InstructorId, StudentId};

use super::resource::{AccessRow, Resource, RowAccess};

// =============================================================================
// ScopeFilter
// =============================================================================

/// Which rows of a resource a caller may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum ScopeFilter {
    /// Every row.
    All,
    /// No row.
    Nothing,
    /// Rows owned by the instructor.
    OwnedBy(InstructorId),
    /// Rows owned by the instructor, plus rows visible to students.
    OwnedByOrVisible(InstructorId),
    /// Rows visible to students.
    Visible,
    /// Visible rows belonging to the student.
    VisibleToStudent(StudentId),
}

impl ScopeFilter {
    /// Evaluates the predicate against one row.
    pub fn matches(&self, row: &RowAccess) -> bool {
        match *self {
            ScopeFilter::All => true,
            ScopeFilter::Nothing => false,
            ScopeFilter::OwnedBy(id) => row.is_owned_by(id),
            ScopeFilter::OwnedByOrVisible(id) => row.is_owned_by(id) || row.is_visible(),
            ScopeFilter::Visible => row.is_visible(),
            ScopeFilter::VisibleToStudent(id) => row.is_visible() && row.belongs_to(id),
        }
    }

    /// Keeps only the rows the predicate admits.
    pub fn apply<T: AccessRow>(&self, rows: Vec<T>) -> Vec<T> {
        match self {
            ScopeFilter::All => rows,
            ScopeFilter::Nothing => Vec::new(),
            _ => rows
                .into_iter()
                .filter(|row| self.matches(&row.access()))
                .collect(),
        }
    }

    /// Returns `true` if the predicate admits no row at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, ScopeFilter::Nothing)
    }

    /// Renders the predicate as a SQL `WHERE` fragment with `?` placeholders.
    ///
    /// A predicate that needs a column the resource does not have renders as
    /// a contradiction.
    pub fn to_sql(&self, columns: &ScopeColumns) -> SqlPredicate {
        match *self {
            ScopeFilter::All => SqlPredicate::always(),
            ScopeFilter::Nothing => SqlPredicate::never(),
            ScopeFilter::OwnedBy(id) => {
                SqlPredicate::new(format!("{} = ?", columns.owner), vec![id.get()])
            }
            ScopeFilter::OwnedByOrVisible(id) => match columns.visibility {
                Some(visibility) => SqlPredicate::new(
                    format!("({} = ? OR {} = 1)", columns.owner, visibility),
                    vec![id.get()],
                ),
                None => SqlPredicate::new(format!("{} = ?", columns.owner), vec![id.get()]),
            },
            ScopeFilter::Visible => match columns.visibility {
                Some(visibility) => SqlPredicate::new(format!("{} = 1", visibility), Vec::new()),
                None => SqlPredicate::never(),
            },
            ScopeFilter::VisibleToStudent(id) => match (columns.visibility, columns.student) {
                (Some(visibility), Some(student)) => SqlPredicate::new(
                    format!("({} = 1 AND {} = ?)", visibility, student),
                    vec![id.get()],
                ),
                _ => SqlPredicate::never(),
            },
        }
    }
}

// =============================================================================
// SQL Rendering
// =============================================================================

/// Column names the predicate is rendered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeColumns {
    /// Owning instructor column.
    pub owner: &'static str,
    /// Student visibility column (`1` when visible).
    pub visibility: Option<&'static str>,
    /// Student column.
    pub student: Option<&'static str>,
}

impl ScopeColumns {
    /// Creates columns with only an owner column.
    pub const fn new(owner: &'static str) -> Self {
        Self {
            owner,
            visibility: None,
            student: None,
        }
    }

    /// Sets the visibility column.
    pub const fn with_visibility(self, column: &'static str) -> Self {
        Self {
            visibility: Some(column),
            ..self
        }
    }

    /// Sets the student column.
    pub const fn with_student(self, column: &'static str) -> Self {
        Self {
            student: Some(column),
            ..self
        }
    }

    /// Standard columns for a row-scoped resource.
    ///
    /// Grades are queried joined to their assessment as `g` and `a`.
    pub fn for_resource(resource: Resource) -> Option<Self> {
        match resource {
            Resource::Assessments => Some(Self::new("teacher_id").with_visibility("is_public")),
            Resource::TimetableEntries => Some(Self::new("teacher_id")),
            Resource::Grades => Some(
                Self::new("a.teacher_id")
                    .with_visibility("a.is_public")
                    .with_student("g.student_id"),
            ),
            _ => None,
        }
    }
}

/// A rendered `WHERE` fragment and its positional binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlPredicate {
    /// The fragment.
    pub clause: String,
    /// Values for each `?`, in order.
    pub binds: Vec<i64>,
}

impl SqlPredicate {
    fn new(clause: String, binds: Vec<i64>) -> Self {
        Self { clause, binds }
    }

    fn always() -> Self {
        Self::new("1 = 1".to_string(), Vec::new())
    }

    fn never() -> Self {
        Self::new("1 = 0".to_string(), Vec::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
