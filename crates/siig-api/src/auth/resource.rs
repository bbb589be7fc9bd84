// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Resources, actions and the row fields the policy engine reads.

use serde::{Deserialize, Serialize};
use siig_core::{InstructorId, StudentId};

// =============================================================================
// Action
// =============================================================================

/// Operations a handler asks permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read a collection.
    List,
    /// Read a single row.
    Read,
    /// Create a row.
    Create,
    /// Update a row.
    Update,
    /// Delete a row.
    Delete,
}

impl Action {
    /// Every action.
    pub const ALL: [Action; 5] = [
        Action::List,
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    /// Returns the action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Returns `true` for `List` and `Read`.
    pub fn is_read(&self) -> bool {
        matches!(self, Action::List | Action::Read)
    }

    /// Returns `true` for `Create`, `Update` and `Delete`.
    pub fn is_mutation(&self) -> bool {
        !self.is_read()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Resource
// =============================================================================

/// Decision table a resource is governed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFamily {
    /// Administrators and instructors only.
    Reference,
    /// Like `Reference`, but students may read.
    Catalog,
    /// Rows carry an owning instructor.
    Ownable,
    /// Rows inherit ownership and visibility from a parent assessment.
    Derived,
}

/// Every table the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Student directory.
    Students,
    /// Instructor directory.
    Teachers,
    /// Subjects.
    Subjects,
    /// Semesters.
    Semesters,
    /// Classes.
    Classes,
    /// Enrollments.
    Enrollments,
    /// Teaching units (UE).
    Ues,
    /// Course elements (EC).
    Ecs,
    /// Class to subject assignments.
    ClassSubjects,
    /// Student to class assignments.
    StudentClassAssignments,
    /// Instructor to subject assignments.
    TeacherSubjects,
    /// Instructor availability slots.
    TeacherAvailability,
    /// Course catalog.
    Courses,
    /// Assessments.
    Assessments,
    /// Timetable entries.
    TimetableEntries,
    /// Grades.
    Grades,
}

impl Resource {
    /// Every resource.
    pub const ALL: [Resource; 16] = [
        Resource::Students,
        Resource::Teachers,
        Resource::Subjects,
        Resource::Semesters,
        Resource::Classes,
        Resource::Enrollments,
        Resource::Ues,
        Resource::Ecs,
        Resource::ClassSubjects,
        Resource::StudentClassAssignments,
        Resource::TeacherSubjects,
        Resource::TeacherAvailability,
        Resource::Courses,
        Resource::Assessments,
        Resource::TimetableEntries,
        Resource::Grades,
    ];

    /// Returns the table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Teachers => "teachers",
            Resource::Subjects => "subjects",
            Resource::Semesters => "semesters",
            Resource::Classes => "classes",
            Resource::Enrollments => "enrollments",
            Resource::Ues => "ues",
            Resource::Ecs => "ecs",
            Resource::ClassSubjects => "class_subjects",
            Resource::StudentClassAssignments => "student_class_assignments",
            Resource::TeacherSubjects => "teacher_subjects",
            Resource::TeacherAvailability => "teacher_availability",
            Resource::Courses => "courses",
            Resource::Assessments => "assessments",
            Resource::TimetableEntries => "timetable_entries",
            Resource::Grades => "grades",
        }
    }

    /// Parses a table name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
    }

    /// Returns the decision table for this resource.
    pub fn family(&self) -> ResourceFamily {
        match self {
            Resource::Courses => ResourceFamily::Catalog,
            Resource::Assessments | Resource::TimetableEntries => ResourceFamily::Ownable,
            Resource::Grades => ResourceFamily::Derived,
            _ => ResourceFamily::Reference,
        }
    }

    /// Returns `true` if rows carry a student visibility flag.
    ///
    /// Grades carry their parent assessment's flag.
    pub fn carries_visibility(&self) -> bool {
        matches!(self, Resource::Assessments | Resource::Grades)
    }

    /// Returns `true` if rows are gated by ownership or visibility.
    pub fn is_row_scoped(&self) -> bool {
        matches!(
            self.family(),
            ResourceFamily::Ownable | ResourceFamily::Derived
        )
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// RowAccess
// =============================================================================

/// The ownership and visibility fields of one candidate row.
///
/// Every field is optional. An absent field never grants access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowAccess {
    /// Owning instructor.
    pub owner_instructor_id: Option<InstructorId>,
    /// Whether students may read the row.
    pub visible_to_students: Option<bool>,
    /// Student the row belongs to (grades only).
    pub student_id: Option<StudentId>,
}

impl RowAccess {
    /// Access fields of an assessment row.
    pub fn assessment(owner: Option<InstructorId>, visible_to_students: bool) -> Self {
        Self {
            owner_instructor_id: owner,
            visible_to_students: Some(visible_to_students),
            student_id: None,
        }
    }

    /// Access fields of a timetable entry.
    pub fn timetable_entry(owner: Option<InstructorId>) -> Self {
        Self {
            owner_instructor_id: owner,
            visible_to_students: None,
            student_id: None,
        }
    }

    /// Access fields of a grade, inherited from its parent assessment.
    pub fn grade(parent: &RowAccess, student: StudentId) -> Self {
        Self {
            owner_instructor_id: parent.owner_instructor_id,
            visible_to_students: parent.visible_to_students,
            student_id: Some(student),
        }
    }

    /// Returns `true` if `instructor` owns the row.
    pub fn is_owned_by(&self, instructor: InstructorId) -> bool {
        self.owner_instructor_id == Some(instructor)
    }

    /// Returns `true` only if the row is explicitly visible to students.
    pub fn is_visible(&self) -> bool {
        self.visible_to_students == Some(true)
    }

    /// Returns `true` if the row belongs to `student`.
    pub fn belongs_to(&self, student: StudentId) -> bool {
        self.student_id == Some(student)
    }
}

/// Rows that expose their access fields.
pub trait AccessRow {
    /// Returns the ownership and visibility fields.
    fn access(&self) -> RowAccess;
}

impl AccessRow for RowAccess {
    fn access(&self) -> RowAccess {
        *self
    }
}

impl<T: AccessRow + ?Sized> AccessRow for &T {
    fn access(&self) -> RowAccess {
        (**self).access()
    }
}

// =============================================================================
// Tests
// =============================================================================
