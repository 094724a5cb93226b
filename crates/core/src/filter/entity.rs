//! Conjunctive entity filter.

use serde::{Deserialize, Serialize};

use super::hierarchy::ClassificationHierarchy;
use crate::records::{Gender, Student, StudentStatus};

/// Filter over student records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityFilter {
    /// Top-level category.
    pub level: Option<String>,
    /// Grade within the level.
    pub grade: Option<String>,
    /// Classroom group within the grade.
    pub group: Option<String>,
    /// Lifecycle status.
    pub status: Option<StudentStatus>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Religion, compared case-insensitively.
    pub religion: Option<String>,
    /// Case-insensitive substring of any address part.
    pub address_fragment: Option<String>,
}

impl EntityFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrows to a level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Narrows to a grade.
    #[must_use]
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Narrows to a group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Narrows to a status.
    #[must_use]
    pub const fn with_status(mut self, status: StudentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Narrows to a gender.
    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Narrows to a religion.
    #[must_use]
    pub fn with_religion(mut self, religion: impl Into<String>) -> Self {
        self.religion = Some(religion.into());
        self
    }

    /// Narrows to addresses containing a fragment.
    #[must_use]
    pub fn with_address_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.address_fragment = Some(fragment.into());
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns false if the level/grade/group narrowing contradicts the hierarchy.
    #[must_use]
    pub fn is_consistent(&self, hierarchy: &ClassificationHierarchy) -> bool {
        let grade_ok = match (&self.level, &self.grade) {
            (Some(level), Some(grade)) => hierarchy.grade_within_level(level, grade),
            _ => true,
        };
        let group_ok = match (&self.grade, &self.group) {
            (Some(grade), Some(group)) => hierarchy.group_within_grade(grade, group),
            _ => true,
        };
        grade_ok && group_ok
    }

    /// Returns true if the student satisfies every set criterion.
    ///
    /// A student without a stored level inherits the level of its grade.
    #[must_use]
    pub fn matches(&self, student: &Student, hierarchy: &ClassificationHierarchy) -> bool {
        if let Some(level) = &self.level {
            let student_level = student
                .level
                .as_deref()
                .or_else(|| student.grade.as_deref().and_then(|g| hierarchy.level_of_grade(g)));
            if student_level != Some(level.as_str()) {
                return false;
            }
        }

        if self.grade.is_some() && student.grade != self.grade {
            return false;
        }
        if self.group.is_some() && student.group != self.group {
            return false;
        }
        if self.status.is_some_and(|status| student.status != status) {
            return false;
        }
        if self.gender.is_some() && student.gender != self.gender {
            return false;
        }
        if let Some(religion) = &self.religion {
            let same = student
                .religion
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case(religion));
            if !same {
                return false;
            }
        }
        if let Some(fragment) = &self.address_fragment
            && !student.address.contains_fragment(fragment)
        {
            return false;
        }

        true
    }
}
