//! Level → grade → group classification hierarchy.

use serde::{Deserialize, Serialize};

/// A grade and its classroom groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    /// Grade code as stored on student records.
    pub code: String,
    /// Classroom groups in display order.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A top-level category and its grades.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Level code as stored on student records.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Grades in display order.
    #[serde(default)]
    pub grades: Vec<Grade>,
}

/// The configured classification hierarchy.
///
/// An empty hierarchy places no constraints on filter combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationHierarchy {
    /// Levels in display order.
    pub levels: Vec<Level>,
}

impl ClassificationHierarchy {
    fn level(&self, code: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.code == code)
    }

    fn grade(&self, code: &str) -> Option<&Grade> {
        self.levels
            .iter()
            .flat_map(|level| &level.grades)
            .find(|grade| grade.code == code)
    }

    /// Grade codes under a level; empty for an unknown level.
    #[must_use]
    pub fn grades_for(&self, level: &str) -> Vec<&str> {
        self.level(level)
            .map(|level| level.grades.iter().map(|grade| grade.code.as_str()).collect())
            .unwrap_or_default()
    }

    /// Groups under a grade of a level; empty if either is unknown.
    #[must_use]
    pub fn groups_for(&self, level: &str, grade: &str) -> Vec<&str> {
        self.level(level)
            .and_then(|level| level.grades.iter().find(|g| g.code == grade))
            .map(|grade| grade.groups.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Level a grade belongs to.
    #[must_use]
    pub fn level_of_grade(&self, grade: &str) -> Option<&str> {
        self.levels
            .iter()
            .find(|level| level.grades.iter().any(|g| g.code == grade))
            .map(|level| level.code.as_str())
    }

    /// Every group in display order.
    pub fn all_groups(&self) -> impl Iterator<Item = &str> {
        self.levels
            .iter()
            .flat_map(|level| &level.grades)
            .flat_map(|grade| &grade.groups)
            .map(String::as_str)
    }

    /// Returns false if `grade` is known to sit outside `level`.
    #[must_use]
    pub fn grade_within_level(&self, level: &str, grade: &str) -> bool {
        self.level(level)
            .is_none_or(|level| level.grades.iter().any(|g| g.code == grade))
    }

    /// Returns false if `group` is known to sit outside `grade`.
    #[must_use]
    pub fn group_within_grade(&self, grade: &str, group: &str) -> bool {
        self.grade(grade)
            .is_none_or(|grade| grade.groups.iter().any(|g| g == group))
    }
}

#[cfg(test)]
pub(crate) fn sample_hierarchy() -> ClassificationHierarchy {
    let grade = |code: &str, groups: &[&str]| Grade {
        code: code.to_string(),
        groups: groups.iter().map(ToString::to_string).collect(),
    };
    ClassificationHierarchy {
        levels: vec![
            Level {
                code: "junior".to_string(),
                name: "Junior High".to_string(),
                grades: vec![grade("7", &["7A", "7B", "7C"]), grade("8", &["8A"])],
            },
            Level {
                code: "senior".to_string(),
                name: "Senior High".to_string(),
                grades: vec![grade("10", &["10A"])],
            },
        ],
    }
}
