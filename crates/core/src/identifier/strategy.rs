//! The three sequence strategies.
//!
//! - `Counting`: start number plus the count of siblings sharing classification and year
//! - `MaxScan`: highest numeric suffix under an exact prefix, plus one
//! - `GroupedCount`: one plus the count of records sharing the formatted birth date

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::IdentifierError;
use super::placeholder::{self, pad_sequence, substitute};
use super::policy::{BirthDateLayout, IdentifierScope, YearFormat};
use crate::calendar::two_digit_year;
use crate::records::Student;

/// Key under which records are counted as siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Creates a scope key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A way of deriving the next identifier from the loaded record set.
///
/// Implementations are pure: they read `existing` and never check
/// uniqueness after rendering.
pub trait SequenceStrategy: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Scope the candidate's sequence is counted in.
    ///
    /// # Errors
    ///
    /// Returns an error when a required candidate field or counter is missing.
    fn scope_key(&self, candidate: &Student) -> Result<ScopeKey, IdentifierError>;

    /// Next sequence number given the existing records.
    ///
    /// The candidate itself is never counted, even if it is in `existing`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SequenceStrategy::scope_key`].
    fn next_sequence(
        &self,
        existing: &[Student],
        candidate: &Student,
    ) -> Result<u32, IdentifierError>;

    /// Renders the identifier for a sequence number.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SequenceStrategy::scope_key`].
    fn render(&self, candidate: &Student, sequence: u32) -> Result<String, IdentifierError>;

    /// Computes and renders the next identifier.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SequenceStrategy::scope_key`].
    fn generate(
        &self,
        existing: &[Student],
        candidate: &Student,
    ) -> Result<String, IdentifierError> {
        let sequence = self.next_sequence(existing, candidate)?;
        self.render(candidate, sequence)
    }
}

fn count_as_sequence(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn siblings<'a>(
    existing: &'a [Student],
    candidate: &'a Student,
) -> impl Iterator<Item = &'a Student> {
    existing.iter().filter(move |record| record.id != candidate.id)
}

/// Template strategy.
pub struct Counting<'a> {
    scope: &'a IdentifierScope,
    template: &'a str,
}

impl<'a> Counting<'a> {
    /// Creates a counting strategy rendering through `template`.
    #[must_use]
    pub const fn new(scope: &'a IdentifierScope, template: &'a str) -> Self {
        Self { scope, template }
    }
}

impl SequenceStrategy for Counting<'_> {
    fn name(&self) -> &'static str {
        "template"
    }

    fn scope_key(&self, candidate: &Student) -> Result<ScopeKey, IdentifierError> {
        let (classification, _) = self.scope.classified(candidate)?;
        let year = self.scope.primary_year(candidate)?;
        Ok(ScopeKey::new(format!("{classification}/{year}")))
    }

    fn next_sequence(
        &self,
        existing: &[Student],
        candidate: &Student,
    ) -> Result<u32, IdentifierError> {
        let (classification, counter) = self.scope.classified(candidate)?;
        let year = self.scope.primary_year(candidate)?;

        let count = siblings(existing, candidate)
            .filter(|record| record.classification() == Some(classification))
            .filter(|record| record.intake_year() == Some(year))
            .count();

        Ok(counter.start_number.saturating_add(count_as_sequence(count)))
    }

    fn render(&self, candidate: &Student, sequence: u32) -> Result<String, IdentifierError> {
        let (_, counter) = self.scope.classified(candidate)?;
        let year = self.scope.primary_year(candidate)?;

        let primary = two_digit_year(i64::from(year));
        let parallel = two_digit_year(self.scope.parallel_year(year));
        let seq = pad_sequence(sequence, self.scope.padding_width);

        Ok(substitute(
            self.template,
            &[
                (placeholder::YEAR, &primary),
                (placeholder::PARALLEL_YEAR, &parallel),
                (placeholder::CODE, &counter.code),
                (placeholder::SEQUENCE, &seq),
            ],
        ))
    }
}

/// Global strategy.
pub struct MaxScan<'a> {
    pub(crate) scope: &'a IdentifierScope,
    pub(crate) prefix: &'a str,
    pub(crate) year_segment: bool,
    pub(crate) year_format: YearFormat,
    pub(crate) classification_segment: bool,
    pub(crate) start_number: u32,
}

impl MaxScan<'_> {
    /// Literal prefix, then the optional year, then the optional code.
    fn full_prefix(&self, candidate: &Student) -> Result<String, IdentifierError> {
        let mut prefix = self.prefix.to_string();

        if self.year_segment {
            let year = self.scope.primary_year(candidate)?;
            match self.year_format {
                YearFormat::Full => prefix.push_str(&year.to_string()),
                YearFormat::Short => prefix.push_str(&two_digit_year(i64::from(year))),
            }
        }

        if self.classification_segment {
            let (_, counter) = self.scope.classified(candidate)?;
            prefix.push_str(&counter.code);
        }

        Ok(prefix)
    }

    fn suffix_of(&self, identifier: &str, prefix: &str) -> Option<u32> {
        let rest = identifier.strip_prefix(prefix)?;
        if rest.len() != self.scope.padding_width || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok()
    }
}

impl SequenceStrategy for MaxScan<'_> {
    fn name(&self) -> &'static str {
        "global"
    }

    fn scope_key(&self, candidate: &Student) -> Result<ScopeKey, IdentifierError> {
        self.full_prefix(candidate).map(ScopeKey::new)
    }

    fn next_sequence(
        &self,
        existing: &[Student],
        candidate: &Student,
    ) -> Result<u32, IdentifierError> {
        let prefix = self.full_prefix(candidate)?;

        let max = siblings(existing, candidate)
            .filter_map(|record| record.identifier.as_deref())
            .filter_map(|identifier| self.suffix_of(identifier, &prefix))
            .max();

        Ok(max.map_or(self.start_number, |max| max.saturating_add(1)))
    }

    fn render(&self, candidate: &Student, sequence: u32) -> Result<String, IdentifierError> {
        let prefix = self.full_prefix(candidate)?;
        Ok(format!(
            "{prefix}{}",
            pad_sequence(sequence, self.scope.padding_width)
        ))
    }
}

/// Date-of-birth strategy.
pub struct GroupedCount<'a> {
    pub(crate) scope: &'a IdentifierScope,
    pub(crate) layout: BirthDateLayout,
    pub(crate) classification_segment: bool,
}

impl GroupedCount<'_> {
    fn formatted_birth_date(&self, record: &Student) -> Option<String> {
        record.birth_date.map(|date| self.layout.format(date))
    }
}

impl SequenceStrategy for GroupedCount<'_> {
    fn name(&self) -> &'static str {
        "birth_date"
    }

    fn scope_key(&self, candidate: &Student) -> Result<ScopeKey, IdentifierError> {
        let mut key = self
            .formatted_birth_date(candidate)
            .ok_or(IdentifierError::MissingField("birth_date"))?;
        if self.classification_segment {
            let (_, counter) = self.scope.classified(candidate)?;
            key.push_str(&counter.code);
        }
        Ok(ScopeKey::new(key))
    }

    fn next_sequence(
        &self,
        existing: &[Student],
        candidate: &Student,
    ) -> Result<u32, IdentifierError> {
        let date = self
            .formatted_birth_date(candidate)
            .ok_or(IdentifierError::MissingField("birth_date"))?;
        let classification = if self.classification_segment {
            Some(self.scope.classified(candidate)?.0)
        } else {
            None
        };

        let count = siblings(existing, candidate)
            .filter(|record| self.formatted_birth_date(record).as_deref() == Some(date.as_str()))
            .filter(|record| classification.is_none_or(|c| record.classification() == Some(c)))
            .count();

        Ok(count_as_sequence(count).saturating_add(1))
    }

    fn render(&self, candidate: &Student, sequence: u32) -> Result<String, IdentifierError> {
        let key = self.scope_key(candidate)?;
        Ok(format!(
            "{key}{}",
            pad_sequence(sequence, self.scope.padding_width)
        ))
    }
}
