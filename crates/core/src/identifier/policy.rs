//! Numbering policy built from raw settings.

use chrono::{Datelike, NaiveDate};
use rostra_shared::NumberingSettings;
use serde::{Deserialize, Serialize};

use super::error::IdentifierError;
use super::strategy::{Counting, GroupedCount, MaxScan, SequenceStrategy};
use crate::calendar::hijri_year_approximation;
use crate::records::Student;

/// Year segment width for the global strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearFormat {
    /// Four digits (2024).
    Full,
    /// Two digits (24).
    Short,
}

impl YearFormat {
    /// Parses a year format keyword.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::UnknownKeyword` for anything but `full` or `short`.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        match value {
            "full" => Ok(Self::Full),
            "short" => Ok(Self::Short),
            _ => Err(IdentifierError::UnknownKeyword {
                setting: "year_format",
                value: value.to_string(),
            }),
        }
    }
}

/// Date layouts supported by the date-of-birth strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthDateLayout {
    /// `ddmmyyyy`
    DdMmYyyy,
    /// `yyyymmdd`
    YyyyMmDd,
    /// `ddmmyy`
    DdMmYy,
}

impl BirthDateLayout {
    /// Parses a layout keyword.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::UnknownKeyword` for unsupported layouts.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        match value {
            "ddmmyyyy" => Ok(Self::DdMmYyyy),
            "yyyymmdd" => Ok(Self::YyyyMmDd),
            "ddmmyy" => Ok(Self::DdMmYy),
            _ => Err(IdentifierError::UnknownKeyword {
                setting: "birth_date_layout",
                value: value.to_string(),
            }),
        }
    }

    /// Formats a date in this layout.
    #[must_use]
    pub fn format(self, date: NaiveDate) -> String {
        match self {
            Self::DdMmYyyy => date.format("%d%m%Y").to_string(),
            Self::YyyyMmDd => date.format("%Y%m%d").to_string(),
            Self::DdMmYy => date.format("%d%m%y").to_string(),
        }
    }
}

/// Where the primary year comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum YearSource {
    /// The candidate's intake date.
    Auto,
    /// A configured year, with an optional parallel-calendar override.
    Manual {
        /// Primary year.
        year: i32,
        /// Parallel-calendar year; approximated from `year` when absent.
        parallel_year: Option<i64>,
    },
}

/// Strategy-specific rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StrategyKind {
    /// Count siblings by classification and year, render through a template.
    Template {
        /// Template with `{YY}`, `{HY}`, `{CODE}` and `{SEQ}` placeholders.
        template: String,
    },
    /// Scan existing identifiers under a fixed prefix and take max + 1.
    Global {
        /// Literal prefix.
        prefix: String,
        /// Append the year after the literal prefix.
        year_segment: bool,
        /// Width of the year segment.
        year_format: YearFormat,
        /// Append the classification code after the year.
        classification_segment: bool,
        /// Number issued when nothing matches the prefix.
        start_number: u32,
    },
    /// Formatted birth date, optional code, then a same-date counter.
    BirthDate {
        /// Date layout.
        layout: BirthDateLayout,
        /// Append the classification code and scope the counter by it.
        classification_segment: bool,
    },
}

/// Code and start number for one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounter {
    /// Classification key as stored on records.
    pub classification: String,
    /// Code embedded in identifiers.
    pub code: String,
    /// First sequence number.
    pub start_number: u32,
}

/// A complete numbering policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierScope {
    /// Active strategy and its rules.
    pub strategy: StrategyKind,
    /// Per-classification counters.
    pub counters: Vec<ClassificationCounter>,
    /// Primary year source.
    pub year_source: YearSource,
    /// Zero-padding width of the sequence number.
    pub padding_width: usize,
}

impl IdentifierScope {
    /// Builds a policy from raw settings, validating every keyword.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::UnknownKeyword` for unrecognised keywords and
    /// `IdentifierError::ManualYearMissing` when the year source is manual
    /// without a year.
    pub fn from_settings(settings: &NumberingSettings) -> Result<Self, IdentifierError> {
        let strategy = match settings.strategy.as_str() {
            "template" => StrategyKind::Template {
                template: settings.template.clone(),
            },
            "global" => StrategyKind::Global {
                prefix: settings.prefix.clone(),
                year_segment: settings.year_segment,
                year_format: YearFormat::parse(&settings.year_format)?,
                classification_segment: settings.classification_segment,
                start_number: settings.start_number,
            },
            "birth_date" => StrategyKind::BirthDate {
                layout: BirthDateLayout::parse(&settings.birth_date_layout)?,
                classification_segment: settings.classification_segment,
            },
            other => {
                return Err(IdentifierError::UnknownKeyword {
                    setting: "strategy",
                    value: other.to_string(),
                });
            }
        };

        let year_source = match settings.year_source.as_str() {
            "auto" => YearSource::Auto,
            "manual" => YearSource::Manual {
                year: settings.manual_year.ok_or(IdentifierError::ManualYearMissing)?,
                parallel_year: settings.manual_parallel_year.map(i64::from),
            },
            other => {
                return Err(IdentifierError::UnknownKeyword {
                    setting: "year_source",
                    value: other.to_string(),
                });
            }
        };

        let counters = settings
            .counters
            .iter()
            .map(|counter| ClassificationCounter {
                classification: counter.classification.clone(),
                code: counter.code.clone(),
                start_number: counter.start_number,
            })
            .collect();

        Ok(Self {
            strategy,
            counters,
            year_source,
            padding_width: settings.padding_width,
        })
    }

    /// Looks up the counter for a classification.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::UnconfiguredClassification` if none is configured.
    pub fn counter_for(
        &self,
        classification: &str,
    ) -> Result<&ClassificationCounter, IdentifierError> {
        self.counters
            .iter()
            .find(|counter| counter.classification == classification)
            .ok_or_else(|| IdentifierError::UnconfiguredClassification(classification.to_string()))
    }

    /// Classification of the candidate together with its configured counter.
    ///
    /// # Errors
    ///
    /// Returns `MissingField("classification")` or `UnconfiguredClassification`.
    pub fn classified<'a>(
        &'a self,
        candidate: &'a Student,
    ) -> Result<(&'a str, &'a ClassificationCounter), IdentifierError> {
        let classification = candidate
            .classification()
            .ok_or(IdentifierError::MissingField("classification"))?;
        Ok((classification, self.counter_for(classification)?))
    }

    /// Primary year for a candidate.
    ///
    /// # Errors
    ///
    /// Returns `MissingField("intake_date")` when the year source is automatic
    /// and the candidate has no intake date.
    pub fn primary_year(&self, candidate: &Student) -> Result<i32, IdentifierError> {
        match self.year_source {
            YearSource::Auto => candidate
                .intake_date
                .map(|date| date.year())
                .ok_or(IdentifierError::MissingField("intake_date")),
            YearSource::Manual { year, .. } => Ok(year),
        }
    }

    /// Parallel-calendar year for a primary year.
    ///
    /// Uses the manual override when one is configured, else the linear
    /// approximation.
    #[must_use]
    pub fn parallel_year(&self, primary_year: i32) -> i64 {
        match self.year_source {
            YearSource::Manual {
                parallel_year: Some(parallel),
                ..
            } => parallel,
            _ => hijri_year_approximation(primary_year),
        }
    }

    /// The strategy implementation for this policy.
    #[must_use]
    pub fn strategy(&self) -> Box<dyn SequenceStrategy + '_> {
        match &self.strategy {
            StrategyKind::Template { template } => Box::new(Counting::new(self, template)),
            StrategyKind::Global {
                prefix,
                year_segment,
                year_format,
                classification_segment,
                start_number,
            } => Box::new(MaxScan {
                scope: self,
                prefix,
                year_segment: *year_segment,
                year_format: *year_format,
                classification_segment: *classification_segment,
                start_number: *start_number,
            }),
            StrategyKind::BirthDate {
                layout,
                classification_segment,
            } => Box::new(GroupedCount {
                scope: self,
                layout: *layout,
                classification_segment: *classification_segment,
            }),
        }
    }
}
