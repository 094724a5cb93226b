//! Source records consumed by the engine.
//!
//! The host application loads these collections; the engine only reads them.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rostra_shared::types::{ChargeId, LoanId, PaymentId, SavingsTransactionId, StudentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filter::ClassificationHierarchy;
use crate::ledger::CashBookEntry;

/// Lifecycle status of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// Currently enrolled.
    Active,
    /// Completed the final grade.
    Graduated,
    /// Moved to another institution.
    Transferred,
    /// Left without transfer.
    Withdrawn,
}

impl StudentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Graduated => "graduated",
            Self::Transferred => "transferred",
            Self::Withdrawn => "withdrawn",
        }
    }
}

/// Gender as recorded on the enrollment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Returns the string representation of the gender.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Postal address split the way enrollment forms collect it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Street and house number.
    pub street: String,
    /// Village or neighbourhood.
    pub village: String,
    /// District.
    pub district: String,
    /// City or regency.
    pub city: String,
}

impl Address {
    /// Returns true if any address part contains the fragment, ignoring case.
    #[must_use]
    pub fn contains_fragment(&self, fragment: &str) -> bool {
        let needle = fragment.to_lowercase();
        [&self.street, &self.village, &self.district, &self.city]
            .iter()
            .any(|part| part.to_lowercase().contains(&needle))
    }

    /// Single-line rendering, skipping empty parts.
    #[must_use]
    pub fn one_line(&self) -> String {
        [&self.street, &self.village, &self.district, &self.city]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A student record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Record ID.
    pub id: StudentId,
    /// Issued student number, if any.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Full name.
    pub name: String,
    /// Top-level category (e.g. "junior").
    #[serde(default)]
    pub level: Option<String>,
    /// Sub-category (grade); also the numbering classification.
    #[serde(default)]
    pub grade: Option<String>,
    /// Classroom group (e.g. "7A").
    #[serde(default)]
    pub group: Option<String>,
    /// Lifecycle status.
    pub status: StudentStatus,
    /// Gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Religion.
    #[serde(default)]
    pub religion: Option<String>,
    /// Place of birth.
    #[serde(default)]
    pub birth_place: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Intake (enrollment) date.
    #[serde(default)]
    pub intake_date: Option<NaiveDate>,
    /// Home address.
    #[serde(default)]
    pub address: Address,
    /// Parent or guardian name.
    #[serde(default)]
    pub guardian_name: Option<String>,
    /// Facility (dormitory, building) code.
    #[serde(default)]
    pub facility: Option<String>,
    /// Date the student transferred in from another institution.
    #[serde(default)]
    pub transfer_in_date: Option<NaiveDate>,
    /// Date the student transferred out.
    #[serde(default)]
    pub transfer_out_date: Option<NaiveDate>,
    /// Counterpart institution for a transfer.
    #[serde(default)]
    pub transfer_institution: Option<String>,
}

impl Student {
    /// Creates an active student with only a name set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StudentId::new(),
            identifier: None,
            name: name.into(),
            level: None,
            grade: None,
            group: None,
            status: StudentStatus::Active,
            gender: None,
            religion: None,
            birth_place: None,
            birth_date: None,
            intake_date: None,
            address: Address::default(),
            guardian_name: None,
            facility: None,
            transfer_in_date: None,
            transfer_out_date: None,
            transfer_institution: None,
        }
    }

    /// Classification used for numbering (the grade).
    #[must_use]
    pub fn classification(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    /// Year of the intake date.
    #[must_use]
    pub fn intake_year(&self) -> Option<i32> {
        self.intake_date.map(|date| date.year())
    }
}

/// A billing charge (tuition, fees) against a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    /// Charge ID.
    pub id: ChargeId,
    /// Student billed.
    pub student_id: StudentId,
    /// Date the charge was issued.
    pub issued_on: NaiveDate,
    /// Description (e.g. "Tuition July").
    pub description: String,
    /// Amount charged.
    pub amount: Decimal,
}

/// A payment received from a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Paying student.
    pub student_id: StudentId,
    /// Charge settled by this payment, if allocated.
    #[serde(default)]
    pub charge_id: Option<ChargeId>,
    /// Time the payment was received.
    pub paid_at: NaiveDateTime,
    /// Amount received.
    pub amount: Decimal,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Kind of discretionary savings transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsKind {
    /// Money put into the student's savings.
    Deposit,
    /// Money taken out of the student's savings.
    Withdrawal,
}

/// A discretionary deposit or withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsTransaction {
    /// Transaction ID.
    pub id: SavingsTransactionId,
    /// Owning student.
    pub student_id: StudentId,
    /// Deposit or withdrawal.
    pub kind: SavingsKind,
    /// Time of the transaction.
    pub recorded_at: NaiveDateTime,
    /// Amount moved.
    pub amount: Decimal,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

/// A library loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryLoan {
    /// Loan ID.
    pub id: LoanId,
    /// Borrowing student.
    pub student_id: StudentId,
    /// Book title.
    pub title: String,
    /// Date borrowed.
    pub borrowed_on: NaiveDate,
    /// Date due back.
    pub due_on: NaiveDate,
    /// Date returned, if returned.
    #[serde(default)]
    pub returned_on: Option<NaiveDate>,
}

impl LibraryLoan {
    /// Returns true if the loan was still out after its due date as of `as_of`.
    #[must_use]
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        match self.returned_on {
            Some(returned) => returned > self.due_on,
            None => as_of > self.due_on,
        }
    }
}

/// A facility (dormitory, building) students can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    /// Facility code stored on student records.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// A subject scored on score sheets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Subject code.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// All collections the host hands to the engine for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCollections {
    /// Student records.
    pub students: Vec<Student>,
    /// Billing charges.
    pub charges: Vec<Charge>,
    /// Payments.
    pub payments: Vec<Payment>,
    /// Discretionary savings transactions.
    pub savings: Vec<SavingsTransaction>,
    /// General cash book entries.
    pub cash_book: Vec<CashBookEntry>,
    /// Library loans.
    pub loans: Vec<LibraryLoan>,
    /// Facilities.
    pub facilities: Vec<Facility>,
    /// Subjects.
    pub subjects: Vec<Subject>,
    /// Level → grade → group hierarchy.
    pub hierarchy: ClassificationHierarchy,
}

impl SourceCollections {
    /// Finds a student by ID.
    #[must_use]
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    /// Finds a facility by code.
    #[must_use]
    pub fn facility(&self, code: &str) -> Option<&Facility> {
        self.facilities.iter().find(|facility| facility.code == code)
    }

    /// Finds a subject by code.
    #[must_use]
    pub fn subject(&self, code: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_fragment_is_case_insensitive() {
        let address = Address {
            street: "Jl. Melati 4".to_string(),
            village: "Sukamaju".to_string(),
            district: String::new(),
            city: "Bandung".to_string(),
        };

        assert!(address.contains_fragment("sukaMAJU"));
        assert!(address.contains_fragment("melati"));
        assert!(!address.contains_fragment("jakarta"));
        assert_eq!(address.one_line(), "Jl. Melati 4, Sukamaju, Bandung");
    }

    #[test]
    fn test_loan_overdue() {
        let loan = LibraryLoan {
            id: LoanId::new(),
            student_id: StudentId::new(),
            title: "Atlas".to_string(),
            borrowed_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            returned_on: None,
        };

        assert!(!loan.is_overdue(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()));
        assert!(loan.is_overdue(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()));

        let returned_late = LibraryLoan {
            returned_on: NaiveDate::from_ymd_opt(2024, 3, 10),
            ..loan
        };
        assert!(returned_late.is_overdue(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
    }

    #[test]
    fn test_intake_year_follows_intake_date() {
        let mut student = Student::new("Ayu");
        assert_eq!(student.intake_year(), None);

        student.intake_date = NaiveDate::from_ymd_opt(2024, 7, 15);
        assert_eq!(student.intake_year(), Some(2024));
    }

    #[test]
    fn test_student_deserializes_with_defaults() {
        let json = r#"{
            "id": "0190b7a4-0000-7000-8000-000000000001",
            "name": "Ayu",
            "status": "active",
            "grade": "7"
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();

        assert_eq!(student.classification(), Some("7"));
        assert!(student.intake_date.is_none());
        assert_eq!(student.address, Address::default());
    }
}
