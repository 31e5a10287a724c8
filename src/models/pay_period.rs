//! Pay period and payroll identity models.
//!
//! This module contains the [`PayPeriod`] date range and the
//! [`PayrollIdentity`] key that uniquely identifies one payroll-period record.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents a payroll period with its inclusive date range.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// );
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a new pay period.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the period does not end before it starts.
    pub fn is_valid(&self) -> bool {
        self.start_date <= self.end_date
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_date, self.end_date)
    }
}

/// The identity of one payroll-period record: employee number plus period.
///
/// At most one finalized record may ever exist per identity, so this is the
/// key for duplicate detection and for the finalized store's unique index.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollIdentity;
/// use chrono::NaiveDate;
///
/// let identity = PayrollIdentity::new(
///     "EMP-001",
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// );
/// assert_eq!(identity.to_string(), "EMP-001 (2024-01-01..2024-01-15)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayrollIdentity {
    /// The employee number.
    pub employee_number: String,
    /// The start date of the pay period.
    pub start_date: NaiveDate,
    /// The end date of the pay period.
    pub end_date: NaiveDate,
}

impl PayrollIdentity {
    /// Creates a new payroll identity.
    pub fn new(employee_number: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            employee_number: employee_number.into(),
            start_date,
            end_date,
        }
    }

    /// Returns the pay period part of the identity.
    pub fn period(&self) -> PayPeriod {
        PayPeriod::new(self.start_date, self.end_date)
    }
}

impl fmt::Display for PayrollIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.employee_number, self.period())
    }
}
