//! Draft payroll row model.
//!
//! Draft rows are created by the payroll source system with status
//! [`PayrollStatus::Unprocessed`]. The engine reads and enriches them, and
//! only the finalization gate ever moves one to [`PayrollStatus::Processed`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PayPeriod, PayrollIdentity};
use crate::error::{EngineError, EngineResult};

/// Lifecycle status of a draft payroll row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Not yet finalized.
    #[default]
    Unprocessed,
    /// Finalized into an immutable record. Terminal.
    Processed,
}

/// A draft payroll row as supplied by the payroll source system.
///
/// Numeric fields are optional because the source system may leave them
/// blank; every computation treats a missing value as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollDraftRow {
    /// Row identifier in the draft store.
    pub id: String,
    /// The employee number. Blank means the row is malformed.
    #[serde(default)]
    pub employee_number: String,
    /// The employee's department.
    #[serde(default)]
    pub department: String,
    /// Start of the payroll period.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// End of the payroll period.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Daily rate.
    #[serde(default)]
    pub rate_per_day: Option<Decimal>,
    /// Rendered hours credited to the period.
    #[serde(default)]
    pub rh: Option<Decimal>,
    /// Deduction hours (tardiness/undertime).
    #[serde(default)]
    pub deduction_hours: Option<Decimal>,
    /// Deduction minutes (tardiness/undertime).
    #[serde(default)]
    pub deduction_minutes: Option<Decimal>,
    /// SSS contribution for the period.
    #[serde(default)]
    pub sss_contribution: Option<Decimal>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: PayrollStatus,
}

impl PayrollDraftRow {
    /// Returns the payroll identity of this row.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the employee number is blank,
    /// either period date is missing, or the period ends before it starts.
    pub fn identity(&self) -> EngineResult<PayrollIdentity> {
        let employee_number = self.employee_number.trim();
        if employee_number.is_empty() {
            return Err(self.invalid("missing employee number"));
        }

        let (start_date, end_date) = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(self.invalid("missing payroll period")),
        };

        if !PayPeriod::new(start_date, end_date).is_valid() {
            return Err(self.invalid("payroll period ends before it starts"));
        }

        Ok(PayrollIdentity::new(employee_number, start_date, end_date))
    }

    /// Returns true if the row has been finalized.
    pub fn is_processed(&self) -> bool {
        self.status == PayrollStatus::Processed
    }

    fn invalid(&self, message: &str) -> EngineError {
        EngineError::Validation {
            row_id: self.id.clone(),
            message: message.to_string(),
        }
    }
}
