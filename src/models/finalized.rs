//! Pay breakdown and finalized payroll record models.
//!
//! [`PayBreakdown`] is the output of the payroll computer. A
//! [`FinalizedPayrollRecord`] freezes one breakdown for one payroll identity
//! and is never updated or deleted by the engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollIdentity;

/// Deduction breakdown for tardiness and undertime.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionBreakdown;
/// use rust_decimal::Decimal;
///
/// let deduction = DeductionBreakdown {
///     hours: Decimal::from(1),
///     minutes: Decimal::from(30),
///     hour_deduction: Decimal::from(100),
///     minute_deduction: Decimal::from(50),
///     total: Decimal::from(150),
/// };
/// assert_eq!(deduction.hour_deduction + deduction.minute_deduction, deduction.total);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Deduction hours.
    pub hours: Decimal,
    /// Deduction minutes.
    pub minutes: Decimal,
    /// Amount deducted for the hours.
    pub hour_deduction: Decimal,
    /// Amount deducted for the minutes.
    pub minute_deduction: Decimal,
    /// Total deduction.
    pub total: Decimal,
}

/// Gross, deductions and net for one payroll row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// Gross amount for the rendered hours.
    pub gross_amount: Decimal,
    /// Deduction breakdown.
    pub deduction: DeductionBreakdown,
    /// SSS contribution withheld.
    pub sss_contribution: Decimal,
    /// Net amount after deductions and SSS.
    pub net_amount: Decimal,
}

/// An immutable finalized payroll record.
///
/// Exactly one may exist per [`PayrollIdentity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedPayrollRecord {
    /// Unique identifier of this record.
    pub record_id: Uuid,
    /// The payroll identity this record finalizes.
    #[serde(flatten)]
    pub identity: PayrollIdentity,
    /// The draft row this record was created from.
    pub source_row_id: String,
    /// The employee's department at finalization time.
    pub department: String,
    /// The daily rate used.
    pub rate_per_day: Decimal,
    /// Rendered hours credited.
    pub rh: Decimal,
    /// The computed pay snapshot.
    pub pay: PayBreakdown,
    /// When the record was finalized.
    pub finalized_at: DateTime<Utc>,
    /// The version of the engine that produced this record.
    pub engine_version: String,
}
