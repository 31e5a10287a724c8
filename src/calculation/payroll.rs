//! Gross, deduction and net pay computation.
//!
//! All functions here are pure and synchronous. They saturate instead of
//! overflowing, so no combination of inputs can panic, and they are safe to
//! call concurrently or standalone (e.g. to re-display a row after an edit).
//!
//! The daily rate is converted to an hourly rate with a fixed 8-hour day:
//!
//! - `gross = rate_per_day / 8 * rh`
//! - `hour_deduction = rate_per_day / 8 * hours`
//! - `minute_deduction = rate_per_day / 8 / 60 * minutes`
//! - `net = gross - (hour_deduction + minute_deduction) - sss`
//!
//! Multiplication happens before division to keep results exact in decimal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DeductionBreakdown, PayBreakdown, PayrollDraftRow};

/// Hours in one paid day.
pub const HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Minutes in one paid day.
pub const MINUTES_PER_DAY: Decimal = Decimal::from_parts(480, 0, 0, false, 0);

/// Computes the gross amount for the rendered hours.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_gross;
/// use rust_decimal::Decimal;
///
/// assert_eq!(compute_gross(Decimal::from(800), Decimal::from(8)), Decimal::from(800));
/// assert_eq!(compute_gross(Decimal::from(800), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn compute_gross(rate_per_day: Decimal, rh: Decimal) -> Decimal {
    rate_per_day.saturating_mul(rh) / HOURS_PER_DAY
}

/// Computes the deduction for whole deduction hours.
pub fn compute_hour_deduction(rate_per_day: Decimal, hours: Decimal) -> Decimal {
    rate_per_day.saturating_mul(hours) / HOURS_PER_DAY
}

/// Computes the deduction for deduction minutes.
pub fn compute_minute_deduction(rate_per_day: Decimal, minutes: Decimal) -> Decimal {
    rate_per_day.saturating_mul(minutes) / MINUTES_PER_DAY
}

/// Computes the total deduction for hours and minutes.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_deduction;
/// use rust_decimal::Decimal;
///
/// // 100 for the hour plus 50 for the half hour
/// let total = compute_deduction(Decimal::from(800), Decimal::from(1), Decimal::from(30));
/// assert_eq!(total, Decimal::from(150));
/// ```
pub fn compute_deduction(rate_per_day: Decimal, hours: Decimal, minutes: Decimal) -> Decimal {
    compute_hour_deduction(rate_per_day, hours)
        .saturating_add(compute_minute_deduction(rate_per_day, minutes))
}

/// Computes the net amount from a gross amount.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_net;
/// use rust_decimal::Decimal;
///
/// let net = compute_net(
///     Decimal::from(800),
///     Decimal::from(800),
///     Decimal::from(1),
///     Decimal::ZERO,
///     Decimal::from(50),
/// );
/// assert_eq!(net, Decimal::from(650));
/// ```
pub fn compute_net(
    gross: Decimal,
    rate_per_day: Decimal,
    hours: Decimal,
    minutes: Decimal,
    sss: Decimal,
) -> Decimal {
    gross
        .saturating_sub(compute_deduction(rate_per_day, hours, minutes))
        .saturating_sub(sss)
}

/// The numeric inputs of a pay computation, with missing values as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayInputs {
    /// Daily rate.
    #[serde(default)]
    pub rate_per_day: Decimal,
    /// Rendered hours.
    #[serde(default)]
    pub rh: Decimal,
    /// Deduction hours.
    #[serde(default)]
    pub deduction_hours: Decimal,
    /// Deduction minutes.
    #[serde(default)]
    pub deduction_minutes: Decimal,
    /// SSS contribution.
    #[serde(default)]
    pub sss_contribution: Decimal,
}

impl From<&PayrollDraftRow> for PayInputs {
    fn from(row: &PayrollDraftRow) -> Self {
        Self {
            rate_per_day: row.rate_per_day.unwrap_or_default(),
            rh: row.rh.unwrap_or_default(),
            deduction_hours: row.deduction_hours.unwrap_or_default(),
            deduction_minutes: row.deduction_minutes.unwrap_or_default(),
            sss_contribution: row.sss_contribution.unwrap_or_default(),
        }
    }
}

/// Computes the full pay breakdown for a set of inputs.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{PayInputs, compute_breakdown};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let breakdown = compute_breakdown(&PayInputs {
///     rate_per_day: Decimal::from(750),
///     rh: Decimal::from(12),
///     deduction_hours: Decimal::from(2),
///     deduction_minutes: Decimal::from(15),
///     sss_contribution: Decimal::from(100),
/// });
///
/// assert_eq!(breakdown.gross_amount, Decimal::from(1125));
/// assert_eq!(breakdown.net_amount, Decimal::from_str("814.0625").unwrap());
/// ```
pub fn compute_breakdown(inputs: &PayInputs) -> PayBreakdown {
    let rate = inputs.rate_per_day;
    let gross_amount = compute_gross(rate, inputs.rh);
    let hour_deduction = compute_hour_deduction(rate, inputs.deduction_hours);
    let minute_deduction = compute_minute_deduction(rate, inputs.deduction_minutes);
    let total = hour_deduction.saturating_add(minute_deduction);
    let net_amount = gross_amount
        .saturating_sub(total)
        .saturating_sub(inputs.sss_contribution);

    PayBreakdown {
        gross_amount,
        deduction: DeductionBreakdown {
            hours: inputs.deduction_hours,
            minutes: inputs.deduction_minutes,
            hour_deduction,
            minute_deduction,
            total,
        },
        sss_contribution: inputs.sss_contribution,
        net_amount,
    }
}

/// Computes the pay breakdown for a draft row.
pub fn compute_row(row: &PayrollDraftRow) -> PayBreakdown {
    compute_breakdown(&PayInputs::from(row))
}
