//! Attendance and official-time models.
//!
//! [`AttendanceEntry`] is one raw swipe record, [`OfficialTime`] is an
//! employee's scheduled time, and [`AttendanceWindow`] is the derived
//! per-employee summary produced by reconciliation.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A raw attendance record for one day.
///
/// Either time may be missing when the employee forgot to swipe.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AttendanceEntry;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let entry = AttendanceEntry {
///     date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
///     time_in: NaiveTime::from_hms_opt(8, 0, 0),
///     time_out: NaiveTime::from_hms_opt(17, 0, 0),
/// };
/// assert!(entry.is_complete());
/// assert_eq!(entry.worked_hours(), Some(Decimal::from(9)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// Time in, if swiped.
    #[serde(default)]
    pub time_in: Option<NaiveTime>,
    /// Time out, if swiped.
    #[serde(default)]
    pub time_out: Option<NaiveTime>,
}

impl AttendanceEntry {
    /// Returns true if both time in and time out are present.
    pub fn is_complete(&self) -> bool {
        self.time_in.is_some() && self.time_out.is_some()
    }

    /// Returns the hours between time in and time out.
    ///
    /// A time out earlier than the time in is an overnight pair and wraps
    /// past midnight. Returns `None` for incomplete pairs.
    pub fn worked_hours(&self) -> Option<Decimal> {
        let (time_in, time_out) = (self.time_in?, self.time_out?);
        let mut minutes = (time_out - time_in).num_minutes();
        if minutes < 0 {
            minutes += MINUTES_PER_DAY;
        }
        Some(Decimal::new(minutes, 0) / Decimal::new(60, 0))
    }
}

/// An employee's official (scheduled) time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialTime {
    /// The scheduled days, e.g. "Mon-Fri".
    pub days_covered: String,
    /// Number of scheduled days.
    pub number_of_days: u32,
    /// The scheduled time range, e.g. "08:00-17:00".
    pub time_range: String,
}

/// Outcome of the lookups that fed an [`AttendanceWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LookupStatus {
    /// All lookups succeeded.
    Resolved,
    /// A lookup failed and placeholder values were substituted.
    Placeholder {
        /// Why the placeholder was used.
        reason: String,
    },
}

/// Reconciled attendance summary for one employee and one period.
///
/// Derived on demand and never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceWindow {
    /// The employee number.
    pub employee_number: String,
    /// Rendered days, e.g. "Jan 2, 3, 5". Empty when no complete pairs exist.
    pub days_rendered: String,
    /// Number of unique days with a complete pair.
    pub days_worked: u32,
    /// Sum of complete pair durations, in hours.
    pub rendered_hours: Decimal,
    /// Official days covered.
    pub days_covered: String,
    /// Official number of days.
    pub number_of_days: u32,
    /// Official time range.
    pub official_time_range: String,
    /// Whether the values are real or placeholders.
    pub lookup: LookupStatus,
}

impl AttendanceWindow {
    /// Returns true if any part of this window is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.lookup, LookupStatus::Placeholder { .. })
    }
}
