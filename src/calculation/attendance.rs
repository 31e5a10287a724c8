//! Attendance reconciliation.
//!
//! Maps raw time-in/time-out records to rendered-day summaries and joins
//! them with each employee's official time. One [`ReconciliationPass`] owns
//! its own official-time cache, so many draft rows for the same employee cost
//! a single lookup and nothing outlives the pass.
//!
//! Lookup failures never abort a pass: the affected window gets placeholder
//! values and a [`LookupStatus::Placeholder`] reason, and every other
//! employee is reconciled normally.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ReconciliationConfig;
use crate::error::EngineError;
use crate::models::{
    AttendanceEntry, AttendanceWindow, LookupStatus, OfficialTime, PayBreakdown, PayPeriod,
    PayrollDraftRow,
};
use crate::store::{AttendanceSource, OfficialTimeSource, StoreError};

use super::payroll::compute_row;

/// Returns the entries that have both a time in and a time out.
pub fn complete_pairs(entries: &[AttendanceEntry]) -> impl Iterator<Item = &AttendanceEntry> {
    entries.iter().filter(|e| e.is_complete())
}

/// Renders the unique days of the complete pairs, e.g. `"Jan 2, 3, 5"`.
///
/// Days are sorted ascending. A period spanning months renders one group per
/// month, in order, separated by `"; "`. No complete pairs renders as an
/// empty string.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::render_days;
/// use payroll_engine::models::AttendanceEntry;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let entry = |d: u32, out: Option<NaiveTime>| AttendanceEntry {
///     date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
///     time_in: NaiveTime::from_hms_opt(8, 0, 0),
///     time_out: out,
/// };
/// let five = NaiveTime::from_hms_opt(17, 0, 0);
///
/// let entries = vec![entry(5, five), entry(2, five), entry(3, None), entry(2, five)];
/// assert_eq!(render_days(&entries), "Jan 2, 5");
/// assert_eq!(render_days(&[]), "");
/// ```
pub fn render_days(entries: &[AttendanceEntry]) -> String {
    let days: BTreeSet<NaiveDate> = complete_pairs(entries).map(|e| e.date).collect();

    let mut groups: Vec<(NaiveDate, Vec<u32>)> = Vec::new();
    for day in days {
        match groups.last_mut() {
            Some((first, list)) if first.year() == day.year() && first.month() == day.month() => {
                list.push(day.day());
            }
            _ => groups.push((day, vec![day.day()])),
        }
    }

    groups
        .iter()
        .map(|(first, list)| {
            let list: Vec<String> = list.iter().map(u32::to_string).collect();
            format!("{} {}", first.format("%b"), list.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Counts the unique days with a complete pair.
pub fn days_worked(entries: &[AttendanceEntry]) -> u32 {
    let days: BTreeSet<NaiveDate> = complete_pairs(entries).map(|e| e.date).collect();
    days.len() as u32
}

/// Sums the hours of all complete pairs.
pub fn rendered_hours(entries: &[AttendanceEntry]) -> Decimal {
    complete_pairs(entries).filter_map(|e| e.worked_hours()).sum()
}

/// A draft row enriched with its attendance window and pay breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRow {
    /// The draft row as read from the store.
    pub row: PayrollDraftRow,
    /// The reconciled attendance window.
    pub window: AttendanceWindow,
    /// The computed pay breakdown.
    pub pay: PayBreakdown,
}

/// Reconciles attendance against official time.
pub struct AttendanceReconciler<'a> {
    attendance: &'a dyn AttendanceSource,
    official: &'a dyn OfficialTimeSource,
    settings: &'a ReconciliationConfig,
}

impl<'a> AttendanceReconciler<'a> {
    /// Creates a reconciler over the given sources.
    pub fn new(
        attendance: &'a dyn AttendanceSource,
        official: &'a dyn OfficialTimeSource,
        settings: &'a ReconciliationConfig,
    ) -> Self {
        Self {
            attendance,
            official,
            settings,
        }
    }

    /// Starts a reconciliation pass with an empty cache.
    pub fn begin_pass(&self) -> ReconciliationPass<'_, 'a> {
        ReconciliationPass {
            reconciler: self,
            cache: HashMap::new(),
            lookups: 0,
        }
    }

    /// Reconciles one employee over one period in a pass of its own.
    pub async fn reconcile(&self, employee_number: &str, period: PayPeriod) -> AttendanceWindow {
        let mut pass = self.begin_pass();
        pass.prefetch([employee_number.to_string()]).await;
        pass.window(employee_number, period).await
    }

    /// Reconciles many draft rows in one pass.
    ///
    /// Output order matches input order. At most `max_concurrent_lookups`
    /// rows are in flight at once.
    pub async fn reconcile_rows(&self, rows: &[PayrollDraftRow]) -> Vec<ReconciledRow> {
        let mut pass = self.begin_pass();
        pass.prefetch(rows.iter().map(|r| r.employee_number.trim().to_string()))
            .await;

        let limit = self.settings.max_concurrent_lookups.max(1);
        let mut reconciled = Vec::with_capacity(rows.len());
        for chunk in rows.chunks(limit) {
            reconciled.extend(join_all(chunk.iter().map(|row| pass.reconcile_row(row))).await);
        }
        reconciled
    }
}

/// One reconciliation pass and its official-time cache.
pub struct ReconciliationPass<'r, 'a> {
    reconciler: &'r AttendanceReconciler<'a>,
    cache: HashMap<String, Result<OfficialTime, String>>,
    lookups: usize,
}

impl ReconciliationPass<'_, '_> {
    /// Looks up official times for every distinct, not yet cached employee.
    ///
    /// Lookups run concurrently, bounded by `max_concurrent_lookups`.
    pub async fn prefetch<I>(&mut self, employee_numbers: I)
    where
        I: IntoIterator<Item = String>,
    {
        let missing: BTreeSet<String> = employee_numbers
            .into_iter()
            .filter(|e| !e.is_empty() && !self.cache.contains_key(e))
            .collect();
        if missing.is_empty() {
            return;
        }

        let official = self.reconciler.official;
        let results: Vec<(String, Result<OfficialTime, String>)> = stream::iter(missing)
            .map(|employee_number| async move {
                let result = official
                    .official_time(&employee_number)
                    .await
                    .map_err(|e| lookup_failed(&employee_number, e));
                (employee_number, result)
            })
            .buffer_unordered(self.reconciler.settings.max_concurrent_lookups.max(1))
            .collect()
            .await;

        self.lookups += results.len();
        debug!(lookups = results.len(), "Prefetched official times");
        self.cache.extend(results);
    }

    /// Number of official-time lookups issued by this pass.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Builds the attendance window for one employee.
    ///
    /// Employees not prefetched get a placeholder for their official time.
    pub async fn window(&self, employee_number: &str, period: PayPeriod) -> AttendanceWindow {
        let placeholder = &self.reconciler.settings.placeholder;
        let mut reasons = Vec::new();

        let (days_covered, number_of_days, official_time_range) =
            match self.cache.get(employee_number) {
                Some(Ok(official)) => (
                    official.days_covered.clone(),
                    official.number_of_days,
                    official.time_range.clone(),
                ),
                Some(Err(message)) => {
                    warn!(employee_number, error = %message, "Official time lookup failed");
                    reasons.push(format!("official time: {}", message));
                    (String::new(), 0, placeholder.clone())
                }
                None => {
                    reasons.push("official time: not looked up in this pass".to_string());
                    (String::new(), 0, placeholder.clone())
                }
            };

        let (days_rendered, days_worked, rendered_hours) = match self
            .reconciler
            .attendance
            .attendance(employee_number, period)
            .await
        {
            Ok(entries) => (
                render_days(&entries),
                days_worked(&entries),
                rendered_hours(&entries),
            ),
            Err(err) => {
                let message = lookup_failed(employee_number, err);
                warn!(employee_number, error = %message, "Attendance lookup failed");
                reasons.push(format!("attendance: {}", message));
                (placeholder.clone(), 0, Decimal::ZERO)
            }
        };

        AttendanceWindow {
            employee_number: employee_number.to_string(),
            days_rendered,
            days_worked,
            rendered_hours,
            days_covered,
            number_of_days,
            official_time_range,
            lookup: if reasons.is_empty() {
                LookupStatus::Resolved
            } else {
                LookupStatus::Placeholder {
                    reason: reasons.join("; "),
                }
            },
        }
    }

    /// Reconciles one draft row and computes its pay.
    pub async fn reconcile_row(&self, row: &PayrollDraftRow) -> ReconciledRow {
        let window = match row.identity() {
            Ok(identity) => {
                self.window(&identity.employee_number, identity.period())
                    .await
            }
            Err(err) => self.unresolved_window(row, err.to_string()),
        };
        ReconciledRow {
            row: row.clone(),
            window,
            pay: compute_row(row),
        }
    }

    fn unresolved_window(&self, row: &PayrollDraftRow, reason: String) -> AttendanceWindow {
        let placeholder = &self.reconciler.settings.placeholder;
        AttendanceWindow {
            employee_number: row.employee_number.clone(),
            days_rendered: placeholder.clone(),
            days_worked: 0,
            rendered_hours: Decimal::ZERO,
            days_covered: String::new(),
            number_of_days: 0,
            official_time_range: placeholder.clone(),
            lookup: LookupStatus::Placeholder { reason },
        }
    }
}

fn lookup_failed(employee_number: &str, err: StoreError) -> String {
    EngineError::TransientFetch {
        employee_number: employee_number.to_string(),
        message: err.to_string(),
    }
    .to_string()
}
