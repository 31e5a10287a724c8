//! Core data models for the Payroll Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod draft_row;
mod export_outcome;
mod finalized;
mod pay_period;

pub use attendance::{AttendanceEntry, AttendanceWindow, LookupStatus, OfficialTime};
pub use draft_row::{PayrollDraftRow, PayrollStatus};
pub use export_outcome::{ExportOutcome, RowError, RowErrorKind};
pub use finalized::{DeductionBreakdown, FinalizedPayrollRecord, PayBreakdown};
pub use pay_period::{PayPeriod, PayrollIdentity};
