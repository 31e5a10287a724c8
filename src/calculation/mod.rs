//! Calculation logic for the Payroll Engine.
//!
//! This module contains the pure pay formulas (gross, hour and minute
//! deductions, net) and attendance reconciliation, which turns raw swipe
//! records into rendered-day summaries joined with official time.

mod attendance;
mod payroll;

pub use attendance::{
    AttendanceReconciler, ReconciledRow, ReconciliationPass, complete_pairs, days_worked,
    render_days, rendered_hours,
};
pub use payroll::{
    HOURS_PER_DAY, MINUTES_PER_DAY, PayInputs, compute_breakdown, compute_deduction,
    compute_gross, compute_hour_deduction, compute_minute_deduction, compute_net, compute_row,
};
