//! Request types for the Payroll Engine API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::PayInputs;
use crate::models::PayPeriod;

/// Request body for `POST /compute`.
///
/// Every field may be omitted or `null`; missing values count as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// Daily rate.
    #[serde(default)]
    pub rate_per_day: Option<Decimal>,
    /// Rendered hours.
    #[serde(default)]
    pub rh: Option<Decimal>,
    /// Deduction hours.
    #[serde(default)]
    pub deduction_hours: Option<Decimal>,
    /// Deduction minutes.
    #[serde(default)]
    pub deduction_minutes: Option<Decimal>,
    /// SSS contribution.
    #[serde(default)]
    pub sss_contribution: Option<Decimal>,
}

impl From<ComputeRequest> for PayInputs {
    fn from(req: ComputeRequest) -> Self {
        PayInputs {
            rate_per_day: req.rate_per_day.unwrap_or_default(),
            rh: req.rh.unwrap_or_default(),
            deduction_hours: req.deduction_hours.unwrap_or_default(),
            deduction_minutes: req.deduction_minutes.unwrap_or_default(),
            sss_contribution: req.sss_contribution.unwrap_or_default(),
        }
    }
}

/// Request body for `POST /reconcile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// The employee to reconcile.
    pub employee_number: String,
    /// Start of the period (inclusive).
    pub start_date: NaiveDate,
    /// End of the period (inclusive).
    pub end_date: NaiveDate,
}

impl ReconcileRequest {
    /// Returns the requested period.
    pub fn period(&self) -> PayPeriod {
        PayPeriod::new(self.start_date, self.end_date)
    }
}

/// Query parameters for `GET /drafts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftsQuery {
    /// Only rows of this department (case-insensitive).
    #[serde(default)]
    pub department: Option<String>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<usize>,
    /// Rows per page; defaults to the configured page size.
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// Request body for `POST /selection/state`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionStateRequest {
    /// Row ids shown on the current page.
    #[serde(default)]
    pub visible_ids: Vec<String>,
    /// Row ids selected across all pages.
    #[serde(default)]
    pub selected_ids: Vec<String>,
}

/// Request body for `POST /export`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Row ids to finalize.
    pub ids: Vec<String>,
}
