//! Response types for the Payroll Engine API.
//!
//! This module defines the response bodies and the error handling for the
//! HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AttendanceWindow, PayBreakdown, PayrollDraftRow};
use crate::selection::CheckboxState;
use crate::store::StoreError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a row not found error response.
    pub fn row_not_found(row_id: &str) -> Self {
        Self::with_details(
            "ROW_NOT_FOUND",
            format!("Payroll row not found: {}", row_id),
            format!("No draft payroll row has the id '{}'", row_id),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            EngineError::ConfigParseError { path, message } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            err @ EngineError::TransientFetch { .. } => ApiErrorResponse::new(
                StatusCode::BAD_GATEWAY,
                ApiError::new("LOOKUP_FAILED", err.to_string()),
            ),
            err @ EngineError::DuplicateFinalization { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("ALREADY_FINALIZED", err.to_string()),
            ),
            err @ EngineError::BatchWrite { .. } => ApiErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::with_details(
                    "BATCH_WRITE_FAILED",
                    err.to_string(),
                    "Nothing beyond what the store confirmed was committed; re-submit the same selection",
                ),
            ),
            err @ EngineError::BatchInProgress => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("BATCH_IN_PROGRESS", err.to_string()),
            ),
            err @ EngineError::Validation { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(err.to_string()),
            ),
            EngineError::RowNotFound { row_id } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::row_not_found(&row_id),
            ),
        }
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        match error {
            err @ StoreError::Unavailable { .. } => ApiErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("STORE_UNAVAILABLE", err.to_string()),
            ),
            err @ StoreError::DuplicateIdentity { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("ALREADY_FINALIZED", err.to_string()),
            ),
            StoreError::NotFound { key } => {
                ApiErrorResponse::new(StatusCode::NOT_FOUND, ApiError::row_not_found(&key))
            }
            err @ StoreError::Rejected { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("WRITE_REJECTED", err.to_string()),
            ),
        }
    }
}

/// One draft row as listed by `GET /drafts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftView {
    /// The stored draft row.
    #[serde(flatten)]
    pub row: PayrollDraftRow,
    /// The reconciled attendance window.
    pub attendance: AttendanceWindow,
    /// The computed pay.
    pub pay: PayBreakdown,
    /// Whether the row may be selected for export.
    pub selectable: bool,
}

/// Sums over the rows of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTotals {
    /// Total gross amount.
    pub gross_amount: Decimal,
    /// Total deductions.
    pub total_deduction: Decimal,
    /// Total SSS contributions.
    pub sss_contribution: Decimal,
    /// Total net amount.
    pub net_amount: Decimal,
}

impl PageTotals {
    /// Adds one row's pay to the totals.
    pub fn add(&mut self, pay: &PayBreakdown) {
        self.gross_amount = self.gross_amount.saturating_add(pay.gross_amount);
        self.total_deduction = self.total_deduction.saturating_add(pay.deduction.total);
        self.sss_contribution = self.sss_contribution.saturating_add(pay.sss_contribution);
        self.net_amount = self.net_amount.saturating_add(pay.net_amount);
    }
}

/// Response body for `GET /drafts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPage {
    /// The 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Rows matching the filter, across all pages.
    pub total_rows: usize,
    /// Number of pages.
    pub total_pages: usize,
    /// Rows on this page.
    pub rows: Vec<DraftView>,
    /// Selectable ids on this page.
    pub page_selectable: Vec<String>,
    /// Sums over this page.
    pub totals: PageTotals,
}

/// Response body for `POST /selection/state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionStateResponse {
    /// State of the page checkbox.
    pub state: CheckboxState,
    /// The visible ids that are selectable.
    pub visible_selectable: Vec<String>,
}

/// Response body for `POST /drafts/repair`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairResponse {
    /// Ids whose status was repaired.
    pub repaired: Vec<String>,
}
