//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::collections::HashSet;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{AttendanceReconciler, PayInputs, compute_breakdown};
use crate::error::EngineError;
use crate::models::PayrollDraftRow;
use crate::selection::{
    FinalizedIndex, is_selectable, page_count, paginate, selectable_rows, tristate,
};

use super::request::{
    ComputeRequest, DraftsQuery, ExportRequest, ReconcileRequest, SelectionStateRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, DraftPage, DraftView, PageTotals, RepairResponse,
    SelectionStateResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/compute", post(compute_handler))
        .route("/reconcile", post(reconcile_handler))
        .route("/drafts", get(list_drafts_handler))
        .route("/drafts/selectable", get(selectable_handler))
        .route("/drafts/repair", post(repair_handler))
        .route("/drafts/:id", delete(delete_draft_handler))
        .route("/selection/state", post(selection_state_handler))
        .route("/export", post(export_handler))
        .route("/finalized", get(finalized_handler))
        .with_state(state)
}

type HandlerResult = Result<Response, ApiErrorResponse>;

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Unwraps a JSON body or turns the rejection into a 400.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::new(StatusCode::BAD_REQUEST, error))
}

/// Loads every draft row together with the finalized index.
async fn load_drafts(
    state: &AppState,
) -> Result<(Vec<PayrollDraftRow>, FinalizedIndex), ApiErrorResponse> {
    let drafts = state.drafts().list_drafts().await?;
    let records = state.finalized().list_finalized().await?;
    Ok((drafts, FinalizedIndex::from_records(&records)))
}

/// Handler for POST /compute.
async fn compute_handler(payload: Result<Json<ComputeRequest>, JsonRejection>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let inputs: PayInputs = json_body(correlation_id, payload)?.into();

    let breakdown = compute_breakdown(&inputs);
    info!(
        correlation_id = %correlation_id,
        gross = %breakdown.gross_amount,
        net = %breakdown.net_amount,
        "Computed pay"
    );
    Ok(json_response(StatusCode::OK, breakdown))
}

/// Handler for POST /reconcile.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let employee_number = request.employee_number.trim();
    if employee_number.is_empty() {
        return Err(ApiErrorResponse::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("employee_number must not be blank"),
        ));
    }
    if !request.period().is_valid() {
        return Err(ApiErrorResponse::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("end_date must not be before start_date"),
        ));
    }

    let reconciler = AttendanceReconciler::new(
        state.attendance(),
        state.official(),
        state.config().reconciliation(),
    );
    let window = reconciler
        .reconcile(employee_number, request.period())
        .await;

    info!(
        correlation_id = %correlation_id,
        employee_number,
        placeholder = window.is_placeholder(),
        "Reconciled attendance"
    );
    Ok(json_response(StatusCode::OK, window))
}

/// Handler for GET /drafts.
///
/// Only the requested page is reconciled, in one pass.
async fn list_drafts_handler(
    State(state): State<AppState>,
    Query(query): Query<DraftsQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(state.config().selection().page_size);
    if page_size == 0 {
        return Err(ApiErrorResponse::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("page_size must be at least 1"),
        ));
    }

    let (mut drafts, index) = load_drafts(&state).await?;
    if let Some(department) = query.department.as_deref().map(str::trim) {
        drafts.retain(|row| row.department.trim().eq_ignore_ascii_case(department));
    }

    let reconciler = AttendanceReconciler::new(
        state.attendance(),
        state.official(),
        state.config().reconciliation(),
    );
    let reconciled = reconciler
        .reconcile_rows(paginate(&drafts, page, page_size))
        .await;

    let mut totals = PageTotals::default();
    let mut page_selectable = Vec::new();
    let rows: Vec<DraftView> = reconciled
        .into_iter()
        .map(|r| {
            let selectable = is_selectable(&r.row, &index);
            if selectable {
                page_selectable.push(r.row.id.clone());
            }
            totals.add(&r.pay);
            DraftView {
                row: r.row,
                attendance: r.window,
                pay: r.pay,
                selectable,
            }
        })
        .collect();

    info!(
        correlation_id = %correlation_id,
        page,
        rows = rows.len(),
        total_rows = drafts.len(),
        duration_us = start_time.elapsed().as_micros() as u64,
        "Listed draft rows"
    );

    Ok(json_response(
        StatusCode::OK,
        DraftPage {
            page,
            page_size,
            total_rows: drafts.len(),
            total_pages: page_count(drafts.len(), page_size),
            rows,
            page_selectable,
            totals,
        },
    ))
}

/// Handler for GET /drafts/selectable.
async fn selectable_handler(State(state): State<AppState>) -> HandlerResult {
    let (drafts, index) = load_drafts(&state).await?;
    let mut ids: Vec<String> = selectable_rows(&drafts, &index).into_iter().collect();
    ids.sort();
    Ok(json_response(StatusCode::OK, ids))
}

/// Handler for POST /selection/state.
async fn selection_state_handler(
    State(state): State<AppState>,
    payload: Result<Json<SelectionStateRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let (drafts, index) = load_drafts(&state).await?;
    let selectable = selectable_rows(&drafts, &index);
    let visible_selectable: Vec<String> = request
        .visible_ids
        .into_iter()
        .filter(|id| selectable.contains(id))
        .collect();
    let selected: HashSet<String> = request.selected_ids.into_iter().collect();

    Ok(json_response(
        StatusCode::OK,
        SelectionStateResponse {
            state: tristate(&visible_selectable, &selected),
            visible_selectable,
        },
    ))
}

/// Handler for POST /export.
async fn export_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        rows = request.ids.len(),
        "Processing export request"
    );

    match state.gate().export_selection(&request.ids).await {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                succeeded = outcome.succeeded.len(),
                skipped = outcome.skipped_duplicate.len(),
                failed = outcome.failed.len(),
                "Export completed"
            );
            Ok(json_response(StatusCode::OK, outcome))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Export failed"
            );
            Err(err.into())
        }
    }
}

/// Handler for POST /drafts/repair.
async fn repair_handler(State(state): State<AppState>) -> HandlerResult {
    let repaired = state.gate().repair_statuses().await?;
    Ok(json_response(StatusCode::OK, RepairResponse { repaired }))
}

/// Handler for DELETE /drafts/:id.
///
/// Processed rows are refused with 409.
async fn delete_draft_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult {
    if state.drafts().delete_draft(&id).await? {
        info!(row_id = %id, "Deleted draft row");
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(EngineError::RowNotFound { row_id: id }.into())
    }
}

/// Handler for GET /finalized.
async fn finalized_handler(State(state): State<AppState>) -> HandlerResult {
    let records = state.finalized().list_finalized().await?;
    Ok(json_response(StatusCode::OK, records))
}
