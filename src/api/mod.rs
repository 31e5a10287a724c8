//! HTTP API module for the Payroll Engine.
//!
//! This module exposes pay computation, attendance reconciliation, batch
//! selection and finalization over REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ComputeRequest, DraftsQuery, ExportRequest, ReconcileRequest, SelectionStateRequest,
};
pub use response::{
    ApiError, DraftPage, DraftView, PageTotals, RepairResponse, SelectionStateResponse,
};
pub use state::AppState;
