//! Integration tests for the Payroll Engine HTTP API.
//!
//! These run against the demo configuration in `config/payroll`, whose seed
//! data holds five draft rows:
//!
//! - `row_001` EMP-001, Finance, Jan 1-15 (gross 8000, net 7800)
//! - `row_002` EMP-002, Operations, Jan 1-15 (gross 1125, net 814.0625)
//! - `row_003` EMP-003, Operations, Jan 1-15, no official time on file
//! - `row_004` EMP-001, Finance, Jan 16-31 (gross 8800, net 8750)
//! - `row_005` a re-imported copy of `row_002` with the same identity

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::store::InMemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/payroll").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::in_memory(load_config()))
}

/// Builds a router over a store the test keeps a handle to.
fn create_router_with_store() -> (Router, Arc<InMemoryStore>) {
    let mut config = load_config();
    let seed = config.take_seed().unwrap_or_default();
    let store = Arc::new(InMemoryStore::from_seed(seed));
    (create_router(AppState::new(config, store.clone())), store)
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal serialized either as a string or a number.
fn decimal_at(value: &Value) -> Decimal {
    serde_json::from_value(value.clone()).unwrap()
}

fn strings(value: &Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, "GET", uri, None).await
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, "POST", uri, Some(body)).await
}

async fn export(router: &Router, ids: &[&str]) -> (StatusCode, Value) {
    post(router, "/export", json!({ "ids": ids })).await
}

fn row<'a>(page: &'a Value, id: &str) -> &'a Value {
    page["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("row {} not on page", id))
}

// =============================================================================
// Computation
// =============================================================================

#[tokio::test]
async fn test_compute_reference_scenario() {
    let router = create_router_for_test();

    let (status, result) = post(
        &router,
        "/compute",
        json!({
            "rate_per_day": "750",
            "rh": "12",
            "deduction_hours": "2",
            "deduction_minutes": "15",
            "sss_contribution": "100"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_at(&result["gross_amount"]), decimal("1125"));
    assert_eq!(decimal_at(&result["deduction"]["hour_deduction"]), decimal("187.5"));
    assert_eq!(decimal_at(&result["deduction"]["minute_deduction"]), decimal("23.4375"));
    assert_eq!(decimal_at(&result["deduction"]["total"]), decimal("210.9375"));
    assert_eq!(decimal_at(&result["net_amount"]), decimal("814.0625"));
}

#[tokio::test]
async fn test_compute_with_missing_and_null_fields() {
    let router = create_router_for_test();

    let (status, result) = post(
        &router,
        "/compute",
        json!({ "rate_per_day": null, "rh": "8", "sss_contribution": "50" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_at(&result["gross_amount"]), Decimal::ZERO);
    assert_eq!(decimal_at(&result["net_amount"]), decimal("-50"));
}

#[tokio::test]
async fn test_compute_empty_body_is_all_zero() {
    let router = create_router_for_test();

    let (status, result) = post(&router, "/compute", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_at(&result["net_amount"]), Decimal::ZERO);
}

// =============================================================================
// Reconciliation
// =============================================================================

#[tokio::test]
async fn test_reconcile_renders_complete_days() {
    let router = create_router_for_test();

    let (status, window) = post(
        &router,
        "/reconcile",
        json!({
            "employee_number": "EMP-001",
            "start_date": "2024-01-01",
            "end_date": "2024-01-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(window["days_rendered"], "Jan 2, 3, 4");
    assert_eq!(window["days_worked"], 3);
    assert_eq!(decimal_at(&window["rendered_hours"]), decimal("22"));
    assert_eq!(window["days_covered"], "Mon-Fri");
    assert_eq!(window["number_of_days"], 5);
    assert_eq!(window["official_time_range"], "08:00-17:00");
    assert_eq!(window["lookup"]["state"], "resolved");
}

#[tokio::test]
async fn test_reconcile_no_complete_pairs_is_empty_string() {
    let router = create_router_for_test();

    let (status, window) = post(
        &router,
        "/reconcile",
        json!({
            "employee_number": "EMP-002",
            "start_date": "2024-01-01",
            "end_date": "2024-01-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(window["days_rendered"], "");
    assert_eq!(window["days_worked"], 0);
    assert_eq!(window["official_time_range"], "07:00-16:00");
}

#[tokio::test]
async fn test_reconcile_missing_official_time_is_placeholder() {
    let router = create_router_for_test();

    let (status, window) = post(
        &router,
        "/reconcile",
        json!({
            "employee_number": "EMP-003",
            "start_date": "2024-01-01",
            "end_date": "2024-01-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(window["official_time_range"], "—");
    assert_eq!(window["number_of_days"], 0);
    assert_eq!(window["days_covered"], "");
    assert_eq!(window["lookup"]["state"], "placeholder");
}

#[tokio::test]
async fn test_reconcile_blank_employee_returns_400() {
    let router = create_router_for_test();

    let (status, error) = post(
        &router,
        "/reconcile",
        json!({
            "employee_number": "   ",
            "start_date": "2024-01-01",
            "end_date": "2024-01-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Draft Listing
// =============================================================================

#[tokio::test]
async fn test_list_drafts_enriches_rows() {
    let router = create_router_for_test();

    let (status, page) = get(&router, "/drafts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["page"], 1);
    assert_eq!(page["page_size"], 10);
    assert_eq!(page["total_rows"], 5);
    assert_eq!(page["total_pages"], 1);

    let first = row(&page, "row_001");
    assert_eq!(first["employee_number"], "EMP-001");
    assert_eq!(first["attendance"]["days_rendered"], "Jan 2, 3, 4");
    assert_eq!(decimal_at(&first["pay"]["gross_amount"]), decimal("8000"));
    assert_eq!(decimal_at(&first["pay"]["net_amount"]), decimal("7800"));
    assert_eq!(first["selectable"], true);

    let second_period = row(&page, "row_004");
    assert_eq!(second_period["attendance"]["days_rendered"], "Jan 17");
    assert_eq!(decimal_at(&second_period["pay"]["net_amount"]), decimal("8750"));

    let no_schedule = row(&page, "row_003");
    assert_eq!(no_schedule["attendance"]["official_time_range"], "—");
    assert_eq!(decimal_at(&no_schedule["pay"]["net_amount"]), decimal("5040"));
}

#[tokio::test]
async fn test_list_drafts_page_totals() {
    let router = create_router_for_test();

    let (_, page) = get(&router, "/drafts").await;

    assert_eq!(decimal_at(&page["totals"]["gross_amount"]), decimal("24170"));
    assert_eq!(decimal_at(&page["totals"]["net_amount"]), decimal("23218.125"));
    assert_eq!(decimal_at(&page["totals"]["sss_contribution"]), decimal("380"));
}

#[tokio::test]
async fn test_list_drafts_department_filter() {
    let router = create_router_for_test();

    let (status, page) = get(&router, "/drafts?department=operations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_rows"], 3);
    let ids: Vec<&str> = page["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["row_002", "row_003", "row_005"]);
}

#[tokio::test]
async fn test_list_drafts_pagination() {
    let router = create_router_for_test();

    let (_, page) = get(&router, "/drafts?page=3&page_size=2").await;
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["rows"].as_array().unwrap().len(), 1);
    assert_eq!(page["rows"][0]["id"], "row_005");

    let (_, beyond) = get(&router, "/drafts?page=9&page_size=2").await;
    assert!(beyond["rows"].as_array().unwrap().is_empty());
    assert_eq!(beyond["total_rows"], 5);
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_selectable_ids_exclude_finalized_identities() {
    let router = create_router_for_test();

    let (_, before) = get(&router, "/drafts/selectable").await;
    assert_eq!(
        strings(&before),
        vec!["row_001", "row_002", "row_003", "row_004", "row_005"]
    );

    export(&router, &["row_002"]).await;

    let (_, after) = get(&router, "/drafts/selectable").await;
    assert_eq!(strings(&after), vec!["row_001", "row_003", "row_004"]);

    let (_, page) = get(&router, "/drafts?department=Operations").await;
    assert_eq!(row(&page, "row_005")["selectable"], false);
    assert_eq!(strings(&page["page_selectable"]), vec!["row_003"]);
}

#[tokio::test]
async fn test_selection_state_tristate() {
    let router = create_router_for_test();

    let (status, state) = post(
        &router,
        "/selection/state",
        json!({
            "visible_ids": ["row_001", "row_002"],
            "selected_ids": ["row_001", "row_004"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["state"], "some");

    let (_, state) = post(
        &router,
        "/selection/state",
        json!({ "visible_ids": ["row_001", "row_002"], "selected_ids": [] }),
    )
    .await;
    assert_eq!(state["state"], "none");

    export(&router, &["row_002"]).await;

    let (_, state) = post(
        &router,
        "/selection/state",
        json!({
            "visible_ids": ["row_001", "row_002"],
            "selected_ids": ["row_001"]
        }),
    )
    .await;
    assert_eq!(state["state"], "all");
    assert_eq!(strings(&state["visible_selectable"]), vec!["row_001"]);
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_shared_identity_in_one_batch() {
    let router = create_router_for_test();

    let (status, outcome) = export(&router, &["row_002", "row_005"]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(strings(&outcome["succeeded"]), vec!["row_002"]);
    assert_eq!(strings(&outcome["skipped_duplicate"]), vec!["row_005"]);
    assert!(outcome["failed"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_is_idempotent() {
    let router = create_router_for_test();
    let selection = ["row_001", "row_004"];

    let (_, first) = export(&router, &selection).await;
    assert_eq!(strings(&first["succeeded"]), vec!["row_001", "row_004"]);

    let (status, second) = export(&router, &selection).await;
    assert_eq!(status, StatusCode::OK);
    assert!(second["succeeded"].as_array().unwrap().is_empty());
    assert_eq!(strings(&second["skipped_duplicate"]), vec!["row_001", "row_004"]);

    let (_, records) = get(&router, "/finalized").await;
    assert_eq!(records.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_export_records_snapshot() {
    let router = create_router_for_test();

    export(&router, &["row_001"]).await;

    let (status, records) = get(&router, "/finalized").await;
    assert_eq!(status, StatusCode::OK);
    let record = &records[0];
    assert_eq!(record["employee_number"], "EMP-001");
    assert_eq!(record["start_date"], "2024-01-01");
    assert_eq!(record["end_date"], "2024-01-15");
    assert_eq!(record["source_row_id"], "row_001");
    assert_eq!(decimal_at(&record["rh"]), decimal("80"));
    assert_eq!(decimal_at(&record["pay"]["gross_amount"]), decimal("8000"));
    assert_eq!(decimal_at(&record["pay"]["deduction"]["total"]), decimal("150"));
    assert_eq!(decimal_at(&record["pay"]["net_amount"]), decimal("7800"));

    let (_, page) = get(&router, "/drafts").await;
    assert_eq!(row(&page, "row_001")["status"], "processed");
}

#[tokio::test]
async fn test_export_unknown_id_is_failed() {
    let router = create_router_for_test();

    let (status, outcome) = export(&router, &["row_404", "row_003"]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(strings(&outcome["succeeded"]), vec!["row_003"]);
    assert_eq!(strings(&outcome["failed"]), vec!["row_404"]);
    assert_eq!(outcome["errors"][0]["kind"], "validation");
}

#[tokio::test]
async fn test_export_missing_ids_returns_400() {
    let router = create_router_for_test();

    let (status, error) = post(&router, "/export", json!({ "rows": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_store_outage_fails_whole_batch() {
    let (router, store) = create_router_with_store();
    store.set_available(false);

    let (status, error) = export(&router, &["row_001"]).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error["code"], "BATCH_WRITE_FAILED");

    let (status, _) = get(&router, "/drafts").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    store.set_available(true);
    let (status, outcome) = export(&router, &["row_001"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(strings(&outcome["succeeded"]), vec!["row_001"]);
}

// =============================================================================
// Repair and Deletion
// =============================================================================

#[tokio::test]
async fn test_repair_flips_stale_twin() {
    let router = create_router_for_test();

    export(&router, &["row_002"]).await;
    let (status, result) = post(&router, "/drafts/repair", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(strings(&result["repaired"]), vec!["row_005"]);

    let (_, again) = post(&router, "/drafts/repair", json!({})).await;
    assert!(again["repaired"].as_array().unwrap().is_empty());

    let (_, page) = get(&router, "/drafts?department=Operations").await;
    assert_eq!(row(&page, "row_005")["status"], "processed");
}

#[tokio::test]
async fn test_delete_draft_rows() {
    let router = create_router_for_test();

    let (status, body) = send(&router, "DELETE", "/drafts/row_003", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, error) = send(&router, "DELETE", "/drafts/row_003", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "ROW_NOT_FOUND");

    export(&router, &["row_001"]).await;
    let (status, error) = send(&router, "DELETE", "/drafts/row_001", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "WRITE_REJECTED");

    let (_, page) = get(&router, "/drafts").await;
    assert_eq!(page["total_rows"], 4);
}
