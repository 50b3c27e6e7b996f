//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use tgcrm_api::error::AppError;
use tgcrm_core::customer::{Customer, IdentifyingField, MatchDetails, MatchResult, NewCustomer};
use tgcrm_core::error::CoreError;
use tgcrm_core::store::StoreError;
use tgcrm_core::types::AddedDate;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn stored(id: i64, name: &str) -> Customer {
    NewCustomer::named(name).into_customer(id, AddedDate::from_ymd_opt(2023, 6, 14).unwrap())
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Customer",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Customer with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("姓名不能为空".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "姓名不能为空");
}

// ---------------------------------------------------------------------------
// Test: CoreError::DuplicateCustomer maps to 409 and carries the match report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_customer_returns_409_with_match() {
    let mut details = MatchDetails::default();
    details.set(IdentifyingField::Name);
    details.set(IdentifyingField::Email);
    let result = MatchResult::found(stored(1001, "李先生"), details);
    let err = AppError::Core(CoreError::DuplicateCustomer(Box::new(result)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_CUSTOMER");
    assert_eq!(json["error"], "与已有客户「李先生」重复：客户名称、电子邮箱");
    assert_eq!(json["match"]["isMatch"], true);
    assert_eq!(json["match"]["matchDetails"]["email"], true);
    assert_eq!(json["match"]["matchDetails"]["phone"], false);
    assert_eq!(json["match"]["existingCustomer"]["id"], "1001");
}

#[tokio::test]
async fn non_duplicate_errors_have_no_match_field() {
    let err = AppError::Core(CoreError::Validation("bad".into()));

    let (_, json) = error_to_response(err).await;

    assert!(json.get("match").is_none());
}

// ---------------------------------------------------------------------------
// Test: store failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pool_timeout_returns_503() {
    let err = AppError::Core(CoreError::Store(StoreError::new(sqlx::Error::PoolTimedOut)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
}

#[tokio::test]
async fn sqlx_row_not_found_returns_404() {
    let err = AppError::Core(CoreError::Store(StoreError::new(sqlx::Error::RowNotFound)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn other_store_errors_return_sanitized_500() {
    let err = AppError::Core(CoreError::Store(StoreError::new(
        "connection string postgres://secret@host leaked",
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
