//! Handlers for customer registration and duplicate checking.
//!
//! Duplicate submissions are rejected with `409 DUPLICATE_CUSTOMER` and the
//! match report; see [`crate::error::AppError`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tgcrm_core::customer::{CustomerFilter, NewCustomer};
use tgcrm_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Unwrap a JSON body, turning extractor rejections into JSON `400`s.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// GET /api/v1/customers?q=&status=
///
/// Customers in store order. Without query parameters this is the full list.
pub async fn list_customers(
    State(state): State<AppState>,
    params: Result<Query<CustomerFilter>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let filter = params
        .map(|Query(filter)| filter)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let customers = if filter == CustomerFilter::default() {
        state.customers.get_customers().await?
    } else {
        state.customers.search_customers(&filter).await?
    };
    Ok(Json(DataResponse { data: customers }))
}

/// POST /api/v1/customers
///
/// Register a candidate. Returns 201 with the stored record, or 409 with the
/// match report if any identifying field collides.
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let candidate = json_body(payload)?;
    let customer = state.customers.add_customer(candidate).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// GET /api/v1/customers/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let customer = state.customers.get_customer(id).await?;
    Ok(Json(DataResponse { data: customer }))
}

/// POST /api/v1/customers/duplicates/check
///
/// Dry run: report whether the candidate would be rejected. Never inserts.
pub async fn check_duplicate(
    State(state): State<AppState>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let candidate = json_body(payload)?;
    let result = state.customers.check_duplicate(&candidate).await?;
    Ok(Json(DataResponse { data: result }))
}
