//! Route definitions for customer endpoints.
//!
//! ```text
//! /customers                          list, register (GET, POST)
//! /customers/{id}                     get (GET)
//! /customers/duplicates/check         dry-run duplicate check (POST)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::customers;
use crate::state::AppState;

/// Customer routes, nested at `/customers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/{id}", get(customers::get_customer))
        .route("/duplicates/check", post(customers::check_duplicate))
}
