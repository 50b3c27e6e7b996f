pub mod customers;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /customers                          list, register (GET, POST)
/// /customers/{id}                     get (GET)
/// /customers/duplicates/check         dry-run duplicate check (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/customers", customers::router())
}
