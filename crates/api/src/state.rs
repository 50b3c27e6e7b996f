use std::sync::Arc;

use tgcrm_core::service::CustomerService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Duplicate detection and registration service.
    pub customers: Arc<CustomerService>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
