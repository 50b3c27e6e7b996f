use std::net::SocketAddr;
use std::sync::Arc;

use tgcrm_core::service::CustomerService;
use tgcrm_core::store::{CustomerStore, MemoryCustomerStore};
use tgcrm_db::PgCustomerStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tgcrm_api::config::{LogFormat, ServerConfig, StoreBackend};
use tgcrm_api::router::build_app_router;
use tgcrm_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "tgcrm_api=debug,tgcrm_core=debug,tgcrm_db=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Customer store ---
    let store = open_store(&config.store_backend).await;
    let customers = Arc::new(CustomerService::new(store));

    if config.seed_demo_customers {
        customers
            .seed_demo_customers()
            .await
            .expect("Failed to seed demo customers");
    }

    let config = Arc::new(config);
    let state = AppState {
        customers,
        config: Arc::clone(&config),
    };

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured store back end.
///
/// For PostgreSQL this connects, checks the connection, and applies pending
/// migrations before the server accepts requests.
async fn open_store(backend: &StoreBackend) -> Arc<dyn CustomerStore> {
    match backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory customer store");
            Arc::new(MemoryCustomerStore::new())
        }
        StoreBackend::Postgres { database_url } => {
            let pool = tgcrm_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            tgcrm_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            tgcrm_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgCustomerStore::new(pool))
        }
    }
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
