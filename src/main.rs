//! Parking occupancy service entry point
//!
//! Reads configuration from TOML file (~/.config/parking-service/config.toml).

use std::sync::Arc;
use std::time::Duration;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use parking_service::application::{SessionLifecycleController, SlotStateStore};
use parking_service::config::AppConfig;
use parking_service::infrastructure::database::migrator::Migrator;
use parking_service::infrastructure::storage::LogStore;
use parking_service::sync::{InMemorySnapshotStore, SnapshotStore, ViewObserver};
use parking_service::{
    create_api_router, create_event_bus, default_config_path, init_database, ApiState,
    DatabaseConfig, SeaOrmLogStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting parking occupancy service...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: cfg.database.connection_url(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Stores and controller ──────────────────────────────────
    let log_store: Arc<dyn LogStore> = Arc::new(SeaOrmLogStore::new(db));
    let slots = Arc::new(SlotStateStore::new());
    let medium: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let event_bus = create_event_bus();

    let controller = Arc::new(SessionLifecycleController::new(
        log_store.clone(),
        slots,
        medium.clone(),
        event_bus.clone(),
    ));

    // Rebuild in-memory occupancy from the durable log
    let rows = controller.reconcile().await?;
    info!("Startup reconciliation done ({} log rows)", rows);

    // ── Observer mirror (admin view) ───────────────────────────
    let poll_interval = Duration::from_secs(cfg.sync.poll_interval_secs);
    let admin_view = Arc::new(ViewObserver::new("admin", medium.clone()));
    let _sync_task = admin_view.spawn(event_bus.subscribe(), poll_interval);
    info!(
        "Admin view mirror polling every {}s",
        cfg.sync.poll_interval_secs
    );

    // ── HTTP server ────────────────────────────────────────────
    let router = create_api_router(ApiState {
        controller,
        log_store,
    });

    let addr = cfg.server.address();
    info!("API listening on http://{} (Swagger UI at /docs)", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
