//! Vendora Server — multi-vendor marketplace backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use vendora_core::config::AppConfig;
use vendora_core::error::AppError;
use vendora_core::traits::LiveStore;
use vendora_database::stores::{
    InventoryStore, NotificationStore, OrderStore, ProductStore, UserStore,
};

#[tokio::main]
async fn main() {
    let env = std::env::var("VENDORA_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Vendora v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = vendora_database::DatabasePool::connect(&config.database).await?;
    vendora_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Live-update store ────────────────────────────────
    tracing::info!(
        "Initializing live store (provider: {})...",
        config.live.provider
    );
    let live = Arc::new(vendora_live::LiveStoreManager::new(&config.live).await?);

    // ── Step 3: Repositories ─────────────────────────────────────
    let pool = db.pool().clone();
    let user_repo: Arc<dyn UserStore> = Arc::new(
        vendora_database::repositories::UserRepository::new(pool.clone()),
    );
    let product_repo: Arc<dyn ProductStore> = Arc::new(
        vendora_database::repositories::ProductRepository::new(pool.clone()),
    );
    let inventory_repo: Arc<dyn InventoryStore> = Arc::new(
        vendora_database::repositories::InventoryRepository::new(pool.clone()),
    );
    let order_repo: Arc<dyn OrderStore> = Arc::new(
        vendora_database::repositories::OrderRepository::new(pool.clone()),
    );
    let notification_repo: Arc<dyn NotificationStore> = Arc::new(
        vendora_database::repositories::NotificationRepository::new(pool.clone()),
    );

    // ── Step 4: Services ─────────────────────────────────────────
    let live_store: Arc<dyn LiveStore> = live.provider();
    let dispatcher = Arc::new(vendora_service::notification::NotificationDispatcher::new(
        Arc::clone(&notification_repo),
        Arc::clone(&live_store),
        Arc::clone(&user_repo),
    ));
    let order_service = Arc::new(vendora_service::order::OrderService::new(
        Arc::clone(&order_repo),
        Arc::clone(&product_repo),
        Arc::clone(&inventory_repo),
        Arc::clone(&user_repo),
        Arc::clone(&dispatcher),
    ));
    let inventory_service = Arc::new(vendora_service::inventory::InventoryService::new(
        Arc::clone(&inventory_repo),
        Arc::clone(&product_repo),
    ));
    let notification_service = Arc::new(vendora_service::notification::NotificationService::new(
        Arc::clone(&notification_repo),
        Arc::clone(&live_store),
    ));
    tracing::info!("Services initialized");

    // ── Step 5: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 6: Background worker ────────────────────────────────
    let worker_handle = if config.worker.enabled {
        let mut runner = vendora_worker::SweepRunner::new(config.worker.clone());
        runner.register(Arc::new(vendora_worker::jobs::MirrorReconcileSweep::new(
            Arc::clone(&notification_repo),
            Arc::clone(&dispatcher),
            config.worker.reconcile_grace_seconds as i64,
            config.worker.reconcile_batch_size,
        )));
        runner.register(Arc::new(
            vendora_worker::jobs::NotificationCleanupSweep::new(
                Arc::clone(&notification_repo),
                Arc::clone(&live_store),
                config.worker.notification_retention_days,
            ),
        ));

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(worker_cancel).await;
        });

        tracing::info!("Background worker started");
        Some(handle)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 7: HTTP server ──────────────────────────────────────
    let app_state = vendora_api::state::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        live: Arc::clone(&live),
        order_service,
        inventory_service,
        notification_service,
    };
    let app = vendora_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Vendora server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Wait for background tasks ────────────────────────
    if let Some(handle) = worker_handle {
        let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
        let _ = tokio::time::timeout(grace, handle).await;
    }
    db.close().await;

    tracing::info!("Vendora server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
