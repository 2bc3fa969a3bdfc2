//! Department Manager
//!
//! REST API for apartment building management.
//! Reads configuration from a TOML file (~/.config/department-manager/config.toml).

use std::sync::Arc;

use tracing::{error, info, warn};

use department_manager::config::{config_path_from_env, AppConfig};
use department_manager::domain::Store;
use department_manager::shared::shutdown::ShutdownCoordinator;
use department_manager::{
    create_api_router, init_database, run_migrations, AppState, SeaOrmRepositoryProvider,
};

fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = config_path_from_env();
    let (app_cfg, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_tracing(&app_cfg);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => error!("Failed to load config: {}. Using defaults.", e),
    }

    info!("Starting Department Manager...");

    // Recorder must exist before the first metrics call
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&app_cfg.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = run_migrations(&db).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }

    let store: Arc<dyn Store> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    let state = AppState::new(
        store,
        app_cfg.jwt_config(),
        app_cfg.vehicle_rates(),
        app_cfg.security.require_auth,
    );
    if !app_cfg.security.require_auth {
        warn!("Authentication is disabled, every API route is public");
    }

    match state
        .users
        .ensure_default_admin(
            &app_cfg.admin.name,
            &app_cfg.admin.email,
            &app_cfg.admin.password,
        )
        .await
    {
        Ok(Some(_)) => warn!("Default admin created, change its password"),
        Ok(None) => {}
        Err(e) => error!("Failed to create default admin: {}", e),
    }

    // ── Shutdown ───────────────────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── HTTP ───────────────────────────────────────────────────
    let router = create_api_router(state, Some(prometheus_handle));
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("REST API received shutdown signal");
        })
        .await;
    if let Err(e) = &result {
        error!("REST API server error: {}", e);
    }

    shutdown
        .run_cleanup(|| async move {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        })
        .await;

    info!("Department Manager shutdown complete");
    result.map_err(Into::into)
}
