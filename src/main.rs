//! Truckshift API Server
//!
//! Food truck staff registry and shift scheduling over HTTP.
//!
//! Usage:
//!   cargo run --bin truckshift
//!
//! Environment:
//!   PORT            - Server port, set by the hosting platform
//!   TRUCKSHIFT_PORT - Local port fallback (default: 8080)
//!   TRUCKSHIFT_HOST - Server host (default: 0.0.0.0)
//!   DATA_DIR        - CSV directory (default: data)
//!   RUST_LOG        - Log level (default: info)
//!
//! See docs/DEPLOYMENT.md for the full variable list.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use truckshift::api::{create_router, start_cleanup_task, AppState};
use truckshift::utils::constants::{APP_NAME, APP_VERSION};
use truckshift::AppConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    print_banner();

    // Missing/incorrect variables are the usual cause of a crash on start
    let config = AppConfig::from_env().map_err(|e| {
        error!(code = e.code_str(), "{}", e.message);
        error!("Run truckshift_doctor to check the deployment");
        e
    })?;
    config.log_summary();

    let state = Arc::new(AppState::from_config(&config).map_err(|e| {
        error!(code = e.code_str(), "{}", e);
        e
    })?);

    // Start background cleanup task for rate limiter
    start_cleanup_task(state.rate_limiter.clone());
    info!("🧹 Background cleanup task started");

    let app = create_router(state.clone());
    let addr = config.bind_addr()?;

    info!("🚚 {} API starting on http://{}", APP_NAME, addr);
    info!("");
    info!("Endpoints:");
    info!("  GET  /v1/truck              - Truck summary");
    info!("  GET  /v1/staff              - List staff");
    info!("  POST /v1/staff              - Register staff");
    info!("  GET  /v1/staff/form         - Registration form fields");
    info!("  GET  /v1/schedules          - List shifts (?staff_email=&date=)");
    info!("  GET  /v1/schedules/options  - Staff choices for booking");
    info!("  POST /v1/schedules          - Book a shift");
    info!("  GET  /v1/customers          - List customers");
    info!("  POST /v1/customers          - Add customer");
    info!("  GET  /v1/health             - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Graceful shutdown sequence
    info!("");
    info!("🛑 Shutdown signal received");
    let truck = state.truck.lock().await;
    let summary = truck.info();
    info!("   Staff:     {}", summary.staff_count);
    info!("   Schedules: {}", summary.schedule_count);
    info!("   Data dir:  {}", state.store.data_dir().display());
    info!("👋 {} shutdown complete", APP_NAME);

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM when the platform stops the service
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════╗
    ║                                                  ║
    ║     T R U C K S H I F T   v{:<21} ║
    ║     Food truck staff & shift scheduling          ║
    ║                                                  ║
    ╚══════════════════════════════════════════════════╝
    "#,
        APP_VERSION
    );
}
