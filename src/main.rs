//! Support Admin Dashboard
//!
//! A local console for the support team's administrators, backed by a hosted
//! database/auth service.
//!
//! ## Features
//!
//! - **Statistics**: user and complaint totals, refreshed every 30 seconds
//! - **Recent Messages**: the newest support complaints, resolvable in place
//! - **User Management**: list users and reset their passwords

mod backend;
mod config;
mod dashboard;
mod handlers;
mod models;
mod validation;

use backend::RestBackend;
use dashboard::{DashboardController, DashboardOptions};
use handlers::{console_auth, AppState};
use models::AdminIdentity;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_admin_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Starting Support Admin Dashboard");
    tracing::info!("Environment: {:?}", config.environment);

    // Connect to the backend and make sure the token belongs to the admin
    let identity = AdminIdentity::new(config.admin_id, config.admin_access_token.clone());
    let backend = Arc::new(RestBackend::new(
        &config.backend_url,
        &config.backend_anon_key,
        identity,
        config.request_timeout,
    )?);
    tracing::info!("Verifying admin identity against {}", config.backend_url);
    backend::verify_admin(backend.as_ref(), config.admin_id).await?;

    // Mount the dashboard
    let dashboard = Arc::new(DashboardController::new(
        backend,
        config.admin_id,
        DashboardOptions {
            refresh_interval: config.refresh_interval,
            recent_complaints_limit: config.recent_complaints_limit,
        },
    ));
    dashboard.mount().await;

    let console_token = match &config.console_token {
        Some(token) => token.clone(),
        None => {
            let token = console_auth::generate_console_token();
            tracing::warn!("CONSOLE_TOKEN not set, generated one for this run: {}", token);
            token
        }
    };

    let state = AppState {
        dashboard: Arc::clone(&dashboard),
        console_token_hash: console_auth::hash_token(&console_token),
        is_production: config.is_production(),
    };

    // Build CORS layer
    let cors = if config.is_production() {
        CorsLayer::new()
            .allow_origin(
                config
                    .cors_origins
                    .iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    let app = handlers::router(state).layer(cors);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Console listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    dashboard.unmount().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
