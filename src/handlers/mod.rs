//! HTTP request handlers for the local dashboard console

pub mod console_auth;
pub mod dashboard;
pub mod middleware;

use crate::backend::Backend;
use crate::dashboard::DashboardController;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use dashboard::*;

/// Shared state of the console server
pub struct AppState<B: Backend> {
    pub dashboard: Arc<DashboardController<B>>,
    /// SHA-256 hash of the console token
    pub console_token_hash: String,
    pub is_production: bool,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
            console_token_hash: self.console_token_hash.clone(),
            is_production: self.is_production,
        }
    }
}

/// Build the console router
pub fn router<B: Backend>(state: AppState<B>) -> Router {
    let api_routes = Router::new()
        .route("/dashboard", get(get_dashboard::<B>))
        .route(
            "/complaints/:id/resolve",
            post(resolve_complaint::<B>),
        )
        .route(
            "/user-management/open",
            post(open_user_management::<B>),
        )
        .route(
            "/user-management/close",
            post(close_user_management::<B>),
        )
        .route(
            "/password-reset/target",
            post(select_reset_target::<B>),
        )
        .route(
            "/password-reset/password",
            put(set_reset_password::<B>),
        )
        .route(
            "/password-reset/submit",
            post(submit_password_reset::<B>),
        )
        .route(
            "/password-reset/close",
            post(close_password_reset::<B>),
        )
        .route("/alert/dismiss", post(dismiss_alert::<B>))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::require_console_token::<B>,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::security_headers::<B>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
