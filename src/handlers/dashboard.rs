//! Console handlers: render the dashboard and dispatch admin actions

use crate::backend::Backend;
use crate::dashboard::DashboardView;
use crate::models::*;
use crate::validation::validate_password_reset;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::AppState;

async fn current_view<B: Backend>(state: &AppState<B>) -> (StatusCode, Json<ApiResponse<DashboardView>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(state.dashboard.view().await)),
    )
}

/// Liveness check
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success("ok")))
}

/// Render the dashboard
pub async fn get_dashboard<B: Backend>(State(state): State<AppState<B>>) -> impl IntoResponse {
    current_view(&state).await
}

/// Mark a complaint as resolved
pub async fn resolve_complaint<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    state.dashboard.mark_complaint_resolved(id).await;
    current_view(&state).await
}

/// Open the user management overlay
pub async fn open_user_management<B: Backend>(
    State(state): State<AppState<B>>,
) -> impl IntoResponse {
    state.dashboard.open_user_management().await;
    current_view(&state).await
}

/// Close the user management overlay (and any reset in progress)
pub async fn close_user_management<B: Backend>(
    State(state): State<AppState<B>>,
) -> impl IntoResponse {
    state.dashboard.close_user_management().await;
    current_view(&state).await
}

/// Pick the user whose password will be reset
pub async fn select_reset_target<B: Backend>(
    State(state): State<AppState<B>>,
    Json(input): Json<SelectResetTarget>,
) -> impl IntoResponse {
    if !state.dashboard.begin_password_reset(input.user_id).await {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        );
    }
    current_view(&state).await
}

/// Update the password buffer of the reset overlay
pub async fn set_reset_password<B: Backend>(
    State(state): State<AppState<B>>,
    Json(input): Json<PasswordInput>,
) -> impl IntoResponse {
    state.dashboard.set_password_input(input.password).await;
    current_view(&state).await
}

/// Submit the password reset
pub async fn submit_password_reset<B: Backend>(
    State(state): State<AppState<B>>,
) -> impl IntoResponse {
    let selection = state.dashboard.snapshot().await.selection;
    if let Err(e) = validate_password_reset(&selection) {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
    }

    state.dashboard.handle_password_reset().await;
    current_view(&state).await
}

/// Close the password reset overlay
pub async fn close_password_reset<B: Backend>(
    State(state): State<AppState<B>>,
) -> impl IntoResponse {
    state.dashboard.close_password_reset().await;
    current_view(&state).await
}

/// Dismiss the pending alert
pub async fn dismiss_alert<B: Backend>(State(state): State<AppState<B>>) -> impl IntoResponse {
    state.dashboard.dismiss_alert().await;
    current_view(&state).await
}
