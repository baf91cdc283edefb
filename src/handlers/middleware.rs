//! Middleware for console authentication and security headers

use crate::backend::Backend;
use crate::handlers::console_auth::{extract_console_token, hash_token, hashes_match};
use crate::handlers::AppState;
use crate::models::ApiResponse;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Reject requests that do not carry the console token
pub async fn require_console_token<B: Backend>(
    State(state): State<AppState<B>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_console_token(request.headers()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error("Not authenticated")),
        )
            .into_response();
    };

    if !hashes_match(&hash_token(&token), &state.console_token_hash) {
        tracing::warn!("Rejected console request with invalid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error("Invalid console token")),
        )
            .into_response();
    }

    next.run(request).await
}

/// Security headers middleware
pub async fn security_headers<B: Backend>(
    State(state): State<AppState<B>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    if state.is_production {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        );
    }

    response
}
