//! Console access token handling
//!
//! The console API is protected by a single shared token, passed either as a
//! bearer token or in the `console_session` cookie. Only its SHA-256 hash is
//! kept in memory.

use axum::http::{header, HeaderMap};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Session cookie name for console sessions
pub const CONSOLE_SESSION_COOKIE: &str = "console_session";

/// Pull the console token from the Authorization header or the session cookie
pub fn extract_console_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", CONSOLE_SESSION_COOKIE)) {
            return Some(value.to_string());
        }
    }

    None
}

/// Generate a random console token (32 bytes, hex encoded)
pub fn generate_console_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a token with SHA-256
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two hex digests without short-circuiting on the first difference
pub fn hashes_match(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
