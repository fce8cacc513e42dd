//! Bearer API-key authentication for the /api routes.

use super::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::error::ApiError;

/// Configured API key allow-list.
#[derive(Clone)]
pub struct ApiKeys(Arc<Vec<String>>);

impl ApiKeys {
    pub fn new(keys: Vec<String>) -> Self {
        Self(Arc::new(keys))
    }

    /// Check a presented key against the allow-list.
    pub fn validate(&self, presented: &str) -> bool {
        // Check every key without early exit to keep timing uniform.
        let mut found = false;
        for key in self.0.iter() {
            if constant_time_compare(key, presented) {
                found = true;
            }
        }
        found
    }
}

/// Constant-time string comparison to prevent timing attacks.
///
/// Leaks only the length difference, which is acceptable for API keys.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let mut result = (a.len() ^ b.len()) as u8;

    let min_len = std::cmp::min(a.len(), b.len());
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    for i in 0..min_len {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

/// Middleware enforcing `Authorization: Bearer <key>` on protected routes.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(presented) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return Err(ApiError::Unauthorized(
            "Missing or malformed Authorization header",
        ));
    };

    if !state.api_keys.validate(presented) {
        return Err(ApiError::Unauthorized("Invalid API key"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_any_configured_key() {
        let keys = ApiKeys::new(vec!["key1".into(), "key2".into()]);
        assert!(keys.validate("key1"));
        assert!(keys.validate("key2"));
        assert!(!keys.validate("key3"));
        assert!(!keys.validate(""));
    }

    #[test]
    fn constant_time_compare_matches_equality() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(!constant_time_compare("", "a"));
        assert!(constant_time_compare("", ""));
    }
}
