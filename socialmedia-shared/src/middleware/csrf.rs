use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::errors::{AppError, ErrorCode};

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const CSRF_COOKIE: &str = "csrftoken";

/// Reject state-mutating requests that do not carry an `X-CSRFToken` header.
///
/// When the client also sends a `csrftoken` cookie the two must match
/// (double-submit). Safe methods pass through untouched.
pub async fn require_csrf_token(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    if is_safe_method(req.method()) {
        return Ok(next.run(req).await);
    }

    check_csrf(req.headers())?;
    Ok(next.run(req).await)
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

pub fn check_csrf(headers: &HeaderMap) -> Result<(), AppError> {
    let token = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::CsrfFailed, "missing X-CSRFToken header"))?;

    if let Some(cookie) = csrf_cookie(headers) {
        if cookie != token {
            tracing::warn!("csrf token does not match cookie");
            return Err(AppError::new(ErrorCode::CsrfFailed, "CSRF token mismatch"));
        }
    }

    Ok(())
}

fn csrf_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| value)
}
