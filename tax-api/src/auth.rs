//! # Admin Authentication
//!
//! HTTP Basic authentication for the `/admin` routes. The expected
//! credentials travel as an [`AdminCredentials`] request extension, and
//! [`basic_auth_middleware`] rejects anything that does not match with a
//! 401 and a `WWW-Authenticate: Basic` challenge.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Username and password accepted on admin routes.
///
/// Custom `Debug` redacts the password.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves are always compared so a wrong username costs the same as
    /// a wrong password.
    pub fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> bool {
        let user_ok = constant_time_eq(username, &self.username);
        let pass_ok = constant_time_eq(password, &self.password);
        user_ok & pass_ok
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn constant_time_eq(
    provided: &str,
    expected: &str,
) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Decode an `Authorization: Basic <base64(user:pass)>` header value.
pub fn parse_basic_auth(header_value: &str) -> Result<(String, String), String> {
    let (scheme, encoded) = header_value
        .trim()
        .split_once(' ')
        .ok_or_else(|| "authorization header must use Basic scheme".to_string())?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err("authorization header must use Basic scheme".into());
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("invalid basic credentials: {e}"))?;
    let decoded =
        String::from_utf8(decoded).map_err(|_| "basic credentials are not UTF-8".to_string())?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| "basic credentials must be username:password".to_string())?;

    Ok((username.to_string(), password.to_string()))
}

/// Admit the request only when its Basic credentials match the configured
/// [`AdminCredentials`].
pub async fn basic_auth_middleware(
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = request.extensions().get::<AdminCredentials>().cloned() else {
        return AppError::Internal("admin credentials not configured".into()).into_response();
    };

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header_value) = header_value else {
        tracing::warn!("admin authentication failed: missing authorization header");
        return AppError::Unauthorized("missing authorization header".into()).into_response();
    };

    match parse_basic_auth(header_value) {
        Ok((username, password)) if expected.verify(&username, &password) => {
            next.run(request).await
        }
        Ok((username, _)) => {
            tracing::warn!(%username, "admin authentication failed: invalid credentials");
            AppError::Unauthorized("invalid credentials".into()).into_response()
        }
        Err(msg) => {
            tracing::warn!(reason = %msg, "admin authentication failed");
            AppError::Unauthorized(msg).into_response()
        }
    }
}
