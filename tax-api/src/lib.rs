//! # tax-api: Personal Income Tax HTTP Service
//!
//! | Method | Path                             | Auth  | Module             |
//! |--------|----------------------------------|-------|--------------------|
//! | GET    | `/`                              | none  | greeting           |
//! | GET    | `/health/liveness`, `/readiness` | none  | probes             |
//! | POST   | `/tax/calculations`              | none  | [`routes::tax`]    |
//! | POST   | `/tax/calculations/upload-csv`   | none  | [`routes::tax`]    |
//! | POST   | `/admin/deductions/personal`     | basic | [`routes::admin`]  |
//! | POST   | `/admin/deductions/k-receipt`    | basic | [`routes::admin`]  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → BasicAuth (admin routes only) → Handler
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::auth::AdminCredentials;
use crate::state::AppState;

/// Plain-text reply on `/`.
pub const GREETING: &str = "Hello, K-Tax!";

/// Assemble the application router.
///
/// Only the `/admin` routes pass through Basic authentication.
pub fn app(
    state: AppState,
    admin: AdminCredentials,
) -> Router {
    let admin_routes = routes::admin::router()
        .layer(from_fn(auth::basic_auth_middleware))
        .layer(axum::Extension(admin));

    let api = Router::new()
        .merge(routes::tax::router())
        .merge(admin_routes)
        .with_state(state);

    let public = Router::new()
        .route("/", get(greeting))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(public)
        .merge(api)
        .layer(TraceLayer::new_for_http())
}

async fn greeting() -> &'static str {
    GREETING
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}
