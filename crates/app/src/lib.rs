//! Parley application composition root
//!
//! Composes the domain routers into a single application.

use axum::Router;
use parley_auth::{AuthBackend, AuthConfig};
use parley_common::Config;
use parley_messaging::{MessagingRepositories, MessagingState};
use sqlx::PgPool;

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let repos = MessagingRepositories::new(pool.clone());

    let auth_config = AuthConfig {
        jwt_secret: config.jwt_secret,
        issuer: config.jwt_issuer,
        audience: config.jwt_audience,
    };

    let messaging_state = MessagingState {
        repos,
        auth: AuthBackend::new(pool, auth_config),
    };

    // Build router — compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Parley API v0.1.0" }))
        .merge(parley_messaging::routes().with_state(messaging_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
