//! # aegis_api
//!
//! HTTP API library for Aegis: pairing tokens, device registry and dashboard
//! telemetry for guardians.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post, put};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ApiConfig;
use crate::handlers::{auth, dashboard, devices, health, tokens};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
///
/// Delegates to `aegis_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    aegis_core::migrate::migrate(pool).await
}

/// Credentialed CORS for the configured dashboard origin, else any origin
/// without credentials.
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = config
        .cors_origin
        .as_deref()
        .and_then(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(origin = o, "ignoring unusable FRONTEND_URL: {e}");
                None
            }
        });

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route(routes::POST_AUTH_LOGOUT, post(auth::logout_handler));

    // Protected routes (require a session)
    let protected = Router::new()
        .route(routes::GET_AUTH_ME, get(auth::me_handler))
        .route(
            routes::TOKENS,
            post(tokens::create_token_handler).get(tokens::list_tokens_handler),
        )
        .route(
            routes::TOKENS_ID,
            get(tokens::get_token_handler)
                .put(tokens::update_token_handler)
                .delete(tokens::delete_token_handler),
        )
        .route(
            routes::PUT_TOKENS_ID_STATS,
            put(tokens::put_token_stats_handler),
        )
        .route(
            routes::DEVICES,
            post(devices::create_device_handler).get(devices::list_devices_handler),
        )
        .route(
            routes::DEVICES_ID,
            get(devices::get_device_handler)
                .put(devices::update_device_handler)
                .delete(devices::delete_device_handler),
        )
        .route(
            routes::GET_DEVICES_ID_DETAILS,
            get(devices::device_details_handler),
        )
        .route(
            routes::POST_DEVICES_ID_ACTIVITY,
            post(devices::append_activity_handler),
        )
        .route(
            routes::GET_DASHBOARD_STATS,
            get(dashboard::dashboard_stats_handler),
        )
        .route(
            routes::GET_DASHBOARD_DEVICES,
            get(dashboard::dashboard_devices_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
