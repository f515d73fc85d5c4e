use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, require_staff,
    security_headers_middleware, trace_id, user_auth::require_auth,
};
use crate::routes::{admin, auth, bookings, catalog, health, jobs, quotes};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register/customer", post(auth::register_customer))
        .route("/api/v1/auth/register/staff", post(auth::register_staff))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/quotes", post(quotes::compute_quote))
        .route("/api/v1/catalog/categories", get(catalog::list_categories))
        .route("/api/v1/catalog/packages", get(catalog::list_packages))
        .route("/api/v1/catalog/features", get(catalog::list_features))
        .route("/api/v1/catalog/addons", get(catalog::list_addons))
        .route("/api/v1/catalog/panchayaths", get(catalog::list_panchayaths));

    // Authenticated routes (any role; per-handler checks refine access)
    let booking_routes = Router::new()
        .route(
            "/api/v1/bookings",
            post(bookings::create_booking).get(bookings::list_my_bookings),
        )
        .route("/api/v1/bookings/:booking_id", get(bookings::get_booking))
        .route(
            "/api/v1/bookings/number/:booking_number",
            get(bookings::get_booking_by_number),
        )
        .route(
            "/api/v1/bookings/:booking_id/status",
            patch(bookings::update_booking_status),
        )
        .route(
            "/api/v1/bookings/:booking_id/rating",
            post(bookings::rate_booking),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Staff job board
    let staff_routes = Router::new()
        .route("/api/v1/staff/jobs", get(jobs::list_my_jobs))
        .route("/api/v1/staff/jobs/available", get(jobs::list_available_jobs))
        .route("/api/v1/staff/jobs/:booking_id/accept", post(jobs::accept_job))
        .route("/api/v1/staff/jobs/:booking_id/reject", post(jobs::reject_job))
        .route("/api/v1/staff/jobs/:booking_id/start", post(jobs::start_job))
        .route(
            "/api/v1/staff/jobs/:booking_id/complete",
            post(jobs::complete_job),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin dashboard
    let admin_routes = Router::new()
        .route("/api/v1/admin/stats", get(admin::get_stats))
        .route("/api/v1/admin/bookings", get(admin::list_bookings))
        .route(
            "/api/v1/admin/bookings/:booking_id/assignments",
            get(admin::list_booking_assignments),
        )
        .route(
            "/api/v1/admin/bookings/:booking_id/payments",
            post(admin::record_payment),
        )
        .route("/api/v1/admin/tabs", get(admin::my_tabs))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(booking_routes)
        .merge(staff_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
