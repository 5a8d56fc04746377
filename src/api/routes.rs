//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{logging_middleware, rate_limit_middleware};

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes (JSON)
    let api_v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/truck", get(handlers::truck_info))
        .route(
            "/staff",
            get(handlers::list_staff).post(handlers::create_staff),
        )
        .route(
            "/schedules",
            get(handlers::list_schedules).post(handlers::create_schedule),
        )
        .route("/staff/form", get(handlers::registration_form))
        .route("/schedules/options", get(handlers::booking_options))
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::add_customer),
        );

    // Site routes for the HTML forms; form posts redirect
    let site = Router::new()
        .route("/", get(handlers::truck_info))
        .route("/health", get(handlers::health_check))
        .route("/staff", get(handlers::list_staff))
        .route(
            "/add_staff",
            get(handlers::registration_form).post(handlers::add_staff_form),
        )
        .route("/schedules", get(handlers::list_schedules))
        .route(
            "/book_schedule",
            get(handlers::booking_options).post(handlers::book_schedule_form),
        );

    Router::new()
        .nest("/v1", api_v1)
        .merge(site)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
