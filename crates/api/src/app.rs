use axum::{
    routing::{get, post, put},
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
use crate::middleware::metrics_handler;
use crate::routes::{devices, health, orders, thresholds};
use crate::services::line::LineNotifier;
use crate::ws::{server, ConnectionRegistry};
use domain::services::notification::ChatNotifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub connections: Arc<ConnectionRegistry>,
    pub notifier: Arc<dyn ChatNotifier>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let notifier: Arc<dyn ChatNotifier> = Arc::new(LineNotifier::new(config.line.clone()));

    let state = AppState {
        pool,
        config: config.clone(),
        connections: Arc::new(ConnectionRegistry::new()),
        notifier,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
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

    // Realtime endpoints: the device fleet and the dashboard clients
    let ws_routes = Router::new()
        .route("/ws/device/:device_id", get(server::device_ws_handler))
        .route("/ws/frontend/:user_id", get(server::frontend_ws_handler));

    // Versioned REST API
    let api_routes = Router::new()
        // Device routes (v1)
        .route(
            "/api/v1/devices",
            post(devices::register_device).get(devices::list_devices),
        )
        .route("/api/v1/devices/:device_id", get(devices::get_device))
        // Distance notification threshold routes (v1)
        .route(
            "/api/v1/distance-notifications",
            get(thresholds::list_thresholds).post(thresholds::create_threshold),
        )
        .route(
            "/api/v1/distance-notifications/:threshold_id",
            put(thresholds::update_threshold).delete(thresholds::delete_threshold),
        )
        // Order delivery lifecycle routes (v1)
        .route(
            "/api/v1/orders/prepare-delivery",
            post(orders::prepare_delivery),
        )
        .route(
            "/api/v1/orders/:order_id/complete",
            put(orders::complete_order),
        )
        .route("/api/v1/orders/:order_id/cancel", put(orders::cancel_order));

    // Public operational routes
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
