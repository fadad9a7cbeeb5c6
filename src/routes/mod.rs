//! Route definitions for the Oficina API.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod reports;
pub mod service_orders;
pub mod users;
pub mod vehicles;

use axum::{
    http::{
        header::{self, InvalidHeaderValue},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::AppState;

/// Request bodies are small JSON forms.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assemble the full application router.
///
/// Fails only when `FRONTEND_URL` is not a valid header value.
pub fn build_router(state: AppState) -> Result<Router, InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_str(&state.config.frontend_url)?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/me", get(auth::me));

    let user_routes = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get_by_id).put(users::update).delete(users::delete),
        );

    let customer_routes = Router::new()
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::get_by_id)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route(
            "/customers/{id}/history",
            get(customers::list_history).post(customers::add_history),
        );

    let vehicle_routes = Router::new()
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .route(
            "/vehicles/{id}",
            get(vehicles::get_by_id)
                .put(vehicles::update)
                .delete(vehicles::delete),
        );

    let order_routes = Router::new()
        .route(
            "/service-orders",
            get(service_orders::list).post(service_orders::create),
        )
        .route(
            "/service-orders/{id}",
            get(service_orders::get_by_id)
                .put(service_orders::update)
                .delete(service_orders::delete),
        )
        .route(
            "/service-orders/{id}/document",
            get(service_orders::document),
        );

    let insight_routes = Router::new()
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/reports/general", get(reports::general))
        .route("/reports/general/csv", get(reports::general_csv))
        .route("/reports/general/document", get(reports::general_document));

    let api = Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(customer_routes)
        .merge(vehicle_routes)
        .merge(order_routes)
        .merge(insight_routes);

    Ok(Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                // Cors requires a `Default` inner body, so it sits innermost.
                .layer(cors),
        )
        .with_state(state))
}
