use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        data::{create_data, delete_data, get_data, list_data, update_thanked},
        error::{method_not_allowed, not_found},
        health::{livez, readyz},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for the data endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let data_routes = Router::new()
        .route(
            "/data",
            get(list_data)
                .post(create_data)
                .fallback(method_not_allowed),
        )
        .route(
            "/data/{id}",
            get(get_data)
                .patch(update_thanked)
                .delete(delete_data)
                .fallback(method_not_allowed),
        )
        .layer(cors);

    Router::new()
        .merge(data_routes)
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
