pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::state::AppState;

/// Build the full HTTP application for the given state
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(ticket_routes())
        .merge(directory_routes())
        .route_layer(from_fn_with_state(state.clone(), middleware::jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Bearer token required
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    // Global middleware
    if let Some(cors) = cors_layer(&state.config.security) {
        router = router.layer(cors);
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn ticket_routes() -> Router<AppState> {
    use handlers::protected::tickets;

    Router::new()
        // Collection
        .route(
            "/service-tickets",
            get(tickets::ticket_list).post(tickets::ticket_create),
        )
        // Individual ticket
        .route(
            "/service-tickets/:id",
            get(tickets::ticket_get)
                .put(tickets::ticket_update)
                .delete(tickets::ticket_delete),
        )
}

fn directory_routes() -> Router<AppState> {
    use handlers::protected::{customers, employees};

    Router::new()
        .route("/customers", get(customers::list))
        .route("/customers/:id", get(customers::get))
        .route("/employees", get(employees::list))
        .route("/employees/:id", get(employees::get))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
