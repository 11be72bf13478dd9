use super::{AppState, auth, handlers, security};
use crate::config::Environment;
use crate::errors;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Largest JSON body accepted on create.
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

/// Builds the full Axum router with all routes, middleware and shared state.
///
/// Layer order, outermost first: request tracing, CORS, security headers,
/// internal error rendering, panic catching, then per-route auth.
pub fn build(state: AppState, environment: Environment) -> Router {
    let require_token = middleware::from_fn_with_state(state.clone(), auth::require_bearer_token);

    let routes = Router::new()
        .route("/", get(handlers::root))
        .route(
            "/address",
            get(handlers::list_addresses)
                .merge(post(handlers::create_address).route_layer(require_token.clone())),
        )
        .route(
            "/address/{id}",
            delete(handlers::delete_address).route_layer(require_token),
        )
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .with_state(state);

    let routes = errors::handle_internal_errors(routes, environment);

    security::apply_headers(routes).layer(cors()).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
