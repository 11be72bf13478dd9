use crate::address::ValidationError;
use crate::config::Environment;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use std::any::Any;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Missing or malformed Authorization header")]
    MalformedAuthorization,

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Address not found")]
    NotFound,

    /// Anything unclassified. Rendered by [`render_internal_errors`].
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::MalformedAuthorization => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Internal(err) => InternalFailure {
                message: err.to_string(),
                detail: format!("{err:?}"),
            }
            .into_response(),
            other => (other.status(), Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

/// Marker carried on a bare 500 response until the error renderer turns it
/// into a body suited to the current environment.
#[derive(Debug, Clone)]
pub struct InternalFailure {
    pub message: String,
    pub detail: String,
}

impl IntoResponse for InternalFailure {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Wraps a router so handler failures and panics come back as a 500 JSON
/// body. Production bodies are opaque; elsewhere the error is echoed.
pub fn handle_internal_errors(router: Router, environment: Environment) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            environment,
            render_internal_errors,
        ))
}

async fn render_internal_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(failure) = response.extensions_mut().remove::<InternalFailure>() else {
        return response;
    };

    tracing::error!(error = %failure.detail, "request failed");

    let body = if environment.is_production() {
        json!({ "error": { "message": "server error" } })
    } else {
        json!({
            "message": failure.message,
            "error": {
                "message": failure.message,
                "detail": failure.detail,
            },
        })
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    InternalFailure {
        detail: format!("panic: {message}"),
        message,
    }
    .into_response()
}
