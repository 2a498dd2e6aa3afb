use crate::import::ImportError;
use crate::repository::RepositoryError;
use crate::result::CorsError;
use crate::view::ViewError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// CORS negotiation failed
    #[error(transparent)]
    Cors(#[from] CorsError),
    /// Reference does not resolve to a document
    #[error("not found: {0}")]
    NotFound(String),
    /// Caller could not be identified
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Payload unreadable or redirect URL unbuildable
    #[error("bad request: {0}")]
    Request(String),
    /// Document creation or permission assignment failed
    #[error(transparent)]
    Import(#[from] ImportError),
    /// Repository call failed
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error(transparent)]
    View(#[from] ViewError),
    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Cors(err) if err.is_protocol_violation() => StatusCode::BAD_REQUEST,
            GatewayError::Cors(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Request(_) => StatusCode::BAD_REQUEST,
            GatewayError::Import(_)
            | GatewayError::Storage(_)
            | GatewayError::View(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            GatewayError::Cors(CorsError::AmbiguousOrigin { values }) => {
                tracing::debug!(?values, "rejecting request with ambiguous Origin");
                status.into_response()
            }
            GatewayError::Cors(err) => {
                tracing::error!("CORS configuration error: {}", err);
                error_body(status, "internal_error", "An internal error occurred")
            }
            GatewayError::NotFound(what) => {
                error_body(status, "not_found", format!("'{}' not found", what))
            }
            GatewayError::Unauthorized(msg) => error_body(status, "unauthorized", msg),
            GatewayError::Request(msg) => error_body(status, "bad_request", msg),
            GatewayError::Import(e) => {
                tracing::error!("Import error: {}", e);
                error_body(status, "import_failed", "The upload could not be imported")
            }
            GatewayError::Storage(e) => {
                tracing::error!("Repository error: {}", e);
                error_body(status, "internal_error", "An internal error occurred")
            }
            GatewayError::View(e) => {
                tracing::error!("View error: {}", e);
                error_body(status, "internal_error", "An internal error occurred")
            }
            GatewayError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_body(status, "internal_error", "An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
