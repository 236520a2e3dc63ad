//! HTTP mapping for order errors.

use crate::api::api_types::{ErrorResponse, InvalidTransitionResponse};
use crate::model::OrderStatus;
use crate::order_actor::OrderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

pub const NOT_FOUND: &str = "Not found";
pub const MISSING_STATUS: &str = "Missing status";
pub const INVALID_STATUS: &str = "Invalid status";
pub const INVALID_TRANSITION: &str = "Invalid transition";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
        allowed: Vec<OrderStatus>,
    },

    #[error("upstream failure: {0}")]
    BadGateway(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => ApiError::NotFound,
            OrderError::InvalidTransition { from, to } => ApiError::InvalidTransition {
                from,
                to,
                allowed: Vec::new(),
            },
            OrderError::ValidationError(msg) => ApiError::BadRequest(msg),
            OrderError::TransportError(msg) => ApiError::BadGateway(msg),
            OrderError::ActorCommunicationError(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidTransition { from, to, allowed } => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(InvalidTransitionResponse {
                        error: INVALID_TRANSITION.to_string(),
                        from,
                        to,
                        allowed,
                    }),
                )
                    .into_response();
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Order store unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
