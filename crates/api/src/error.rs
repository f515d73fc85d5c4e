use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::models::booking::BookingStatus;
use domain::BookingError;
use persistence::repositories::AcceptJobError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Order total {total} is below the minimum order of {minimum}")]
    BelowMinimumOrder { total: i64, minimum: i64 },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Booking is not open for acceptance")]
    NotOpen,

    #[error("Booking already has the required number of staff")]
    CapacityExceeded,

    #[error("Staff member has already accepted or rejected this booking")]
    AlreadyActedOn,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::BelowMinimumOrder { .. } => (
                StatusCode::BAD_REQUEST,
                "below_minimum_order",
                self.to_string(),
            ),
            ApiError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "invalid_transition", self.to_string())
            }
            ApiError::NotOpen => (StatusCode::CONFLICT, "not_open", self.to_string()),
            ApiError::CapacityExceeded => {
                (StatusCode::CONFLICT, "capacity_exceeded", self.to_string())
            }
            ApiError::AlreadyActedOn => {
                (StatusCode::CONFLICT, "already_acted_on", self.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.clone().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();

        ApiError::Validation(messages.join(", "))
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) => ApiError::Validation(msg),
            BookingError::BelowMinimumOrder { total, minimum } => {
                ApiError::BelowMinimumOrder { total, minimum }
            }
            BookingError::InvalidTransition { from, to } => {
                ApiError::InvalidTransition { from, to }
            }
            BookingError::Forbidden(msg) => ApiError::Forbidden(msg),
            BookingError::NotOpen => ApiError::NotOpen,
            BookingError::CapacityExceeded => ApiError::CapacityExceeded,
            BookingError::AlreadyActedOn => ApiError::AlreadyActedOn,
            BookingError::NotFound(msg) => ApiError::NotFound(msg),
        }
    }
}

impl From<AcceptJobError> for ApiError {
    fn from(err: AcceptJobError) -> Self {
        match err {
            AcceptJobError::NotFound => ApiError::NotFound("Booking not found".into()),
            AcceptJobError::NotOpen(_) => ApiError::NotOpen,
            AcceptJobError::AlreadyActedOn => ApiError::AlreadyActedOn,
            AcceptJobError::CapacityExceeded => ApiError::CapacityExceeded,
            AcceptJobError::Database(db_err) => db_err.into(),
        }
    }
}
