//! Domain error types returned by core booking operations.

use crate::models::booking::BookingStatus;
use thiserror::Error;

/// Typed failures for booking, assignment and pricing operations.
///
/// Every core operation returns one of these; callers decide how to surface
/// them. The core never retries and never defaults silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Order total {total} is below the minimum order of {minimum}")]
    BelowMinimumOrder { total: i64, minimum: i64 },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Booking is not open for acceptance")]
    NotOpen,

    #[error("Booking already has the required number of staff")]
    CapacityExceeded,

    #[error("Staff member has already accepted or rejected this booking")]
    AlreadyActedOn,

    #[error("Not found: {0}")]
    NotFound(String),
}
